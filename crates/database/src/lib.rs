//! # Stock Insights Data Access
//!
//! This crate loads the two input tables of the dashboard, the daily price table and
//! the ticker → sector mapping, either from the MySQL database or from CSV exports.
//!
//! ## Architectural Principles
//!
//! - **Adapter Only:** This crate encapsulates all SQL and file-format details. It hands
//!   back polars `DataFrame`s; column validation and typing happen in `core-types`.
//! - **One Snapshot Per Run:** Each loader reads a whole table once. Nothing is cached
//!   or refreshed behind the caller's back.
//! - **Asynchronous & Pooled:** Database access is asynchronous over a `MySqlPool`.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Creates the `stock_data` and `sector_data` tables if missing.
//! - `DbRepository`: Holds the pool and fetches both tables as frames.
//! - `load_frame`: Reads any headered CSV file into a `DataFrame`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod csv_source;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use csv_source::load_frame;
pub use error::DbError;
pub use repository::DbRepository;
