//! # Stock Insights Core Types
//!
//! Layer 0 of the workspace. Every other crate speaks in these types.
//!
//! - `frame`: case-insensitive column access over the polars `DataFrame` handed over by
//!   a data-access collaborator. Columns may arrive in any order and with any capitalisation.
//! - `PriceTable` / `SectorTable`: the strongly-typed views of a `DataFrame`. Building one
//!   is the only place where a missing column is detected.
//! - `ReturnSign`: the positive/negative category attached to presented returns.

pub mod enums;
pub mod error;
pub mod frame;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::ReturnSign;
pub use error::CoreError;
pub use frame::{find_column, require_column};
pub use structs::{PriceRow, PriceTable, SectorRow, SectorTable};
