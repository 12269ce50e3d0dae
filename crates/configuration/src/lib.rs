//! # Stock Insights Configuration
//!
//! Loads `config.toml` (data source, ranking sizes, logging) and layers
//! `INSIGHTS__SECTION__KEY` environment overrides on top of it.

use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalysisSettings, Config, DataSettings, DataSourceKind, LoggingSettings};

/// Prefix of environment overrides, e.g. `INSIGHTS__ANALYSIS__VOLATILITY_TOP_N=20`.
pub const ENV_PREFIX: &str = "INSIGHTS";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional: without it every setting takes its default, and environment
/// variables can still override individual values.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config.toml").required(false), environment())
}

/// Loads the application configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path).required(true), environment())
}

/// `INSIGHTS__SECTION__KEY` variables, e.g. `INSIGHTS__DATA__SOURCE=database`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn build<S>(file: S, environment: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_all_sections() {
        let file = config_file(
            r#"
            [data]
            source = "database"

            [analysis]
            volatility_top_n = 20
            cumulative_top_n = 3
            movers_per_side = 4

            [logging]
            level = "debug"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.data.source, DataSourceKind::Database);
        assert_eq!(config.analysis.ranking_limits().volatility_top_n, 20);
        assert_eq!(config.analysis.movers_per_side, 4);
        assert_eq!(config.logging.level, "debug");
        // Untouched keys keep their defaults.
        assert_eq!(config.logging.file_prefix, "stock-insights.log");
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = config_file("[analysis]\nmovers_per_side = 4\n\n[logging]\nlevel = \"debug\"\n");
        let variables = config::Map::from([
            ("INSIGHTS__ANALYSIS__MOVERS_PER_SIDE".to_string(), "7".to_string()),
            ("INSIGHTS__DATA__SOURCE".to_string(), "database".to_string()),
            ("OTHER__ANALYSIS__VOLATILITY_TOP_N".to_string(), "99".to_string()),
        ]);

        let config = build(config::File::from(file.path()), environment().source(Some(variables))).unwrap();

        assert_eq!(config.analysis.movers_per_side, 7);
        assert_eq!(config.data.source, DataSourceKind::Database);
        // Only the INSIGHTS prefix is read.
        assert_eq!(config.analysis.volatility_top_n, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn zero_ranking_size_is_invalid() {
        let file = config_file("[analysis]\ncumulative_top_n = 0\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_explicit_file_is_a_load_error() {
        let err = load_config_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
