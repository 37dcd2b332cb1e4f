use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct InvoicingConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Directory holding the stored collections.
    pub data_dir: PathBuf,
    /// Where generated PDFs and backups are written.
    pub output_dir: PathBuf,
}

impl InvoicingConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(InvoicingConfig {
            common: common_config,
            data_dir: get_env("INVOICING_DATA_DIR", Some("data"), is_prod)?.into(),
            output_dir: get_env("INVOICING_OUTPUT_DIR", Some("."), is_prod)?.into(),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("ENVIRONMENT");
        env::remove_var("INVOICING_DATA_DIR");
        env::remove_var("INVOICING_OUTPUT_DIR");
    }

    #[test]
    #[serial]
    fn test_defaults_outside_production() {
        clear_env();
        let config = InvoicingConfig::load().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    #[serial]
    fn test_env_overrides_directories() {
        clear_env();
        env::set_var("INVOICING_DATA_DIR", "/tmp/invoicing-data");
        let config = InvoicingConfig::load().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/invoicing-data"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_explicit_directories() {
        clear_env();
        env::set_var("ENVIRONMENT", "prod");
        let err = InvoicingConfig::load().unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("INVOICING_DATA_DIR"));
        clear_env();
    }
}
