use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use contactnorm_core::settings::{validate_base_year, validate_country_code, validate_pivot_year};
use contactnorm_core::{NormalizerSettings, SettingsError};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "contactnorm";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub normalizer: NormalizerSettings,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub default_country_code: Option<String>,
    pub pivot_year: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid normalizer settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    normalizer: Option<NormalizerFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizerFile {
    default_country_code: Option<String>,
    pivot_year: Option<u32>,
    base_year: Option<i32>,
    months: Option<BTreeMap<String, u32>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn load_with_overrides(config_path: Option<PathBuf>, overrides: &Overrides) -> Result<AppConfig> {
    let mut config = load(config_path)?;
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();
    let Some(normalizer) = parsed.normalizer else {
        return Ok(config);
    };
    let settings = &mut config.normalizer;

    if let Some(code) = normalizer.default_country_code {
        let code = code.trim().to_string();
        validate_country_code(&code)?;
        settings.default_country_code = code;
    }
    if let Some(pivot) = normalizer.pivot_year {
        settings.pivot_year = validate_pivot_year(pivot)?;
    }
    if let Some(base) = normalizer.base_year {
        settings.base_year = validate_base_year(base)?;
    }
    if let Some(months) = normalizer.months {
        for (name, month) in months {
            settings.insert_month_name(&name, month)?;
        }
    }

    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, overrides: &Overrides) -> Result<()> {
    let settings = &mut config.normalizer;
    if let Some(code) = overrides.default_country_code.as_deref() {
        let code = code.trim().trim_start_matches('+');
        validate_country_code(code)?;
        settings.default_country_code = code.to_string();
    }
    if let Some(pivot) = overrides.pivot_year {
        settings.pivot_year = validate_pivot_year(pivot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        apply_overrides, load_at_path, merge_config, AppConfig, ConfigError, ConfigFile,
        NormalizerFile, Overrides,
    };
    use contactnorm_core::SettingsError;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let mut months = BTreeMap::new();
        months.insert("Janv".to_string(), 1);
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                default_country_code: Some(" 44 ".to_string()),
                pivot_year: Some(30),
                base_year: Some(1800),
                months: Some(months),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.normalizer.default_country_code, "44");
        assert_eq!(merged.normalizer.pivot_year, 30);
        assert_eq!(merged.normalizer.base_year, 1800);
        assert_eq!(merged.normalizer.month_number("janv"), Some(1));
        assert_eq!(merged.normalizer.month_number("jan"), Some(1));
    }

    #[test]
    fn merge_config_rejects_bad_values() {
        let parsed = ConfigFile {
            normalizer: Some(NormalizerFile {
                default_country_code: None,
                pivot_year: Some(120),
                base_year: None,
                months: None,
            }),
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSettings(SettingsError::InvalidPivotYear(120))
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[normalizer]\ndefault_country_code = \"1\"\npivot_year = 10\n[normalizer.months]\nmaerz = 3\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.normalizer.default_country_code, "1");
        assert_eq!(config.normalizer.pivot_year, 10);
        assert_eq!(config.normalizer.base_year, 1900);
        assert_eq!(config.normalizer.month_number("MAERZ"), Some(3));
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[normalizer]\ncountry = \"1\"\n").expect("write config");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = AppConfig::default();
        let overrides = Overrides {
            default_country_code: Some("+49".to_string()),
            pivot_year: Some(5),
        };
        apply_overrides(&mut config, &overrides).expect("overrides");
        assert_eq!(config.normalizer.default_country_code, "49");
        assert_eq!(config.normalizer.pivot_year, 5);

        let bad = Overrides {
            default_country_code: Some("abc".to_string()),
            pivot_year: None,
        };
        assert!(apply_overrides(&mut config, &bad).is_err());
    }
}
