//! Config for comdesc binary
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};

const CONF_DIR: &str = "comdesc";
const CONF_NAME: &str = "comdesc.json";

/// Defaults for output settings; command line flags are OR-ed on top
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Transliterate output to 8-bit safe characters
    pub ascii: bool,
    /// Print resolved ports as JSON
    pub json: bool,
    /// Disable coloured output
    pub no_colour: bool,
}

impl Config {
    /// Default new
    pub fn new() -> Config {
        Config {
            ..Default::default()
        }
    }

    /// Path of the user config file, `$CONFIG_DIR/comdesc/comdesc.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONF_DIR).join(CONF_NAME))
    }

    /// Attempt to read from .json format config at `file_path`
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Config> {
        let f = File::open(&file_path)?;
        let mut br = BufReader::new(f);
        let mut data = String::new();

        br.read_to_string(&mut data)?;
        serde_json::from_str::<Config>(&data).map_err(|e| {
            Error::new(
                ErrorKind::Config,
                &format!(
                    "Failed to parse config at {}: {}",
                    file_path.as_ref().display(),
                    e
                ),
            )
        })
    }

    /// Config at [`Config::default_path`] if it exists, otherwise [`Config::new`]
    pub fn sys() -> Result<Config> {
        match Self::default_path() {
            Some(p) if p.exists() => {
                log::info!("Using user config {:?}", p);
                Self::from_file(p)
            }
            _ => Ok(Config::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_kebab_case() {
        let config: Config = serde_json::from_str(r#"{"ascii": true, "no-colour": true}"#).unwrap();
        assert_eq!(
            config,
            Config {
                ascii: true,
                json: false,
                no_colour: true
            }
        );
    }

    #[test]
    fn test_deserialize_unknown_field_fails() {
        assert!(serde_json::from_str::<Config>(r#"{"colour": true}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let config = Config::from_file("./tests/data/config.json").unwrap();
        assert!(config.ascii);
        assert!(!config.json);
    }

    #[test]
    fn test_from_file_missing() {
        let e = Config::from_file("./tests/data/missing.json").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Io);
    }
}
