use std::fs::File;
use std::io::{BufReader, ErrorKind};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::FeedtuiError;

pub const DEFAULT_API_URL: &str = "https://final-api-pf8l.onrender.com/basilio/posts";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Display name used for one-shot posts from the command line.
    #[serde(default)]
    pub author: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            author: String::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Config {
    /// Read `~/.config/feedtui/config.json`; a missing file just means
    /// defaults.
    pub fn load() -> Result<Self, FeedtuiError> {
        let config_path = dirs::home_dir()
            .ok_or_else(|| FeedtuiError::Config("Could not find home directory".to_string()))?
            .join(".config/feedtui/config.json");

        let file = match File::open(&config_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => {
                return Err(FeedtuiError::Config(format!(
                    "Failed to open config file at {:?}: {}",
                    config_path, e
                )))
            }
        };

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context("Failed to parse config JSON")?;

        Ok(config)
    }
}
