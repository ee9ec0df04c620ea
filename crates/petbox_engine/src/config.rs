use serde::Deserialize;

use petbox_base::pal::{FilePath, PalHandle};
use petbox_base::{PetboxResult, err};

/// Configuration for a petbox server, loaded from `petbox.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the backing JSON file, relative to the PAL base directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Host address to bind the HTTP server to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on. When absent the OS assigns a free port.
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_data_file() -> String {
    "pets.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            host: default_host(),
            port: None,
        }
    }
}

/// Load and parse the configuration file through the PAL.
pub fn load_config(pal: &PalHandle, path: &FilePath) -> PetboxResult<Config> {
    let contents = pal.read_file_to_string(path)?;
    toml::from_str(&contents).map_err(|e| err!("Failed to parse config {}: {}", path, e))
}
