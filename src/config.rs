//! Configuration file handling for iexpense.
//!
//! The configuration file is stored at `$IEXPENSE_HOME/config.json` and names the key the expense
//! list is stored under and, optionally, the currency amounts are displayed in. The stored list
//! itself lives in `$IEXPENSE_HOME/defaults`.

use crate::kv::FileKeyValue;
use crate::store::{Store, DEFAULT_STORAGE_KEY};
use crate::view::Currency;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "iexpense";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DEFAULTS: &str = "defaults";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$IEXPENSE_HOME` and from there it loads `$IEXPENSE_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    defaults: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its `defaults` subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/iexpense`
    /// - `currency` - The currency code to display amounts in. When `None`, the currency is taken
    ///   from the locale each time the app runs.
    /// - `storage_key` - The key the expense list is stored under, `Items` when `None`.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub fn create(
        dir: impl Into<PathBuf>,
        currency: Option<&str>,
        storage_key: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the iexpense home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let defaults = root.join(DEFAULTS);
        utils::make_dir(&defaults)?;

        let storage_key = storage_key.unwrap_or(DEFAULT_STORAGE_KEY);
        check_storage_key(storage_key)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            storage_key: storage_key.to_string(),
            currency_code: currency.map(|c| Currency::new(c).code().to_string()),
            ..ConfigFile::default()
        };
        config_file.save(&config_path)?;

        Ok(Self {
            root,
            defaults,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `iexpense_home` exists and that the config file exists
    /// - load the config file
    /// - make sure the `defaults` directory exists
    pub fn load(iexpense_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = iexpense_home.into();
        let root = utils::canonicalize(&maybe_relative).context(
            "The iexpense home directory is missing, run `iexpense init` to create it",
        )?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run `iexpense init` to create it",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path)?;

        let defaults = root.join(DEFAULTS);
        utils::make_dir(&defaults)?;

        debug!("Loaded config from {}", config_path.display());
        Ok(Self {
            root,
            defaults,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory that holds the key-value files.
    pub fn defaults(&self) -> &Path {
        &self.defaults
    }

    pub fn storage_key(&self) -> &str {
        &self.config_file.storage_key
    }

    /// The configured currency, or the locale's currency if none is configured.
    pub fn currency(&self) -> Currency {
        match &self.config_file.currency_code {
            Some(code) => Currency::new(code),
            None => Currency::from_env(),
        }
    }

    /// Opens the expense list.
    pub fn store(&self) -> Result<Store<FileKeyValue>> {
        let kv = FileKeyValue::new(&self.defaults)?;
        Ok(Store::open(kv, self.storage_key()))
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "iexpense",
///   "config_version": 1,
///   "storage_key": "Items",
///   "currency_code": "EUR"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "iexpense"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The key the expense list is stored under
    #[serde(default = "default_storage_key")]
    storage_key: String,

    /// ISO 4217 code amounts are displayed in. Taken from the locale when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_code: Option<String>,
}

/// The storage key becomes a file name inside `defaults`, so it must be a single plain component.
fn check_storage_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("The storage key cannot be empty")
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-')))
    {
        bail!(
            "The storage key '{key}' contains '{c}', only ASCII letters, digits, '_' and '-' \
            are allowed"
        )
    }
    Ok(())
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            storage_key: default_storage_key(),
            currency_code: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        check_storage_key(&config.storage_key)
            .with_context(|| format!("Invalid storage_key in config file {}", path.display()))?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }
}
