use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its `defaults` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `iexpense_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/iexpense`
/// - `args` - The optional currency and storage key to write into the config.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub fn init(iexpense_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(iexpense_home, args.currency(), args.storage_key())
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the iexpense directory at {}",
        config.root().display()
    )
    .into())
}
