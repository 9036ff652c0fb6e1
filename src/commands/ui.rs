use crate::commands::{expenses, Out};
use crate::{tui, Config, Result};
use anyhow::ensure;

/// Runs the interactive screen until the user quits.
///
/// # Errors
/// - Returns an error if the terminal cannot be used or the last change could not be saved.
pub fn ui(config: Config) -> Result<Out<()>> {
    let store = config.store()?;
    let app = tui::App::new(store, config.currency());
    let app = tui::run(app)?;
    ensure!(app.store().is_saved(), "The last change could not be saved");
    Ok(format!("Saved {}", expenses(app.store().records().len())).into())
}
