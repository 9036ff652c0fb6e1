use crate::args::AddArgs;
use crate::commands::Out;
use crate::form::AddForm;
use crate::model::ExpenseRecord;
use crate::{Config, Result};
use anyhow::ensure;

/// Validates the expense described by `args` and appends it to the list.
///
/// # Errors
///
/// - Returns an error if the name is empty or the amount is not a non-negative number. Nothing is
///   added in that case.
/// - Returns an error if the list could not be written.
pub fn add(config: Config, args: &AddArgs) -> Result<Out<ExpenseRecord>> {
    let record = AddForm::new(args.name(), args.category(), args.amount()).submit()?;
    let mut store = config.store()?;
    store.append(record.clone());
    ensure!(
        store.is_saved(),
        "The expense '{}' could not be saved",
        record.name()
    );
    let message = format!(
        "Added {} expense '{}' of {}",
        record.category(),
        record.name(),
        config.currency().format(record.amount().value())
    );
    Ok(Out::new(message, record))
}
