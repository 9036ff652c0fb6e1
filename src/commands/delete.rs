//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{expenses, Out};
use crate::model::ExpenseRecord;
use crate::{Config, Result};
use anyhow::{bail, ensure};

/// Deletes expenses by their offsets within one section.
///
/// This operation is all-or-nothing: if any offset does not exist in the section, nothing is
/// deleted.
pub fn delete(config: Config, args: &DeleteArgs) -> Result<Out<Vec<ExpenseRecord>>> {
    let mut store = config.store()?;
    let section_len = store.sections().section(args.section()).len();
    if let Some(missing) = args.offsets().iter().find(|&&offset| offset >= section_len) {
        bail!(
            "There is no {} expense at position {} (the section has {})",
            args.section(),
            missing,
            expenses(section_len)
        )
    }

    let deleted = store.remove_in_section(args.section(), args.offsets().iter().copied());
    ensure!(
        store.is_saved(),
        "The deletion of {} could not be saved",
        expenses(deleted.len())
    );
    let message = format!("Deleted {}", expenses(deleted.len()));
    Ok(Out::new(message, deleted))
}
