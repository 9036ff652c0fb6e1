//! Types that represent the core data model: `ExpenseRecord` and the values it is made of.
mod amount;
mod category;
mod expense;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryError};
pub use expense::ExpenseRecord;
