//! The add-expense form. Input arrives as raw text and is validated here, before a record exists.

use crate::model::{Amount, Category, ExpenseRecord};
use crate::Result;
use anyhow::{ensure, Context};
use std::str::FromStr;

/// The fields of the add form as the user typed them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub name: String,
    pub category: Category,
    pub amount: String,
}

impl AddForm {
    pub fn new(name: impl Into<String>, category: Category, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            amount: amount.into(),
        }
    }

    /// Validates the form and produces a new record. The name is trimmed and must not be empty;
    /// the amount must parse as a non-negative decimal.
    pub fn submit(&self) -> Result<ExpenseRecord> {
        let name = self.name.trim();
        ensure!(!name.is_empty(), "Name is required");
        let amount = Amount::from_str(&self.amount).context("Please check the amount")?;
        Ok(ExpenseRecord::new(name, self.category, amount))
    }
}
