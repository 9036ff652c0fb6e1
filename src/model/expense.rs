use crate::model::{Amount, Category};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single expense entry.
///
/// The `id` is generated when the record is created and never changes. It exists so that list
/// rows have a stable identity; it carries no other meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseRecord {
    id: Uuid,
    name: String,
    /// Older lists name this field `type`.
    #[serde(alias = "type")]
    category: Category,
    amount: Amount,
}

impl ExpenseRecord {
    /// Creates a record with a freshly generated id. Callers are expected to have validated
    /// `name`, see `AddForm`.
    pub fn new(name: impl Into<String>, category: Category, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            amount,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}
