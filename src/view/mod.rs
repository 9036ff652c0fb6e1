//! The list view model: the expense list split into one section per category.
//!
//! Both the command line and the terminal UI render from `Sections`. A section is a filtered view
//! of the store, so every `Row` remembers the position of its record in the full list. Offsets
//! that a user picks within a section must go through `Section::store_indices` before they are
//! used to remove anything from the store.

mod currency;

pub use currency::{Currency, DEFAULT_CURRENCY};

use crate::model::{Category, ExpenseRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The badge shown next to an amount. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Less than 10.
    Low,
    /// At least 10 and less than 100.
    Mid,
    /// 100 or more.
    High,
}

serde_plain::derive_display_from_serialize!(Tier);

impl Tier {
    pub fn for_amount(value: Decimal) -> Self {
        if value < Decimal::TEN {
            Tier::Low
        } else if value < Decimal::ONE_HUNDRED {
            Tier::Mid
        } else {
            Tier::High
        }
    }
}

/// One record as it appears inside a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    index: usize,
    record: &'a ExpenseRecord,
}

impl<'a> Row<'a> {
    /// The position of the record in the full, unfiltered list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &'a ExpenseRecord {
        self.record
    }

    pub fn tier(&self) -> Tier {
        Tier::for_amount(self.record.amount().value())
    }

    pub fn amount_text(&self, currency: &Currency) -> String {
        currency.format(self.record.amount().value())
    }

    /// What a screen reader says for the row, e.g. `Coffee, $3.50`.
    pub fn accessibility_label(&self, currency: &Currency) -> String {
        format!("{}, {}", self.record.name(), self.amount_text(currency))
    }

    /// Extra context for a screen reader; the category.
    pub fn accessibility_hint(&self) -> &'static str {
        self.record.category().as_str()
    }
}

/// The records of one category, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    category: Category,
    rows: Vec<Row<'a>>,
}

impl<'a> Section<'a> {
    pub fn category(&self) -> Category {
        self.category
    }

    /// The header text.
    pub fn title(&self) -> &'static str {
        self.category.as_str()
    }

    pub fn rows(&self) -> &[Row<'a>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&Row<'a>> {
        self.rows.get(offset)
    }

    /// Translates offsets within this section into positions in the full list. Offsets past the
    /// end of the section are dropped. The result is sorted and free of duplicates.
    pub fn store_indices(&self, offsets: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        offsets
            .into_iter()
            .filter_map(|offset| self.rows.get(offset).map(Row::index))
            .collect()
    }
}

/// All sections, in the order they are displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> Sections<'a> {
    /// Partitions `records` into one section per category. Every record lands in exactly one
    /// section and keeps its relative order.
    pub fn new(records: &'a [ExpenseRecord]) -> Self {
        let sections = Category::ALL
            .into_iter()
            .map(|category| Section {
                category,
                rows: records
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| record.category() == category)
                    .map(|(index, record)| Row { index, record })
                    .collect(),
            })
            .collect();
        Self { sections }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section<'a>> {
        self.sections.iter()
    }

    pub fn section(&self, category: Category) -> &Section<'a> {
        // `new` builds one section for each entry of `Category::ALL`, in that order.
        let position = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        &self.sections[position]
    }
}
