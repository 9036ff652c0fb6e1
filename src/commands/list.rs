use crate::commands::{expenses, Out};
use crate::model::Category;
use crate::view::{Currency, Section, Tier};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Write;

/// One section of the `list` output.
#[derive(Debug, Clone, Serialize)]
pub struct ListedSection {
    pub category: Category,
    pub rows: Vec<ListedRow>,
}

/// One row of the `list` output. `offset` is what `delete` expects.
#[derive(Debug, Clone, Serialize)]
pub struct ListedRow {
    pub offset: usize,
    pub name: String,
    pub amount: String,
    pub formatted: String,
    pub tier: Tier,
    pub accessibility_label: String,
    pub accessibility_hint: &'static str,
}

impl ListedSection {
    fn new(section: &Section<'_>, currency: &Currency) -> Self {
        let rows = section
            .rows()
            .iter()
            .enumerate()
            .map(|(offset, row)| ListedRow {
                offset,
                name: row.record().name().to_string(),
                amount: row.record().amount().to_string(),
                formatted: row.amount_text(currency),
                tier: row.tier(),
                accessibility_label: row.accessibility_label(currency),
                accessibility_hint: row.accessibility_hint(),
            })
            .collect();
        Self {
            category: section.category(),
            rows,
        }
    }
}

/// Lists every expense, one section per category.
///
/// The message is the rendered listing; the structure holds the same data for each section.
pub fn list(config: Config) -> Result<Out<Vec<ListedSection>>> {
    let store = config.store()?;
    let currency = config.currency();
    let sections: Vec<ListedSection> = store
        .sections()
        .iter()
        .map(|s| ListedSection::new(s, &currency))
        .collect();
    let message = render(&sections, store.records().len());
    Ok(Out::new(message, sections))
}

fn render(sections: &[ListedSection], total: usize) -> String {
    let mut text = format!("iExpense: {}", expenses(total));
    for section in sections {
        let _ = write!(text, "\n\n{}", section.category);
        if section.rows.is_empty() {
            text.push_str("\n  (none)");
        }
        for row in &section.rows {
            let _ = write!(
                text,
                "\n  {:>3}  {:<24} {:>14}  [{}]",
                row.offset, row.name, row.formatted, row.tier
            );
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_list_empty() {
        let env = TestEnv::new();
        let out = list(env.config()).unwrap();
        assert!(out.message().starts_with("iExpense: 0 expenses"));
        assert!(out.message().contains("Personal\n  (none)"));
        let sections = out.structure().unwrap();
        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|s| s.rows.is_empty()));
    }

    #[test]
    fn test_list_sections() {
        let env = TestEnv::new();
        env.add("Coffee", Category::Personal, "3.50");
        env.add("Hotel", Category::Business, "180");
        env.add("Taxi", Category::Business, "32.10");

        let out = list(env.config()).unwrap();
        let sections = out.structure().unwrap();
        assert_eq!(sections[0].category, Category::Personal);
        assert_eq!(sections[1].category, Category::Business);

        let business = &sections[1].rows;
        assert_eq!(business.len(), 2);
        assert_eq!(business[0].offset, 0);
        assert_eq!(business[0].name, "Hotel");
        assert_eq!(business[0].formatted, "$180.00");
        assert_eq!(business[0].tier, Tier::High);
        assert_eq!(business[0].accessibility_label, "Hotel, $180.00");
        assert_eq!(business[0].accessibility_hint, "Business");
        assert_eq!(business[1].name, "Taxi");
        assert_eq!(business[1].tier, Tier::Mid);

        assert!(out.message().starts_with("iExpense: 3 expenses"));
        assert!(out.message().contains("Coffee"));
        assert!(out.message().contains("[low]"));
    }
}
