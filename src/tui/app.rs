use crate::form::AddForm;
use crate::kv::KeyValue;
use crate::model::Category;
use crate::store::Store;
use crate::view::Currency;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Category,
    Amount,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Category,
            FormField::Category => FormField::Amount,
            FormField::Amount => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Name,
        }
    }
}

/// The add modal while it is open.
#[derive(Debug, Clone)]
pub struct FormState {
    pub form: AddForm,
    pub focus: FormField,
    pub error: Option<String>,
}

impl FormState {
    fn new(category: Category) -> Self {
        Self {
            form: AddForm {
                category,
                ..AddForm::default()
            },
            focus: FormField::Name,
            error: None,
        }
    }
}

pub struct App<K>
where
    K: KeyValue,
{
    store: Store<K>,
    currency: Currency,
    /// The section that receives navigation and delete keys.
    pub focus: Category,
    pub personal: ListState,
    pub business: ListState,
    pub form: Option<FormState>,
    pub status: String,
    pub quit: bool,
}

impl<K> App<K>
where
    K: KeyValue,
{
    pub fn new(store: Store<K>, currency: Currency) -> Self {
        let mut app = Self {
            store,
            currency,
            focus: Category::Personal,
            personal: ListState::default(),
            business: ListState::default(),
            form: None,
            status: "a: add | d: delete | Tab: switch section | q: quit".into(),
            quit: false,
        };
        app.clamp_selections();
        app
    }

    pub fn store(&self) -> &Store<K> {
        &self.store
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn selection(&self, category: Category) -> &ListState {
        match category {
            Category::Personal => &self.personal,
            Category::Business => &self.business,
        }
    }

    fn selection_mut(&mut self, category: Category) -> &mut ListState {
        match category {
            Category::Personal => &mut self.personal,
            Category::Business => &mut self.business,
        }
    }

    /// Keeps each section's selection inside the section, selecting the first row of a non-empty
    /// section that has no selection.
    fn clamp_selections(&mut self) {
        for category in Category::ALL {
            let len = self.store.sections().section(category).len();
            let sel = self.selection_mut(category);
            match (len, sel.selected()) {
                (0, _) => sel.select(None),
                (n, Some(i)) if i >= n => sel.select(Some(n - 1)),
                (_, None) => sel.select(Some(0)),
                _ => {}
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let n = self.store.sections().section(self.focus).len();
        let sel = self.selection_mut(self.focus);
        if n == 0 {
            sel.select(None);
            return;
        }
        let cur = sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        sel.select(Some(next));
    }

    fn delete_selected(&mut self) {
        let Some(offset) = self.selection(self.focus).selected() else {
            self.status = format!("Nothing to delete in {}", self.focus);
            return;
        };
        let removed = self.store.remove_in_section(self.focus, [offset]);
        match removed.first() {
            Some(record) => {
                debug!("Deleted '{}' from {}", record.name(), self.focus);
                self.status = if self.store.is_saved() {
                    format!("Deleted '{}'", record.name())
                } else {
                    format!("Deleted '{}' but could not save the list", record.name())
                };
            }
            None => self.status = format!("Nothing to delete in {}", self.focus),
        }
        self.clamp_selections();
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.kind != KeyEventKind::Press {
            return;
        }
        if self.form.is_some() {
            self.handle_form_key(k);
            return;
        }

        match k.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.next(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('a') | KeyCode::Char('+') => {
                self.form = Some(FormState::new(self.focus));
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, k: KeyEvent) {
        let Some(state) = self.form.as_mut() else {
            return;
        };
        match k.code {
            KeyCode::Esc => {
                self.form = None;
                self.status = "Cancelled".into();
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => state.focus = state.focus.next(),
            KeyCode::BackTab | KeyCode::Up => state.focus = state.focus.prev(),
            KeyCode::Left if state.focus == FormField::Category => {
                state.form.category = state.form.category.prev();
            }
            KeyCode::Right | KeyCode::Char(' ') if state.focus == FormField::Category => {
                state.form.category = state.form.category.next();
            }
            KeyCode::Char(c) => match state.focus {
                FormField::Name => state.form.name.push(c),
                FormField::Amount => {
                    if c.is_ascii_digit() || matches!(c, '.' | ',' | '$' | '-') {
                        state.form.amount.push(c);
                    }
                }
                FormField::Category => {}
            },
            KeyCode::Backspace => match state.focus {
                FormField::Name => {
                    state.form.name.pop();
                }
                FormField::Amount => {
                    state.form.amount.pop();
                }
                FormField::Category => {}
            },
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(state) = self.form.as_mut() else {
            return;
        };
        match state.form.submit() {
            Ok(record) => {
                let category = record.category();
                let name = record.name().to_string();
                self.store.append(record);
                self.status = if self.store.is_saved() {
                    format!("Added '{name}'")
                } else {
                    format!("Added '{name}' but could not save the list")
                };
                self.form = None;
                self.focus = category;
                self.clamp_selections();
                let last = self.store.sections().section(category).len().saturating_sub(1);
                self.selection_mut(category).select(Some(last));
            }
            Err(e) => state.error = Some(format!("{e:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryKeyValue, ReadOnlyKeyValue};
    use crate::store::DEFAULT_STORAGE_KEY;

    fn press<K: KeyValue>(app: &mut App<K>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text<K: KeyValue>(app: &mut App<K>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add<K: KeyValue>(app: &mut App<K>, name: &str, business: bool, amount: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, name);
        press(app, KeyCode::Tab);
        if business != (app.form.as_ref().unwrap().form.category == Category::Business) {
            press(app, KeyCode::Right);
        }
        press(app, KeyCode::Tab);
        type_text(app, amount);
        press(app, KeyCode::Enter);
    }

    fn new_app() -> (App<MemoryKeyValue>, MemoryKeyValue) {
        let kv = MemoryKeyValue::new();
        let store = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        (App::new(store, Currency::default()), kv)
    }

    fn names(app: &App<MemoryKeyValue>) -> Vec<&str> {
        app.store().records().iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_add_through_form() {
        let (mut app, kv) = new_app();
        add(&mut app, "Coffee", false, "3.50");
        assert!(app.form.is_none());
        assert_eq!(names(&app), vec!["Coffee"]);
        assert_eq!(app.personal.selected(), Some(0));
        assert_eq!(app.status, "Added 'Coffee'");

        // Persisted immediately.
        assert_eq!(Store::load(&kv, DEFAULT_STORAGE_KEY).len(), 1);
    }

    #[test]
    fn test_add_business_moves_focus() {
        let (mut app, _) = new_app();
        add(&mut app, "Hotel", true, "180");
        assert_eq!(app.focus, Category::Business);
        assert_eq!(
            app.store().records()[0].category(),
            Category::Business
        );
        assert_eq!(app.business.selected(), Some(0));
    }

    #[test]
    fn test_form_error_keeps_form_open() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Name is required"));
        assert!(app.store().records().is_empty());
    }

    #[test]
    fn test_form_escape_cancels() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Tea");
        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());
        assert!(!app.quit);
        assert!(app.store().records().is_empty());
    }

    #[test]
    fn test_amount_field_ignores_letters() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::BackTab);
        type_text(&mut app, "1x2.5q");
        assert_eq!(app.form.as_ref().unwrap().form.amount, "12.5");
    }

    #[test]
    fn test_delete_in_business_section() {
        let (mut app, _) = new_app();
        add(&mut app, "Coffee", false, "3.50");
        add(&mut app, "Hotel", true, "180");
        add(&mut app, "Books", false, "25");
        add(&mut app, "Taxi", true, "32");

        app.focus = Category::Business;
        app.business.select(Some(0));
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(names(&app), vec!["Coffee", "Books", "Taxi"]);
        assert_eq!(app.status, "Deleted 'Hotel'");
        assert_eq!(app.business.selected(), Some(0));
    }

    #[test]
    fn test_delete_last_row_clears_selection() {
        let (mut app, _) = new_app();
        add(&mut app, "Coffee", false, "3.50");
        press(&mut app, KeyCode::Char('d'));
        assert!(app.store().records().is_empty());
        assert_eq!(app.personal.selected(), None);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.status, "Nothing to delete in Personal");
    }

    #[test]
    fn test_navigation_wraps() {
        let (mut app, _) = new_app();
        add(&mut app, "a", false, "1");
        add(&mut app, "b", false, "1");
        app.personal.select(Some(0));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.personal.selected(), Some(1));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.personal.selected(), Some(0));
    }

    #[test]
    fn test_tab_switches_section_and_q_quits() {
        let (mut app, _) = new_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Category::Business);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn test_backspace_does_not_delete() {
        let (mut app, _) = new_app();
        add(&mut app, "Coffee", false, "3.50");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(names(&app), vec!["Coffee"]);
        assert_eq!(app.status, "Added 'Coffee'");
    }

    #[test]
    fn test_failed_save_shows_in_status() {
        let kv = MemoryKeyValue::new();
        let mut seed = Store::open(kv.clone(), DEFAULT_STORAGE_KEY);
        seed.append(AddForm::new("Hotel", Category::Business, "180").submit().unwrap());
        let store = Store::open(ReadOnlyKeyValue(kv.clone()), DEFAULT_STORAGE_KEY);
        let mut app = App::new(store, Currency::default());

        add(&mut app, "Coffee", false, "3.50");
        assert!(app.form.is_none());
        assert_eq!(app.status, "Added 'Coffee' but could not save the list");
        assert_eq!(app.store().records().len(), 2);

        app.focus = Category::Business;
        app.business.select(Some(0));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.status, "Deleted 'Hotel' but could not save the list");
        assert_eq!(app.store().records().len(), 1);
        assert_eq!(Store::load(&kv, DEFAULT_STORAGE_KEY).len(), 1);
    }
}
