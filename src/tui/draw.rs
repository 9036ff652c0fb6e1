use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::kv::KeyValue;
use crate::model::Category;
use crate::tui::app::{App, FormField, FormState};
use crate::view::{Row, Tier};

pub fn draw<K: KeyValue>(f: &mut Frame, app: &mut App<K>) {
    let size = f.area();

    // title | personal | business | status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
            Constraint::Length(1),
        ])
        .split(size);

    let total = app.store().records().len();
    let title = Paragraph::new(Line::from(vec![
        Span::styled("iExpense", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {total} total")),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, root[0]);

    draw_section(f, root[1], app, Category::Personal);
    draw_section(f, root[2], app, Category::Business);

    f.render_widget(Paragraph::new(app.status.as_str()), root[3]);

    if let Some(state) = &app.form {
        let area = center_rect(size, 54, 11);
        f.render_widget(Clear, area);
        draw_form(f, area, state);
    }
}

fn draw_section<K: KeyValue>(f: &mut Frame, area: Rect, app: &mut App<K>, category: Category) {
    let currency = app.currency().clone();
    let focused = app.focus == category && app.form.is_none();

    let items: Vec<ListItem> = {
        let sections = app.store().sections();
        sections
            .section(category)
            .rows()
            .iter()
            .map(|row| ListItem::new(row_line(row, &row.amount_text(&currency))))
            .collect()
    };
    let empty = items.is_empty();

    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(category.as_str());

    if empty {
        let p = Paragraph::new("No expenses yet. Press a to add one.").block(block);
        f.render_widget(p, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });

    let sel = match category {
        Category::Personal => &mut app.personal,
        Category::Business => &mut app.business,
    };
    f.render_stateful_widget(list, area, sel);
}

fn row_line(row: &Row<'_>, amount: &str) -> Line<'static> {
    let record = row.record();
    Line::from(vec![
        Span::styled(
            format!("{:<28}", record.name()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{:<10}", record.category().as_str())),
        Span::styled(format!(" {amount:>14} "), badge(row.tier())),
    ])
}

fn badge(tier: Tier) -> Style {
    let bg = match tier {
        Tier::Low => Color::Blue,
        Tier::Mid => Color::Black,
        Tier::High => Color::Red,
    };
    Style::default().bg(bg).fg(Color::White)
}

fn draw_form(f: &mut Frame, area: Rect, state: &FormState) {
    let marker = |field: FormField| if state.focus == field { "> " } else { "  " };

    let mut lines = vec![
        Line::from(format!("{}Name     : {}", marker(FormField::Name), state.form.name)),
        Line::from(format!(
            "{}Category : < {} >",
            marker(FormField::Category),
            state.form.category
        )),
        Line::from(format!(
            "{}Amount   : {}",
            marker(FormField::Amount),
            state.form.amount
        )),
        Line::from(""),
        Line::from("Tab: next field | ←/→: category | Enter: save | Esc: cancel"),
    ];
    if let Some(err) = &state.error {
        lines.push(Line::from(""));
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add new expense"))
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(rect.width),
        height: h.min(rect.height),
    }
}
