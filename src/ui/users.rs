use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};

use crate::app::AppState;
use crate::catalog::UNKNOWN_LABEL;
use crate::ui::components::{bordered, fit_rows, page_bounds};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    fit_rows(app, area);
    let users = app.catalog.list_users();
    let (start, end) = page_bounds(app.selected_user_index, app.rows_per_page, users.len());

    let rows = users[start..end].iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_user_index {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.user_id.clone()),
            Cell::from(u.name.clone()),
            Cell::from(app.catalog.loans_for_user(&u.user_id).len().to_string()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(16), Constraint::Percentage(70), Constraint::Length(6)];
    let header = Row::new(vec!["User ID", "Name", "Loans"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let title = format!("Users ({})", users.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(&title, app))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Books currently held by the selected user.
pub fn render_user_loans(f: &mut Frame, area: Rect, app: &AppState) {
    let loans = app
        .catalog
        .list_users()
        .get(app.selected_user_index)
        .map(|u| app.catalog.loans_for_user(&u.user_id))
        .unwrap_or_default();

    let rows = loans.iter().map(|l| {
        let (title, style) = match app.catalog.find_book(&l.isbn) {
            Some(b) => (b.title.clone(), Style::default().fg(app.theme.text)),
            None => (UNKNOWN_LABEL.to_string(), Style::default().fg(app.theme.muted)),
        };
        Row::new(vec![Cell::from(title), Cell::from(l.isbn.clone())]).style(style)
    });

    let widths = [Constraint::Percentage(70), Constraint::Percentage(30)];
    let header = Row::new(vec!["Book", "ISBN"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered("Borrowed books", app))
        .column_spacing(1);
    f.render_widget(table, area);
}
