use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::catalog::UNKNOWN_LABEL;
use crate::ui::components::{bordered, fit_rows, page_bounds};

pub fn render_books_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    fit_rows(app, area);
    let (start, end) = page_bounds(app.selected_book_index, app.rows_per_page, app.books.len());

    let rows = app.books[start..end].iter().enumerate().map(|(i, b)| {
        let style = if start + i == app.selected_book_index {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let status = if app.catalog.is_loaned(&b.isbn) { "on loan" } else { "available" };
        Row::new(vec![
            Cell::from(b.title.clone()),
            Cell::from(b.author.clone()),
            Cell::from(b.isbn.clone()),
            Cell::from(status),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
    ];
    let header = Row::new(vec!["Title", "Author", "ISBN", "Status"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let title = if app.search_query.is_empty() {
        format!("Books ({})", app.books.len())
    } else {
        format!("Books ({} of {})", app.books.len(), app.catalog.book_count())
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(&title, app))
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_book_details(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = match app.books.get(app.selected_book_index) {
        Some(book) => {
            let loan_line = match app.catalog.borrower_of(&book.isbn) {
                Some(user_id) => {
                    let name = app
                        .catalog
                        .find_user(user_id)
                        .map_or(UNKNOWN_LABEL, |u| u.name.as_str());
                    Line::from(vec![
                        Span::raw("On loan to: "),
                        Span::styled(
                            format!("{name} ({user_id})"),
                            Style::default().fg(app.theme.warning_fg),
                        ),
                    ])
                }
                None => Line::styled("Available", Style::default().fg(app.theme.success_fg)),
            };
            vec![
                Line::raw(book.to_string()),
                Line::raw(""),
                Line::raw(format!("Title: {}", book.title)),
                Line::raw(format!("Author: {}", book.author)),
                Line::raw(format!("ISBN: {}", book.isbn)),
                loan_line,
            ]
        }
        None => vec![Line::styled(
            "No books. Press n to add one.",
            Style::default().fg(app.theme.muted),
        )],
    };
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .block(bordered("Details", app));
    f.render_widget(p, area);
}
