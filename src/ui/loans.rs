use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};

use crate::app::AppState;
use crate::ui::components::{bordered, fit_rows, page_bounds};

pub fn render_loans_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    fit_rows(app, area);
    let view = app.catalog.resolve_loan_view();
    let (start, end) = page_bounds(app.selected_loan_index, app.rows_per_page, view.len());

    let muted = Style::default().fg(app.theme.muted);
    let rows = view[start..end].iter().enumerate().map(|(i, v)| {
        let style = if start + i == app.selected_loan_index {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let book = Cell::from(v.book_title.clone());
        let user = Cell::from(v.user_name.clone());
        Row::new(vec![
            if v.book_found { book } else { book.style(muted) },
            Cell::from(v.isbn.clone()),
            if v.user_found { user } else { user.style(muted) },
        ])
        .style(style)
    });

    let widths = [Constraint::Percentage(45), Constraint::Percentage(20), Constraint::Percentage(35)];
    let header = Row::new(vec!["Book Name", "ISBN", "User"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );
    let title = format!("Borrowed Books ({})", view.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(&title, app))
        .column_spacing(1);
    f.render_widget(table, area);
}
