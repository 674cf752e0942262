pub mod books;
pub mod components;
pub mod loans;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActiveTab, AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    render_header(f, root[0], app);

    match app.active_tab {
        ActiveTab::Books => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
                .split(root[1]);
            books::render_books_table(f, body[0], app);
            books::render_book_details(f, body[1], app);
        }
        ActiveTab::Users => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
                .split(root[1]);
            users::render_users_table(f, body[0], app);
            users::render_user_loans(f, body[1], app);
        }
        ActiveTab::Loans => loans::render_loans_table(f, root[1], app),
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    if let Some(form) = &app.form {
        components::render_form(f, area, app, form);
    }
    if let Some(state) = &app.modal {
        match state {
            ModalState::Info { .. } | ModalState::Warning { .. } => {
                components::render_message_modal(f, area, app, state)
            }
            ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
        }
    }
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let mut spans = vec![Span::styled(
        "Library Management System  ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for tab in ActiveTab::ALL {
        if tab == app.active_tab {
            spans.push(Span::styled(
                format!("[{}]", tab.title()),
                Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!(" {} ", tab.title())));
        }
        spans.push(Span::raw(" "));
    }
    if app.input_mode == InputMode::Search {
        spans.push(Span::raw(format!(" Search titles: {}", app.search_query)));
    } else if !app.search_query.is_empty() && app.active_tab == ActiveTab::Books {
        spans.push(Span::styled(
            format!(" filter: \"{}\"", app.search_query),
            Style::default().fg(app.theme.muted),
        ));
    }

    let p = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title("library-manager")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}
