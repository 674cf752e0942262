//! Shared UI components (status bar, forms, modals, paging).
//!
//! Contains small building blocks reused by the books/users/loans screens.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormState, InputMode, ModalState};

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Visible window `[start, end)` of a list so that `selected` is on screen.
pub fn page_bounds(selected: usize, rows_per_page: usize, len: usize) -> (usize, usize) {
    let rpp = rows_per_page.max(1);
    let start = ((selected / rpp) * rpp).min(len);
    let end = (start + rpp).min(len);
    (start, end)
}

/// Update `app.rows_per_page` from a bordered table's height (border + header).
pub fn fit_rows(app: &mut AppState, area: Rect) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
}

pub fn bordered<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Render the bottom status bar with mode, counts, and the current toast.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Modal => "MODAL",
    };
    let mut spans = vec![Span::raw(format!(
        "mode: {mode}  books:{}  users:{}  on loan:{}  ",
        app.catalog.book_count(),
        app.catalog.user_count(),
        app.catalog.loan_count(),
    ))];
    if let Some(toast) = &app.toast {
        spans.push(Span::styled(
            toast.message.clone(),
            Style::default().fg(app.theme.success_fg).add_modifier(Modifier::BOLD),
        ));
    } else {
        let help = app.keymap.keys_for(KeyAction::OpenHelp).join("/");
        spans.push(Span::styled(
            format!("{help}: help"),
            Style::default().fg(app.theme.muted),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render a form: one labelled line per field, then the action buttons.
pub fn render_form(f: &mut Frame, area: Rect, app: &AppState, form: &FormState) {
    let labels = form.kind.labels();
    let actions = form.kind.actions();
    let label_w = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let height = (labels.len() + 6) as u16;
    let rect = centered_rect(60u16.min(area.width.saturating_sub(4)).max(40), height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        let focused = idx == form.selected;
        let marker = if focused { "▶" } else { " " };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker} {label:>label_w$}: ")),
            Span::styled(
                format!("{}{cursor}", form.value(idx)),
                Style::default().fg(app.theme.text),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    let mut buttons = vec![Span::raw("  ")];
    for (i, action) in actions.iter().enumerate() {
        let focused = form.selected == labels.len() + i;
        let style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        buttons.push(Span::styled(format!("[ {} ]", action.label()), style));
        buttons.push(Span::raw("  "));
    }
    lines.push(Line::from(buttons));
    lines.push(Line::styled(
        "Tab/↑↓ move · Enter next/submit · Esc close",
        Style::default().fg(app.theme.muted),
    ));

    let p = Paragraph::new(lines).block(bordered(form.kind.title(), app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render an info or warning message over the screen.
pub fn render_message_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let (title, message, color) = match state {
        ModalState::Info { message } => ("Info", message, app.theme.text),
        ModalState::Warning { message } => ("Warning", message, app.theme.warning_fg),
        ModalState::Help { .. } => return,
    };
    // Compute a sensible max width and height; wrap long text
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(vec![
        Line::styled(message.clone(), Style::default().fg(color)),
        Line::raw(""),
        Line::styled("Enter/Esc to close", Style::default().fg(app.theme.muted)),
    ])
    .wrap(Wrap { trim: false })
    .block(bordered(title, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal built from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let keys = |a: KeyAction| app.keymap.keys_for(a).join(", ");

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("General", bold))];
    for (label, action) in [
        ("Quit", KeyAction::Quit),
        ("Next tab", KeyAction::NextTab),
        ("Previous tab", KeyAction::PrevTab),
        ("Add book / register user / loan form", KeyAction::NewEntry),
        ("Borrow & return form", KeyAction::OpenLoanForm),
        ("Loan form for selected row", KeyAction::EnterAction),
        ("Search titles (Books tab)", KeyAction::StartSearch),
        ("Help", KeyAction::OpenHelp),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(keys(action), italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Navigation", bold)));
    for (label, action) in [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(keys(action), italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Forms", bold)));
    for (label, value) in [
        ("Next / previous field", "Tab, Down / Shift+Tab, Up"),
        ("Submit", "Enter on a button"),
        ("Close", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(value, italic),
        ]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(bordered("Help", app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
