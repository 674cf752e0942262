//! Event loop and key handling.
//!
//! `handle_key` is the single entry point for input; it is also what tests
//! drive, since it needs no terminal.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{ActiveTab, AppState, FormAction, FormKind, FormState, InputMode, MISSING_FIELDS, ModalState};
use crate::search::apply_search;
use crate::ui;

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    info!("event loop started");
    loop {
        app.expire_toast(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    break;
                }
            }
        }
    }
    info!(uptime = ?app.started_at.elapsed(), "event loop finished");
    Ok(())
}

/// Apply one key press. Returns `false` when the application should exit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Form => handle_form_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    true
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(&key) else {
        return true;
    };
    match action {
        KeyAction::Quit => return false,
        KeyAction::NextTab => app.active_tab = app.active_tab.next(),
        KeyAction::PrevTab => app.active_tab = app.active_tab.prev(),
        KeyAction::StartSearch => {
            if app.active_tab == ActiveTab::Books {
                app.search_query.clear();
                apply_search(app);
                app.input_mode = InputMode::Search;
            }
        }
        KeyAction::NewEntry => {
            let kind = match app.active_tab {
                ActiveTab::Books => FormKind::AddBook,
                ActiveTab::Users => FormKind::RegisterUser,
                ActiveTab::Loans => FormKind::Loan,
            };
            app.open_form(FormState::new(kind));
        }
        KeyAction::OpenLoanForm => app.open_form(FormState::new(FormKind::Loan)),
        KeyAction::EnterAction => match prefilled_loan_form(app) {
            Some(form) => app.open_form(form),
            None => {
                let keys = app.keymap.keys_for(KeyAction::OpenLoanForm).join("/");
                app.show_info(format!(
                    "Nothing selected on the {} tab. Press {keys} to open an empty loan form.",
                    app.active_tab.title()
                ));
            }
        },
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::MoveUp => move_selection(app, -1),
        KeyAction::MoveDown => move_selection(app, 1),
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1) as isize;
            move_selection(app, -rpp);
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1) as isize;
            move_selection(app, rpp);
        }
        KeyAction::Ignore => {}
    }
    true
}

fn move_selection(app: &mut AppState, delta: isize) {
    let last = app.active_len().saturating_sub(1);
    let idx = app.active_index_mut();
    *idx = idx.saturating_add_signed(delta).min(last);
}

/// Loan form filled from the selected row: the book's ISBN, the user's id, or both for a loan.
fn prefilled_loan_form(app: &AppState) -> Option<FormState> {
    match app.active_tab {
        ActiveTab::Books => app
            .books
            .get(app.selected_book_index)
            .map(|b| FormState::loan("", &b.isbn)),
        ActiveTab::Users => app
            .catalog
            .list_users()
            .get(app.selected_user_index)
            .map(|u| FormState::loan(&u.user_id, "")),
        ActiveTab::Loans => app.catalog.list_loans().get(app.selected_loan_index).map(|l| {
            let mut form = FormState::loan(&l.user_id, &l.isbn);
            // a selected loan is usually being returned
            form.selected = form.values.len() + 1;
            form
        }),
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => form.next(),
        KeyCode::BackTab | KeyCode::Up => form.prev(),
        KeyCode::Enter => match form.selected_action() {
            Some(action) => submit_form(app, action),
            None => form.next(),
        },
        KeyCode::Backspace => {
            if let Some(field) = form.selected_field_mut() {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = form.selected_field_mut() {
                field.push(c);
            }
        }
        _ => {}
    }
}

/// Run `action` against the catalog with the open form's values.
///
/// Any empty field is rejected before the catalog is touched. On failure the
/// form keeps its values so the user can correct and retry.
fn submit_form(app: &mut AppState, action: FormAction) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    if !form.all_filled() {
        debug!(?action, "form rejected: empty field");
        app.show_warning(MISSING_FIELDS);
        return;
    }
    let v = form.values.clone();

    let outcome: Result<(&str, bool), String> = match action {
        FormAction::AddBook => {
            app.catalog.register_book(&v[0], &v[1], &v[2]);
            apply_search(app);
            Ok(("Book added successfully!", true))
        }
        FormAction::RegisterUser => {
            app.catalog.register_user(&v[0], &v[1]);
            Ok(("User registered successfully!", true))
        }
        FormAction::Borrow => app
            .catalog
            .borrow(&v[0], &v[1])
            .map(|()| ("Book borrowed successfully!", true))
            .map_err(|e| format!("Book could not be borrowed: {e}. Check User ID or ISBN.")),
        // returning leaves the fields in place
        FormAction::Return => app
            .catalog
            .return_book(&v[0], &v[1])
            .map(|()| ("Book returned successfully!", false))
            .map_err(|e| format!("Book could not be returned: {e}. Check User ID or ISBN.")),
    };

    match outcome {
        Ok((message, clear)) => {
            info!(?action, "form submitted");
            if clear {
                if let Some(form) = app.form.as_mut() {
                    form.clear();
                }
            }
            clamp_selections(app);
            app.show_toast(message);
        }
        Err(message) => {
            info!(?action, reason = %message, "form action failed");
            app.show_warning(message);
        }
    }
}

fn clamp_selections(app: &mut AppState) {
    app.selected_book_index = app.selected_book_index.min(app.books.len().saturating_sub(1));
    app.selected_user_index = app
        .selected_user_index
        .min(app.catalog.user_count().saturating_sub(1));
    app.selected_loan_index = app
        .selected_loan_index
        .min(app.catalog.loan_count().saturating_sub(1));
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            _ => {}
        },
        Some(ModalState::Info { .. }) | Some(ModalState::Warning { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.close_modal(),
            _ => {}
        },
        None => app.close_modal(),
    }
}
