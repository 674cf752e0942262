// Integration tests for library-manager

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use library_manager::app::update::handle_key;
use library_manager::app::{ActiveTab, AppState, FormKind, InputMode, MISSING_FIELDS, ModalState};
use library_manager::LendingCatalog;

fn press(app: &mut AppState, code: KeyCode) -> bool {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Type into each field in turn, then land on the first button.
fn fill_form(app: &mut AppState, values: &[&str]) {
    for v in values {
        type_text(app, v);
        press(app, KeyCode::Enter);
    }
}

fn warning(app: &AppState) -> Option<&str> {
    match &app.modal {
        Some(ModalState::Warning { message }) => Some(message),
        _ => None,
    }
}

fn dune_app() -> AppState {
    let mut catalog = LendingCatalog::new();
    catalog.register_book("Dune", "Herbert", "111");
    catalog.register_user("u1", "Alice");
    AppState::with_catalog(catalog)
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use library_manager::app::Theme;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("theme.conf");

    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(t, t2);

    let missing = dir.path().join("fresh.conf");
    let created = Theme::load_or_init(&missing);
    assert!(missing.exists());
    assert_eq!(created, Theme::mocha());
}

// 2) Keymap file is created on first run and user overrides are honoured
#[test]
fn keymap_init_then_override() {
    use library_manager::app::keymap::{KeyAction, Keymap};

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("keybinds.conf");
    let _ = Keymap::load_or_init(&path);
    assert!(path.exists());

    std::fs::write(&path, "Quit = x\n").unwrap();
    let km = Keymap::load_or_init(&path);
    let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(km.resolve(&x), Some(KeyAction::Quit));
}

// 3) AppState::from_config writes both config files into the directory
#[test]
fn from_config_initialises_config_dir() {
    use library_manager::app::config::ConfigPaths;
    use library_manager::BorrowPolicy;

    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ConfigPaths::new(dir.path());
    let app = AppState::from_config(&paths, BorrowPolicy::RegisteredUsersOnly);
    assert!(paths.theme().exists());
    assert!(paths.keybinds().exists());
    assert_eq!(app.catalog.policy(), BorrowPolicy::RegisteredUsersOnly);
    assert_eq!(app.catalog.book_count(), 0);
}

// 4) Adding a book through the form registers it, clears the fields, and toasts
#[test]
fn add_book_form_registers_and_clears() {
    let mut app = AppState::default();
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.form.as_ref().map(|f| f.kind), Some(FormKind::AddBook));

    fill_form(&mut app, &["Dune", "Herbert", "111"]);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.catalog.book_count(), 1);
    assert_eq!(app.books.len(), 1);
    let form = app.form.as_ref().expect("form stays open");
    assert!(form.values.iter().all(String::is_empty));
    assert_eq!(
        app.toast.as_ref().map(|t| t.message.as_str()),
        Some("Book added successfully!")
    );
}

// 5) Empty fields are rejected with a warning; inputs and state are untouched
#[test]
fn empty_field_warns_and_keeps_input() {
    let mut app = AppState::default();
    app.active_tab = ActiveTab::Users;
    press(&mut app, KeyCode::Char('n'));
    fill_form(&mut app, &["u1", ""]);
    press(&mut app, KeyCode::Enter);

    assert_eq!(warning(&app), Some(MISSING_FIELDS));
    assert_eq!(app.catalog.user_count(), 0);
    assert_eq!(app.form.as_ref().unwrap().values, vec!["u1".to_string(), String::new()]);

    // dismissing returns to the form for a retry
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.form.is_some());
}

// 6) Borrow and return through the loan form, including failure paths
#[test]
fn loan_form_borrow_conflict_and_return() {
    let mut app = dune_app();
    press(&mut app, KeyCode::Char('b'));
    fill_form(&mut app, &["u1", "111"]);
    // first button is Borrow
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.catalog.borrower_of("111"), Some("u1"));
    assert!(app.form.as_ref().unwrap().values.iter().all(String::is_empty));

    // someone else tries to borrow the same book
    fill_form(&mut app, &["u2", "111"]);
    press(&mut app, KeyCode::Enter);
    let msg = warning(&app).expect("warning").to_string();
    assert!(msg.contains("already on loan"), "{msg}");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form.as_ref().unwrap().values, vec!["u2".to_string(), "111".to_string()]);

    // and to return it: move to the Return button
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    let msg = warning(&app).expect("warning").to_string();
    assert!(msg.contains("different user"), "{msg}");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.catalog.borrower_of("111"), Some("u1"));
}

// 7) Returning from the Loans tab via the prefilled form keeps the fields
#[test]
fn return_from_loans_tab_keeps_fields() {
    let mut app = dune_app();
    app.catalog.borrow("u1", "111").unwrap();
    app.active_tab = ActiveTab::Loans;

    press(&mut app, KeyCode::Enter);
    let form = app.form.as_ref().expect("loan form");
    assert_eq!(form.values, vec!["u1".to_string(), "111".to_string()]);

    // the prefilled form lands on Return
    press(&mut app, KeyCode::Enter);
    assert!(!app.catalog.is_loaned("111"));
    assert_eq!(
        app.toast.as_ref().map(|t| t.message.as_str()),
        Some("Book returned successfully!")
    );
    assert_eq!(
        app.form.as_ref().unwrap().values,
        vec!["u1".to_string(), "111".to_string()]
    );
}

// 8) Title search filters the Books tab and Esc restores the full list
#[test]
fn search_filters_books_by_title() {
    let mut app = dune_app();
    app.catalog.register_book("Neuromancer", "Gibson", "222");
    app.catalog.register_book("Dune Messiah", "Herbert", "333");
    library_manager::search::apply_search(&mut app);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Search);
    type_text(&mut app, "DUNE");
    press(&mut app, KeyCode::Enter);
    let titles: Vec<&str> = app.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Dune Messiah"]);

    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.books.len(), 3);
}

// 9) Navigation clamps to the list and q quits
#[test]
fn navigation_clamps_and_quit() {
    let mut app = dune_app();
    app.catalog.register_book("Neuromancer", "Gibson", "222");
    library_manager::search::apply_search(&mut app);

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_book_index, 1);
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Up);
    assert_eq!(app.selected_book_index, 0);

    press(&mut app, KeyCode::Tab);
    assert_eq!(app.active_tab, ActiveTab::Users);
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.active_tab, ActiveTab::Loans);

    assert!(!press(&mut app, KeyCode::Char('q')));
}

// 10) Rendering shows catalog rows and the loan join with Unknown fallback
#[test]
fn render_shows_tables() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut app = dune_app();
    app.catalog.borrow("ghost", "111").unwrap();
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

    let screen = |terminal: &Terminal<TestBackend>| -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    };

    terminal.draw(|f| library_manager::ui::render(f, &mut app)).unwrap();
    let books = screen(&terminal);
    assert!(books.contains("Dune"));
    assert!(books.contains("on loan"));

    app.active_tab = ActiveTab::Loans;
    terminal.draw(|f| library_manager::ui::render(f, &mut app)).unwrap();
    let loans = screen(&terminal);
    assert!(loans.contains("Borrowed Books (1)"));
    assert!(loans.contains("Unknown"));

    app.active_tab = ActiveTab::Users;
    press(&mut app, KeyCode::Char('?'));
    terminal.draw(|f| library_manager::ui::render(f, &mut app)).unwrap();
    assert!(screen(&terminal).contains("Help"));
}

// 11) Enter on an empty list explains how to reach the loan form
#[test]
fn enter_on_empty_tab_shows_info() {
    let mut app = AppState::default();
    app.active_tab = ActiveTab::Loans;
    press(&mut app, KeyCode::Enter);
    match &app.modal {
        Some(ModalState::Info { message }) => assert!(message.contains("Loans"), "{message}"),
        other => panic!("expected info modal, got {other:?}"),
    }
    assert!(app.form.is_none());
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.input_mode, InputMode::Normal);
}

// 12) Reopening search shows the full list, and Ctrl-chords never reach the query
#[test]
fn search_prompt_resets_view_and_ignores_ctrl_keys() {
    let mut app = dune_app();
    app.catalog.register_book("Neuromancer", "Gibson", "222");
    library_manager::search::apply_search(&mut app);

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "dune");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.books.len(), 1);

    // the prompt starts empty, so the table must match it
    press(&mut app, KeyCode::Char('/'));
    assert!(app.search_query.is_empty());
    assert_eq!(app.books.len(), 2);

    type_text(&mut app, "neu");
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(app.search_query, "neu");
    assert_eq!(app.input_mode, InputMode::Search);

    // shifted capitals still type
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
    assert_eq!(app.search_query, "neuR");
}

// 13) Every fenced block in the README that is not Rust says so
#[test]
fn readme_code_fences_are_tagged() {
    let readme = include_str!("../README.md");
    let mut open = false;
    for line in readme.lines().map(str::trim_start) {
        let Some(tag) = line.strip_prefix("```") else {
            continue;
        };
        if !open {
            assert!(!tag.trim().is_empty(), "untagged fence would run as a doctest");
        }
        open = !open;
    }
    assert!(!open, "unterminated fence");
}
