//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod config;
pub mod keymap;
pub mod update;

use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::style::Color;
use tracing::warn;

use crate::catalog::{Book, BorrowPolicy, LendingCatalog};
use config::ConfigPaths;
use keymap::Keymap;

/// How long a success notification stays in the status bar.
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

/// Warning shown when a form is submitted with an empty field.
pub const MISSING_FIELDS: &str = "Please fill out all fields.";

/// Top-level active tab in the UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Books,
    Users,
    Loans,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 3] = [ActiveTab::Books, ActiveTab::Users, ActiveTab::Loans];

    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Books => "Books",
            ActiveTab::Users => "Users",
            ActiveTab::Loans => "Loans",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ActiveTab::Books => ActiveTab::Users,
            ActiveTab::Users => ActiveTab::Loans,
            ActiveTab::Loans => ActiveTab::Books,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveTab::Books => ActiveTab::Loans,
            ActiveTab::Users => ActiveTab::Books,
            ActiveTab::Loans => ActiveTab::Users,
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success_fg: Color,
    pub warning_fg: Color,
}

impl Theme {
    /// Plain ANSI palette for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success_fg: Color::Green,
            warning_fg: Color::Yellow,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success_fg: Color::Rgb(0xa6, 0xe3, 0xa1),   // green
            warning_fg: Color::Rgb(0xfa, 0xb3, 0x87),   // peach
        }
    }

    /// Load theme from a key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Some(Self::parse(&contents)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read theme");
                None
            }
        }
    }

    /// Parse `key = value` lines. An optional `preset = dark|mocha` picks the
    /// base palette; other keys override single colors.
    pub fn parse(contents: &str) -> Self {
        let pairs: Vec<(&str, &str)> = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| l.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();

        let mut theme = match pairs.iter().find(|(k, _)| *k == "preset").map(|(_, v)| *v) {
            Some("dark") => Self::dark(),
            Some("mocha") | None => Self::mocha(),
            Some(other) => {
                warn!(preset = other, "unknown theme preset, using mocha");
                Self::mocha()
            }
        };
        for (key, val) in pairs {
            if key == "preset" {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                warn!(key, value = val, "ignoring unparsable theme color");
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "success_fg" => theme.success_fg = color,
                "warning_fg" => theme.warning_fg = color,
                _ => {}
            }
        }
        theme
    }

    /// Parse "#RRGGBB", "RRGGBB", "index:N", or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        if let Some(idx) = lower.strip_prefix("index:") {
            return idx.trim().parse().ok().map(Color::Indexed);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            Color::Reset => "reset".to_string(),
            Color::Indexed(i) => format!("index:{}", i),
            // Named colors map to their ANSI index
            Color::Black => "index:0".to_string(),
            Color::Red => "index:1".to_string(),
            Color::Green => "index:2".to_string(),
            Color::Yellow => "index:3".to_string(),
            Color::Blue => "index:4".to_string(),
            Color::Magenta => "index:5".to_string(),
            Color::Cyan => "index:6".to_string(),
            Color::Gray => "index:7".to_string(),
            Color::DarkGray => "index:8".to_string(),
            Color::LightRed => "index:9".to_string(),
            Color::LightGreen => "index:10".to_string(),
            Color::LightYellow => "index:11".to_string(),
            Color::LightBlue => "index:12".to_string(),
            Color::LightMagenta => "index:13".to_string(),
            Color::LightCyan => "index:14".to_string(),
            Color::White => "index:15".to_string(),
        }
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# library-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, index:N, or 'reset'\n");
        buf.push_str("# Optional base palette: preset = mocha | dark\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, Self::color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success_fg", self.success_fg);
        kv("warning_fg", self.warning_fg);

        std::fs::write(path, buf)
    }

    /// Load `path`, or write the `mocha` defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Which form is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormKind {
    AddBook,
    RegisterUser,
    Loan,
}

/// Buttons shown under a form's fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    AddBook,
    RegisterUser,
    Borrow,
    Return,
}

impl FormAction {
    pub fn label(self) -> &'static str {
        match self {
            FormAction::AddBook => "Add Book",
            FormAction::RegisterUser => "Register User",
            FormAction::Borrow => "Borrow Book",
            FormAction::Return => "Return Book",
        }
    }
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::AddBook => "Add book",
            FormKind::RegisterUser => "Register user",
            FormKind::Loan => "Borrow & Return",
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            FormKind::AddBook => &["Book Title", "Author", "ISBN"],
            FormKind::RegisterUser => &["User ID", "Name"],
            FormKind::Loan => &["User ID", "Book ISBN"],
        }
    }

    pub fn actions(self) -> &'static [FormAction] {
        match self {
            FormKind::AddBook => &[FormAction::AddBook],
            FormKind::RegisterUser => &[FormAction::RegisterUser],
            FormKind::Loan => &[FormAction::Borrow, FormAction::Return],
        }
    }
}

/// Text entry form. Rows are the fields followed by the action buttons;
/// `selected` indexes into that combined list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub values: Vec<String>,
    pub selected: usize,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: vec![String::new(); kind.labels().len()],
            selected: 0,
        }
    }

    /// Loan form with the given fields already filled in.
    pub fn loan(user_id: &str, isbn: &str) -> Self {
        let mut form = Self::new(FormKind::Loan);
        form.values = vec![user_id.to_string(), isbn.to_string()];
        // land on the first empty field, or on Borrow when both are set
        form.selected = form
            .values
            .iter()
            .position(String::is_empty)
            .unwrap_or(form.values.len());
        form
    }

    pub fn row_count(&self) -> usize {
        self.values.len() + self.kind.actions().len()
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.row_count();
    }

    pub fn prev(&mut self) {
        let n = self.row_count();
        self.selected = (self.selected + n - 1) % n;
    }

    pub fn selected_field_mut(&mut self) -> Option<&mut String> {
        self.values.get_mut(self.selected)
    }

    pub fn selected_action(&self) -> Option<FormAction> {
        self.selected
            .checked_sub(self.values.len())
            .and_then(|i| self.kind.actions().get(i).copied())
    }

    pub fn value(&self, i: usize) -> &str {
        self.values.get(i).map(String::as_str).unwrap_or("")
    }

    pub fn all_filled(&self) -> bool {
        self.values.iter().all(|v| !v.is_empty())
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(String::clear);
        self.selected = 0;
    }
}

/// Transient success notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Modal dialogs drawn over the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Info { message: String },
    Warning { message: String },
    Help { scroll: u16 },
}

pub struct AppState {
    pub started_at: Instant,
    pub catalog: LendingCatalog,
    /// Books tab view: the catalog filtered by the applied title search.
    pub books: Vec<Book>,
    pub active_tab: ActiveTab,
    pub selected_book_index: usize,
    pub selected_user_index: usize,
    pub selected_loan_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub form: Option<FormState>,
    pub modal: Option<ModalState>,
    pub toast: Option<Toast>,
}

impl AppState {
    /// State around `catalog` with the built-in theme and keymap; touches no files.
    pub fn with_catalog(catalog: LendingCatalog) -> Self {
        let books = catalog.list_books().to_vec();
        Self {
            started_at: Instant::now(),
            catalog,
            books,
            active_tab: ActiveTab::Books,
            selected_book_index: 0,
            selected_user_index: 0,
            selected_loan_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme: Theme::mocha(),
            keymap: Keymap::default(),
            form: None,
            modal: None,
            toast: None,
        }
    }

    /// Empty catalog under `policy`, with theme and keybindings from `paths`
    /// (written with defaults on first run).
    pub fn from_config(paths: &ConfigPaths, policy: BorrowPolicy) -> Self {
        let mut app = Self::with_catalog(LendingCatalog::with_policy(policy));
        app.theme = Theme::load_or_init(&paths.theme());
        app.keymap = Keymap::load_or_init(&paths.keybinds());
        app
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn show_warning(&mut self, message: impl Into<String>) {
        self.modal = Some(ModalState::Warning {
            message: message.into(),
        });
        self.input_mode = InputMode::Modal;
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.modal = Some(ModalState::Info {
            message: message.into(),
        });
        self.input_mode = InputMode::Modal;
    }

    /// Dismiss the modal and return to the form underneath, if any.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = if self.form.is_some() {
            InputMode::Form
        } else {
            InputMode::Normal
        };
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Length of the list shown on the active tab.
    pub fn active_len(&self) -> usize {
        match self.active_tab {
            ActiveTab::Books => self.books.len(),
            ActiveTab::Users => self.catalog.user_count(),
            ActiveTab::Loans => self.catalog.loan_count(),
        }
    }

    pub fn active_index_mut(&mut self) -> &mut usize {
        match self.active_tab {
            ActiveTab::Books => &mut self.selected_book_index,
            ActiveTab::Users => &mut self.selected_user_index,
            ActiveTab::Loans => &mut self.selected_loan_index,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_catalog(LendingCatalog::new())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
