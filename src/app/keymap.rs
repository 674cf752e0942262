//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only normal-mode keys go through the keymap. Forms, search, and modals
//! read raw keys because they are text entry.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Start a title search on the Books tab.
    StartSearch,
    /// Open the form that fits the active tab: add book, register user, or loan.
    NewEntry,
    /// Open an empty borrow/return form from any tab.
    OpenLoanForm,
    /// Cycle Books -> Users -> Loans.
    NextTab,
    /// Cycle backwards.
    PrevTab,
    /// Open the borrow/return form prefilled from the selected row.
    EnterAction,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Swallow the key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 13] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::NewEntry,
    KeyAction::OpenLoanForm,
    KeyAction::NextTab,
    KeyAction::PrevTab,
    KeyAction::EnterAction,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Ignore,
];

/// Canonical mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewEntry);
        bindings.insert((M::NONE, Char('b')), KeyAction::OpenLoanForm);
        bindings.insert((M::NONE, Tab), KeyAction::NextTab);
        // Shift+Tab arrives as BackTab, with or without SHIFT depending on the terminal
        bindings.insert((M::NONE, BackTab), KeyAction::PrevTab);
        bindings.insert((M::SHIFT, BackTab), KeyAction::PrevTab);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageUp);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default keybindings");
        }
        km
    }

    /// Read `<Action> = <KeySpec>` lines (or the reversed `<KeySpec> = <Action>`)
    /// on top of the defaults. Returns `None` if the file cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read keybindings");
                return None;
            }
        };
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }

    /// Serialize every binding, grouped by action in a stable order.
    pub fn render(&self) -> String {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# library-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, /, ?\n");
        buf.push_str("# Actions: ");
        buf.push_str(
            &ALL_ACTIONS
                .iter()
                .map(|a| format_action(*a))
                .collect::<Vec<_>>()
                .join(", "),
        );
        buf.push_str("\n\n");

        for action in ALL_ACTIONS {
            let mut keys: Vec<String> = self
                .bindings
                .iter()
                .filter(|(_, a)| **a == action)
                .map(|((mods, code), _)| Self::format_key(*mods, *code))
                .collect();
            keys.sort();
            keys.dedup();
            for k in keys {
                let _ = writeln!(&mut buf, "{} = {}", format_action(action), k);
            }
        }
        buf
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&(key.modifiers, key.code))
            .copied()
            .or_else(|| {
                // Terminals differ on whether '?' or '/' carry SHIFT
                match key.code {
                    KeyCode::Char(_) if key.modifiers == KeyModifiers::SHIFT => {
                        self.bindings.get(&(KeyModifiers::NONE, key.code)).copied()
                    }
                    _ => None,
                }
            })
    }

    /// Keys bound to `action`, formatted for display.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key into a spec like "Ctrl+c" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS.into_iter().find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewEntry => "NewEntry",
        KeyAction::OpenLoanForm => "OpenLoanForm",
        KeyAction::NextTab => "NextTab",
        KeyAction::PrevTab => "PrevTab",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_resolve_vim_and_arrow_keys() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('j'), KeyModifiers::NONE)), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyCode::Up, KeyModifiers::NONE)), Some(KeyAction::MoveUp));
        assert_eq!(km.resolve(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn shifted_punctuation_falls_back_to_plain_binding() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)), Some(KeyAction::OpenHelp));
    }

    #[test]
    fn parse_accepts_both_orders_and_skips_garbage() {
        let km = Keymap::parse("# comment\nQuit = x\nCtrl+n = NewEntry\nnonsense\nMoveUp = NotAKey\n");
        assert_eq!(km.resolve(&key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)), Some(KeyAction::NewEntry));
        // defaults survive
        assert_eq!(km.resolve(&key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    }

    #[test]
    fn rendered_file_parses_back_to_same_bindings() {
        let km = Keymap::default();
        let again = Keymap::parse(&km.render());
        for action in ALL_ACTIONS {
            assert_eq!(km.keys_for(action), again.keys_for(action), "{}", format_action(action));
        }
    }
}
