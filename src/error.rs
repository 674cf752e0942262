//! Error and result types for the lending catalog.
//!
//! Every expected failure of a catalog operation is an ordinary value of
//! [`CatalogError`]; callers branch on it and leave their own state alone.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Which roster a failed lookup was made against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Book,
    User,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Book => write!(f, "book"),
            RecordKind::User => write!(f, "user"),
        }
    }
}

/// Recoverable failures reported by [`crate::catalog::LendingCatalog`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no {kind} registered under '{key}'")]
    NotFound { kind: RecordKind, key: String },

    #[error("book {isbn} is already on loan")]
    AlreadyLoaned { isbn: String },

    #[error("book {isbn} is not on loan")]
    NotLoaned { isbn: String },

    #[error("book {isbn} is on loan to a different user")]
    BorrowerMismatch { isbn: String },
}

impl CatalogError {
    pub fn book_not_found(isbn: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::Book,
            key: isbn.into(),
        }
    }

    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RecordKind::User,
            key: user_id.into(),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_key() {
        assert_eq!(
            CatalogError::book_not_found("111").to_string(),
            "no book registered under '111'"
        );
        assert_eq!(
            CatalogError::user_not_found("u9").to_string(),
            "no user registered under 'u9'"
        );
        assert_eq!(
            CatalogError::BorrowerMismatch { isbn: "42".into() }.to_string(),
            "book 42 is on loan to a different user"
        );
    }
}
