use std::fmt::{Display, Formatter};

/// Label shown in joined views when a loan points at a book or user that was never registered.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {} (ISBN: {})", self.title, self.author, self.isbn)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub name: String,
}

impl User {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.user_id, self.name)
    }
}

/// An active loan: `isbn` is currently held by `user_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loan {
    pub isbn: String,
    pub user_id: String,
    /// Creation order among all loans ever made by the owning catalog.
    pub(crate) seq: u64,
}

impl Loan {
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.isbn, &self.user_id)
    }
}

/// A loan joined against the book and user rosters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoanView {
    pub book_title: String,
    pub isbn: String,
    pub user_name: String,
    /// False when `book_title` is the [`UNKNOWN_LABEL`] fallback.
    pub book_found: bool,
    /// False when `user_name` is the [`UNKNOWN_LABEL`] fallback.
    pub user_found: bool,
}

impl Display for LoanView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Book: {}, ISBN: {}, User: {}",
            self.book_title, self.isbn, self.user_name
        )
    }
}
