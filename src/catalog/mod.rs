//! Lending-state core.
//!
//! [`LendingCatalog`] owns the book roster, the user roster, and the set of
//! active loans. It is the only place that mutates any of them:
//! - a book is either free or on loan to exactly one user id
//! - returning requires the exact borrower
//! - lookups under duplicate keys return the first registered record
//!
//! The catalog is a plain owned value; wrap it in [`SharedCatalog`] to hand it
//! to more than one thread.
mod models;
mod shared;

pub use models::{Book, Loan, LoanView, User, UNKNOWN_LABEL};
pub use shared::{CatalogSnapshot, SharedCatalog};

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// Whether `borrow` accepts user ids that were never registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BorrowPolicy {
    /// Any user id may borrow; loans to unknown users show as "Unknown".
    #[default]
    AnyUser,
    /// Only registered user ids may borrow.
    RegisteredUsersOnly,
}

#[derive(Clone, Debug, Default)]
pub struct LendingCatalog {
    books: Vec<Book>,
    users: Vec<User>,
    // key -> position of the first record registered under that key
    book_index: HashMap<String, usize>,
    user_index: HashMap<String, usize>,
    loans: HashMap<String, Loan>,
    next_loan_seq: u64,
    policy: BorrowPolicy,
}

impl LendingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: BorrowPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> BorrowPolicy {
        self.policy
    }

    /// Append a book. Duplicate ISBNs are stored but never shadow the first one.
    pub fn register_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> &Book {
        let book = Book::new(title, author, isbn);
        let pos = self.books.len();
        self.book_index.entry(book.isbn.clone()).or_insert(pos);
        debug!(isbn = %book.isbn, title = %book.title, "book registered");
        self.books.push(book);
        &self.books[pos]
    }

    /// Append a user. Duplicate user ids are stored but never shadow the first one.
    pub fn register_user(&mut self, user_id: impl Into<String>, name: impl Into<String>) -> &User {
        let user = User::new(user_id, name);
        let pos = self.users.len();
        self.user_index.entry(user.user_id.clone()).or_insert(pos);
        debug!(user_id = %user.user_id, "user registered");
        self.users.push(user);
        &self.users[pos]
    }

    pub fn find_book(&self, isbn: &str) -> Option<&Book> {
        self.book_index.get(isbn).and_then(|&i| self.books.get(i))
    }

    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.user_index.get(user_id).and_then(|&i| self.users.get(i))
    }

    /// Lend `isbn` to `user_id`.
    ///
    /// Fails with [`CatalogError::NotFound`] when the ISBN is not in the catalog
    /// (or, under [`BorrowPolicy::RegisteredUsersOnly`], the user id is unknown),
    /// and with [`CatalogError::AlreadyLoaned`] when the book is out, even to the
    /// same user. State is untouched on failure.
    pub fn borrow(&mut self, user_id: &str, isbn: &str) -> CatalogResult<()> {
        if !self.book_index.contains_key(isbn) {
            debug!(%isbn, %user_id, "borrow rejected: unknown isbn");
            return Err(CatalogError::book_not_found(isbn));
        }
        if self.policy == BorrowPolicy::RegisteredUsersOnly && !self.user_index.contains_key(user_id) {
            debug!(%isbn, %user_id, "borrow rejected: unknown user");
            return Err(CatalogError::user_not_found(user_id));
        }
        if let Some(existing) = self.loans.get(isbn) {
            debug!(%isbn, %user_id, holder = %existing.user_id, "borrow rejected: already on loan");
            return Err(CatalogError::AlreadyLoaned {
                isbn: isbn.to_string(),
            });
        }

        let seq = self.next_loan_seq;
        self.next_loan_seq += 1;
        self.loans.insert(
            isbn.to_string(),
            Loan {
                isbn: isbn.to_string(),
                user_id: user_id.to_string(),
                seq,
            },
        );
        debug!(%isbn, %user_id, "book borrowed");
        Ok(())
    }

    /// End the loan of `isbn`, provided `user_id` is its borrower.
    pub fn return_book(&mut self, user_id: &str, isbn: &str) -> CatalogResult<()> {
        let Some(loan) = self.loans.get(isbn) else {
            debug!(%isbn, %user_id, "return rejected: not on loan");
            return Err(CatalogError::NotLoaned {
                isbn: isbn.to_string(),
            });
        };
        if loan.user_id != user_id {
            debug!(%isbn, %user_id, holder = %loan.user_id, "return rejected: borrower mismatch");
            return Err(CatalogError::BorrowerMismatch {
                isbn: isbn.to_string(),
            });
        }
        self.loans.remove(isbn);
        debug!(%isbn, %user_id, "book returned");
        Ok(())
    }

    pub fn list_books(&self) -> &[Book] {
        &self.books
    }

    pub fn list_users(&self) -> &[User] {
        &self.users
    }

    /// Active loans, oldest first.
    pub fn list_loans(&self) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self.loans.values().collect();
        loans.sort_by_key(|l| l.seq);
        loans
    }

    /// Active loans joined with book titles and user names, substituting
    /// [`UNKNOWN_LABEL`] for whichever side is not registered.
    pub fn resolve_loan_view(&self) -> Vec<LoanView> {
        self.list_loans()
            .into_iter()
            .map(|loan| {
                let book = self.find_book(&loan.isbn);
                let user = self.find_user(&loan.user_id);
                LoanView {
                    book_title: book.map_or_else(|| UNKNOWN_LABEL.to_string(), |b| b.title.clone()),
                    isbn: loan.isbn.clone(),
                    user_name: user.map_or_else(|| UNKNOWN_LABEL.to_string(), |u| u.name.clone()),
                    book_found: book.is_some(),
                    user_found: user.is_some(),
                }
            })
            .collect()
    }

    pub fn borrower_of(&self, isbn: &str) -> Option<&str> {
        self.loans.get(isbn).map(|l| l.user_id.as_str())
    }

    pub fn is_loaned(&self, isbn: &str) -> bool {
        self.loans.contains_key(isbn)
    }

    /// Loans currently held by `user_id`, oldest first.
    pub fn loans_for_user(&self, user_id: &str) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self.loans.values().filter(|l| l.user_id == user_id).collect();
        loans.sort_by_key(|l| l.seq);
        loans
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordKind;

    fn dune_catalog() -> LendingCatalog {
        let mut c = LendingCatalog::new();
        c.register_book("Dune", "Herbert", "111");
        c.register_user("u1", "Alice");
        c
    }

    #[test]
    fn lending_scenario_from_front_desk() {
        let mut c = dune_catalog();
        assert_eq!(c.borrow("u1", "111"), Ok(()));
        assert_eq!(
            c.borrow("u2", "111"),
            Err(CatalogError::AlreadyLoaned { isbn: "111".into() })
        );
        assert_eq!(
            c.return_book("u2", "111"),
            Err(CatalogError::BorrowerMismatch { isbn: "111".into() })
        );
        assert_eq!(c.borrower_of("111"), Some("u1"));
        assert_eq!(c.return_book("u1", "111"), Ok(()));
        assert_eq!(c.borrow("u2", "111"), Ok(()));
        assert_eq!(c.borrower_of("111"), Some("u2"));
    }

    #[test]
    fn borrow_requires_registered_isbn() {
        let mut c = dune_catalog();
        let err = c.borrow("u1", "999").unwrap_err();
        assert_eq!(
            err,
            CatalogError::NotFound {
                kind: RecordKind::Book,
                key: "999".into()
            }
        );
        assert_eq!(c.loan_count(), 0);
    }

    #[test]
    fn same_user_cannot_borrow_twice() {
        let mut c = dune_catalog();
        c.borrow("u1", "111").unwrap();
        assert!(matches!(c.borrow("u1", "111"), Err(CatalogError::AlreadyLoaned { .. })));
        assert_eq!(c.loan_count(), 1);
    }

    #[test]
    fn return_without_loan_is_not_loaned() {
        let mut c = dune_catalog();
        assert_eq!(
            c.return_book("u1", "111"),
            Err(CatalogError::NotLoaned { isbn: "111".into() })
        );
    }

    #[test]
    fn unregistered_users_may_borrow_by_default() {
        let mut c = dune_catalog();
        assert_eq!(c.borrow("ghost", "111"), Ok(()));
        let view = c.resolve_loan_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].book_title, "Dune");
        assert_eq!(view[0].user_name, UNKNOWN_LABEL);
        assert!(view[0].book_found);
        assert!(!view[0].user_found);
    }

    #[test]
    fn strict_policy_rejects_unknown_user() {
        let mut c = LendingCatalog::with_policy(BorrowPolicy::RegisteredUsersOnly);
        c.register_book("Dune", "Herbert", "111");
        assert_eq!(c.borrow("ghost", "111"), Err(CatalogError::user_not_found("ghost")));
        c.register_user("ghost", "Casper");
        assert_eq!(c.borrow("ghost", "111"), Ok(()));
    }

    #[test]
    fn duplicate_keys_resolve_to_first_registration() {
        let mut c = LendingCatalog::new();
        c.register_book("First", "A", "111");
        c.register_book("Second", "B", "111");
        c.register_user("u1", "Alice");
        c.register_user("u1", "Alicia");
        assert_eq!(c.list_books().len(), 2);
        assert_eq!(c.find_book("111").map(|b| b.title.as_str()), Some("First"));
        assert_eq!(c.find_user("u1").map(|u| u.name.as_str()), Some("Alice"));
    }

    #[test]
    fn loans_list_in_creation_order() {
        let mut c = LendingCatalog::new();
        for isbn in ["1", "2", "3"] {
            c.register_book(format!("Book {isbn}"), "Anon", isbn);
        }
        c.borrow("u1", "1").unwrap();
        c.borrow("u2", "2").unwrap();
        c.borrow("u3", "3").unwrap();
        c.return_book("u1", "1").unwrap();
        c.borrow("u4", "1").unwrap();

        let pairs: Vec<(&str, &str)> = c.list_loans().into_iter().map(Loan::as_pair).collect();
        assert_eq!(pairs, vec![("2", "u2"), ("3", "u3"), ("1", "u4")]);
    }

    #[test]
    fn loans_for_user_filters_by_borrower() {
        let mut c = LendingCatalog::new();
        c.register_book("A", "x", "1");
        c.register_book("B", "x", "2");
        c.register_book("C", "x", "3");
        c.borrow("u1", "1").unwrap();
        c.borrow("u2", "2").unwrap();
        c.borrow("u1", "3").unwrap();
        let mine: Vec<&str> = c.loans_for_user("u1").iter().map(|l| l.isbn.as_str()).collect();
        assert_eq!(mine, vec!["1", "3"]);
        assert!(c.loans_for_user("nobody").is_empty());
    }
}
