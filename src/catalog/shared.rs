//! Thread-safe handle over a [`LendingCatalog`].
//!
//! Every call takes the one catalog-wide lock, so the check-then-insert in
//! `borrow` cannot interleave with another caller.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Book, LendingCatalog, Loan, LoanView, User};
use crate::error::CatalogResult;

/// Owned copy of the whole catalog taken under the lock.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub loans: Vec<Loan>,
    pub loan_view: Vec<LoanView>,
}

#[derive(Clone, Debug, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<LendingCatalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: LendingCatalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Run `f` with exclusive access to the catalog.
    pub fn with<R>(&self, f: impl FnOnce(&mut LendingCatalog) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn register_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Book {
        self.with(|c| c.register_book(title, author, isbn).clone())
    }

    pub fn register_user(&self, user_id: impl Into<String>, name: impl Into<String>) -> User {
        self.with(|c| c.register_user(user_id, name).clone())
    }

    pub fn find_book(&self, isbn: &str) -> Option<Book> {
        self.with(|c| c.find_book(isbn).cloned())
    }

    pub fn find_user(&self, user_id: &str) -> Option<User> {
        self.with(|c| c.find_user(user_id).cloned())
    }

    pub fn borrow(&self, user_id: &str, isbn: &str) -> CatalogResult<()> {
        self.with(|c| c.borrow(user_id, isbn))
    }

    pub fn return_book(&self, user_id: &str, isbn: &str) -> CatalogResult<()> {
        self.with(|c| c.return_book(user_id, isbn))
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.with(|c| CatalogSnapshot {
            books: c.list_books().to_vec(),
            users: c.list_users().to_vec(),
            loans: c.list_loans().into_iter().cloned().collect(),
            loan_view: c.resolve_loan_view(),
        })
    }

    /// Recover the catalog if this is the last handle.
    pub fn into_inner(self) -> Option<LendingCatalog> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}

impl From<LendingCatalog> for SharedCatalog {
    fn from(catalog: LendingCatalog) -> Self {
        Self::new(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_state_under_lock() {
        let shared = SharedCatalog::default();
        shared.register_book("Dune", "Herbert", "111");
        shared.register_user("u1", "Alice");
        shared.borrow("u1", "111").unwrap();

        let snap = shared.snapshot();
        assert_eq!(snap.books.len(), 1);
        assert_eq!(snap.users.len(), 1);
        assert_eq!(snap.loans.len(), 1);
        assert_eq!(snap.loan_view[0].user_name, "Alice");
    }

    #[test]
    fn into_inner_requires_sole_handle() {
        let shared = SharedCatalog::default();
        let other = shared.clone();
        assert!(shared.into_inner().is_none());
        assert!(other.into_inner().is_some());
    }
}
