//! Library crate for library-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Lending-state core: books, users, and loans (`catalog`)
//! - Error and result types (`error`)
//! - Title search helpers (`search`)
//! - Application state and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `library-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod catalog;
pub mod error;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use catalog::{Book, BorrowPolicy, LendingCatalog, Loan, LoanView, SharedCatalog, User};
pub use error::{CatalogError, CatalogResult};
