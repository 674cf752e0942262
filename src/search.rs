use crate::app::AppState;
use crate::catalog::Book;

/// Books whose title contains `query`, ignoring case. An empty query keeps every book.
pub fn filter_books_by_title(books: &[Book], query: &str) -> Vec<Book> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|b| b.title.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// Rebuild the Books tab view from the catalog with the current query.
pub fn apply_search(app: &mut AppState) {
    app.books = filter_books_by_title(app.catalog.list_books(), &app.search_query);
    app.selected_book_index = app
        .selected_book_index
        .min(app.books.len().saturating_sub(1));
}
