use payloads::requests::BookFilters;
use uuid::Uuid;

use super::*;

fn validate(book: &payloads::Book) -> Result<(), StoreError> {
    required(&book.titulo, "titulo")?;
    required(&book.autor, "autor")?;
    required(&book.categoria, "categoria")
}

pub fn create_book(
    store: &Store,
    book: payloads::Book,
) -> Result<responses::Book, StoreError> {
    validate(&book)?;
    let book = responses::Book {
        id: BookId(Uuid::new_v4()),
        book,
    };
    store.tables().books.insert(book.id, book.clone());
    Ok(book)
}

pub fn read_book(store: &Store, id: &BookId) -> Result<responses::Book, StoreError> {
    store
        .tables()
        .books
        .get(id)
        .cloned()
        .ok_or(StoreError::BookNotFound)
}

pub fn update_book(
    store: &Store,
    id: &BookId,
    book: payloads::Book,
) -> Result<responses::Book, StoreError> {
    validate(&book)?;
    let mut tables = store.tables();
    let existing = tables.books.get_mut(id).ok_or(StoreError::BookNotFound)?;
    existing.book = book;
    Ok(existing.clone())
}

pub fn delete_book(store: &Store, id: &BookId) -> Result<(), StoreError> {
    store
        .tables()
        .books
        .remove(id)
        .map(|_| ())
        .ok_or(StoreError::BookNotFound)
}

/// Books matching the filters, sorted by title. Search covers title, author
/// and description.
pub fn list_books(
    store: &Store,
    filters: &BookFilters,
    page: PageRequest,
) -> (Vec<responses::Book>, Pagination) {
    let mut books: Vec<responses::Book> = store
        .tables()
        .books
        .values()
        .filter(|b| {
            filters
                .categoria
                .as_deref()
                .is_none_or(|categoria| b.book.categoria == categoria)
        })
        .filter(|b| {
            matches_search(
                filters.search.as_deref(),
                &[
                    b.book.titulo.as_str(),
                    b.book.autor.as_str(),
                    b.book.descripcion.as_deref().unwrap_or_default(),
                ],
            )
        })
        .cloned()
        .collect();
    books.sort_by(|a, b| a.book.titulo.cmp(&b.book.titulo));
    paginate(books, page)
}

pub fn book_categories(store: &Store) -> Vec<String> {
    let tables = store.tables();
    categories(tables.books.values().map(|b| b.book.categoria.as_str()))
}
