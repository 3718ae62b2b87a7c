use payloads::requests::DirectoryFilters;
use uuid::Uuid;

use super::*;

fn validate(directory: &payloads::Directory) -> Result<(), StoreError> {
    required(&directory.nombre, "nombre")?;
    required(&directory.categoria, "categoria")
}

pub fn create_directory(
    store: &Store,
    directory: payloads::Directory,
) -> Result<responses::Directory, StoreError> {
    validate(&directory)?;
    let directory = responses::Directory {
        id: DirectoryId(Uuid::new_v4()),
        directory,
    };
    store
        .tables()
        .directories
        .insert(directory.id, directory.clone());
    Ok(directory)
}

pub fn read_directory(
    store: &Store,
    id: &DirectoryId,
) -> Result<responses::Directory, StoreError> {
    store
        .tables()
        .directories
        .get(id)
        .cloned()
        .ok_or(StoreError::DirectoryNotFound)
}

pub fn update_directory(
    store: &Store,
    id: &DirectoryId,
    directory: payloads::Directory,
) -> Result<responses::Directory, StoreError> {
    validate(&directory)?;
    let mut tables = store.tables();
    let existing = tables
        .directories
        .get_mut(id)
        .ok_or(StoreError::DirectoryNotFound)?;
    existing.directory = directory;
    Ok(existing.clone())
}

pub fn delete_directory(store: &Store, id: &DirectoryId) -> Result<(), StoreError> {
    store
        .tables()
        .directories
        .remove(id)
        .map(|_| ())
        .ok_or(StoreError::DirectoryNotFound)
}

/// Directory entries matching the filters, sorted by name.
pub fn list_directories(
    store: &Store,
    filters: &DirectoryFilters,
    page: PageRequest,
) -> (Vec<responses::Directory>, Pagination) {
    let mut directories: Vec<responses::Directory> = store
        .tables()
        .directories
        .values()
        .filter(|d| {
            filters
                .categoria
                .as_deref()
                .is_none_or(|categoria| d.directory.categoria == categoria)
        })
        .filter(|d| {
            matches_search(
                filters.search.as_deref(),
                &[
                    d.directory.nombre.as_str(),
                    d.directory.descripcion.as_deref().unwrap_or_default(),
                    d.directory.direccion.as_deref().unwrap_or_default(),
                ],
            )
        })
        .cloned()
        .collect();
    directories.sort_by(|a, b| a.directory.nombre.cmp(&b.directory.nombre));
    paginate(directories, page)
}

pub fn directory_categories(store: &Store) -> Vec<String> {
    let tables = store.tables();
    categories(
        tables
            .directories
            .values()
            .map(|d| d.directory.categoria.as_str()),
    )
}
