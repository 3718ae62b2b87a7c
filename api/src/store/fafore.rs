use uuid::Uuid;

use super::*;

pub fn create_section(
    store: &Store,
    titulo: &str,
    contenido: &str,
    orden: u32,
) -> Result<responses::FaforeSection, StoreError> {
    required(titulo, "titulo")?;
    let section = responses::FaforeSection {
        id: FaforeSectionId(Uuid::new_v4()),
        titulo: titulo.to_string(),
        contenido: contenido.to_string(),
        orden,
    };
    store.tables().fafore.insert(section.id, section.clone());
    Ok(section)
}

/// Every FAFORE section in display order.
pub fn list_sections(store: &Store) -> Vec<responses::FaforeSection> {
    let mut sections: Vec<_> = store.tables().fafore.values().cloned().collect();
    sections.sort_by_key(|section| section.orden);
    sections
}
