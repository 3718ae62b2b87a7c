use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    BookId, DiaryEntryId, DirectoryId, EventId, FaforeSectionId, Role, UserId,
    WeeklySummaryId, dates,
};

/// Every successful backend response wraps its payload in an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            message: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::new(data)
        }
    }
}

/// Error bodies returned by the backend. Conflict bodies also carry the id
/// of the record that already occupies the unique slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<uuid::Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Build a page from a list envelope. Endpoints that don't paginate are
    /// treated as a single page holding every item.
    pub fn from_envelope(envelope: Envelope<Vec<T>>) -> Self {
        let pagination = envelope.pagination.unwrap_or_else(|| {
            let total = envelope.data.len();
            Pagination::new(1, total.max(1) as u32, total as u64)
        });
        Self {
            items: envelope.data,
            pagination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub rol: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub book: crate::Book,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub id: DirectoryId,
    #[serde(flatten)]
    pub directory: crate::Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub event: crate::CalendarEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: DiaryEntryId,
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub entry: crate::DiaryEntry,
}

impl std::ops::Deref for DiaryEntry {
    type Target = crate::DiaryEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub id: WeeklySummaryId,
    pub user_id: UserId,
    #[serde(with = "dates::serde_date")]
    pub semana_fin: Date,
    #[serde(flatten)]
    pub summary: crate::WeeklySummary,
}

impl std::ops::Deref for WeeklySummary {
    type Target = crate::WeeklySummary;

    fn deref(&self) -> &Self::Target {
        &self.summary
    }
}

/// Everything the "mom's week" screen shows for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekOverview {
    #[serde(with = "dates::serde_date")]
    pub semana_inicio: Date,
    #[serde(with = "dates::serde_date")]
    pub semana_fin: Date,
    pub entradas: Vec<DiaryEntry>,
    #[serde(default)]
    pub resumen: Option<WeeklySummary>,
    /// Most frequent emotion among the week's entries.
    #[serde(default)]
    pub emocion_predominante: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaforeSection {
    pub id: FaforeSectionId,
    pub titulo: String,
    pub contenido: String,
    pub orden: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_usuarios: u64,
    pub total_libros: u64,
    pub total_directorios: u64,
    pub total_eventos: u64,
    pub total_entradas_diario: u64,
    pub total_resumenes_semanales: u64,
}
