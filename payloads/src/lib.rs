pub mod api_client;
pub mod dates;
pub mod requests;
pub mod responses;
pub mod services;
pub mod session;

pub use api_client::{APIClient, Auth, ClientError, Conflict, Reply};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext,
    SessionError, SessionStore,
};

use derive_more::Display;
use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id type wrappers help ensure we don't mix up ids for different resources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DirectoryId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DiaryEntryId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WeeklySummaryId(pub Uuid);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FaforeSectionId(pub Uuid);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// An educational book listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub titulo: String,
    pub autor: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: String,
    /// Free-form age range, e.g. "0-3 años"
    #[serde(default)]
    pub edad_recomendada: Option<String>,
    #[serde(default)]
    pub url_descarga: Option<String>,
    #[serde(default)]
    pub imagen_portada: Option<String>,
}

/// A support service in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub sitio_web: Option<String>,
    #[serde(default)]
    pub horario: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Baja,
    #[default]
    Media,
    Alta,
}

pub const DEFAULT_EVENT_COLOR: &str = "#4A90E2";

fn default_event_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Calendar event details, as sent when creating or updating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub titulo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(with = "dates::serde_date")]
    pub fecha_evento: Date,
    #[serde(default)]
    pub hora_inicio: Option<Time>,
    #[serde(default)]
    pub hora_fin: Option<Time>,
    #[serde(default = "default_event_color")]
    pub color: String,
    pub tipo_evento: String,
    #[serde(default)]
    pub nivel_importancia: Importance,
    #[serde(default)]
    pub recordatorio_activo: bool,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub notas_adicionales: Option<String>,
}

impl CalendarEvent {
    /// Event with only the required fields set.
    pub fn new(
        titulo: impl Into<String>,
        fecha_evento: Date,
        tipo_evento: impl Into<String>,
    ) -> Self {
        Self {
            titulo: titulo.into(),
            descripcion: None,
            fecha_evento,
            hora_inicio: None,
            hora_fin: None,
            color: default_event_color(),
            tipo_evento: tipo_evento.into(),
            nivel_importancia: Importance::default(),
            recordatorio_activo: false,
            ubicacion: None,
            notas_adicionales: None,
        }
    }
}

/// Diary entry details. At most one entry exists per user and `fecha`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    #[serde(with = "dates::serde_date")]
    pub fecha: Date,
    #[serde(default)]
    pub titulo: Option<String>,
    pub contenido: String,
    #[serde(default)]
    pub fotos: Vec<String>,
    #[serde(default)]
    pub emocion: Option<String>,
    #[serde(default)]
    pub emocion_emoji: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DiaryEntry {
    pub fn new(fecha: Date, contenido: impl Into<String>) -> Self {
        Self {
            fecha,
            titulo: None,
            contenido: contenido.into(),
            fotos: Vec::new(),
            emocion: None,
            emocion_emoji: None,
            tags: Vec::new(),
        }
    }
}

/// Weekly "mom's week" summary details. At most one summary exists per user
/// and week; `semana_inicio` is normalized to the week's Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    #[serde(with = "dates::serde_date")]
    pub semana_inicio: Date,
    pub resumen: String,
    #[serde(default)]
    pub logros: Vec<String>,
    #[serde(default)]
    pub desafios: Vec<String>,
    #[serde(default)]
    pub emocion_predominante: Option<String>,
}
