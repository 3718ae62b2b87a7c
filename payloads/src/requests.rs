use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::dates;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const NAME_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAccount {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Which page of a list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Clamp to the values the backend accepts.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip. Saturates, so a page past the end is just empty.
    pub fn offset(&self) -> usize {
        let normalized = self.normalized();
        let offset = u64::from(normalized.page - 1)
            .saturating_mul(u64::from(normalized.limit));
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

/// A blank text filter means "no filter".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// One field of a filter patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the current value alone.
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> Patch<T> {
    pub fn apply(self, field: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }
}

impl Patch<String> {
    /// Like [`Patch::apply`], but setting blank text clears the filter.
    pub fn apply_text(self, field: &mut Option<String>) {
        match self {
            Self::Set(value) if value.trim().is_empty() => *field = None,
            patch => patch.apply(field),
        }
    }
}

/// Query string for list endpoints: filters plus paging.
#[derive(Debug, Serialize)]
pub struct ListQuery<'a, F: Serialize> {
    #[serde(flatten)]
    pub filters: &'a F,
    #[serde(flatten)]
    pub page: &'a PageRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
}

/// Changes to [`BookFilters`]; unmentioned fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFiltersPatch {
    pub search: Patch<String>,
    pub categoria: Patch<String>,
}

impl BookFilters {
    pub fn merge(&mut self, patch: BookFiltersPatch) {
        patch.search.apply_text(&mut self.search);
        patch.categoria.apply_text(&mut self.categoria);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFiltersPatch {
    pub search: Patch<String>,
    pub categoria: Patch<String>,
}

impl DirectoryFilters {
    pub fn merge(&mut self, patch: DirectoryFiltersPatch) {
        patch.search.apply_text(&mut self.search);
        patch.categoria.apply_text(&mut self.categoria);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::serde_date::option"
    )]
    pub fecha_inicio: Option<Date>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::serde_date::option"
    )]
    pub fecha_fin: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_evento: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFiltersPatch {
    pub fecha_inicio: Patch<Date>,
    pub fecha_fin: Patch<Date>,
    pub tipo_evento: Patch<String>,
}

impl EventFilters {
    pub fn merge(&mut self, patch: EventFiltersPatch) {
        patch.fecha_inicio.apply(&mut self.fecha_inicio);
        patch.fecha_fin.apply(&mut self.fecha_fin);
        patch.tipo_evento.apply_text(&mut self.tipo_evento);
    }

    pub fn contains(&self, date: Date) -> bool {
        self.fecha_inicio.is_none_or(|start| date >= start)
            && self.fecha_fin.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i16>,
}

impl DiaryFilters {
    /// Filters selecting the month that contains `date`.
    pub fn month_of(date: Date) -> Self {
        Self {
            month: Some(date.month()),
            year: Some(date.year()),
        }
    }

    pub fn matches(&self, date: Date) -> bool {
        self.month.is_none_or(|month| date.month() == month)
            && self.year.is_none_or(|year| date.year() == year)
    }
}
