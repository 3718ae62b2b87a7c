//! Stateful stores over the Conectando Corazones API.
//!
//! Each store owns one slice of client state behind a mutex and exposes
//! async operations that call the backend and update that state. Callers
//! read consistent copies through `state()`. Locks are never held across an
//! `.await`.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod diary;
pub mod error;
pub mod guard;
pub mod list;
pub mod moms_week;
pub mod reconcile;
pub mod resource;
pub mod state;

pub use auth::AuthStore;
pub use config::{Config, ConfigError, build_client};
pub use diary::DiaryStore;
pub use error::HookError;
pub use guard::{Admission, InflightGuard};
pub use list::{BookStore, CalendarStore, DirectoryStore, ListStore};
pub use moms_week::MomsWeekStore;
pub use reconcile::SavePhase;
pub use resource::{FetchState, Resource};
pub use state::ResourceState;
