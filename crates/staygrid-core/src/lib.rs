//! # staygrid Core Library
//!
//! This library provides the booking-timeline logic of a property
//! management back office: it turns the loosely-shaped booking records an
//! API returns into a per-unit Gantt board, a triage ordering and an
//! availability search. The `staygrid` CLI is a thin layer over the same
//! library.
//!
//! ## Architecture
//!
//! - **Timeline**: normalization, lanes, grid placement, triage and
//!   availability, all pure functions over `serde_json::Value` input
//! - **Engine**: [`TimelineLayoutEngine`], a stateless facade binding those
//!   operations to an [`EngineConfig`]
//! - **Config**: TOML-based field tables, vocabularies and grid geometry
//!
//! Nothing here does I/O except [`config`], and nothing logs: records that
//! cannot be used are dropped and counted in [`DropCounts`].
//!
//! ## Key Components
//!
//! - [`TimelineLayoutEngine`]: board layout, triage and availability
//! - [`NormalizedStay`]: the typed projection of one booking record
//! - [`DateWindow`]: the visible calendar range
//! - [`EngineConfig`]: engine configuration management

pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod fields;
pub mod timeline;
pub mod vocab;

pub use config::{data_dir, EngineConfig, WindowConfig};
pub use dates::DateWindow;
pub use engine::{DayColumn, LaneLayout, PlacedStay, TimelineLayout, TimelineLayoutEngine};
pub use error::{ConfigError, CoreError, ValidationError};
pub use fields::{FieldTable, UnitFields};
pub use timeline::{
    AvailabilityQuery, BookingRow, DropCounts, GridConfig, NormalizedStay, Placement, StayKind,
    TriageRow, UnitInfo, UnitKey,
};
pub use vocab::{CancellationVocabulary, KindVocabulary, StatusRankTable};
