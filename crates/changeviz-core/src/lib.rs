#![forbid(unsafe_code)]

//! Change-graph snapshot model (headless).
//!
//! A [`GraphSnapshot`] is one point-in-time view of a version-control history: a set of
//! [`Change`]s with pre-assigned grid coordinates plus the [`Edge`]s between them. Snapshots are
//! immutable once built and are replaced wholesale on refresh.

pub mod config;
pub mod error;
pub mod model;

pub use config::GraphConfig;
pub use error::{Error, Result};
pub use model::{Change, Edge, GraphSnapshot, GridPos, SYNTHETIC_CHANGE_ID};
