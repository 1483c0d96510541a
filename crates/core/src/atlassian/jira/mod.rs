//! Jira boards, sprints and issues
//!
//! - [`raw`]: records as returned by the REST and Agile APIs
//! - [`model`]: the domain model
//! - [`mapping`]: raw records → domain model
//! - [`correlation`]: rebuilding the sprint → issues relation
//! - [`tracker`]: board and sprint queries over an [`AgileApi`]

pub mod correlation;
pub mod error;
pub mod mapping;
pub mod model;
pub mod raw;
pub mod tracker;

pub use error::{Entity, MappingError, TrackerError};
pub use model::{Board, Issue, IssueKey, Person, Sprint, Status};
pub use raw::FieldIds;
pub use tracker::{AgileApi, Tracker};
