//! Core library for sprintwatch
//!
//! This crate implements the **Functional Core** of the sprintwatch application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`sprintwatch_core`** (this crate): domain model, mapping, pagination and
//!   sprint correlation, with zero I/O
//! - **`sprintwatch`**: configuration, the HTTP client and the CLI (the Imperative Shell)
//!
//! The only seam between the two is the [`atlassian::jira::AgileApi`] trait:
//! the shell implements it over HTTP, and tests implement it in memory.
//!
//! # Module Organization
//!
//! - [`pagination`]: fetch-all helpers for offset- and token-paginated endpoints
//! - [`atlassian`]: Jira raw records, domain model, mapping and queries
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use sprintwatch_core::atlassian::jira::{Board, Tracker};
//!
//! // `api` is anything implementing `AgileApi`
//! let tracker = Tracker::new(api);
//!
//! for board in tracker.find_scrum_boards("PROJ").await? {
//!     for sprint in tracker.open_sprints_for_board(&board).await? {
//!         println!("{}: {} issue(s)", sprint.name, sprint.issues.len());
//!     }
//! }
//! ```

pub mod atlassian;
pub mod pagination;
