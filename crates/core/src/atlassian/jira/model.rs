//! Domain model for boards, sprints and issues
//!
//! These are plain value types. Every sprint owns copies of its issues, so
//! results from separate fetches never share state.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Jira issue key, e.g. `PROJ-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IssueKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for IssueKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Agile board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Board {
    /// Board known only by its id
    pub fn new(id: u64) -> Self {
        Self { id, name: None }
    }
}

/// Jira user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Withheld when the user's profile visibility hides it
    pub email_address: Option<String>,
}

/// Workflow status of an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub key: IssueKey,
    pub summary: String,
    pub status: Status,
    pub issue_type: String,
    pub assignee: Option<Person>,
    pub reporter: Option<Person>,
    /// Non-negative when present
    pub story_points: Option<f64>,
}

/// Sprint with a snapshot of the issues it contained at fetch time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    /// Lifecycle state as reported by Jira (`active`, `closed`, `future`)
    pub status: String,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
    pub issues: Vec<Issue>,
}

impl Sprint {
    /// Sum of the story points of all estimated issues
    pub fn total_story_points(&self) -> f64 {
        self.issues.iter().filter_map(|i| i.story_points).sum()
    }

    /// Number of issues without a story point estimate
    pub fn unestimated_issues(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.story_points.is_none())
            .count()
    }
}
