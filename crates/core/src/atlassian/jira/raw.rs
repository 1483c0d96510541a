//! Raw records returned by the Jira REST and Agile APIs
//!
//! Every field is optional at this layer. Deciding which absences are
//! acceptable and which are errors is the job of [`super::mapping`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pagination::ContinuationPage;

/// Default custom field id holding story points
pub const STORY_POINTS_FIELD: &str = "customfield_10026";

/// Default custom field id holding the sprints an issue belongs to
pub const SPRINT_FIELD: &str = "customfield_10020";

/// Ids of the custom fields this instance uses for story points and sprints.
///
/// Custom field ids differ between Jira instances, so they are configuration
/// rather than part of the raw schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub story_points: String,
    pub sprint: String,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            story_points: STORY_POINTS_FIELD.to_string(),
            sprint: SPRINT_FIELD.to_string(),
        }
    }
}

impl FieldIds {
    /// Fields to request from the issue search endpoint
    pub fn search_fields(&self) -> Vec<String> {
        ["key", "summary", "status", "issuetype", "assignee", "reporter"]
            .into_iter()
            .map(str::to_string)
            .chain([self.story_points.clone(), self.sprint.clone()])
            .collect()
    }
}

/// Board from `GET /rest/agile/1.0/board`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawBoard {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[serde(rename = "type")]
    pub board_type: Option<String>,
}

/// Sprint from `GET /rest/agile/1.0/board/{id}/sprint`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawSprint {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(default)]
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// User as embedded in issue fields
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawUser {
    #[serde(default)]
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(default)]
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawStatus {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawIssueType {
    #[serde(default)]
    pub name: Option<String>,
}

/// Issue fields; custom fields are kept by id in `custom`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawIssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    #[serde(default)]
    pub issuetype: Option<RawIssueType>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(default)]
    pub reporter: Option<RawUser>,
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl RawIssueFields {
    /// Value of a custom field, treating JSON `null` as absent
    pub fn custom_field(&self, id: &str) -> Option<&serde_json::Value> {
        self.custom.get(id).filter(|v| !v.is_null())
    }
}

/// Issue from the JQL search endpoint
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawIssue {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: Option<RawIssueFields>,
}

/// Envelope of the offset-paginated Agile endpoints
#[derive(Debug, Deserialize, Clone)]
pub struct RawOffsetPage<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    #[serde(default)]
    #[serde(rename = "startAt")]
    pub start_at: Option<u64>,
    #[serde(default)]
    #[serde(rename = "maxResults")]
    pub max_results: Option<u64>,
    #[serde(default)]
    #[serde(rename = "isLast")]
    pub is_last: Option<bool>,
}

/// Response of `GET /rest/api/3/search/jql`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawIssueSearchPage {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    #[serde(default)]
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    #[serde(rename = "isLast")]
    pub is_last: Option<bool>,
}

impl IntoIterator for RawIssueSearchPage {
    type Item = RawIssue;
    type IntoIter = std::vec::IntoIter<RawIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl ContinuationPage for RawIssueSearchPage {
    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }
}
