//! Mapping from raw Jira records to the domain model
//!
//! Optional domain fields are absent exactly when the raw record omits or
//! nulls them. Required fields that are missing produce a [`MappingError`]
//! naming the record kind and the field.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde_json::Value;

use super::error::{Entity, MappingError};
use super::model::{Board, Issue, IssueKey, Person, Sprint, Status};
use super::raw::{FieldIds, RawBoard, RawIssue, RawSprint, RawStatus, RawUser};

fn missing(entity: Entity, field: &'static str) -> MappingError {
    MappingError::MissingField { entity, field }
}

fn invalid(entity: Entity, field: &'static str, reason: String) -> MappingError {
    MappingError::InvalidField {
        entity,
        field,
        reason,
    }
}

fn required(value: &Option<String>, entity: Entity, field: &'static str) -> Result<String, MappingError> {
    value.clone().ok_or_else(|| missing(entity, field))
}

pub fn map_board(raw: &RawBoard) -> Result<Board, MappingError> {
    Ok(Board {
        id: raw.id.ok_or_else(|| missing(Entity::Board, "id"))?,
        name: raw.name.clone(),
    })
}

pub fn map_person(raw: &RawUser) -> Result<Person, MappingError> {
    Ok(Person {
        id: required(&raw.account_id, Entity::Person, "accountId")?,
        name: required(&raw.display_name, Entity::Person, "displayName")?,
        email_address: raw.email_address.clone(),
    })
}

pub fn map_status(raw: &RawStatus) -> Result<Status, MappingError> {
    Ok(Status {
        id: required(&raw.id, Entity::Status, "id")?,
        name: required(&raw.name, Entity::Status, "name")?,
    })
}

/// Convert a raw issue, reading story points from `field_ids.story_points`
pub fn map_issue(raw: &RawIssue, field_ids: &FieldIds) -> Result<Issue, MappingError> {
    let key = required(&raw.key, Entity::Issue, "key")?;
    let fields = raw
        .fields
        .as_ref()
        .ok_or_else(|| missing(Entity::Issue, "fields"))?;

    let status = fields
        .status
        .as_ref()
        .ok_or_else(|| missing(Entity::Issue, "fields.status"))?;
    let issue_type = fields
        .issuetype
        .as_ref()
        .and_then(|t| t.name.clone())
        .ok_or_else(|| missing(Entity::Issue, "fields.issuetype.name"))?;

    Ok(Issue {
        key: IssueKey::from(key),
        summary: required(&fields.summary, Entity::Issue, "fields.summary")?,
        status: map_status(status)?,
        issue_type,
        assignee: fields.assignee.as_ref().map(map_person).transpose()?,
        reporter: fields.reporter.as_ref().map(map_person).transpose()?,
        story_points: parse_story_points(fields.custom_field(&field_ids.story_points))?,
    })
}

/// Convert a raw sprint together with the raw issues correlated to it.
///
/// Issues keep the order of `raw_issues`.
pub fn map_sprint(
    raw: &RawSprint,
    raw_issues: &[&RawIssue],
    field_ids: &FieldIds,
) -> Result<Sprint, MappingError> {
    let start_date = parse_timestamp(raw.start_date.as_deref(), Entity::Sprint, "startDate")?;
    let end_date = parse_timestamp(raw.end_date.as_deref(), Entity::Sprint, "endDate")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(invalid(
                Entity::Sprint,
                "endDate",
                format!("ends ({end}) before it starts ({start})"),
            ));
        }
    }

    let issues = raw_issues
        .iter()
        .map(|issue| map_issue(issue, field_ids))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Sprint {
        id: raw.id.ok_or_else(|| missing(Entity::Sprint, "id"))?,
        name: required(&raw.name, Entity::Sprint, "name")?,
        status: required(&raw.state, Entity::Sprint, "state")?,
        start_date,
        end_date,
        issues,
    })
}

/// Ids of every sprint referenced by the issue's sprint field.
///
/// References without a recognisable id are skipped.
pub fn sprint_ids(raw: &RawIssue, field_ids: &FieldIds) -> Vec<u64> {
    let Some(value) = raw
        .fields
        .as_ref()
        .and_then(|f| f.custom_field(&field_ids.sprint))
    else {
        return Vec::new();
    };

    let refs = match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };

    refs.iter()
        .filter_map(|sprint_ref| {
            let id = sprint_ref_id(sprint_ref);
            if id.is_none() {
                log::warn!(
                    "skipping unrecognised sprint reference on {}: {}",
                    raw.key.as_deref().unwrap_or("<no key>"),
                    sprint_ref
                );
            }
            id
        })
        .collect()
}

fn sprint_ref_id(value: &Value) -> Option<u64> {
    match value {
        Value::Object(map) => match map.get("id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        },
        Value::Number(n) => n.as_u64(),
        Value::String(s) => legacy_sprint_id(s),
        _ => None,
    }
}

/// Parse `com.atlassian.greenhopper.service.sprint.Sprint@1a2b[id=12,rapidViewId=3,...]`
fn legacy_sprint_id(value: &str) -> Option<u64> {
    static RE_SPRINT_ID: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE_SPRINT_ID
        .get_or_init(|| Regex::new(r"[\[,]id=(\d+)").ok())
        .as_ref()?;
    re.captures(value)?.get(1)?.as_str().parse().ok()
}

fn parse_story_points(value: Option<&Value>) -> Result<Option<f64>, MappingError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let points = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match points {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(Some(p)),
        _ => Err(invalid(
            Entity::Issue,
            "story points",
            format!("expected a non-negative number, got {value}"),
        )),
    }
}

/// Parse an ISO-8601 timestamp; missing or empty means absent
fn parse_timestamp(
    value: Option<&str>,
    entity: Entity,
    field: &'static str,
) -> Result<Option<DateTime<FixedOffset>>, MappingError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    // Jira Server sends `+0000` offsets, which RFC 3339 rejects
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(Some)
        .map_err(|e| invalid(entity, field, format!("`{value}` is not a timestamp: {e}")))
}
