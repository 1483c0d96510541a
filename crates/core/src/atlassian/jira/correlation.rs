//! Associating issues with the sprints they belong to
//!
//! The search endpoint returns issues independently of sprints, and one
//! issue may reference several sprints. These helpers rebuild the
//! sprint → issues relation for a known set of sprints.

use std::collections::{HashMap, HashSet};

use super::mapping::sprint_ids;
use super::raw::{FieldIds, RawIssue};

/// JQL selecting every issue in any of the given sprints
pub fn sprint_membership_jql(sprint_ids: &[u64]) -> String {
    let ids: Vec<String> = sprint_ids.iter().map(u64::to_string).collect();
    format!("sprint IN ({})", ids.join(","))
}

/// Group raw issues by the requested sprints they reference.
///
/// Every id in `sprint_ids` gets an entry, possibly empty. References to
/// sprints outside that set are ignored. Within one sprint the issues keep
/// their fetch order and an issue key appears at most once; an issue in
/// several requested sprints appears under each of them.
pub fn issues_by_sprint<'a>(
    sprint_ids_requested: &[u64],
    raw_issues: &'a [RawIssue],
    field_ids: &FieldIds,
) -> HashMap<u64, Vec<&'a RawIssue>> {
    let mut grouped: HashMap<u64, Vec<&'a RawIssue>> = sprint_ids_requested
        .iter()
        .map(|id| (*id, Vec::new()))
        .collect();
    let mut seen: HashSet<(u64, &'a str)> = HashSet::new();

    for issue in raw_issues {
        for sprint_id in sprint_ids(issue, field_ids) {
            let Some(issues) = grouped.get_mut(&sprint_id) else {
                continue;
            };

            // Keyless issues fail mapping later, so they are not deduplicated here
            let first_time = match issue.key.as_deref() {
                Some(key) => seen.insert((sprint_id, key)),
                None => true,
            };
            if first_time {
                issues.push(issue);
            }
        }
    }

    grouped
}
