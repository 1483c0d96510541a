/// Atlassian-related transformations
///
/// This module contains the pure side of the Jira integration.
/// Nothing here performs I/O; remote access goes through [`jira::AgileApi`].
pub mod jira;
