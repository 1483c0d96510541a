//! HTTP implementation of [`AgileApi`] over the Jira Cloud REST APIs

use serde::de::DeserializeOwned;
use sprintwatch_core::atlassian::jira::raw::{
    RawBoard, RawIssueSearchPage, RawOffsetPage, RawSprint,
};
use sprintwatch_core::atlassian::jira::AgileApi;

use crate::atlassian::{create_jira_client, JiraConfig};
use crate::prelude::*;

const SEARCH_PATH: &str = "/rest/api/3/search/jql";

/// Issues requested per search page
const SEARCH_PAGE_SIZE: u32 = 100;

type Query = Vec<(&'static str, String)>;

/// Authenticated Jira client; one method call is one HTTP round trip
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        Ok(Self {
            http: create_jira_client(config)?,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> std::result::Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url} {query:?}");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_body(status, &body)
    }
}

/// Turn a response status and body into a value or a [`TransportError`]
fn decode_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> std::result::Result<T, TransportError> {
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    serde_json::from_str(body).map_err(TransportError::Decode)
}

fn board_sprints_path(board_id: u64) -> String {
    format!("/rest/agile/1.0/board/{board_id}/sprint")
}

fn boards_query(project_key: &str, board_type: &str, start_at: u64, max_results: u32) -> Query {
    vec![
        ("projectKeyOrId", project_key.to_string()),
        ("type", board_type.to_string()),
        ("startAt", start_at.to_string()),
        ("maxResults", max_results.to_string()),
    ]
}

fn sprints_query(state: &str, start_at: u64, max_results: u32) -> Query {
    vec![
        ("state", state.to_string()),
        ("startAt", start_at.to_string()),
        ("maxResults", max_results.to_string()),
    ]
}

fn search_query(jql: &str, fields: &[String], next_page_token: Option<String>) -> Query {
    let mut query = vec![
        ("jql", jql.to_string()),
        ("fields", fields.join(",")),
        ("maxResults", SEARCH_PAGE_SIZE.to_string()),
    ];
    if let Some(token) = next_page_token {
        query.push(("nextPageToken", token));
    }
    query
}

impl AgileApi for JiraClient {
    type Error = TransportError;

    async fn boards(
        &self,
        project_key: &str,
        board_type: &str,
        start_at: u64,
        max_results: u32,
    ) -> std::result::Result<Vec<RawBoard>, TransportError> {
        let query = boards_query(project_key, board_type, start_at, max_results);
        let page: RawOffsetPage<RawBoard> = self.get_json("/rest/agile/1.0/board", &query).await?;
        Ok(page.values)
    }

    async fn sprints(
        &self,
        board_id: u64,
        state: &str,
        start_at: u64,
        max_results: u32,
    ) -> std::result::Result<Vec<RawSprint>, TransportError> {
        let query = sprints_query(state, start_at, max_results);
        let page: RawOffsetPage<RawSprint> =
            self.get_json(&board_sprints_path(board_id), &query).await?;
        Ok(page.values)
    }

    async fn search_issues(
        &self,
        jql: &str,
        fields: &[String],
        next_page_token: Option<String>,
    ) -> std::result::Result<RawIssueSearchPage, TransportError> {
        let query = search_query(jql, fields, next_page_token);
        self.get_json(SEARCH_PATH, &query).await
    }
}
