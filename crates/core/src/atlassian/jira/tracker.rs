//! Board and sprint queries composed from pagination, correlation and mapping
//!
//! [`Tracker`] knows nothing about HTTP. It drives an [`AgileApi`]
//! implementation, which is the only place that talks to Jira.

use crate::pagination::{
    fetch_all_by_offset, fetch_all_by_token, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

use super::correlation::{issues_by_sprint, sprint_membership_jql};
use super::error::{Entity, MappingError, TrackerError};
use super::mapping::{map_board, map_sprint};
use super::model::{Board, Sprint};
use super::raw::{FieldIds, RawBoard, RawIssueSearchPage, RawSprint};

/// Board type queried by [`Tracker::find_scrum_boards`]
pub const SCRUM_BOARD: &str = "scrum";

/// Sprint state queried by [`Tracker::open_sprints_for_board`]
pub const ACTIVE_SPRINT: &str = "active";

/// Raw page access to the Jira Agile and search APIs.
///
/// Each method performs one round trip and returns one page.
#[allow(async_fn_in_trait)]
pub trait AgileApi {
    type Error;

    /// Boards of `board_type` for a project, starting at `start_at`
    async fn boards(
        &self,
        project_key: &str,
        board_type: &str,
        start_at: u64,
        max_results: u32,
    ) -> Result<Vec<RawBoard>, Self::Error>;

    /// Sprints of a board in the given state, starting at `start_at`
    async fn sprints(
        &self,
        board_id: u64,
        state: &str,
        start_at: u64,
        max_results: u32,
    ) -> Result<Vec<RawSprint>, Self::Error>;

    /// One page of a JQL search
    async fn search_issues(
        &self,
        jql: &str,
        fields: &[String],
        next_page_token: Option<String>,
    ) -> Result<RawIssueSearchPage, Self::Error>;
}

/// Read-only board and sprint queries.
///
/// Every call builds fresh state and returns owned values, so calls can be
/// retried in full.
#[derive(Debug, Clone)]
pub struct Tracker<A> {
    api: A,
    field_ids: FieldIds,
    page_size: u32,
}

impl<A: AgileApi> Tracker<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            field_ids: FieldIds::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Use instance-specific custom field ids
    pub fn with_fields(mut self, field_ids: FieldIds) -> Self {
        self.field_ids = field_ids;
        self
    }

    /// Page size for offset-paginated requests, clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// All scrum boards of a project
    pub async fn find_scrum_boards(
        &self,
        project_key: &str,
    ) -> Result<Vec<Board>, TrackerError<A::Error>> {
        let api = &self.api;
        let raw_boards = fetch_all_by_offset(self.page_size, move |start_at, max_results| {
            api.boards(project_key, SCRUM_BOARD, start_at, max_results)
        })
        .await
        .map_err(TrackerError::Transport)?;

        log::debug!(
            "found {} scrum board(s) for project {project_key}",
            raw_boards.len()
        );

        let boards = raw_boards
            .iter()
            .map(map_board)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    /// Active sprints of a board, each with its issues
    pub async fn open_sprints_for_board(
        &self,
        board: &Board,
    ) -> Result<Vec<Sprint>, TrackerError<A::Error>> {
        self.sprints_for_board(board, ACTIVE_SPRINT).await
    }

    /// Sprints of a board in `state`, each with its issues.
    ///
    /// Sprints keep the order Jira returned them in, and each sprint's issues
    /// keep the search order. When the board has no matching sprint the
    /// issue search is skipped.
    pub async fn sprints_for_board(
        &self,
        board: &Board,
        state: &str,
    ) -> Result<Vec<Sprint>, TrackerError<A::Error>> {
        let api = &self.api;
        let board_id = board.id;
        let raw_sprints = fetch_all_by_offset(self.page_size, move |start_at, max_results| {
            api.sprints(board_id, state, start_at, max_results)
        })
        .await
        .map_err(TrackerError::Transport)?;

        if raw_sprints.is_empty() {
            log::debug!("board {board_id} has no {state} sprints");
            return Ok(Vec::new());
        }

        let sprint_ids = raw_sprints
            .iter()
            .map(|s| {
                s.id.ok_or(MappingError::MissingField {
                    entity: Entity::Sprint,
                    field: "id",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let jql = sprint_membership_jql(&sprint_ids);
        let fields = self.field_ids.search_fields();
        let (jql, fields) = (jql.as_str(), fields.as_slice());
        let raw_issues = fetch_all_by_token(move |token| api.search_issues(jql, fields, token))
            .await
            .map_err(TrackerError::Transport)?;

        log::debug!(
            "board {board_id}: {} sprint(s), {} issue(s)",
            raw_sprints.len(),
            raw_issues.len()
        );

        let grouped = issues_by_sprint(&sprint_ids, &raw_issues, &self.field_ids);
        let sprints = raw_sprints
            .iter()
            .zip(&sprint_ids)
            .map(|(raw, id)| {
                let issues = grouped.get(id).map(Vec::as_slice).unwrap_or_default();
                map_sprint(raw, issues, &self.field_ids)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sprints)
    }
}
