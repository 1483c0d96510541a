//! Sprints of a board with the issues they contain

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use sprintwatch_core::atlassian::jira::{AgileApi, Board, Issue, Sprint, Tracker};

use crate::prelude::{println, *};

/// Options for listing sprints
#[derive(Args, Debug, Clone)]
pub struct SprintsOptions {
    /// Board ID (or set JIRA_BOARD_ID)
    #[arg(
        long,
        env = "JIRA_BOARD_ID",
        conflicts_with = "project",
        required_unless_present = "project"
    )]
    pub board: Option<u64>,

    /// Walk every scrum board of this project instead of a single board
    #[arg(long)]
    pub project: Option<String>,

    /// Sprint state(s) to include, comma-separated
    #[arg(long, default_value = "active")]
    pub state: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Sprints found on one board
#[derive(Debug, Serialize)]
pub struct BoardSprints {
    pub board: Board,
    pub sprints: Vec<Sprint>,
}

/// Sprints (with issues) of the selected boards, boards in Jira order
pub async fn list_sprints_data<A>(
    tracker: &Tracker<A>,
    boards: Vec<Board>,
    state: &str,
) -> Result<Vec<BoardSprints>>
where
    A: AgileApi,
    A::Error: std::error::Error + Send + Sync + 'static,
{
    let mut output = Vec::with_capacity(boards.len());

    for board in boards {
        let sprints = tracker
            .sprints_for_board(&board, state)
            .await
            .wrap_err_with(|| format!("Failed to list sprints of board {}", board.id))?;
        output.push(BoardSprints { board, sprints });
    }

    Ok(output)
}

/// Handle the sprints command
pub async fn handler<A>(tracker: &Tracker<A>, options: SprintsOptions) -> Result<()>
where
    A: AgileApi,
    A::Error: std::error::Error + Send + Sync + 'static,
{
    let boards = match (&options.board, &options.project) {
        (Some(id), _) => vec![Board::new(*id)],
        (None, Some(project)) => super::board::list_boards_data(tracker, project).await?,
        (None, None) => return Err(eyre!("Either --board or --project is required")),
    };

    let data = list_sprints_data(tracker, boards, &options.state).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if data.iter().all(|b| b.sprints.is_empty()) {
        println!("No {} sprints found.", options.state);
        return Ok(());
    }

    let mut out = anstream::stdout();
    for entry in &data {
        for sprint in &entry.sprints {
            write_sprint(&mut out, &entry.board, sprint)?;
        }
    }

    Ok(())
}

fn format_date(date: Option<&chrono::DateTime<chrono::FixedOffset>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_points(points: Option<f64>) -> String {
    points.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Write one sprint and its issue table to `out`
fn write_sprint(out: &mut impl Write, board: &Board, sprint: &Sprint) -> std::io::Result<()> {
    writeln!(
        out,
        "\n{} {} [{}] {} → {}  (board {})",
        sprint.id.to_string().green(),
        sprint.name.bold().bright_white(),
        sprint.status.bright_yellow(),
        format_date(sprint.start_date.as_ref()),
        format_date(sprint.end_date.as_ref()),
        board.id
    )?;

    if sprint.issues.is_empty() {
        return writeln!(out, "{}", "  No issues.".bright_black());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Key".bold().cyan(),
        "Summary".bold().cyan(),
        "Type".bold().cyan(),
        "Status".bold().cyan(),
        "Assignee".bold().cyan(),
        "Points".bold().cyan()
    ]);
    for issue in &sprint.issues {
        table.add_row(issue_row(issue));
    }
    table.print(out)?;

    writeln!(
        out,
        "{} {} point(s), {} unestimated issue(s)",
        "Total:".bold().cyan(),
        sprint.total_story_points(),
        sprint.unestimated_issues()
    )
}

fn issue_row(issue: &Issue) -> prettytable::Row {
    let assignee = match &issue.assignee {
        Some(person) => person.name.bright_magenta().to_string(),
        None => "Unassigned".bright_black().to_string(),
    };

    prettytable::row![
        issue.key.as_str().bright_white(),
        issue.summary,
        issue.issue_type.bright_blue(),
        issue.status.name.green(),
        assignee,
        format_points(issue.story_points)
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(Some(3.0)), "3");
        assert_eq!(format_points(Some(0.5)), "0.5");
        assert_eq!(format_points(None), "-");
    }

    #[test]
    fn test_format_date() {
        let date = chrono::DateTime::parse_from_rfc3339("2024-05-01T08:00:00+02:00").unwrap();

        assert_eq!(format_date(Some(&date)), "2024-05-01");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_write_sprint_strips_colors_when_piped() {
        // Arrange
        colored::control::set_override(true);
        let sprint = Sprint {
            id: 7,
            name: "Sprint 7".to_string(),
            status: "active".to_string(),
            start_date: None,
            end_date: None,
            issues: vec![Issue {
                key: "PROJ-1".into(),
                summary: "Fix login".to_string(),
                status: sprintwatch_core::atlassian::jira::Status {
                    id: "3".to_string(),
                    name: "In Progress".to_string(),
                },
                issue_type: "Bug".to_string(),
                assignee: None,
                reporter: None,
                story_points: Some(3.0),
            }],
        };
        let mut out = anstream::StripStream::new(Vec::new());

        // Act
        write_sprint(&mut out, &Board::new(3), &sprint).unwrap();
        colored::control::unset_override();

        // Assert
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("Sprint 7"));
        assert!(text.contains("PROJ-1"));
        assert!(text.contains("3 point(s), 0 unestimated issue(s)"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_board_sprints_json_shape() {
        let data = BoardSprints {
            board: Board::new(3),
            sprints: vec![Sprint {
                id: 1,
                name: "Sprint 1".to_string(),
                status: "active".to_string(),
                start_date: None,
                end_date: None,
                issues: vec![],
            }],
        };

        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["board"]["id"], 3);
        assert_eq!(json["sprints"][0]["status"], "active");
        assert!(json["sprints"][0]["start_date"].is_null());
    }
}
