//! Scrum board listing

use clap::Args;
use colored::Colorize;
use sprintwatch_core::atlassian::jira::{AgileApi, Board, Tracker};

use crate::prelude::{println, *};

/// Options for listing boards
#[derive(Args, Debug, Clone)]
pub struct BoardsOptions {
    /// Project key (or set JIRA_PROJECT)
    #[clap(env = "JIRA_PROJECT")]
    pub project: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Scrum boards of a project, in the order Jira returns them
pub async fn list_boards_data<A>(tracker: &Tracker<A>, project_key: &str) -> Result<Vec<Board>>
where
    A: AgileApi,
    A::Error: std::error::Error + Send + Sync + 'static,
{
    tracker
        .find_scrum_boards(project_key)
        .await
        .wrap_err_with(|| format!("Failed to list boards of project {project_key}"))
}

/// Handle the boards command
pub async fn handler<A>(tracker: &Tracker<A>, options: BoardsOptions) -> Result<()>
where
    A: AgileApi,
    A::Error: std::error::Error + Send + Sync + 'static,
{
    let boards = list_boards_data(tracker, &options.project).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
    } else if boards.is_empty() {
        println!("No scrum boards found for project {}.", options.project);
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row!["ID".bold().cyan(), "Name".bold().cyan()]);
        for board in &boards {
            table.add_row(prettytable::row![
                board.id.to_string().green(),
                board.name.as_deref().unwrap_or("-").bright_white()
            ]);
        }
        table.printstd();
    }

    Ok(())
}
