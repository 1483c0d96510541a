pub mod board;
pub mod client;
pub mod sprint;

use sprintwatch_core::atlassian::jira::Tracker;

use crate::atlassian::JiraConfig;
use crate::prelude::{eprintln, *};

pub use client::JiraClient;

/// Jira commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List the scrum boards of a project
    #[clap(name = "boards")]
    Boards(board::BoardsOptions),

    /// List sprints of a board, or of every scrum board in a project, with their issues
    #[clap(name = "sprints")]
    Sprints(sprint::SprintsOptions),
}

/// Build a tracker backed by the HTTP client
pub fn create_tracker(config: &JiraConfig) -> Result<Tracker<JiraClient>> {
    let client = JiraClient::new(config)?;
    Ok(Tracker::new(client)
        .with_fields(config.field_ids.clone())
        .with_page_size(config.page_size))
}

/// Run Jira commands
pub async fn run(cmd: Commands, config: &JiraConfig, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Jira server: {} (as {})", config.server_url, config.user);
    }

    let tracker = create_tracker(config)?;

    match cmd {
        Commands::Boards(options) => board::handler(&tracker, options).await,
        Commands::Sprints(options) => sprint::handler(&tracker, options).await,
    }
}
