use crate::prelude::*;
use clap::Parser;

mod atlassian;
mod error;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Scrum boards, open sprints and their issues from Jira"
)]
pub struct App {
    #[command(subcommand)]
    pub command: atlassian::jira::Commands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "SPRINTWATCH_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    let config = atlassian::JiraConfig::load().wrap_err("Invalid Jira configuration")?;

    atlassian::jira::run(app.command, &config, app.global).await
}
