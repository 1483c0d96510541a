/// Startup configuration problems. These are fatal and never retried.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} environment variable not set")]
    MissingVar { name: &'static str },

    #[error("{name} environment variable is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Failures talking to Jira, passed through the core untouched
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Failed to send request to Jira: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Jira API error [{status}]: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Jira response: {0}")]
    Decode(#[source] serde_json::Error),
}
