use crate::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use sprintwatch_core::atlassian::jira::FieldIds;
use sprintwatch_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub mod jira;

/// Jira configuration from environment variables
#[derive(Debug)]
pub struct JiraConfig {
    pub server_url: String,
    pub user: String,
    pub token: SecretString,
    pub field_ids: FieldIds,
    pub page_size: u32,
}

impl JiraConfig {
    /// Load configuration from a `.env` file, when one is found in the
    /// working directory or its parents, and then the environment.
    ///
    /// Variables already set in the environment take precedence over the file.
    pub fn load() -> std::result::Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => log::debug!("No .env file found"),
            Err(err) => log::warn!("Ignoring unreadable .env file: {err}"),
        }

        Self::from_env()
    }

    /// Load configuration from environment variables.
    ///
    /// `JIRA_SERVER`, `JIRA_USER` and `JIRA_TOKEN` are required.
    /// `JIRA_STORY_POINTS_FIELD`, `JIRA_SPRINT_FIELD` and `JIRA_PAGE_SIZE`
    /// override the defaults.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required =
            |name: &'static str| var(name).ok_or(ConfigError::MissingVar { name });

        let server_url = required("JIRA_SERVER")?;
        let user = required("JIRA_USER")?;
        let token = SecretString::from(required("JIRA_TOKEN")?);

        let defaults = FieldIds::default();
        let field_ids = FieldIds {
            story_points: var("JIRA_STORY_POINTS_FIELD").unwrap_or(defaults.story_points),
            sprint: var("JIRA_SPRINT_FIELD").unwrap_or(defaults.sprint),
        };

        let page_size = match var("JIRA_PAGE_SIZE") {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: "JIRA_PAGE_SIZE",
                        reason: format!(
                            "expected an integer between 1 and {MAX_PAGE_SIZE}, got `{raw}`"
                        ),
                    })
                }
            },
        };

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            user,
            token,
            field_ids,
            page_size,
        })
    }
}

/// Create an authenticated HTTP client with Basic Auth headers
pub fn create_jira_client(config: &JiraConfig) -> Result<reqwest::Client> {
    use base64::Engine;
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

    let auth_string = format!("{}:{}", config.user, config.token.expose_secret());
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    let mut auth_value = HeaderValue::from_str(&format!("Basic {auth_encoded}"))
        .map_err(|e| eyre!("Invalid header value: {}", e))?;
    auth_value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("JIRA_SERVER", "https://example.atlassian.net/"),
        ("JIRA_USER", "me@example.com"),
        ("JIRA_TOKEN", "secret-token"),
    ];

    #[test]
    fn test_from_lookup_required_only() {
        let config = JiraConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.server_url, "https://example.atlassian.net");
        assert_eq!(config.user, "me@example.com");
        assert_eq!(config.token.expose_secret(), "secret-token");
        assert_eq!(config.field_ids, FieldIds::default());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_lookup_missing_token() {
        let err = JiraConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar { name: "JIRA_TOKEN" }));
    }

    #[test]
    fn test_from_lookup_empty_value_is_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("JIRA_SERVER", "");

        let err = JiraConfig::from_lookup(lookup(&vars)).unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar { name: "JIRA_SERVER" }));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("JIRA_STORY_POINTS_FIELD", "customfield_10016"),
            ("JIRA_SPRINT_FIELD", "customfield_10010"),
            ("JIRA_PAGE_SIZE", "25"),
        ]);

        let config = JiraConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.field_ids.story_points, "customfield_10016");
        assert_eq!(config.field_ids.sprint, "customfield_10010");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_from_lookup_invalid_page_size() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("JIRA_PAGE_SIZE", "0"));

        let err = JiraConfig::from_lookup(lookup(&vars)).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: "JIRA_PAGE_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn test_from_lookup_page_size_above_server_cap() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("JIRA_PAGE_SIZE", "100"));

        let err = JiraConfig::from_lookup(lookup(&vars)).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: "JIRA_PAGE_SIZE",
                ref reason,
            } if reason.contains("between 1 and 50")
        ));
    }

    #[test]
    fn test_from_env_reads_env_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "JIRA_SERVER=https://dotenv.atlassian.net\n\
             JIRA_USER=dotenv@example.com\n\
             JIRA_TOKEN=dotenv-token\n",
        )
        .unwrap();

        // Act
        dotenvy::from_path(&path).unwrap();
        let config = JiraConfig::from_env().unwrap();

        // Assert
        assert_eq!(config.server_url, "https://dotenv.atlassian.net");
        assert_eq!(config.user, "dotenv@example.com");
        assert_eq!(config.token.expose_secret(), "dotenv-token");
    }

    #[test]
    fn test_debug_output_hides_token() {
        let config = JiraConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert!(!format!("{config:?}").contains("secret-token"));
    }

    #[test]
    fn test_create_jira_client() {
        let config = JiraConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert!(create_jira_client(&config).is_ok());
    }
}
