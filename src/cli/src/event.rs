//! GitHub Actions event context.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Events the action can run on.
pub const SUPPORTED_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];

/// Errors that can occur while reading the workflow context.
#[derive(Debug, Error)]
pub enum EventError {
    /// The workflow was triggered by an unsupported event.
    #[error("Unsupported event '{name}', expected pull_request or pull_request_target")]
    UnsupportedEvent { name: String },

    /// The event payload could not be read.
    #[error("Failed to read event payload {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The event payload is not valid JSON.
    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The event payload carries no pull request number.
    #[error("Event payload does not reference a pull request")]
    MissingPullRequest,

    /// `GITHUB_REPOSITORY` is not of the form `owner/repo`.
    #[error("Invalid repository '{value}', expected owner/repo")]
    InvalidRepository { value: String },
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<EventPullRequest>,
    #[serde(default)]
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
}

/// Extracts the pull request number from an event payload.
pub fn pull_request_number(event_name: &str, payload: &str) -> Result<u64, EventError> {
    if !SUPPORTED_EVENTS.contains(&event_name) {
        return Err(EventError::UnsupportedEvent {
            name: event_name.to_string(),
        });
    }
    let payload: EventPayload = serde_json::from_str(payload)?;
    payload
        .pull_request
        .map(|pr| pr.number)
        .or(payload.number)
        .ok_or(EventError::MissingPullRequest)
}

/// Reads the event payload at `path` and extracts the pull request number.
pub fn read_pull_request_number(event_name: &str, path: &Path) -> Result<u64, EventError> {
    let payload = std::fs::read_to_string(path).map_err(|source| EventError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    pull_request_number(event_name, &payload)
}

/// Splits `owner/repo`.
pub fn parse_repository(value: &str) -> Result<(&str, &str), EventError> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(EventError::InvalidRepository {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_number_from_pull_request_event() {
        let payload = r#"{"action":"closed","number":42,"pull_request":{"number":42,"merged":true}}"#;
        assert_eq!(pull_request_number("pull_request_target", payload).unwrap(), 42);
    }

    #[test]
    fn rejects_unsupported_events() {
        let result = pull_request_number("push", "{}");
        assert!(matches!(result, Err(EventError::UnsupportedEvent { .. })));
    }

    #[test]
    fn rejects_payload_without_pull_request() {
        let result = pull_request_number("pull_request", r#"{"action":"opened"}"#);
        assert!(matches!(result, Err(EventError::MissingPullRequest)));
    }

    #[test]
    fn reads_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pull_request":{{"number":7}}}}"#).unwrap();

        let number = read_pull_request_number("pull_request", file.path()).unwrap();
        assert_eq!(number, 7);
    }

    #[test]
    fn parses_repository() {
        assert_eq!(parse_repository("octo/repo").unwrap(), ("octo", "repo"));
        assert!(parse_repository("octo").is_err());
        assert!(parse_repository("/repo").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }
}
