use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::{config::Config, error::WorldClockError};

/// Build the HTTP client shared by every collaborator.
pub fn build_client(config: &Config) -> Result<Client, WorldClockError> {
    Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| WorldClockError::NetworkFailure(e.to_string()))
}

/// Read the body of a response, mapping non-success statuses onto the
/// error taxonomy.
pub async fn read_body(res: Response) -> Result<String, WorldClockError> {
    let status = res.status();
    let body = res.text().await?;
    classify(status, &body)?;
    Ok(body)
}

pub fn classify(status: StatusCode, body: &str) -> Result<(), WorldClockError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED => Err(WorldClockError::Unauthorized),
        StatusCode::BAD_REQUEST => Err(WorldClockError::BadRequest),
        s => Err(WorldClockError::NetworkFailure(format!("{s}: {}", truncate_body(body)))),
    }
}

pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
