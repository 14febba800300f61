//! Issue feed: HTTP client, cancellable pending load and list state.
//!
//! A load runs on the tokio runtime and reports back through a oneshot
//! channel polled once per frame. Completion is ignored once the overlay's
//! [`LivenessToken`] is dead.

use shared::{Issue, IssuesResponse};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::lifecycle::LivenessToken;

/// Message shown in the issue list when the feed fails
pub const FETCH_FAILED: &str = "Error fetching issues";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("issue load was cancelled")]
    Cancelled,
}

pub type IssueResult = Result<Vec<Issue>, FetchError>;

/// Sending side of a pending load, for feeding issues from any source
pub type IssueSender = oneshot::Sender<IssueResult>;

/// Client for the issue endpoint
#[derive(Debug, Clone)]
pub struct IssueClient {
    http: reqwest::Client,
    endpoint: String,
}

impl IssueClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET` the endpoint and decode `{ issues: [...] }`
    pub async fn fetch(&self) -> IssueResult {
        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body: IssuesResponse = response.json().await?;
        Ok(body.issues)
    }
}

/// Issue load in flight
#[derive(Debug)]
pub struct PendingLoad {
    token: LivenessToken,
    rx: oneshot::Receiver<IssueResult>,
    task: Option<JoinHandle<()>>,
}

impl PendingLoad {
    /// Fetch on the runtime behind `handle`
    pub fn spawn(handle: &tokio::runtime::Handle, client: IssueClient, token: LivenessToken) -> Self {
        let (tx, rx) = oneshot::channel();
        let task = handle.spawn(async move {
            let result = client.fetch().await;
            if let Err(e) = &result {
                tracing::debug!("Issue fetch from {} failed: {e}", client.endpoint());
            }
            let _ = tx.send(result);
        });
        Self {
            token,
            rx,
            task: Some(task),
        }
    }

    /// Pending load completed by whoever holds the returned sender
    pub fn channel(token: LivenessToken) -> (IssueSender, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                token,
                rx,
                task: None,
            },
        )
    }

    pub fn token(&self) -> &LivenessToken {
        &self.token
    }

    /// Non-blocking check. None while still in flight.
    pub fn poll(&mut self) -> Option<IssueResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(FetchError::Cancelled)),
        }
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// What the issue list panel shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IssueListState {
    #[default]
    Idle,
    Loading,
    /// Every fetched issue; the first `shown` have markers
    Loaded { issues: Vec<Issue>, shown: usize },
    Failed(String),
}

impl IssueListState {
    pub fn loaded(issues: Vec<Issue>, cap: usize) -> Self {
        let shown = issues.len().min(cap);
        Self::Loaded { issues, shown }
    }

    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Loaded { issues, .. } => issues,
            _ => &[],
        }
    }

    /// Header line for the list
    pub fn summary(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Loading => "Loading issues...".to_string(),
            Self::Loaded { issues, .. } if issues.is_empty() => {
                "No issues found with matching properties".to_string()
            }
            Self::Loaded { issues, .. } => format!("Found {} issues", issues.len()),
            Self::Failed(message) => message.clone(),
        }
    }

    /// Trailer when more issues exist than have markers
    pub fn overflow_notice(&self) -> Option<String> {
        match self {
            Self::Loaded { issues, shown } if issues.len() > *shown => {
                Some(format!("...and {} more", issues.len() - shown))
            }
            _ => None,
        }
    }
}
