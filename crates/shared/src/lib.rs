mod seed;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use seed::seeded_issues;

/// Identifier of an issue record. The seeded service uses numbers,
/// other sources may send strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueId {
    Number(u64),
    Text(String),
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueId::Number(n) => write!(f, "{n}"),
            IssueId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for IssueId {
    fn from(n: u64) -> Self {
        IssueId::Number(n)
    }
}

/// Issue status category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueStatus {
    Open,
    Closed,
    InProgress,
    Resolved,
    Critical,
    /// Anything the palette has no dedicated colour for
    Other(String),
}

impl IssueStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Open" => IssueStatus::Open,
            "Closed" => IssueStatus::Closed,
            "In Progress" => IssueStatus::InProgress,
            "Resolved" => IssueStatus::Resolved,
            "Critical" => IssueStatus::Critical,
            other => IssueStatus::Other(other.to_string()),
        }
    }

    /// Label as sent over the wire
    pub fn label(&self) -> &str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::Closed => "Closed",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Critical => "Critical",
            IssueStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Issue record served by `GET /api/issues`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub location: String,
    /// ISO 8601 timestamps, kept as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignee: String,
}

impl Issue {
    pub fn status(&self) -> IssueStatus {
        IssueStatus::parse(&self.status)
    }

    /// Due date without the time part (`2023-10-10T15:00:00Z` → `2023-10-10`)
    pub fn due_day(&self) -> Option<&str> {
        self.due_date
            .as_deref()
            .map(|d| d.split_once('T').map_or(d, |(day, _)| day))
    }
}

/// Body of `GET /api/issues`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IssuesResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub status: u16,
}
