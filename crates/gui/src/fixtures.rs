//! Factory functions for issue records used in tests and by agent commands.

use shared::{Issue, IssueId};

/// Issue with a numeric id and the given status label
pub fn issue(id: u64, status: &str) -> Issue {
    Issue {
        id: IssueId::Number(id),
        name: format!("Issue {id}"),
        description: format!("Test issue number {id}."),
        status: status.to_string(),
        severity: "Medium".to_string(),
        location: "Section A".to_string(),
        created_at: Some("2023-10-01T10:00:00Z".to_string()),
        updated_at: None,
        due_date: Some("2023-10-10T15:00:00Z".to_string()),
        assignee: "Test User".to_string(),
    }
}

/// Issue with a string id
pub fn text_issue(id: &str, status: &str) -> Issue {
    Issue {
        id: IssueId::Text(id.to_string()),
        ..issue(0, status)
    }
}

/// One issue per status, ids starting at 1
pub fn issues_with_statuses(statuses: &[&str]) -> Vec<Issue> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| issue(i as u64 + 1, status))
        .collect()
}

/// `n` open issues
pub fn many_issues(n: usize) -> Vec<Issue> {
    (1..=n as u64).map(|i| issue(i, "Open")).collect()
}
