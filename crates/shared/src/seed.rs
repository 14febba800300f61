//! The fixed issue list served by the demo backend.

use crate::{Issue, IssueId};

struct Row {
    id: u64,
    name: &'static str,
    description: &'static str,
    status: &'static str,
    severity: &'static str,
    location: &'static str,
    created_at: &'static str,
    updated_at: &'static str,
    due_date: &'static str,
    assignee: &'static str,
}

const ROWS: [Row; 5] = [
    Row {
        id: 1,
        name: "Issue 1 - la primeira",
        description: "This is the first issue.",
        status: "Open",
        severity: "High",
        location: "Section A",
        created_at: "2023-10-01T10:00:00Z",
        updated_at: "2023-10-02T12:00:00Z",
        due_date: "2023-10-10T15:00:00Z",
        assignee: "John Doe",
    },
    Row {
        id: 2,
        name: "Issue 2",
        description: "This is the second issue.",
        status: "Closed",
        severity: "Medium",
        location: "Section B",
        created_at: "2023-10-03T11:00:00Z",
        updated_at: "2023-10-04T13:00:00Z",
        due_date: "2023-10-12T16:00:00Z",
        assignee: "Jane Smith",
    },
    Row {
        id: 3,
        name: "Issue 3",
        description: "This is the third issue.",
        status: "In Progress",
        severity: "Low",
        location: "Section C",
        created_at: "2023-10-05T14:00:00Z",
        updated_at: "2023-10-06T17:00:00Z",
        due_date: "2023-10-15T18:00:00Z",
        assignee: "Alice Johnson",
    },
    Row {
        id: 4,
        name: "Issue 4",
        description: "This is the fourth issue.",
        status: "Open",
        severity: "Critical",
        location: "Section D",
        created_at: "2023-10-07T09:00:00Z",
        updated_at: "2023-10-08T10:00:00Z",
        due_date: "2023-10-20T11:00:00Z",
        assignee: "Bob Brown",
    },
    Row {
        id: 5,
        name: "Issue 5",
        description: "This is the fifth issue.",
        status: "Resolved",
        severity: "High",
        location: "Section E",
        created_at: "2023-10-09T08:00:00Z",
        updated_at: "2023-10-10T09:00:00Z",
        due_date: "2023-10-25T12:00:00Z",
        assignee: "Charlie Davis",
    },
];

/// Seeded issues, in id order
pub fn seeded_issues() -> Vec<Issue> {
    ROWS.iter()
        .map(|r| Issue {
            id: IssueId::Number(r.id),
            name: r.name.to_string(),
            description: r.description.to_string(),
            status: r.status.to_string(),
            severity: r.severity.to_string(),
            location: r.location.to_string(),
            created_at: Some(r.created_at.to_string()),
            updated_at: Some(r.updated_at.to_string()),
            due_date: Some(r.due_date.to_string()),
            assignee: r.assignee.to_string(),
        })
        .collect()
}
