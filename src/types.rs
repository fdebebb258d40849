use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Server-assigned ticket identifier (always positive)
pub type TicketId = u64;

/// Server-assigned comment identifier (always positive)
pub type CommentId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Cycle forward through the statuses, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycle backward through the statuses, wrapping around
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "Open"),
            TicketStatus::InProgress => write!(f, "InProgress"),
            TicketStatus::Resolved => write!(f, "Resolved"),
            TicketStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' ', '-'], "").as_str() {
            "open" => Ok(TicketStatus::Open),
            "inprogress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(DeskError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "Low"),
            TicketPriority::Medium => write!(f, "Medium"),
            TicketPriority::High => write!(f, "High"),
            TicketPriority::Urgent => write!(f, "Urgent"),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            _ => Err(DeskError::InvalidPriority(s.to_string())),
        }
    }
}

/// Cycle an optional filter value: unset -> first -> ... -> last -> unset
pub fn cycle_filter<T: Copy + PartialEq>(current: Option<T>, all: &[T], forward: bool) -> Option<T> {
    let len = all.len();
    // Position len stands for "unset"
    let pos = match current {
        None => len,
        Some(value) => all.iter().position(|v| *v == value).unwrap_or(len),
    };
    let next = if forward {
        (pos + 1) % (len + 1)
    } else {
        (pos + len) % (len + 1)
    };
    all.get(next).copied()
}

/// A ticket as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
}

/// A comment attached to exactly one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Parent ticket; not every server response includes it
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
    pub author: String,
    pub message: String,
    pub created_at: String,
}

/// One page of the ticket list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage {
    pub items: Vec<Ticket>,
    pub total_count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: TicketPriority,
    pub count: u64,
}

/// Both aggregate reports, fetched together for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardReports {
    pub status: Vec<StatusCount>,
    pub priority: Vec<PriorityCount>,
}

/// Body of `POST /tickets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Free-text tags exactly as typed (trimmed); the server splits them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Body of `PUT /tickets/{id}`
///
/// `assignee` and `tags` serialize as `null` when absent so that clearing a
/// field reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Body of the comment create and update endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRequest {
    pub author: String,
    pub message: String,
}

/// Page sizes offered by the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PageSize::Ten => PageSize::TwentyFive,
            PageSize::TwentyFive => PageSize::Fifty,
            PageSize::Fifty => PageSize::Ten,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = DeskError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PageSize::Ten),
            25 => Ok(PageSize::TwentyFive),
            50 => Ok(PageSize::Fifty),
            other => Err(DeskError::InvalidPageSize(other)),
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_deserialize_camel_case() {
        let json = r#"{
            "id": 7,
            "title": "Login broken",
            "description": "500 on submit",
            "status": "InProgress",
            "priority": "Urgent",
            "createdAt": "2025-01-05T10:20:30Z",
            "updatedAt": null,
            "assignee": "Frontend Team",
            "tags": ["bug", "ui"]
        }"#;

        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, TicketPriority::Urgent);
        assert_eq!(ticket.assignee.as_deref(), Some("Frontend Team"));
        assert_eq!(ticket.tags, Some(vec!["bug".to_string(), "ui".to_string()]));
        assert!(ticket.updated_at.is_none());
        assert!(ticket.comments.is_none());
    }

    #[test]
    fn test_ticket_deserialize_minimal() {
        let json = r#"{"id":1,"title":"t","description":"d","status":"Open","priority":"Low","createdAt":"2025-01-01T00:00:00"}"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.tags, None);
        assert_eq!(ticket.assignee, None);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#"{"status":"Reopened","count":3}"#;
        assert!(serde_json::from_str::<StatusCount>(json).is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("open".parse::<TicketStatus>().unwrap(), TicketStatus::Open);
        assert_eq!(
            "in_progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            "InProgress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert!("done".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("URGENT".parse::<TicketPriority>().unwrap(), TicketPriority::Urgent);
        assert!("p0".parse::<TicketPriority>().is_err());
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(TicketStatus::Open.next(), TicketStatus::InProgress);
        assert_eq!(TicketStatus::Closed.next(), TicketStatus::Open);
        assert_eq!(TicketStatus::Open.prev(), TicketStatus::Closed);
    }

    #[test]
    fn test_priority_cycle() {
        assert_eq!(TicketPriority::Urgent.next(), TicketPriority::Low);
        assert_eq!(TicketPriority::Low.prev(), TicketPriority::Urgent);
    }

    #[test]
    fn test_cycle_filter_passes_through_unset() {
        let all = TicketStatus::ALL;
        assert_eq!(cycle_filter(None, &all, true), Some(TicketStatus::Open));
        assert_eq!(cycle_filter(Some(TicketStatus::Closed), &all, true), None);
        assert_eq!(cycle_filter(None, &all, false), Some(TicketStatus::Closed));
        assert_eq!(cycle_filter(Some(TicketStatus::Open), &all, false), None);
    }

    #[test]
    fn test_create_request_skips_absent_fields() {
        let req = CreateTicketRequest {
            title: "t".to_string(),
            description: "d".to_string(),
            priority: TicketPriority::Medium,
            assignee: None,
            tags: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "t", "description": "d", "priority": "Medium"})
        );
    }

    #[test]
    fn test_update_request_sends_null_for_cleared_fields() {
        let req = UpdateTicketRequest {
            title: "t".to_string(),
            description: "d".to_string(),
            status: TicketStatus::Resolved,
            priority: TicketPriority::High,
            assignee: None,
            tags: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["assignee"], serde_json::Value::Null);
        assert_eq!(value["tags"], serde_json::Value::Null);
        assert_eq!(value["status"], "Resolved");
    }

    #[test]
    fn test_page_size_conversions() {
        assert_eq!(PageSize::try_from(25).unwrap(), PageSize::TwentyFive);
        assert!(PageSize::try_from(20).is_err());
        assert_eq!(u32::from(PageSize::Fifty), 50);
        assert_eq!(PageSize::Fifty.next(), PageSize::Ten);
    }

    #[test]
    fn test_page_size_yaml() {
        let size: PageSize = serde_yaml_ng::from_str("25").unwrap();
        assert_eq!(size, PageSize::TwentyFive);
        assert!(serde_yaml_ng::from_str::<PageSize>("7").is_err());
    }
}
