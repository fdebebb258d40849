//! Remote ticket API.
//!
//! [`TicketApi`] is the seam between the client and the server: the query
//! layer and the views only ever see the trait, [`HttpTicketApi`] talks to the
//! real service, and tests substitute an in-memory implementation.

pub mod http;

use serde::Serialize;

use crate::error::Result;
use crate::types::{
    Comment, CommentId, CommentRequest, CreateTicketRequest, PriorityCount, StatusCount, Ticket,
    TicketId, TicketPage, TicketPriority, TicketStatus, UpdateTicketRequest,
};

pub use http::HttpTicketApi;

/// Query string of `GET /tickets`
///
/// `page` is 1-based on the wire. Absent filters are omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListTicketsParams {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            priority: None,
            assignee: None,
            page: 1,
            page_size: 10,
        }
    }
}

/// Every call the client makes against the ticket service
#[async_trait::async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_tickets(&self, params: &ListTicketsParams) -> Result<TicketPage>;

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket>;

    /// Returns the created ticket with its server-assigned id
    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket>;

    async fn update_ticket(&self, id: TicketId, request: &UpdateTicketRequest) -> Result<()>;

    async fn delete_ticket(&self, id: TicketId) -> Result<()>;

    async fn status_report(&self) -> Result<Vec<StatusCount>>;

    async fn priority_report(&self) -> Result<Vec<PriorityCount>>;

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>>;

    async fn create_comment(&self, ticket_id: TicketId, request: &CommentRequest)
    -> Result<Comment>;

    async fn update_comment(&self, comment_id: CommentId, request: &CommentRequest) -> Result<()>;

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()>;
}

/// Endpoint paths, relative to the API base address
pub mod paths {
    use crate::types::{CommentId, TicketId};

    pub const TICKETS: &str = "tickets";
    pub const STATUS_REPORT: &str = "tickets/reports/status";
    pub const PRIORITY_REPORT: &str = "tickets/reports/priority";

    pub fn ticket(id: TicketId) -> String {
        format!("tickets/{id}")
    }

    pub fn ticket_comments(ticket_id: TicketId) -> String {
        format!("tickets/{ticket_id}/comments")
    }

    pub fn comment(comment_id: CommentId) -> String {
        format!("tickets/comments/{comment_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_skip_absent_filters() {
        let params = ListTicketsParams {
            page: 3,
            page_size: 25,
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({"page": 3, "pageSize": 25}));
    }

    #[test]
    fn test_params_include_filters() {
        let params = ListTicketsParams {
            search: Some("login".to_string()),
            status: Some(TicketStatus::InProgress),
            priority: Some(TicketPriority::Urgent),
            assignee: Some("Ops".to_string()),
            page: 1,
            page_size: 10,
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["status"], "InProgress");
        assert_eq!(value["priority"], "Urgent");
        assert_eq!(value["search"], "login");
        assert_eq!(value["assignee"], "Ops");
    }

    #[test]
    fn test_paths() {
        assert_eq!(paths::ticket(5), "tickets/5");
        assert_eq!(paths::ticket_comments(5), "tickets/5/comments");
        assert_eq!(paths::comment(9), "tickets/comments/9");
    }
}
