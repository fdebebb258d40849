//! Server writes and the cache keys each one makes stale.

use crate::api::TicketApi;
use crate::error::Result;
use crate::types::{
    Comment, CommentId, CommentRequest, CreateTicketRequest, Ticket, TicketId, UpdateTicketRequest,
};

use super::key::QueryKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateTicket(CreateTicketRequest),
    UpdateTicket {
        id: TicketId,
        request: UpdateTicketRequest,
    },
    DeleteTicket(TicketId),
    CreateComment {
        ticket_id: TicketId,
        request: CommentRequest,
    },
    UpdateComment {
        ticket_id: TicketId,
        comment_id: CommentId,
        request: CommentRequest,
    },
    DeleteComment {
        ticket_id: TicketId,
        comment_id: CommentId,
    },
}

/// What a successful write returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    TicketCreated(Ticket),
    CommentCreated(Comment),
    Done,
}

impl Mutation {
    /// Ticket the write is about, if it already exists
    pub fn ticket_id(&self) -> Option<TicketId> {
        match self {
            Mutation::CreateTicket(_) => None,
            Mutation::UpdateTicket { id, .. } | Mutation::DeleteTicket(id) => Some(*id),
            Mutation::CreateComment { ticket_id, .. }
            | Mutation::UpdateComment { ticket_id, .. }
            | Mutation::DeleteComment { ticket_id, .. } => Some(*ticket_id),
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::CreateTicket(_) => "create ticket",
            Mutation::UpdateTicket { .. } => "update ticket",
            Mutation::DeleteTicket(_) => "delete ticket",
            Mutation::CreateComment { .. } => "create comment",
            Mutation::UpdateComment { .. } => "update comment",
            Mutation::DeleteComment { .. } => "delete comment",
        }
    }

    /// Key prefixes that are stale once this write succeeds
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::CreateTicket(_) => {
                vec![QueryKey::tickets(), QueryKey::dashboard_reports()]
            }
            Mutation::UpdateTicket { id, .. } => vec![
                QueryKey::ticket(*id),
                QueryKey::tickets(),
                QueryKey::dashboard_reports(),
            ],
            Mutation::DeleteTicket(_) => vec![QueryKey::tickets(), QueryKey::dashboard_reports()],
            Mutation::CreateComment { ticket_id, .. }
            | Mutation::UpdateComment { ticket_id, .. }
            | Mutation::DeleteComment { ticket_id, .. } => vec![
                QueryKey::ticket_comments(*ticket_id),
                QueryKey::ticket(*ticket_id),
            ],
        }
    }

    /// Exact keys whose server data is gone once this write succeeds
    pub fn removes(&self) -> Vec<QueryKey> {
        match self {
            Mutation::DeleteTicket(id) => {
                vec![QueryKey::ticket(*id), QueryKey::ticket_comments(*id)]
            }
            _ => Vec::new(),
        }
    }

    /// Perform the single request behind this write
    pub async fn execute(&self, api: &dyn TicketApi) -> Result<MutationOutcome> {
        match self {
            Mutation::CreateTicket(request) => api
                .create_ticket(request)
                .await
                .map(MutationOutcome::TicketCreated),
            Mutation::UpdateTicket { id, request } => {
                api.update_ticket(*id, request).await?;
                Ok(MutationOutcome::Done)
            }
            Mutation::DeleteTicket(id) => {
                api.delete_ticket(*id).await?;
                Ok(MutationOutcome::Done)
            }
            Mutation::CreateComment { ticket_id, request } => api
                .create_comment(*ticket_id, request)
                .await
                .map(MutationOutcome::CommentCreated),
            Mutation::UpdateComment {
                comment_id,
                request,
                ..
            } => {
                api.update_comment(*comment_id, request).await?;
                Ok(MutationOutcome::Done)
            }
            Mutation::DeleteComment { comment_id, .. } => {
                api.delete_comment(*comment_id).await?;
                Ok(MutationOutcome::Done)
            }
        }
    }
}
