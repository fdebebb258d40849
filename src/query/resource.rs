//! Readable server resources and how each maps to a key and a fetch.

use crate::api::{ListTicketsParams, TicketApi};
use crate::error::Result;
use crate::types::{Comment, DashboardReports, Ticket, TicketId, TicketPage};

use super::key::QueryKey;

/// Something a view can observe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    TicketList(ListTicketsParams),
    Ticket(TicketId),
    Comments(TicketId),
    /// Status and priority reports, fetched together
    DashboardReports,
}

/// Payload of a cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    TicketPage(TicketPage),
    Ticket(Ticket),
    Comments(Vec<Comment>),
    Reports(DashboardReports),
}

impl QueryData {
    pub fn into_ticket_page(self) -> Option<TicketPage> {
        match self {
            QueryData::TicketPage(page) => Some(page),
            _ => None,
        }
    }

    pub fn into_ticket(self) -> Option<Ticket> {
        match self {
            QueryData::Ticket(ticket) => Some(ticket),
            _ => None,
        }
    }

    pub fn into_comments(self) -> Option<Vec<Comment>> {
        match self {
            QueryData::Comments(comments) => Some(comments),
            _ => None,
        }
    }

    pub fn into_reports(self) -> Option<DashboardReports> {
        match self {
            QueryData::Reports(reports) => Some(reports),
            _ => None,
        }
    }
}

impl Resource {
    /// Cache key; the list key carries the zero-based page index followed by
    /// page size and the filters in a fixed order.
    pub fn key(&self) -> QueryKey {
        match self {
            Resource::TicketList(params) => QueryKey::tickets()
                .with(params.page.saturating_sub(1))
                .with(params.page_size)
                .with(params.search.clone())
                .with(params.status)
                .with(params.priority)
                .with(params.assignee.clone()),
            Resource::Ticket(id) => QueryKey::ticket(*id),
            Resource::Comments(id) => QueryKey::ticket_comments(*id),
            Resource::DashboardReports => QueryKey::dashboard_reports(),
        }
    }

    pub async fn fetch(&self, api: &dyn TicketApi) -> Result<QueryData> {
        match self {
            Resource::TicketList(params) => api.list_tickets(params).await.map(QueryData::TicketPage),
            Resource::Ticket(id) => api.get_ticket(*id).await.map(QueryData::Ticket),
            Resource::Comments(id) => api.list_comments(*id).await.map(QueryData::Comments),
            Resource::DashboardReports => {
                let (status, priority) =
                    tokio::try_join!(api.status_report(), api.priority_report())?;
                Ok(QueryData::Reports(DashboardReports { status, priority }))
            }
        }
    }
}
