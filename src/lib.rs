pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatting;
pub mod query;
pub mod router;
pub mod tui;
pub mod types;

pub use api::{HttpTicketApi, ListTicketsParams, TicketApi};
pub use config::Config;
pub use error::{DeskError, Result};
pub use query::{Mutation, MutationOutcome, QueryClient, QueryKey, QueryState, Resource};
pub use router::{Navigator, Route};
pub use types::{
    Comment, CommentRequest, CreateTicketRequest, DashboardReports, PageSize, Ticket,
    TicketPage, TicketPriority, TicketStatus, UpdateTicketRequest,
};
