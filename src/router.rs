//! In-app routes and navigation history.
//!
//! Routes keep the web paths (`/tickets/42`) so a start path can be passed on
//! the command line and shown in the header.

use std::fmt;

use crate::types::TicketId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    TicketList,
    NewTicket,
    TicketDetail(TicketId),
    /// `/tickets/{x}` where `x` is not a positive integer
    InvalidTicket(String),
    Dashboard,
    NotFound(String),
}

impl Route {
    /// Resolve a path. `/` (and the empty path) redirect to the ticket list.
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["tickets"] => Route::TicketList,
            ["tickets", "new"] => Route::NewTicket,
            ["tickets", id] => match id.parse::<TicketId>() {
                Ok(id) if id > 0 => Route::TicketDetail(id),
                _ => Route::InvalidTicket((*id).to_string()),
            },
            ["dashboard"] => Route::Dashboard,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::TicketList => "/tickets".to_string(),
            Route::NewTicket => "/tickets/new".to_string(),
            Route::TicketDetail(id) => format!("/tickets/{id}"),
            Route::InvalidTicket(raw) => format!("/tickets/{raw}"),
            Route::Dashboard => "/dashboard".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Title shown in the header
    pub fn title(&self) -> String {
        match self {
            Route::TicketList => "Tickets".to_string(),
            Route::NewTicket => "Create Ticket".to_string(),
            Route::TicketDetail(id) => format!("Ticket #{id}"),
            Route::InvalidTicket(_) => "Invalid Ticket".to_string(),
            Route::Dashboard => "Dashboard".to_string(),
            Route::NotFound(_) => "Not Found".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Current route plus back history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::TicketList)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Navigate forward; pushing the current route is a no-op
    pub fn push(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
    }

    /// Navigate without leaving a history entry
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    /// Go back one step. Returns false when there is no history.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(route) => {
                self.current = route;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}
