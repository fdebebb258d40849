//! Shared test support: an in-memory ticket service and an app driver

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use iocraft::prelude::{KeyCode, KeyModifiers};
use parking_lot::Mutex;
use reqwest::StatusCode;

use ticketdesk::api::{ListTicketsParams, TicketApi};
use ticketdesk::error::{DeskError, Result};
use ticketdesk::query::{QueryClient, QueryObserver};
use ticketdesk::router::Route;
use ticketdesk::tui::app::{AppAction, AppState, dispatch, execute};
use ticketdesk::types::{
    Comment, CommentId, CommentRequest, CreateTicketRequest, PageSize, PriorityCount,
    StatusCount, Ticket, TicketId, TicketPage, TicketPriority, TicketStatus, UpdateTicketRequest,
};

/// Endpoints of the ticket service, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTickets,
    GetTicket,
    CreateTicket,
    UpdateTicket,
    DeleteTicket,
    StatusReport,
    PriorityReport,
    ListComments,
    CreateComment,
    UpdateComment,
    DeleteComment,
}

/// A request the fake received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListTickets(ListTicketsParams),
    GetTicket(TicketId),
    CreateTicket(CreateTicketRequest),
    UpdateTicket(TicketId, UpdateTicketRequest),
    DeleteTicket(TicketId),
    StatusReport,
    PriorityReport,
    ListComments(TicketId),
    CreateComment(TicketId, CommentRequest),
    UpdateComment(CommentId, CommentRequest),
    DeleteComment(CommentId),
}

impl Call {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Call::ListTickets(_) => Endpoint::ListTickets,
            Call::GetTicket(_) => Endpoint::GetTicket,
            Call::CreateTicket(_) => Endpoint::CreateTicket,
            Call::UpdateTicket(..) => Endpoint::UpdateTicket,
            Call::DeleteTicket(_) => Endpoint::DeleteTicket,
            Call::StatusReport => Endpoint::StatusReport,
            Call::PriorityReport => Endpoint::PriorityReport,
            Call::ListComments(_) => Endpoint::ListComments,
            Call::CreateComment(..) => Endpoint::CreateComment,
            Call::UpdateComment(..) => Endpoint::UpdateComment,
            Call::DeleteComment(_) => Endpoint::DeleteComment,
        }
    }
}

#[derive(Default)]
struct Store {
    tickets: BTreeMap<TicketId, Ticket>,
    comments: BTreeMap<CommentId, Comment>,
    next_ticket_id: TicketId,
    next_comment_id: CommentId,
    calls: Vec<Call>,
    failing: HashSet<Endpoint>,
}

/// In-memory ticket service
#[derive(Default)]
pub struct FakeTicketApi {
    store: Mutex<Store>,
}

pub fn ticket(id: TicketId, title: &str) -> Ticket {
    Ticket {
        id,
        title: title.to_string(),
        description: format!("Description of {title}"),
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        created_at: "2025-03-01T09:30:00Z".to_string(),
        updated_at: None,
        assignee: None,
        tags: None,
        comments: None,
    }
}

pub fn comment(id: CommentId, ticket_id: TicketId, author: &str, message: &str) -> Comment {
    Comment {
        id,
        ticket_id: Some(ticket_id),
        author: author.to_string(),
        message: message.to_string(),
        created_at: "2025-03-02T10:00:00Z".to_string(),
    }
}

impl FakeTicketApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service holding tickets `1..=count` titled `Ticket N`
    pub fn with_tickets(count: u64) -> Self {
        let api = Self::new();
        for id in 1..=count {
            api.insert_ticket(ticket(id, &format!("Ticket {id}")));
        }
        api
    }

    pub fn insert_ticket(&self, ticket: Ticket) {
        let mut store = self.store.lock();
        store.next_ticket_id = store.next_ticket_id.max(ticket.id);
        store.tickets.insert(ticket.id, ticket);
    }

    pub fn insert_comment(&self, comment: Comment) {
        let mut store = self.store.lock();
        store.next_comment_id = store.next_comment_id.max(comment.id);
        store.comments.insert(comment.id, comment);
    }

    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.store.lock().tickets.get(&id).cloned()
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.store.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.store.lock().failing.remove(&endpoint);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.store.lock().calls.clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.store
            .lock()
            .calls
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.store.lock().calls.clear();
    }

    /// Record the call; fails it when its endpoint is marked failing
    fn record(&self, call: Call) -> Result<()> {
        let mut store = self.store.lock();
        let endpoint = call.endpoint();
        store.calls.push(call);
        if store.failing.contains(&endpoint) {
            return Err(DeskError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{endpoint:?} failed"),
            });
        }
        Ok(())
    }

    fn not_found(what: &str) -> DeskError {
        DeskError::Api {
            status: StatusCode::NOT_FOUND,
            message: format!("{what} not found"),
        }
    }
}

fn matches(ticket: &Ticket, params: &ListTicketsParams) -> bool {
    let search = params.search.as_ref().is_none_or(|s| {
        let s = s.to_lowercase();
        ticket.title.to_lowercase().contains(&s) || ticket.description.to_lowercase().contains(&s)
    });
    let assignee = params
        .assignee
        .as_ref()
        .is_none_or(|a| ticket.assignee.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(a)));
    search
        && assignee
        && params.status.is_none_or(|s| ticket.status == s)
        && params.priority.is_none_or(|p| ticket.priority == p)
}

#[async_trait::async_trait]
impl TicketApi for FakeTicketApi {
    async fn list_tickets(&self, params: &ListTicketsParams) -> Result<TicketPage> {
        self.record(Call::ListTickets(params.clone()))?;
        let store = self.store.lock();
        let matching: Vec<Ticket> = store
            .tickets
            .values()
            .filter(|t| matches(t, params))
            .cloned()
            .collect();
        let skip = (params.page.saturating_sub(1) * params.page_size) as usize;
        Ok(TicketPage {
            total_count: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(skip)
                .take(params.page_size as usize)
                .collect(),
            page: Some(params.page),
            page_size: Some(params.page_size),
        })
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket> {
        self.record(Call::GetTicket(id))?;
        self.ticket(id).ok_or_else(|| Self::not_found("ticket"))
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket> {
        self.record(Call::CreateTicket(request.clone()))?;
        let mut store = self.store.lock();
        store.next_ticket_id += 1;
        let created = Ticket {
            id: store.next_ticket_id,
            title: request.title.clone(),
            description: request.description.clone(),
            status: TicketStatus::Open,
            priority: request.priority,
            created_at: "2025-04-01T12:00:00Z".to_string(),
            updated_at: None,
            assignee: request.assignee.clone(),
            tags: request
                .tags
                .as_ref()
                .map(|t| t.split(',').map(|s| s.trim().to_string()).collect()),
            comments: None,
        };
        store.tickets.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_ticket(&self, id: TicketId, request: &UpdateTicketRequest) -> Result<()> {
        self.record(Call::UpdateTicket(id, request.clone()))?;
        let mut store = self.store.lock();
        let ticket = store
            .tickets
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("ticket"))?;
        ticket.title = request.title.clone();
        ticket.description = request.description.clone();
        ticket.status = request.status;
        ticket.priority = request.priority;
        ticket.assignee = request.assignee.clone();
        ticket.tags = request.tags.clone();
        ticket.updated_at = Some("2025-04-02T08:00:00Z".to_string());
        Ok(())
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<()> {
        self.record(Call::DeleteTicket(id))?;
        let mut store = self.store.lock();
        store
            .tickets
            .remove(&id)
            .ok_or_else(|| Self::not_found("ticket"))?;
        store.comments.retain(|_, c| c.ticket_id != Some(id));
        Ok(())
    }

    async fn status_report(&self) -> Result<Vec<StatusCount>> {
        self.record(Call::StatusReport)?;
        let store = self.store.lock();
        Ok(TicketStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: store.tickets.values().filter(|t| t.status == *status).count() as u64,
            })
            .filter(|c| c.count > 0)
            .collect())
    }

    async fn priority_report(&self) -> Result<Vec<PriorityCount>> {
        self.record(Call::PriorityReport)?;
        let store = self.store.lock();
        Ok(TicketPriority::ALL
            .iter()
            .map(|priority| PriorityCount {
                priority: *priority,
                count: store
                    .tickets
                    .values()
                    .filter(|t| t.priority == *priority)
                    .count() as u64,
            })
            .filter(|c| c.count > 0)
            .collect())
    }

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
        self.record(Call::ListComments(ticket_id))?;
        let store = self.store.lock();
        Ok(store
            .comments
            .values()
            .filter(|c| c.ticket_id == Some(ticket_id))
            .cloned()
            .collect())
    }

    async fn create_comment(
        &self,
        ticket_id: TicketId,
        request: &CommentRequest,
    ) -> Result<Comment> {
        self.record(Call::CreateComment(ticket_id, request.clone()))?;
        let mut store = self.store.lock();
        store.next_comment_id += 1;
        let created = Comment {
            id: store.next_comment_id,
            ticket_id: Some(ticket_id),
            author: request.author.clone(),
            message: request.message.clone(),
            created_at: "2025-04-03T15:45:00Z".to_string(),
        };
        store.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_comment(&self, comment_id: CommentId, request: &CommentRequest) -> Result<()> {
        self.record(Call::UpdateComment(comment_id, request.clone()))?;
        let mut store = self.store.lock();
        let comment = store
            .comments
            .get_mut(&comment_id)
            .ok_or_else(|| Self::not_found("comment"))?;
        comment.author = request.author.clone();
        comment.message = request.message.clone();
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.record(Call::DeleteComment(comment_id))?;
        self.store
            .lock()
            .comments
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("comment"))
    }
}

/// Runs the app reducer against a [`FakeTicketApi`] without a terminal.
///
/// Every command is awaited before the next action is applied, so after each
/// call the state reflects all follow-up fetches.
pub struct AppDriver {
    pub api: Arc<FakeTicketApi>,
    pub client: QueryClient,
    pub state: AppState,
    observer: QueryObserver,
}

impl AppDriver {
    pub async fn start(api: FakeTicketApi, route: Route) -> Self {
        let api = Arc::new(api);
        let client = QueryClient::new(api.clone());
        let observer = client.observer();
        let mut driver = Self {
            api,
            client,
            state: AppState::new(route, PageSize::Ten),
            observer,
        };
        driver.send(AppAction::CacheChanged).await;
        driver
    }

    pub async fn send(&mut self, action: AppAction) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let (next, commands) =
                dispatch(&self.client, self.state.clone(), &mut self.observer, action);
            self.state = next;
            for command in commands {
                queue.extend(execute(self.client.clone(), command).await);
                queue.push_back(AppAction::CacheChanged);
            }
        }
    }

    pub async fn press(&mut self, code: KeyCode) {
        self.send(AppAction::Key {
            code,
            modifiers: KeyModifiers::NONE,
        })
        .await;
    }

    pub async fn ctrl(&mut self, c: char) {
        self.send(AppAction::Key {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        })
        .await;
    }

    pub async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c)).await;
        }
    }

    pub fn route(&self) -> &Route {
        self.state.route()
    }
}

/// Restores an environment variable on drop, even if the test panics.
///
/// Tests using it must be `#[serial]`: the environment is process-global.
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// Snapshot `key`, then set it to `value`
    pub fn set(key: &str, value: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        // SAFETY: callers are #[serial], so no other thread touches the environment
        unsafe { env::set_var(key, value) };
        guard
    }

    /// Snapshot `key`, then remove it
    pub fn remove(key: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        // SAFETY: as above
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: as above
        match &self.original {
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
