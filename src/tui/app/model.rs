//! Top-level app model: routing, view dispatch and async commands
//!
//! `reduce_app` is the only place state changes. View reducers return
//! [`Effect`]s; this module turns them into navigation, toasts and
//! [`Command`]s that the app component executes against the query client.

use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::query::{
    Mutation, MutationOutcome, QueryClient, QueryData, QueryKey, QueryObserver, Resource,
};
use crate::router::{Navigator, Route};
use crate::tui::components::{NavTab, Toast};
use crate::tui::create::{self, CreateAction, CreateState, reduce_create};
use crate::tui::dashboard::{self, DashboardAction, reduce_dashboard};
use crate::tui::detail::{self, DetailAction, DetailState, reduce_detail};
use crate::tui::effect::Effect;
use crate::tui::list::{self, ListAction, ListState, reduce_list};
use crate::tui::list::model::visible_page;
use crate::types::{Comment, PageSize, Ticket, TicketPage};

// ============================================================================
// State Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub navigator: Navigator,
    /// Survives navigation so filters and page are kept
    pub list: ListState,
    /// Detail of the most recently opened ticket
    pub detail: Option<DetailState>,
    pub create: CreateState,
    pub toast: Option<Toast>,
    /// Table rows that fit on screen
    pub list_height: usize,
    /// Bumped on every cache change so the view re-reads the cache
    pub revision: u64,
    pub should_exit: bool,
}

impl AppState {
    pub fn new(start: Route, page_size: PageSize) -> Self {
        let mut state = Self {
            navigator: Navigator::new(start.clone()),
            list: ListState::new(page_size),
            detail: None,
            create: CreateState::default(),
            toast: None,
            list_height: 10,
            revision: 0,
            should_exit: false,
        };
        state.enter(&start);
        state
    }

    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    /// Detail state for the current route, if it shows a ticket
    pub fn current_detail(&self) -> Option<&DetailState> {
        match self.route() {
            Route::TicketDetail(id) => self.detail.as_ref().filter(|d| d.ticket_id == *id),
            _ => None,
        }
    }

    fn enter(&mut self, route: &Route) {
        if let Route::TicketDetail(id) = route
            && self.detail.as_ref().is_none_or(|d| d.ticket_id != *id)
        {
            self.detail = Some(DetailState::new(*id));
        }
    }

    fn navigate(&mut self, route: Route, push: bool) {
        if push {
            self.navigator.push(route.clone());
        } else {
            self.navigator.replace(route.clone());
        }
        self.enter(&route);
    }

    fn back(&mut self) {
        if !self.navigator.back() {
            self.navigator.replace(Route::TicketList);
        }
        let route = self.route().clone();
        self.enter(&route);
    }

    /// Whether key input currently goes to a text field
    pub fn is_text_input_active(&self, snapshot: &ServerSnapshot) -> bool {
        match self.route() {
            Route::TicketList => self.list.is_text_input_active(),
            Route::TicketDetail(_) => self
                .current_detail()
                .is_some_and(|d| d.is_text_input_active(snapshot.comments())),
            Route::NewTicket => true,
            _ => false,
        }
    }
}

/// Tab highlighted in the header for a route
pub fn active_tab(route: &Route) -> Option<NavTab> {
    match route {
        Route::TicketList | Route::TicketDetail(_) | Route::InvalidTicket(_) => {
            Some(NavTab::Tickets)
        }
        Route::NewTicket => Some(NavTab::Create),
        Route::Dashboard => Some(NavTab::Dashboard),
        Route::NotFound(_) => None,
    }
}

/// Cached server data the reducers need, read just before dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSnapshot {
    /// List page on screen (possibly the previous page as a placeholder)
    pub list_page: Option<TicketPage>,
    /// Ticket and comments of the open detail, if cached
    pub ticket: Option<Ticket>,
    pub comments: Option<Vec<Comment>>,
}

impl ServerSnapshot {
    pub fn read(client: &QueryClient, state: &AppState) -> Self {
        let current = client
            .state(&state.list.key())
            .filter_map(QueryData::into_ticket_page);
        let placeholder = client
            .latest_data(&QueryKey::tickets())
            .and_then(QueryData::into_ticket_page);
        let (list_page, _) = visible_page(&current, placeholder);

        let (ticket, comments) = match &state.detail {
            Some(detail) => (
                client
                    .state(&QueryKey::ticket(detail.ticket_id))
                    .into_data()
                    .and_then(QueryData::into_ticket),
                client
                    .state(&QueryKey::ticket_comments(detail.ticket_id))
                    .into_data()
                    .and_then(QueryData::into_comments),
            ),
            None => (None, None),
        };

        Self {
            list_page,
            ticket,
            comments,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Action and Command Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    Resize(usize),
    List(ListAction),
    Detail(DetailAction),
    Create(CreateAction),
    Dashboard(DashboardAction),
    Navigate(Route),
    Back,
    Quit,
    DismissToast,
    /// Cached data changed
    CacheChanged,
    MutationSettled {
        mutation: Mutation,
        result: Result<MutationOutcome, String>,
    },
}

/// Async work requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(Resource),
    Mutate(Mutation),
    /// Invalidate these prefixes and refetch what is observed
    Refresh(Vec<QueryKey>),
}

// ============================================================================
// Reducer
// ============================================================================

fn apply_effects(state: &mut AppState, effects: Vec<Effect>, commands: &mut Vec<Command>) {
    for effect in effects {
        match effect {
            Effect::Navigate(route) => state.navigate(route, true),
            Effect::Redirect(route) => state.navigate(route, false),
            Effect::Back => state.back(),
            Effect::Mutate(mutation) => commands.push(Command::Mutate(mutation)),
            Effect::Refresh(keys) => commands.push(Command::Refresh(keys)),
            Effect::Toast(toast) => state.toast = Some(toast),
            Effect::Quit => state.should_exit = true,
        }
    }
}

/// Push the latest cached ticket and comments into the open detail
fn sync_detail(state: &mut AppState, snapshot: &ServerSnapshot) {
    let Some(detail) = state.detail.take() else {
        return;
    };
    let comment_ids = snapshot
        .comments
        .as_ref()
        .map(|comments| comments.iter().map(|c| c.id).collect());
    let (detail, _) = reduce_detail(
        detail,
        DetailAction::Sync {
            ticket: snapshot.ticket.clone(),
            comment_ids,
        },
        snapshot.comments(),
    );
    state.detail = Some(detail);
}

fn settle(
    state: &mut AppState,
    mutation: Mutation,
    result: Result<MutationOutcome, String>,
    snapshot: &ServerSnapshot,
    commands: &mut Vec<Command>,
) {
    if let Mutation::CreateTicket(_) = mutation {
        let on_form = *state.route() == Route::NewTicket;
        let create = std::mem::take(&mut state.create);
        let (create, effects) = reduce_create(create, CreateAction::Settled { mutation, result });
        state.create = create;
        // Only jump to the new ticket if the user is still on the form
        let effects = effects
            .into_iter()
            .filter(|e| on_form || !matches!(e, Effect::Navigate(_)))
            .collect();
        apply_effects(state, effects, commands);
        return;
    }

    let owner = mutation.ticket_id();
    let detail_matches = state
        .detail
        .as_ref()
        .is_some_and(|d| Some(d.ticket_id) == owner);

    if detail_matches {
        sync_detail(state, snapshot);
        if let Some(detail) = state.detail.take() {
            let (detail, effects) = reduce_detail(
                detail,
                DetailAction::Settled { mutation, result },
                snapshot.comments(),
            );
            state.detail = Some(detail);
            // A deleted ticket redirects only if it is still on screen
            let on_ticket = matches!(state.route(), Route::TicketDetail(id) if Some(*id) == owner);
            let effects = effects
                .into_iter()
                .filter(|e| on_ticket || !matches!(e, Effect::Redirect(_)))
                .collect();
            apply_effects(state, effects, commands);
        }
    } else if let Err(error) = result {
        state.toast = Some(Toast::error(format!("Could not {}: {error}", mutation.label())));
    }
}

/// Pure function: apply an action to the app state
pub fn reduce_app(
    mut state: AppState,
    action: AppAction,
    snapshot: &ServerSnapshot,
) -> (AppState, Vec<Command>) {
    let mut commands = Vec::new();

    match action {
        AppAction::Key { code, modifiers } => {
            return match key_to_action(code, modifiers, &state, snapshot) {
                Some(action) => reduce_app(state, action, snapshot),
                None => (state, commands),
            };
        }
        AppAction::Resize(height) => {
            state.list_height = height.max(1);
            state.list.scroll_offset = list::model::adjust_scroll(
                state.list.scroll_offset,
                state.list.selected_index,
                state.list_height,
            );
        }
        AppAction::List(action) => {
            let list = std::mem::take(&mut state.list);
            let (list, effects) =
                reduce_list(list, action, snapshot.list_page.as_ref(), state.list_height);
            state.list = list;
            apply_effects(&mut state, effects, &mut commands);
        }
        AppAction::Detail(action) => {
            if let Some(detail) = state.detail.take() {
                let (detail, effects) = reduce_detail(detail, action, snapshot.comments());
                state.detail = Some(detail);
                apply_effects(&mut state, effects, &mut commands);
            }
        }
        AppAction::Create(action) => {
            let create = std::mem::take(&mut state.create);
            let (create, effects) = reduce_create(create, action);
            state.create = create;
            apply_effects(&mut state, effects, &mut commands);
        }
        AppAction::Dashboard(action) => {
            apply_effects(&mut state, reduce_dashboard(action), &mut commands);
        }
        AppAction::Navigate(route) => state.navigate(route, true),
        AppAction::Back => state.back(),
        AppAction::Quit => state.should_exit = true,
        AppAction::DismissToast => state.toast = None,
        AppAction::CacheChanged => {
            state.revision = state.revision.wrapping_add(1);
            sync_detail(&mut state, snapshot);
        }
        AppAction::MutationSettled { mutation, result } => {
            settle(&mut state, mutation, result, snapshot, &mut commands);
        }
    }

    (state, commands)
}

/// Read the cache, reduce, and sync the observed resources.
///
/// Returns the next state and every command to run, including fetches for
/// resources the new route starts observing.
pub fn dispatch(
    client: &QueryClient,
    state: AppState,
    observer: &mut QueryObserver,
    action: AppAction,
) -> (AppState, Vec<Command>) {
    let route_before = state.route().clone();
    let snapshot = ServerSnapshot::read(client, &state);
    let (mut next, mut commands) = reduce_app(state, action, &snapshot);

    // A new route may already have cached data
    if *next.route() != route_before {
        tracing::debug!("Route changed: {} -> {}", route_before, next.route());
        let snapshot = ServerSnapshot::read(client, &next);
        let (synced, more) = reduce_app(next, AppAction::CacheChanged, &snapshot);
        next = synced;
        commands.extend(more);
    }

    commands.extend(
        observer
            .set_resources(observed_resources(&next))
            .into_iter()
            .map(Command::Fetch),
    );
    (next, commands)
}

/// Resources the current route reads
pub fn observed_resources(state: &AppState) -> Vec<Resource> {
    match state.route() {
        Route::TicketList => vec![state.list.resource()],
        Route::TicketDetail(id) => vec![Resource::Ticket(*id), Resource::Comments(*id)],
        Route::Dashboard => vec![Resource::DashboardReports],
        Route::NewTicket | Route::InvalidTicket(_) | Route::NotFound(_) => Vec::new(),
    }
}

/// Run one command. Returns the actions its completion produces.
pub async fn execute(client: QueryClient, command: Command) -> Vec<AppAction> {
    match command {
        Command::Fetch(resource) => {
            client.fetch(&resource).await;
            Vec::new()
        }
        Command::Refresh(keys) => {
            client.invalidate_all(&keys).await;
            Vec::new()
        }
        Command::Mutate(mutation) => {
            let result = client.mutate(&mutation).await.map_err(|e| e.to_string());
            vec![AppAction::MutationSettled { mutation, result }]
        }
    }
}

// ============================================================================
// Key Mapping
// ============================================================================

/// Convert a key event to an AppAction (pure function)
///
/// Quit chords always work; the single-key global shortcuts only apply while
/// no text field has focus.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &AppState,
    snapshot: &ServerSnapshot,
) -> Option<AppAction> {
    if modifiers.contains(KeyModifiers::CONTROL)
        && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return Some(AppAction::Quit);
    }

    let plain = !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    if plain && !state.is_text_input_active(snapshot) {
        match code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Char(c) => {
                if let Some(tab) = NavTab::ALL.iter().find(|t| t.key() == c) {
                    let route = match tab {
                        NavTab::Dashboard => Route::Dashboard,
                        NavTab::Tickets => Route::TicketList,
                        NavTab::Create => Route::NewTicket,
                    };
                    return Some(AppAction::Navigate(route));
                }
            }
            _ => {}
        }
    }

    match state.route() {
        Route::TicketList => list::key_to_action(code, modifiers, &state.list).map(AppAction::List),
        Route::TicketDetail(_) => state.current_detail().and_then(|detail| {
            detail::key_to_action(code, modifiers, detail, snapshot.comments())
                .map(AppAction::Detail)
        }),
        Route::NewTicket => {
            create::key_to_action(code, modifiers, &state.create).map(AppAction::Create)
        }
        Route::Dashboard => dashboard::key_to_action(code, modifiers).map(AppAction::Dashboard),
        Route::InvalidTicket(_) | Route::NotFound(_) => {
            (code == KeyCode::Esc).then_some(AppAction::Back)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
