//! Root component: header, routed screen, toast and footer
//!
//! Terminal events only enqueue actions. A single pump task applies them
//! through [`dispatch`], runs the resulting commands, and reacts to cache
//! notifications, so state is never mutated from two places.

use std::time::Duration;

use futures::StreamExt;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::FuturesUnordered;
use iocraft::prelude::*;
use jiff::tz::TimeZone;
use tokio::sync::broadcast::error::RecvError;

use crate::query::{QueryClient, QueryData, QueryKey, QueryObserver};
use crate::router::Route;
use crate::tui::action_queue::ActionChannel;
use crate::tui::components::{Footer, Header, Message, MessageKind, Shortcut, render_toast};
use crate::tui::create::{CreateTicketScreen, compute_create_view_model};
use crate::tui::dashboard::{DashboardScreen, compute_dashboard_view_model};
use crate::tui::detail::{TicketDetailScreen, compute_detail_view_model};
use crate::tui::list::{TicketListScreen, compute_list_view_model};
use crate::tui::theme::theme;
use crate::types::PageSize;

use super::model::{AppAction, AppState, Command, active_tab, dispatch, execute};

/// Rows taken by everything on the list screen except table rows
const LIST_CHROME: usize = 9;
const TOAST_TICK: Duration = Duration::from_millis(250);

/// Props for the App component
#[derive(Default, Props)]
pub struct AppProps {
    pub client: Option<QueryClient>,
    /// Initial route; defaults to the ticket list
    pub start: Option<Route>,
    pub page_size: PageSize,
    pub time_zone: Option<TimeZone>,
    pub toast_duration: Duration,
}

/// Apply one action to the component state and return its commands
fn dispatch_to(
    client: &QueryClient,
    state: &mut State<AppState>,
    observer: &mut QueryObserver,
    action: AppAction,
) -> Vec<Command> {
    let current = state.read().clone();
    let (next, commands) = dispatch(client, current, observer, action);
    state.set(next);
    commands
}

/// Drain the action channel until the app exits
async fn run_pump(
    client: QueryClient,
    channel: ActionChannel<AppAction>,
    mut state: State<AppState>,
    toast_duration: Duration,
) {
    let receiver = channel.receiver();
    let mut rx = receiver.lock().await;
    let mut events = client.subscribe();
    let mut observer = client.observer();
    let mut in_flight: FuturesUnordered<BoxFuture<'static, Vec<AppAction>>> =
        FuturesUnordered::new();
    let mut ticker = tokio::time::interval(TOAST_TICK);

    for command in dispatch_to(&client, &mut state, &mut observer, AppAction::CacheChanged) {
        in_flight.push(execute(client.clone(), command).boxed());
    }

    loop {
        let actions = tokio::select! {
            action = rx.recv() => match action {
                Some(action) => vec![action],
                None => break,
            },
            Some(actions) = in_flight.next(), if !in_flight.is_empty() => actions,
            event = events.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => vec![AppAction::CacheChanged],
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                let expired = state
                    .read()
                    .toast
                    .as_ref()
                    .is_some_and(|toast| toast.is_expired(toast_duration));
                if !expired {
                    continue;
                }
                vec![AppAction::DismissToast]
            }
        };

        for action in actions {
            for command in dispatch_to(&client, &mut state, &mut observer, action) {
                tracing::debug!("Running command: {:?}", command);
                in_flight.push(execute(client.clone(), command).boxed());
            }
        }

        if state.read().should_exit {
            break;
        }
    }
}

/// Screen body, its shortcuts, and whether a background fetch is running
fn render_route(
    app: &AppState,
    client: &QueryClient,
    tz: &TimeZone,
) -> (AnyElement<'static>, Vec<Shortcut>, bool) {
    match app.route() {
        Route::TicketList => {
            let current = client
                .state(&app.list.key())
                .filter_map(QueryData::into_ticket_page);
            let placeholder = client
                .latest_data(&QueryKey::tickets())
                .and_then(QueryData::into_ticket_page);
            let vm = compute_list_view_model(&app.list, &current, placeholder, app.list_height, tz);
            let busy = vm.is_fetching;
            let shortcuts = vm.shortcuts.clone();
            (
                element!(TicketListScreen(view_model: vm)).into_any(),
                shortcuts,
                busy,
            )
        }
        Route::TicketDetail(id) => match app.current_detail() {
            Some(detail) => {
                let ticket = client
                    .state(&QueryKey::ticket(*id))
                    .filter_map(QueryData::into_ticket);
                let comments = client
                    .state(&QueryKey::ticket_comments(*id))
                    .filter_map(QueryData::into_comments);
                let vm = compute_detail_view_model(detail, &ticket, &comments, tz);
                let busy = vm.is_refreshing;
                let shortcuts = vm.shortcuts.clone();
                (
                    element!(TicketDetailScreen(view_model: vm)).into_any(),
                    shortcuts,
                    busy,
                )
            }
            None => (
                element!(Message(kind: MessageKind::Loading, title: "Opening ticket...")).into_any(),
                Vec::new(),
                true,
            ),
        },
        Route::NewTicket => {
            let vm = compute_create_view_model(&app.create);
            let busy = vm.is_pending;
            let shortcuts = vm.shortcuts.clone();
            (
                element!(CreateTicketScreen(view_model: vm)).into_any(),
                shortcuts,
                busy,
            )
        }
        Route::Dashboard => {
            let reports = client
                .state(&QueryKey::dashboard_reports())
                .filter_map(QueryData::into_reports);
            let vm = compute_dashboard_view_model(&reports);
            let busy = vm.is_refreshing;
            let shortcuts = vm.shortcuts.clone();
            (
                element!(DashboardScreen(view_model: vm)).into_any(),
                shortcuts,
                busy,
            )
        }
        Route::InvalidTicket(raw) => (
            element! {
                Message(
                    kind: MessageKind::Error,
                    title: "Invalid ticket id.",
                    detail: Some(format!("'{raw}' is not a ticket number.")),
                    hint: Some("Press Esc to go back.".to_string()),
                )
            }
            .into_any(),
            vec![Shortcut::new("Esc", "Back")],
            false,
        ),
        Route::NotFound(path) => (
            element! {
                Message(
                    kind: MessageKind::Info,
                    title: "Page not found.",
                    detail: Some(format!("Nothing lives at {path}.")),
                    hint: Some("Press Esc to go back or 2 for the ticket list.".to_string()),
                )
            }
            .into_any(),
            vec![Shortcut::new("Esc", "Back")],
            false,
        ),
    }
}

/// Main application component
#[component]
pub fn App(props: &AppProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let theme = theme();

    let start = props.start.clone().unwrap_or(Route::TicketList);
    let page_size = props.page_size;
    let state: State<AppState> = hooks.use_state(move || AppState::new(start, page_size));
    let channel: State<ActionChannel<AppAction>> = hooks.use_state(ActionChannel::new);

    let pump: Handler<()> = hooks.use_async_handler({
        let client = props.client.clone();
        let channel = channel.read().clone();
        let toast_duration = props.toast_duration;

        move |()| {
            let client = client.clone();
            let channel = channel.clone();

            async move {
                match client {
                    Some(client) => run_pump(client, channel, state, toast_duration).await,
                    None => tracing::error!("App started without a query client"),
                }
            }
        }
    });

    let mut pump_started = hooks.use_state(|| false);
    if !pump_started.get() {
        pump_started.set(true);
        pump.clone()(());
    }

    hooks.use_terminal_events({
        let channel = channel.read().clone();
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                if !channel.send(AppAction::Key { code, modifiers }) {
                    tracing::warn!("Dropped key event: action pump is gone");
                }
            }
            _ => {}
        }
    });

    let app = state.read().clone();

    if app.should_exit {
        system.exit();
    }

    let list_height = (height as usize).saturating_sub(LIST_CHROME).max(1);
    if list_height != app.list_height {
        channel.read().send(AppAction::Resize(list_height));
    }

    let tz = props.time_zone.clone().unwrap_or_else(TimeZone::system);
    let (body, mut shortcuts, busy) = match &props.client {
        Some(client) => render_route(&app, client, &tz),
        None => (
            element!(Message(kind: MessageKind::Error, title: "No API client configured.")).into_any(),
            Vec::new(),
            false,
        ),
    };
    shortcuts.push(Shortcut::new("C-q", "Quit"));

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                active: active_tab(app.route()),
                title: app.route().title(),
                path: app.route().path(),
                busy: busy,
            )
            View(
                flex_grow: 1.0,
                width: 100pct,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::Hidden,
            ) {
                #(Some(body))
            }
            #(render_toast(&app.toast))
            Footer(shortcuts: shortcuts)
        }
    }
}
