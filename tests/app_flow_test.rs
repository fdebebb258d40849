//! End-to-end flows through the app reducer against an in-memory service
//!
//! These complement the reducer unit tests in `src/tui/*/model.rs` by running
//! the commands each action produces, so cache refetches and navigation after
//! writes are exercised together.

mod common;

use common::{AppDriver, Call, Endpoint, FakeTicketApi, comment};
use iocraft::prelude::KeyCode;

use ticketdesk::query::{QueryData, QueryKey};
use ticketdesk::router::Route;
use ticketdesk::tui::app::AppAction;
use ticketdesk::tui::components::ToastLevel;
use ticketdesk::tui::dashboard::model::{DashboardBody, compute_dashboard_view_model};
use ticketdesk::tui::list::compute_list_view_model;
use ticketdesk::types::{CommentRequest, TicketStatus};

fn list_view(driver: &AppDriver) -> ticketdesk::tui::list::ListViewModel {
    let current = driver
        .client
        .state(&driver.state.list.key())
        .filter_map(QueryData::into_ticket_page);
    let placeholder = driver
        .client
        .latest_data(&QueryKey::tickets())
        .and_then(QueryData::into_ticket_page);
    compute_list_view_model(
        &driver.state.list,
        &current,
        placeholder,
        driver.state.list_height,
        &jiff::tz::TimeZone::UTC,
    )
}

fn toast_message(driver: &AppDriver) -> Option<String> {
    driver.state.toast.as_ref().map(|t| t.message.clone())
}

// ============================================================================
// Ticket List
// ============================================================================

#[tokio::test]
async fn test_list_loads_first_page() {
    let driver = AppDriver::start(FakeTicketApi::with_tickets(23), Route::TicketList).await;

    assert_eq!(driver.api.count(Endpoint::ListTickets), 1);
    let vm = list_view(&driver);
    assert_eq!(vm.range_label, "Showing 1-10 of 23");
    assert_eq!(vm.page_label, "Page 1 of 3");
    assert!(vm.has_next);
    assert!(!vm.has_prev);
}

#[tokio::test]
async fn test_paging_keeps_filters_and_filter_resets_page() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(23), Route::TicketList).await;

    driver.press(KeyCode::Char('l')).await;
    driver.press(KeyCode::Char('l')).await;
    assert_eq!(driver.state.list.page, 2);
    assert_eq!(list_view(&driver).range_label, "Showing 21-23 of 23");

    // Wire pages are 1-based
    let Some(Call::ListTickets(params)) = driver.api.calls().last().cloned() else {
        panic!("expected a list call");
    };
    assert_eq!(params.page, 3);

    driver.press(KeyCode::Char('s')).await;
    assert_eq!(driver.state.list.page, 0);
    assert_eq!(driver.state.list.status, Some(TicketStatus::Open));
}

#[tokio::test]
async fn test_search_filter_is_sent_trimmed() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(3), Route::TicketList).await;

    driver.press(KeyCode::Char('/')).await;
    driver.type_text("  Ticket 2 ").await;
    driver.press(KeyCode::Enter).await;

    let Some(Call::ListTickets(params)) = driver.api.calls().last().cloned() else {
        panic!("expected a list call");
    };
    assert_eq!(params.search.as_deref(), Some("Ticket 2"));
    assert_eq!(list_view(&driver).total_count, 1);
}

#[tokio::test]
async fn test_open_ticket_fetches_ticket_and_comments() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(3), Route::TicketList).await;
    driver.api.clear_calls();

    driver.press(KeyCode::Char('j')).await;
    driver.press(KeyCode::Enter).await;

    assert_eq!(*driver.route(), Route::TicketDetail(2));
    let calls = driver.api.calls();
    assert!(calls.contains(&Call::GetTicket(2)));
    assert!(calls.contains(&Call::ListComments(2)));
}

#[tokio::test]
async fn test_returning_to_list_uses_cache() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(3), Route::TicketList).await;
    driver.press(KeyCode::Enter).await;
    driver.press(KeyCode::Esc).await;

    assert_eq!(*driver.route(), Route::TicketList);
    assert_eq!(driver.api.count(Endpoint::ListTickets), 1);
}

// ============================================================================
// Ticket Detail
// ============================================================================

#[tokio::test]
async fn test_edit_and_save_ticket() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(1), Route::TicketDetail(1)).await;

    driver.press(KeyCode::Char('e')).await;
    driver.type_text(" v2").await;
    driver.ctrl('s').await;

    let updated = driver.api.ticket(1).unwrap();
    assert_eq!(updated.title, "Ticket 1 v2");
    assert_eq!(toast_message(&driver).as_deref(), Some("Ticket updated."));

    let detail = driver.state.current_detail().unwrap();
    assert!(!detail.is_editing_ticket());
    assert_eq!(
        detail.ticket.as_ref().unwrap().current().title.value(),
        "Ticket 1 v2"
    );
}

#[tokio::test]
async fn test_cancel_restores_server_values() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(1), Route::TicketDetail(1)).await;

    driver.press(KeyCode::Char('e')).await;
    driver.type_text("XYZ").await;
    driver.press(KeyCode::Tab).await;
    driver.press(KeyCode::Tab).await;
    driver.press(KeyCode::Right).await;
    driver.press(KeyCode::Esc).await;

    let detail = driver.state.current_detail().unwrap();
    assert!(!detail.is_editing_ticket());
    let draft = detail.ticket.as_ref().unwrap().current();
    assert_eq!(draft.title.value(), "Ticket 1");
    assert_eq!(draft.status, TicketStatus::Open);
    assert_eq!(driver.api.count(Endpoint::UpdateTicket), 0);
}

#[tokio::test]
async fn test_failed_update_keeps_editing() {
    let api = FakeTicketApi::with_tickets(1);
    api.fail(Endpoint::UpdateTicket);
    let mut driver = AppDriver::start(api, Route::TicketDetail(1)).await;

    driver.press(KeyCode::Char('e')).await;
    driver.type_text("!").await;
    driver.ctrl('s').await;

    let detail = driver.state.current_detail().unwrap();
    assert!(detail.is_editing_ticket());
    assert!(detail.ticket_error.is_some());
    let toast = driver.state.toast.as_ref().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Ticket could not be updated.");
}

#[tokio::test]
async fn test_new_comment_refetches_comments_and_ticket() {
    let api = FakeTicketApi::with_tickets(1);
    api.insert_comment(comment(1, 1, "Lee", "First"));
    let mut driver = AppDriver::start(api, Route::TicketDetail(1)).await;
    driver.api.clear_calls();

    driver.press(KeyCode::Tab).await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Ana").await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Looks good").await;
    driver.ctrl('s').await;

    let calls = driver.api.calls();
    assert_eq!(
        calls.first(),
        Some(&Call::CreateComment(
            1,
            CommentRequest {
                author: "Ana".to_string(),
                message: "Looks good".to_string(),
            }
        ))
    );
    assert!(calls.contains(&Call::ListComments(1)));
    assert!(calls.contains(&Call::GetTicket(1)));

    let comments = driver
        .client
        .state(&QueryKey::ticket_comments(1))
        .into_data()
        .and_then(QueryData::into_comments)
        .unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(toast_message(&driver).as_deref(), Some("Comment added."));
    assert!(driver.state.current_detail().unwrap().new_comment.author.is_blank());
}

#[tokio::test]
async fn test_blank_comment_is_not_sent() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(1), Route::TicketDetail(1)).await;

    driver.press(KeyCode::Tab).await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Ana").await;
    driver.ctrl('s').await;

    assert_eq!(driver.api.count(Endpoint::CreateComment), 0);
}

#[tokio::test]
async fn test_delete_comment() {
    let api = FakeTicketApi::with_tickets(1);
    api.insert_comment(comment(4, 1, "Lee", "Obsolete"));
    let mut driver = AppDriver::start(api, Route::TicketDetail(1)).await;

    driver.press(KeyCode::Tab).await;
    driver.press(KeyCode::Char('x')).await;

    assert!(driver.api.calls().contains(&Call::DeleteComment(4)));
    assert_eq!(toast_message(&driver).as_deref(), Some("Comment deleted."));
    let comments = driver
        .client
        .state(&QueryKey::ticket_comments(1))
        .into_data()
        .and_then(QueryData::into_comments)
        .unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_delete_ticket_returns_to_list() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(2), Route::TicketList).await;
    driver.press(KeyCode::Enter).await;

    driver.press(KeyCode::Char('d')).await;
    assert!(driver.state.current_detail().unwrap().confirm_delete);
    driver.api.clear_calls();
    driver.press(KeyCode::Char('y')).await;

    let calls = driver.api.calls();
    assert!(calls.contains(&Call::DeleteTicket(1)));
    // The deleted ticket is dropped from the cache, not refetched
    assert!(!calls.contains(&Call::GetTicket(1)));
    assert!(!calls.contains(&Call::ListComments(1)));
    assert!(driver.client.state(&QueryKey::ticket(1)).is_empty());
    assert_eq!(*driver.route(), Route::TicketList);
    assert_eq!(toast_message(&driver).as_deref(), Some("Ticket deleted."));
    assert_eq!(list_view(&driver).total_count, 1);
}

#[tokio::test]
async fn test_missing_ticket_shows_error() {
    let driver = AppDriver::start(FakeTicketApi::with_tickets(1), Route::TicketDetail(99)).await;

    let state = driver.client.state(&QueryKey::ticket(99));
    assert!(state.error().is_some_and(|e| e.contains("not found")));
}

// ============================================================================
// Create Ticket
// ============================================================================

#[tokio::test]
async fn test_create_navigates_to_new_ticket_and_invalidates_list() {
    let mut driver = AppDriver::start(FakeTicketApi::with_tickets(3), Route::TicketList).await;

    driver.press(KeyCode::Char('3')).await;
    assert_eq!(*driver.route(), Route::NewTicket);

    driver.type_text("Printer jam").await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Floor 3").await;
    driver.ctrl('s').await;

    assert_eq!(*driver.route(), Route::TicketDetail(4));
    assert_eq!(toast_message(&driver).as_deref(), Some("Ticket created."));
    assert!(driver.client.is_stale(&driver.state.list.key()));

    driver.send(AppAction::Navigate(Route::TicketList)).await;
    assert_eq!(driver.api.count(Endpoint::ListTickets), 2);
    assert_eq!(list_view(&driver).total_count, 4);
}

#[tokio::test]
async fn test_blank_title_never_calls_create() {
    let mut driver = AppDriver::start(FakeTicketApi::new(), Route::NewTicket).await;

    driver.type_text("   ").await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Some description").await;
    driver.ctrl('s').await;

    assert_eq!(driver.api.count(Endpoint::CreateTicket), 0);
    assert_eq!(*driver.route(), Route::NewTicket);
    assert!(driver.state.create.error.is_some());
}

#[tokio::test]
async fn test_create_failure_keeps_form() {
    let api = FakeTicketApi::new();
    api.fail(Endpoint::CreateTicket);
    let mut driver = AppDriver::start(api, Route::NewTicket).await;

    driver.type_text("Title").await;
    driver.press(KeyCode::Tab).await;
    driver.type_text("Body").await;
    driver.ctrl('s').await;

    assert_eq!(*driver.route(), Route::NewTicket);
    assert_eq!(driver.state.create.title.value(), "Title");
    assert_eq!(
        toast_message(&driver).as_deref(),
        Some("Ticket could not be created.")
    );
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_one_failing_report_fails_dashboard() {
    let api = FakeTicketApi::with_tickets(4);
    api.fail(Endpoint::PriorityReport);
    let mut driver = AppDriver::start(api, Route::Dashboard).await;

    let reports = |driver: &AppDriver| {
        driver
            .client
            .state(&QueryKey::dashboard_reports())
            .filter_map(QueryData::into_reports)
    };

    let vm = compute_dashboard_view_model(&reports(&driver));
    assert!(matches!(vm.body, DashboardBody::Error(_)));

    driver.api.recover(Endpoint::PriorityReport);
    driver.press(KeyCode::Char('r')).await;

    let vm = compute_dashboard_view_model(&reports(&driver));
    let DashboardBody::Ready(summary) = vm.body else {
        panic!("expected reports, got {:?}", vm.body);
    };
    assert_eq!(summary.total, 4);
    assert_eq!(summary.open, 4);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_invalid_ticket_route_fetches_nothing() {
    let mut driver = AppDriver::start(
        FakeTicketApi::with_tickets(1),
        Route::parse("/tickets/abc"),
    )
    .await;

    assert_eq!(*driver.route(), Route::InvalidTicket("abc".to_string()));
    assert!(driver.api.calls().is_empty());

    driver.press(KeyCode::Esc).await;
    assert_eq!(*driver.route(), Route::TicketList);
}

#[tokio::test]
async fn test_quit_key() {
    let mut driver = AppDriver::start(FakeTicketApi::new(), Route::Dashboard).await;
    driver.press(KeyCode::Char('q')).await;
    assert!(driver.state.should_exit);
}
