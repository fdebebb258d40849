//! Ticket list model types for testable state management
//!
//! This module separates state (ListState) from view (ListViewModel)
//! enabling unit testing without the iocraft framework.

use std::cmp::Ordering;

use iocraft::prelude::{KeyCode, KeyModifiers};
use jiff::tz::TimeZone;

use crate::api::ListTicketsParams;
use crate::formatting::{format_timestamp, parse_server_timestamp};
use crate::query::{QueryKey, QueryState, Resource};
use crate::router::Route;
use crate::tui::components::{Shortcut, shortcuts};
use crate::tui::effect::Effect;
use crate::tui::form::{TextEdit, TextField, non_blank, text_edit_for_key};
use crate::types::{
    PageSize, Ticket, TicketId, TicketPage, TicketPriority, TicketStatus, cycle_filter,
};

// ============================================================================
// State Types
// ============================================================================

/// Which part of the list screen receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFocus {
    #[default]
    Table,
    Search,
    Assignee,
}

/// Column the current page is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Status,
    Priority,
    Assignee,
    Created,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::Title,
        SortColumn::Status,
        SortColumn::Priority,
        SortColumn::Assignee,
        SortColumn::Created,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::Title => "Title",
            SortColumn::Status => "Status",
            SortColumn::Priority => "Priority",
            SortColumn::Assignee => "Assignee",
            SortColumn::Created => "Created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub descending: bool,
}

/// Filters, pagination and table navigation of the ticket list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub search: TextField,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assignee: TextField,
    /// Zero-based page index
    pub page: u32,
    pub page_size: PageSize,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub focus: ListFocus,
    /// Client-side ordering of the rows of the current page
    pub sort: Option<Sort>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ListState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            search: TextField::default(),
            status: None,
            priority: None,
            assignee: TextField::default(),
            page: 0,
            page_size,
            selected_index: 0,
            scroll_offset: 0,
            focus: ListFocus::Table,
            sort: None,
        }
    }

    /// Query parameters for the current page; the wire page is 1-based
    pub fn params(&self) -> ListTicketsParams {
        ListTicketsParams {
            search: non_blank(self.search.value()),
            status: self.status,
            priority: self.priority,
            assignee: non_blank(self.assignee.value()),
            page: self.page + 1,
            page_size: self.page_size.get(),
        }
    }

    pub fn resource(&self) -> Resource {
        Resource::TicketList(self.params())
    }

    pub fn key(&self) -> QueryKey {
        self.resource().key()
    }

    pub fn is_text_input_active(&self) -> bool {
        self.focus != ListFocus::Table
    }

    fn go_to_page(&mut self, page: u32) {
        self.page = page;
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Called after any filter or page-size change
    fn filters_changed(&mut self) {
        self.go_to_page(0);
    }
}

// ============================================================================
// Action Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    MoveUp,
    MoveDown,
    GoToTop,
    GoToBottom,
    /// Open the selected ticket
    Open,
    NextPage,
    PrevPage,
    CycleStatus { forward: bool },
    CyclePriority { forward: bool },
    CyclePageSize,
    SetPageSize(PageSize),
    FocusSearch,
    FocusAssignee,
    /// Return key input to the table
    Blur,
    /// Edit the focused filter text
    Input(TextEdit),
    ClearFilters,
    CycleSort,
    ToggleSortDirection,
    Refresh,
    NewTicket,
}

// ============================================================================
// View Model Types
// ============================================================================

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRow {
    pub id: TicketId,
    pub title: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: String,
    pub created: String,
    pub is_selected: bool,
    pub is_urgent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterViewModel {
    pub search: TextField,
    pub assignee: TextField,
    pub status_label: String,
    pub priority_label: String,
    pub page_size: PageSize,
    pub focus: ListFocus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListViewModel {
    /// Rows inside the visible window
    pub rows: Vec<TicketRow>,
    pub total_count: u64,
    /// `Showing X-Y of Z`
    pub range_label: String,
    pub page_label: String,
    pub has_prev: bool,
    pub has_next: bool,
    /// No data to show yet and a fetch is in flight
    pub is_loading: bool,
    pub is_fetching: bool,
    /// Rows belong to the previous key while the current one loads
    pub is_placeholder: bool,
    pub error: Option<String>,
    pub filters: FilterViewModel,
    pub sort_label: Option<String>,
    pub empty_message: Option<String>,
    pub shortcuts: Vec<Shortcut>,
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Displayed range for a page: `(from, to)` with `from = 0` when there are no
/// tickets
pub fn display_range(page: u32, page_size: u32, total: u64) -> (u64, u64) {
    let page = page as u64;
    let size = page_size as u64;
    let from = if total == 0 { 0 } else { page * size + 1 };
    let to = total.min((page + 1) * size);
    (from, to)
}

/// ```
/// use ticketdesk::tui::list::model::range_label;
///
/// assert_eq!(range_label(0, 10, 0), "Showing 0-0 of 0");
/// assert_eq!(range_label(2, 10, 23), "Showing 21-23 of 23");
/// ```
pub fn range_label(page: u32, page_size: u32, total: u64) -> String {
    let (from, to) = display_range(page, page_size, total);
    format!("Showing {from}-{to} of {total}")
}

pub fn total_pages(page_size: u32, total: u64) -> u64 {
    let size = page_size.max(1) as u64;
    total.div_ceil(size).max(1)
}

pub fn has_next_page(page: u32, page_size: u32, total: u64) -> bool {
    (page as u64 + 1) * (page_size as u64) < total
}

fn compare(a: &Ticket, b: &Ticket, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortColumn::Status => a.status.cmp(&b.status),
        SortColumn::Priority => a.priority.cmp(&b.priority),
        // Unassigned tickets sort last
        SortColumn::Assignee => match (&a.assignee, &b.assignee) {
            (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortColumn::Created => {
            let x = parse_server_timestamp(&a.created_at);
            let y = parse_server_timestamp(&b.created_at);
            x.cmp(&y)
        }
    }
}

/// Rows of the current page in display order; ties keep server order
pub fn sorted_rows(items: &[Ticket], sort: Option<Sort>) -> Vec<Ticket> {
    let mut rows = items.to_vec();
    if let Some(sort) = sort {
        rows.sort_by(|a, b| {
            let ord = compare(a, b, sort.column);
            if sort.descending { ord.reverse() } else { ord }
        });
    }
    rows
}

/// Adjust scroll offset to keep the selected row visible
pub fn adjust_scroll(scroll_offset: usize, selected_index: usize, list_height: usize) -> usize {
    if list_height == 0 {
        return 0;
    }
    if selected_index < scroll_offset {
        return selected_index;
    }
    if selected_index >= scroll_offset + list_height {
        return selected_index.saturating_sub(list_height - 1);
    }
    scroll_offset
}

/// Page data to display: the current key's data, or while it has none the
/// most recent list page (kept visible as a placeholder)
pub fn visible_page(
    current: &QueryState<TicketPage>,
    placeholder: Option<TicketPage>,
) -> (Option<TicketPage>, bool) {
    match current.data() {
        Some(page) => (Some(page.clone()), false),
        None if current.is_fetching() => {
            let has_placeholder = placeholder.is_some();
            (placeholder, has_placeholder)
        }
        None => (None, false),
    }
}

/// Pure function: compute view model from state and the cached page
pub fn compute_list_view_model(
    state: &ListState,
    current: &QueryState<TicketPage>,
    placeholder: Option<TicketPage>,
    list_height: usize,
    tz: &TimeZone,
) -> ListViewModel {
    let (page, is_placeholder) = visible_page(current, placeholder);
    let size = state.page_size.get();

    let items = page.as_ref().map(|p| p.items.as_slice()).unwrap_or_default();
    let rows = sorted_rows(items, state.sort);
    let total_count = if is_placeholder {
        page.as_ref().map_or(0, |p| p.total_count)
    } else {
        current.data().map_or(0, |p| p.total_count)
    };

    let visible_rows: Vec<TicketRow> = rows
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(list_height.max(1))
        .map(|(i, ticket)| TicketRow {
            id: ticket.id,
            title: ticket.title.clone(),
            status: ticket.status,
            priority: ticket.priority,
            assignee: ticket.assignee.clone().unwrap_or_else(|| "-".to_string()),
            created: format_timestamp(Some(&ticket.created_at), tz),
            is_selected: i == state.selected_index && state.focus == ListFocus::Table,
            is_urgent: ticket.priority == TicketPriority::Urgent,
        })
        .collect();

    let is_loading = page.is_none() && current.is_fetching();
    let error = current.error().map(str::to_string);

    let empty_message = if page.is_some() && rows.is_empty() {
        let filtered = state.params().search.is_some()
            || state.status.is_some()
            || state.priority.is_some()
            || state.params().assignee.is_some();
        Some(if filtered {
            "No tickets match the current filters.".to_string()
        } else {
            "No tickets yet. Press 'n' to create one.".to_string()
        })
    } else {
        None
    };

    let status_label = state
        .status
        .map_or("All Status".to_string(), |s| s.to_string());
    let priority_label = state
        .priority
        .map_or("All Priority".to_string(), |p| p.to_string());

    ListViewModel {
        rows: visible_rows,
        total_count,
        range_label: range_label(state.page, size, total_count),
        page_label: format!(
            "Page {} of {}",
            state.page + 1,
            total_pages(size, total_count)
        ),
        has_prev: state.page > 0,
        has_next: has_next_page(state.page, size, total_count),
        is_loading,
        is_fetching: current.is_fetching(),
        is_placeholder,
        error,
        filters: FilterViewModel {
            search: state.search.clone(),
            assignee: state.assignee.clone(),
            status_label,
            priority_label,
            page_size: state.page_size,
            focus: state.focus,
        },
        sort_label: state.sort.map(|s| {
            format!(
                "{} {}",
                s.column.label(),
                if s.descending { "desc" } else { "asc" }
            )
        }),
        empty_message,
        shortcuts: list_shortcuts(state.focus),
    }
}

fn list_shortcuts(focus: ListFocus) -> Vec<Shortcut> {
    match focus {
        ListFocus::Table => shortcuts([
            ("j/k", "Up/Down"),
            ("Enter", "Open"),
            ("h/l", "Prev/Next Page"),
            ("/", "Search"),
            ("a", "Assignee"),
            ("s/S", "Status"),
            ("p/P", "Priority"),
            ("z", "Page Size"),
            ("o/O", "Sort"),
            ("x", "Clear"),
            ("r", "Refresh"),
            ("n", "New"),
            ("q", "Quit"),
        ]),
        ListFocus::Search | ListFocus::Assignee => shortcuts([
            ("Enter", "Apply"),
            ("Esc", "Back to Table"),
            ("C-u", "Clear"),
            ("C-q", "Quit"),
        ]),
    }
}

/// Pure function: apply an action to the list state
///
/// `page` is the page currently shown (possibly a placeholder); navigation
/// and row activation are bounded by it.
pub fn reduce_list(
    mut state: ListState,
    action: ListAction,
    page: Option<&TicketPage>,
    list_height: usize,
) -> (ListState, Vec<Effect>) {
    let mut effects = Vec::new();
    let rows = page.map(|p| sorted_rows(&p.items, state.sort)).unwrap_or_default();
    let row_count = rows.len();
    let total = page.map_or(0, |p| p.total_count);

    match action {
        ListAction::MoveUp => {
            state.selected_index = state.selected_index.saturating_sub(1);
        }
        ListAction::MoveDown => {
            if row_count > 0 {
                state.selected_index = (state.selected_index + 1).min(row_count - 1);
            }
        }
        ListAction::GoToTop => state.selected_index = 0,
        ListAction::GoToBottom => state.selected_index = row_count.saturating_sub(1),
        ListAction::Open => {
            if let Some(ticket) = rows.get(state.selected_index) {
                effects.push(Effect::Navigate(Route::TicketDetail(ticket.id)));
            }
        }
        ListAction::NextPage => {
            if has_next_page(state.page, state.page_size.get(), total) {
                let next = state.page + 1;
                state.go_to_page(next);
            }
        }
        ListAction::PrevPage => {
            if state.page > 0 {
                let prev = state.page - 1;
                state.go_to_page(prev);
            }
        }
        ListAction::CycleStatus { forward } => {
            state.status = cycle_filter(state.status, &TicketStatus::ALL, forward);
            state.filters_changed();
        }
        ListAction::CyclePriority { forward } => {
            state.priority = cycle_filter(state.priority, &TicketPriority::ALL, forward);
            state.filters_changed();
        }
        ListAction::CyclePageSize => {
            state.page_size = state.page_size.next();
            state.filters_changed();
        }
        ListAction::SetPageSize(size) => {
            if size != state.page_size {
                state.page_size = size;
                state.filters_changed();
            }
        }
        ListAction::FocusSearch => state.focus = ListFocus::Search,
        ListAction::FocusAssignee => state.focus = ListFocus::Assignee,
        ListAction::Blur => state.focus = ListFocus::Table,
        ListAction::Input(edit) => {
            let field = match state.focus {
                ListFocus::Search => Some(&mut state.search),
                ListFocus::Assignee => Some(&mut state.assignee),
                ListFocus::Table => None,
            };
            if let Some(field) = field
                && field.apply(edit)
            {
                state.filters_changed();
            }
        }
        ListAction::ClearFilters => {
            let had_filters = !state.search.value().is_empty()
                || state.status.is_some()
                || state.priority.is_some()
                || !state.assignee.value().is_empty();
            if had_filters {
                state.search.clear();
                state.assignee.clear();
                state.status = None;
                state.priority = None;
                state.filters_changed();
            }
        }
        ListAction::CycleSort => {
            state.sort = match state.sort {
                None => Some(Sort {
                    column: SortColumn::ALL[0],
                    descending: false,
                }),
                Some(sort) => {
                    let idx = SortColumn::ALL
                        .iter()
                        .position(|c| *c == sort.column)
                        .unwrap_or(0);
                    SortColumn::ALL.get(idx + 1).map(|column| Sort {
                        column: *column,
                        descending: sort.descending,
                    })
                }
            };
        }
        ListAction::ToggleSortDirection => {
            if let Some(sort) = state.sort.as_mut() {
                sort.descending = !sort.descending;
            }
        }
        ListAction::Refresh => effects.push(Effect::Refresh(vec![QueryKey::tickets()])),
        ListAction::NewTicket => effects.push(Effect::Navigate(Route::NewTicket)),
    }

    state.scroll_offset = adjust_scroll(state.scroll_offset, state.selected_index, list_height);
    (state, effects)
}

/// Convert a key event to a ListAction (pure function)
///
/// Returns `None` if the key doesn't map to any action.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &ListState,
) -> Option<ListAction> {
    if state.is_text_input_active() {
        return match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab => {
                Some(ListAction::Blur)
            }
            _ => text_edit_for_key(code, modifiers).map(ListAction::Input),
        };
    }

    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(ListAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(ListAction::MoveUp),
        KeyCode::Char('g') | KeyCode::Home => Some(ListAction::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(ListAction::GoToBottom),
        KeyCode::Enter => Some(ListAction::Open),
        KeyCode::Char('l') | KeyCode::Char(']') | KeyCode::Right | KeyCode::PageDown => {
            Some(ListAction::NextPage)
        }
        KeyCode::Char('h') | KeyCode::Char('[') | KeyCode::Left | KeyCode::PageUp => {
            Some(ListAction::PrevPage)
        }
        KeyCode::Char('s') => Some(ListAction::CycleStatus { forward: true }),
        KeyCode::Char('S') => Some(ListAction::CycleStatus { forward: false }),
        KeyCode::Char('p') => Some(ListAction::CyclePriority { forward: true }),
        KeyCode::Char('P') => Some(ListAction::CyclePriority { forward: false }),
        KeyCode::Char('z') => Some(ListAction::CyclePageSize),
        KeyCode::Char('/') => Some(ListAction::FocusSearch),
        KeyCode::Char('a') => Some(ListAction::FocusAssignee),
        KeyCode::Char('x') => Some(ListAction::ClearFilters),
        KeyCode::Char('o') => Some(ListAction::CycleSort),
        KeyCode::Char('O') => Some(ListAction::ToggleSortDirection),
        KeyCode::Char('r') => Some(ListAction::Refresh),
        KeyCode::Char('n') => Some(ListAction::NewTicket),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
