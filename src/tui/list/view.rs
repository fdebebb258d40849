//! Ticket list screen: filter bar, table and pagination footer

use iocraft::prelude::*;

use crate::formatting::fit_cell;
use crate::tui::components::{Message, MessageKind, field_display};
use crate::tui::theme::theme;

use super::model::{FilterViewModel, ListFocus, ListViewModel, TicketRow};

const ID_WIDTH: u32 = 6;
const STATUS_WIDTH: u32 = 12;
const PRIORITY_WIDTH: u32 = 9;
const ASSIGNEE_WIDTH: u32 = 18;
const CREATED_WIDTH: u32 = 20;

/// Props for the TicketListScreen component
#[derive(Default, Props)]
pub struct TicketListScreenProps {
    pub view_model: ListViewModel,
}

#[component]
pub fn TicketListScreen(props: &TicketListScreenProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = &props.view_model;

    // A failed refetch over visible rows shows as a banner instead
    let banner = vm
        .error
        .clone()
        .filter(|_| !vm.rows.is_empty());

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
        ) {
            FilterBar(filters: vm.filters.clone(), sort_label: vm.sort_label.clone())
            #(banner.map(|error| element! {
                View(height: 1, padding_left: 1) {
                    Text(content: format!("Refresh failed: {error}"), color: theme.error)
                }
            }))
            View(
                flex_grow: 1.0,
                width: 100pct,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: if vm.filters.focus == ListFocus::Table { theme.border_focused } else { theme.border },
            ) {
                #(render_body(vm))
            }
            View(
                height: 1,
                width: 100pct,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                padding_left: 1,
                padding_right: 1,
            ) {
                Text(content: format!("{} tickets", vm.range_label), color: theme.text_dimmed)
                View(flex_direction: FlexDirection::Row, gap: 2) {
                    Text(
                        content: if vm.has_prev { "◀ prev" } else { "      " },
                        color: theme.text_dimmed,
                    )
                    Text(content: vm.page_label.clone(), color: theme.text)
                    Text(
                        content: if vm.has_next { "next ▶" } else { "      " },
                        color: theme.text_dimmed,
                    )
                }
            }
        }
    }
}

/// Table, or a message when there is nothing to tabulate
fn render_body(vm: &ListViewModel) -> Option<AnyElement<'static>> {
    if vm.is_loading {
        return Some(
            element! {
                Message(kind: MessageKind::Loading, title: "Loading tickets...")
            }
            .into_any(),
        );
    }

    if vm.rows.is_empty() && vm.empty_message.is_none() {
        if let Some(error) = &vm.error {
            return Some(
                element! {
                    Message(
                        kind: MessageKind::Error,
                        title: "Tickets could not be loaded.",
                        detail: Some(error.clone()),
                        hint: Some("Press 'r' to retry.".to_string()),
                    )
                }
                .into_any(),
            );
        }
    }

    if let Some(empty) = &vm.empty_message {
        return Some(
            element! {
                Message(kind: MessageKind::Info, title: empty.clone())
            }
            .into_any(),
        );
    }

    Some(
        element! {
            TicketTable(rows: vm.rows.clone(), dimmed: vm.is_placeholder)
        }
        .into_any(),
    )
}

/// Props for the FilterBar component
#[derive(Default, Props)]
pub struct FilterBarProps {
    pub filters: FilterViewModel,
    pub sort_label: Option<String>,
}

#[component]
pub fn FilterBar(props: &FilterBarProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let filters = &props.filters;

    let search_focused = filters.focus == ListFocus::Search;
    let assignee_focused = filters.focus == ListFocus::Assignee;

    let search = if filters.search.value().is_empty() && !search_focused {
        "search title/description".to_string()
    } else {
        field_display(&filters.search, search_focused)
    };
    let assignee = if filters.assignee.value().is_empty() && !assignee_focused {
        "any".to_string()
    } else {
        field_display(&filters.assignee, assignee_focused)
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            padding_left: 1,
            gap: 2,
        ) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: "/ ", color: if search_focused { theme.border_focused } else { theme.text_dimmed })
                Text(content: search, color: if search_focused || !filters.search.value().is_empty() { theme.text } else { theme.text_dimmed })
            }
            Text(content: format!("Status: {}", filters.status_label), color: theme.text)
            Text(content: format!("Priority: {}", filters.priority_label), color: theme.text)
            View(flex_direction: FlexDirection::Row) {
                Text(content: "Assignee: ", color: if assignee_focused { theme.border_focused } else { theme.text_dimmed })
                Text(content: assignee, color: if assignee_focused || !filters.assignee.value().is_empty() { theme.text } else { theme.text_dimmed })
            }
            Text(content: format!("Per page: {}", filters.page_size), color: theme.text_dimmed)
            #(props.sort_label.clone().map(|label| element! {
                Text(content: format!("Sort: {label}"), color: theme.text_dimmed)
            }))
        }
    }
}

/// Props for the TicketTable component
#[derive(Default, Props)]
pub struct TicketTableProps {
    pub rows: Vec<TicketRow>,
    /// Rows are a placeholder from the previous page
    pub dimmed: bool,
}

#[component]
pub fn TicketTable(props: &TicketTableProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(width: 100pct, flex_direction: FlexDirection::Column) {
            View(height: 1, flex_direction: FlexDirection::Row, padding_left: 1, padding_right: 1) {
                Text(
                    content: format!(
                        "{}{}{}{}{}",
                        fit_cell("ID", ID_WIDTH as usize),
                        fit_cell("Status", STATUS_WIDTH as usize),
                        fit_cell("Priority", PRIORITY_WIDTH as usize),
                        fit_cell("Assignee", ASSIGNEE_WIDTH as usize),
                        fit_cell("Created", CREATED_WIDTH as usize),
                    ),
                    color: theme.text_dimmed,
                    weight: Weight::Bold,
                )
                Text(content: "Title", color: theme.text_dimmed, weight: Weight::Bold)
            }
            #(props.rows.iter().map(|row| element! {
                TicketTableRow(row: Some(row.clone()), dimmed: props.dimmed)
            }))
        }
    }
}

/// Props for a single table row
#[derive(Default, Props)]
pub struct TicketTableRowProps {
    pub row: Option<TicketRow>,
    pub dimmed: bool,
}

#[component]
pub fn TicketTableRow(props: &TicketTableRowProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let Some(row) = &props.row else {
        return element! { View() };
    };

    let background = if row.is_selected {
        Some(theme.selection)
    } else if row.is_urgent {
        Some(theme.urgent_row)
    } else {
        None
    };
    let text_color = if props.dimmed { theme.text_dimmed } else { theme.text };
    let status_color = if props.dimmed { theme.text_dimmed } else { theme.status_color(row.status) };
    let priority_color = if props.dimmed { theme.text_dimmed } else { theme.priority_color(row.priority) };

    element! {
        View(
            height: 1,
            width: 100pct,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            background_color: background,
        ) {
            View(width: ID_WIDTH, flex_shrink: 0.0) {
                Text(content: fit_cell(&format!("#{}", row.id), ID_WIDTH as usize), color: if props.dimmed { theme.text_dimmed } else { theme.id_color })
            }
            View(width: STATUS_WIDTH, flex_shrink: 0.0) {
                Text(content: fit_cell(&row.status.to_string(), STATUS_WIDTH as usize), color: status_color)
            }
            View(width: PRIORITY_WIDTH, flex_shrink: 0.0) {
                Text(
                    content: fit_cell(&row.priority.to_string(), PRIORITY_WIDTH as usize),
                    color: priority_color,
                    weight: if row.is_urgent { Weight::Bold } else { Weight::Normal },
                )
            }
            View(width: ASSIGNEE_WIDTH, flex_shrink: 0.0) {
                Text(content: fit_cell(&row.assignee, ASSIGNEE_WIDTH as usize), color: text_color)
            }
            View(width: CREATED_WIDTH, flex_shrink: 0.0) {
                Text(content: fit_cell(&row.created, CREATED_WIDTH as usize), color: theme.text_dimmed)
            }
            View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                Text(content: row.title.clone(), color: text_color)
            }
        }
    }
}
