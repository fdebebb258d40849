//! Create-ticket screen

use iocraft::prelude::*;

use crate::tui::components::{SelectRow, TextFieldRow};
use crate::tui::detail::model::TicketField;
use crate::tui::theme::theme;

use super::model::CreateViewModel;

/// Props for the CreateTicketScreen component
#[derive(Default, Props)]
pub struct CreateTicketScreenProps {
    pub view_model: CreateViewModel,
}

#[component]
pub fn CreateTicketScreen(props: &CreateTicketScreenProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = &props.view_model;
    let focused = |field: TicketField| vm.focus == field && !vm.is_pending;

    let submit_hint = if vm.is_pending {
        "Creating ticket..."
    } else if vm.can_submit {
        "Ctrl+S to create"
    } else {
        "Title and description are required"
    };

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
        ) {
            View(
                width: 100pct,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                padding_left: 1,
                padding_right: 1,
                gap: 1,
            ) {
                Text(content: "Create Ticket", color: theme.text, weight: Weight::Bold)
                TextFieldRow(label: "Title", field: vm.title.clone(), has_focus: focused(TicketField::Title))
                TextFieldRow(label: "Description", field: vm.description.clone(), has_focus: focused(TicketField::Description))
                SelectRow(
                    label: "Status",
                    value: vm.status.to_string(),
                    has_focus: focused(TicketField::Status),
                    value_color: Some(theme.status_color(vm.status)),
                )
                SelectRow(
                    label: "Priority",
                    value: vm.priority.to_string(),
                    has_focus: focused(TicketField::Priority),
                    value_color: Some(theme.priority_color(vm.priority)),
                )
                TextFieldRow(
                    label: "Assignee",
                    field: vm.assignee.clone(),
                    has_focus: focused(TicketField::Assignee),
                    placeholder: Some("optional".to_string()),
                )
                TextFieldRow(
                    label: "Tags",
                    field: vm.tags.clone(),
                    has_focus: focused(TicketField::Tags),
                    placeholder: Some("comma separated, optional".to_string()),
                )
                #(vm.error.clone().map(|error| element! {
                    Text(content: error, color: theme.error)
                }))
                Text(
                    content: submit_hint,
                    color: if vm.can_submit { theme.border_focused } else { theme.text_dimmed },
                )
            }
        }
    }
}
