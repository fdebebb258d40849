//! Ticket detail screen

use iocraft::prelude::*;

use crate::formatting::MISSING;
use crate::tui::components::{Message, MessageKind, SelectRow, TextFieldRow};
use crate::tui::form::TextField;
use crate::tui::theme::theme;

use super::model::{
    CommentDraft, CommentField, CommentViewModel, DetailSection, DetailViewModel, TicketDraft,
    TicketField, TicketPanel,
};

/// Props for the TicketDetailScreen component
#[derive(Default, Props)]
pub struct TicketDetailScreenProps {
    pub view_model: DetailViewModel,
}

#[component]
pub fn TicketDetailScreen(props: &TicketDetailScreenProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let vm = &props.view_model;

    let status_line = if vm.confirm_delete {
        Some((
            format!("Delete ticket #{}? This cannot be undone. [y/n]", vm.ticket_id),
            theme.error,
        ))
    } else {
        vm.pending
            .map(|label| (format!("Working: {label}..."), theme.text_dimmed))
    };

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
        ) {
            #(status_line.map(|(text, color)| element! {
                View(height: 1, padding_left: 1) {
                    Text(content: text, color: color, weight: Weight::Bold)
                }
            }))
            View(
                width: 100pct,
                flex_direction: FlexDirection::Column,
                flex_shrink: 0.0,
                border_style: BorderStyle::Round,
                border_color: if vm.section == DetailSection::Ticket { theme.border_focused } else { theme.border },
                padding_left: 1,
                padding_right: 1,
            ) {
                #(render_ticket_panel(vm))
            }
            View(
                width: 100pct,
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: if vm.section == DetailSection::Comments { theme.border_focused } else { theme.border },
                padding_left: 1,
                padding_right: 1,
                overflow: Overflow::Hidden,
            ) {
                Text(
                    content: format!("Comments ({})", vm.comments.len()),
                    color: theme.text,
                    weight: Weight::Bold,
                )
                #(render_comments(vm))
            }
            View(
                width: 100pct,
                flex_direction: FlexDirection::Column,
                flex_shrink: 0.0,
                border_style: BorderStyle::Round,
                border_color: if vm.new_comment_focused { theme.border_focused } else { theme.border },
                padding_left: 1,
                padding_right: 1,
            ) {
                Text(content: "New comment", color: theme.text, weight: Weight::Bold)
                #(render_comment_form(&vm.new_comment, vm.new_comment_focused))
                #(vm.new_comment_error.clone().map(|error| element! {
                    Text(content: error, color: theme.error)
                }))
                #(vm.new_comment_focused.then(|| element! {
                    Text(
                        content: if vm.can_submit_comment { "Ctrl+S to add" } else { "Author and message are required" },
                        color: theme.text_dimmed,
                    )
                }))
            }
        }
    }
}

fn render_ticket_panel(vm: &DetailViewModel) -> Vec<AnyElement<'static>> {
    let theme = theme();

    let (draft, is_editing) = match &vm.ticket {
        TicketPanel::Loading => {
            return vec![
                element! {
                    Message(kind: MessageKind::Loading, title: format!("Loading ticket #{}...", vm.ticket_id))
                }
                .into_any(),
            ];
        }
        TicketPanel::Error(error) => {
            return vec![
                element! {
                    Message(
                        kind: MessageKind::Error,
                        title: "Ticket could not be loaded.",
                        detail: Some(error.clone()),
                        hint: Some("Press 'r' to retry or Esc to go back.".to_string()),
                    )
                }
                .into_any(),
            ];
        }
        TicketPanel::Ready {
            draft, is_editing, ..
        } => (draft.as_ref(), *is_editing),
    };

    let mut rows: Vec<AnyElement<'static>> = Vec::new();

    if let Some(error) = &vm.ticket_fetch_error {
        rows.push(
            element! {
                Text(content: format!("Refresh failed: {error}"), color: theme.error)
            }
            .into_any(),
        );
    }

    rows.extend(
        TicketField::ALL
            .iter()
            .map(|field| ticket_field_row(draft, *field, vm.focused_field == Some(*field), is_editing)),
    );

    rows.push(
        element! {
            View(flex_direction: FlexDirection::Row, gap: 3) {
                Text(content: format!("Created: {}", vm.created), color: theme.text_dimmed)
                Text(content: format!("Updated: {}", vm.updated), color: theme.text_dimmed)
            }
        }
        .into_any(),
    );

    if let Some(error) = &vm.ticket_error {
        rows.push(
            element! {
                Text(content: error.clone(), color: theme.error)
            }
            .into_any(),
        );
    }

    rows
}

fn ticket_field_row(
    draft: &TicketDraft,
    field: TicketField,
    has_focus: bool,
    is_editing: bool,
) -> AnyElement<'static> {
    let theme = theme();
    let read_only = !is_editing;

    let text = |value: &TextField| {
        element! {
            TextFieldRow(
                label: field.label(),
                field: value.clone(),
                has_focus: has_focus,
                read_only: read_only,
                placeholder: Some(MISSING.to_string()),
            )
        }
        .into_any()
    };

    match field {
        TicketField::Title => text(&draft.title),
        TicketField::Description => text(&draft.description),
        TicketField::Assignee => text(&draft.assignee),
        TicketField::Tags => text(&draft.tags),
        TicketField::Status => element! {
            SelectRow(
                label: field.label(),
                value: draft.status.to_string(),
                has_focus: has_focus,
                read_only: read_only,
                value_color: Some(theme.status_color(draft.status)),
            )
        }
        .into_any(),
        TicketField::Priority => element! {
            SelectRow(
                label: field.label(),
                value: draft.priority.to_string(),
                has_focus: has_focus,
                read_only: read_only,
                value_color: Some(theme.priority_color(draft.priority)),
            )
        }
        .into_any(),
    }
}

fn render_comments(vm: &DetailViewModel) -> Vec<AnyElement<'static>> {
    let theme = theme();

    if vm.comments_loading {
        return vec![
            element! {
                Text(content: "Loading comments...", color: theme.text_dimmed)
            }
            .into_any(),
        ];
    }

    let mut rows: Vec<AnyElement<'static>> = Vec::new();

    if let Some(error) = &vm.comments_error {
        rows.push(
            element! {
                Text(content: format!("Comments could not be loaded: {error}"), color: theme.error)
            }
            .into_any(),
        );
    }

    if vm.comments.is_empty() && vm.comments_error.is_none() {
        rows.push(
            element! {
                Text(content: "No comments yet.", color: theme.text_dimmed)
            }
            .into_any(),
        );
    }

    rows.extend(vm.comments.iter().map(render_comment));

    if let Some(error) = &vm.comment_error {
        rows.push(
            element! {
                Text(content: error.clone(), color: theme.error)
            }
            .into_any(),
        );
    }

    rows
}

fn render_comment(comment: &CommentViewModel) -> AnyElement<'static> {
    let theme = theme();
    let indicator = if comment.is_selected { ">" } else { " " };

    element! {
        View(
            width: 100pct,
            flex_direction: FlexDirection::Column,
            margin_top: 1,
            background_color: if comment.is_selected && comment.edit.is_none() { Some(theme.selection) } else { None },
        ) {
            View(flex_direction: FlexDirection::Row, gap: 1) {
                Text(content: indicator, color: theme.text)
                Text(content: comment.author.clone(), color: theme.id_color, weight: Weight::Bold)
                Text(content: comment.created.clone(), color: theme.text_dimmed)
                #(comment.edit.is_some().then(|| element! {
                    Text(content: "(editing)", color: theme.border_focused)
                }))
            }
            #(match &comment.edit {
                Some(draft) => render_comment_form(draft, comment.is_selected),
                None => vec![
                    element! {
                        View(padding_left: 2) {
                            Text(content: comment.message.clone(), color: theme.text)
                        }
                    }
                    .into_any(),
                ],
            })
        }
    }
    .into_any()
}

fn render_comment_form(draft: &CommentDraft, focused: bool) -> Vec<AnyElement<'static>> {
    vec![
        element! {
            TextFieldRow(
                label: "Author",
                field: draft.author.clone(),
                has_focus: focused && draft.focus == CommentField::Author,
            )
        }
        .into_any(),
        element! {
            TextFieldRow(
                label: "Message",
                field: draft.message.clone(),
                has_focus: focused && draft.focus == CommentField::Message,
            )
        }
        .into_any(),
    ]
}
