//! Centered message used for loading, error and not-found screens

use iocraft::prelude::*;

use crate::tui::theme::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Loading,
    Error,
}

/// Props for the Message component
#[derive(Default, Props)]
pub struct MessageProps {
    pub kind: MessageKind,
    pub title: String,
    pub detail: Option<String>,
    pub hint: Option<String>,
}

#[component]
pub fn Message(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let (icon, color) = match props.kind {
        MessageKind::Info => ("i", theme.border),
        MessageKind::Loading => ("~", theme.border),
        MessageKind::Error => ("!", theme.error),
    };

    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            padding: 2,
        ) {
            View(
                width: 5,
                height: 3,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border_style: BorderStyle::Round,
                border_color: color,
            ) {
                Text(content: icon, color: color, weight: Weight::Bold)
            }
            View(margin_top: 1) {
                Text(content: props.title.clone(), color: theme.text, weight: Weight::Bold)
            }
            #(props.detail.clone().map(|detail| element! {
                View(margin_top: 1) {
                    Text(content: detail, color: if props.kind == MessageKind::Error { theme.error } else { theme.text_dimmed })
                }
            }))
            #(props.hint.clone().map(|hint| element! {
                View(margin_top: 1) {
                    Text(content: hint, color: theme.text_dimmed)
                }
            }))
        }
    }
}
