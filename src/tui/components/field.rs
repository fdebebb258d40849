//! Labelled form rows: text fields and inline selectors

use iocraft::prelude::*;

use crate::tui::form::TextField;
use crate::tui::theme::theme;

const LABEL_WIDTH: u32 = 13;
const CURSOR: &str = "▏";

/// Text shown for a field: the value with a cursor mark when focused
pub fn field_display(field: &TextField, focused: bool) -> String {
    if focused {
        let (before, after) = field.split_at_cursor();
        format!("{before}{CURSOR}{after}")
    } else {
        field.value().to_string()
    }
}

/// Props for the TextFieldRow component
#[derive(Default, Props)]
pub struct TextFieldRowProps {
    pub label: String,
    pub field: TextField,
    pub has_focus: bool,
    /// Read-only fields render dimmed and never show a cursor
    pub read_only: bool,
    pub placeholder: Option<String>,
}

/// `Label: value` row for a text field
#[component]
pub fn TextFieldRow(props: &TextFieldRowProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let focused = props.has_focus && !props.read_only;

    let (content, color) = match (&props.placeholder, props.field.value().is_empty(), focused) {
        (Some(placeholder), true, false) => (placeholder.clone(), theme.text_dimmed),
        _ => (
            field_display(&props.field, focused),
            if props.read_only { theme.text_dimmed } else { theme.text },
        ),
    };

    element! {
        View(flex_direction: FlexDirection::Row, width: 100pct) {
            View(width: LABEL_WIDTH, flex_shrink: 0.0) {
                Text(
                    content: format!("{}:", props.label),
                    color: if focused { theme.border_focused } else { theme.text_dimmed },
                    weight: if focused { Weight::Bold } else { Weight::Normal },
                )
            }
            View(flex_grow: 1.0) {
                Text(content: content, color: color)
            }
        }
    }
}

/// Props for the SelectRow component
#[derive(Default, Props)]
pub struct SelectRowProps {
    pub label: String,
    pub value: String,
    pub has_focus: bool,
    pub read_only: bool,
    /// Semantic color for the value (status/priority)
    pub value_color: Option<Color>,
}

/// Compact inline selector row: `Label: ◀ value ▶`
///
/// Arrows indicate the value can be cycled with left/right keys.
#[component]
pub fn SelectRow(props: &SelectRowProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let focused = props.has_focus && !props.read_only;
    let accent = if focused {
        theme.border_focused
    } else {
        theme.text_dimmed
    };

    element! {
        View(flex_direction: FlexDirection::Row, width: 100pct) {
            View(width: LABEL_WIDTH, flex_shrink: 0.0) {
                Text(
                    content: format!("{}:", props.label),
                    color: accent,
                    weight: if focused { Weight::Bold } else { Weight::Normal },
                )
            }
            View(flex_direction: FlexDirection::Row, gap: 1) {
                #((!props.read_only).then(|| element! { Text(content: "◀", color: accent) }))
                Text(
                    content: props.value.clone(),
                    color: props.value_color.unwrap_or(theme.text),
                )
                #((!props.read_only).then(|| element! { Text(content: "▶", color: accent) }))
            }
        }
    }
}
