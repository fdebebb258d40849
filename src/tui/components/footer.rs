//! Bottom bar listing the keys that do something on the current screen

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// A key and what pressing it does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Key as shown, e.g. `"Enter"` or `"C-s"`
    pub key: String,
    pub action: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Build a shortcut list from `(key, action)` pairs
pub fn shortcuts<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<Shortcut> {
    pairs
        .into_iter()
        .map(|(key, action)| Shortcut::new(key, action))
        .collect()
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub shortcuts: Vec<Shortcut>,
}

#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            flex_shrink: 0.0,
            padding_left: 1,
            column_gap: 3,
            border_edges: Edges::Top,
            border_style: BorderStyle::Single,
            border_color: theme.border,
        ) {
            #(props.shortcuts.iter().map(|Shortcut { key, action }| element! {
                View(flex_direction: FlexDirection::Row, column_gap: 1) {
                    Text(content: key.clone(), color: theme.id_color, weight: Weight::Bold)
                    Text(content: action.clone(), color: theme.text_dimmed)
                }
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts_from_pairs() {
        let list = shortcuts([("r", "Refresh"), ("Esc", "Back")]);
        assert_eq!(list, vec![Shortcut::new("r", "Refresh"), Shortcut::new("Esc", "Back")]);
    }
}
