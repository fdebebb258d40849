//! App header bar component
//!
//! Shows the application name, the navigation tabs, and the current path.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Top-level destinations shown as tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTab {
    Dashboard,
    Tickets,
    Create,
}

impl NavTab {
    pub const ALL: [NavTab; 3] = [NavTab::Dashboard, NavTab::Tickets, NavTab::Create];

    /// Key that switches to this tab
    pub fn key(self) -> char {
        match self {
            NavTab::Dashboard => '1',
            NavTab::Tickets => '2',
            NavTab::Create => '3',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavTab::Dashboard => "Dashboard",
            NavTab::Tickets => "Tickets",
            NavTab::Create => "Create",
        }
    }
}

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    /// Highlighted tab, if the current route belongs to one
    pub active: Option<NavTab>,
    /// Title of the current screen
    pub title: String,
    /// Current route path
    pub path: String,
    /// Show a refreshing indicator
    pub busy: bool,
}

/// App header bar
#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let active = props.active;

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.highlight,
        ) {
            View(flex_direction: FlexDirection::Row, gap: 2) {
                Text(
                    content: "TicketDesk",
                    color: theme.text,
                    weight: Weight::Bold,
                )
                #(NavTab::ALL.iter().map(|tab| {
                    let is_active = active == Some(*tab);
                    let label = if is_active {
                        format!("[{} {}]", tab.key(), tab.label())
                    } else {
                        format!(" {} {} ", tab.key(), tab.label())
                    };
                    element! {
                        Text(
                            content: label,
                            color: if is_active { theme.text } else { theme.text_dimmed },
                            weight: if is_active { Weight::Bold } else { Weight::Normal },
                        )
                    }
                }))
            }
            View(flex_direction: FlexDirection::Row, gap: 1) {
                #(props.busy.then(|| element! {
                    Text(content: "refreshing...", color: theme.text_dimmed)
                }))
                Text(content: props.title.clone(), color: theme.text, weight: Weight::Bold)
                Text(content: props.path.clone(), color: theme.text_dimmed)
            }
        }
    }
}
