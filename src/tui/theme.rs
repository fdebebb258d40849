//! Theme system for TUI colors and styles

use iocraft::prelude::Color;

use crate::types::{TicketPriority, TicketStatus};

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

/// Theme configuration for TUI components
#[derive(Debug, Clone)]
pub struct Theme {
    // Status colors
    pub status_open: Color,
    pub status_in_progress: Color,
    pub status_resolved: Color,
    pub status_closed: Color,

    // Priority colors
    pub priority_low: Color,
    pub priority_medium: Color,
    pub priority_high: Color,
    pub priority_urgent: Color,

    /// Background of rows for urgent tickets
    pub urgent_row: Color,

    // UI colors
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub selection: Color,
    pub error: Color,
    pub id_color: Color,
    pub bar: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_open: Color::Yellow,
            status_in_progress: Color::Cyan,
            status_resolved: Color::Green,
            status_closed: GREY,

            priority_low: GREY,
            priority_medium: Color::White,
            priority_high: Color::Yellow,
            priority_urgent: Color::Red,

            urgent_row: Color::Rgb { r: 70, g: 20, b: 20 },

            border: GREY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            selection: Color::Rgb { r: 40, g: 60, b: 110 },
            error: Color::Red,
            id_color: Color::Cyan,
            bar: Color::Blue,
        }
    }
}

impl Theme {
    /// Get the color for a ticket status
    pub fn status_color(&self, status: TicketStatus) -> Color {
        match status {
            TicketStatus::Open => self.status_open,
            TicketStatus::InProgress => self.status_in_progress,
            TicketStatus::Resolved => self.status_resolved,
            TicketStatus::Closed => self.status_closed,
        }
    }

    /// Get the color for a ticket priority
    pub fn priority_color(&self, priority: TicketPriority) -> Color {
        match priority {
            TicketPriority::Low => self.priority_low,
            TicketPriority::Medium => self.priority_medium,
            TicketPriority::High => self.priority_high,
            TicketPriority::Urgent => self.priority_urgent,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
