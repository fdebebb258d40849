//! Transient outcome messages for writes

use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::tui::theme::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// One line shown above the footer until it expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Success,
            shown_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Error,
            shown_at: Instant::now(),
        }
    }

    /// True once the toast has been up for `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.shown_at.elapsed() >= ttl
    }

    fn color(&self) -> Color {
        match self.level {
            ToastLevel::Success => theme().status_resolved,
            ToastLevel::Error => theme().error,
        }
    }

    fn glyph(&self) -> &'static str {
        match self.level {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        }
    }
}

/// The toast bar, or nothing when no toast is showing
pub fn render_toast(toast: &Option<Toast>) -> Option<AnyElement<'static>> {
    let toast = toast.as_ref()?;
    let color = toast.color();

    Some(
        element! {
            View(
                width: 100pct,
                flex_shrink: 0.0,
                padding_left: 1,
                border_edges: Edges::Top,
                border_style: BorderStyle::Single,
                border_color: color,
            ) {
                Text(
                    content: format!("{} {}", toast.glyph(), toast.message),
                    color,
                    weight: Weight::Bold,
                )
            }
        }
        .into_any(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let toast = Toast::success("saved");
        assert!(!toast.is_expired(Duration::from_secs(60)));
        assert!(toast.is_expired(Duration::ZERO));
    }

    #[test]
    fn test_no_toast_renders_nothing() {
        assert!(render_toast(&None).is_none());
        assert!(render_toast(&Some(Toast::error("boom"))).is_some());
    }
}
