//! Dashboard model: report aggregates and bar chart rows

use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::query::{QueryKey, QueryState};
use crate::tui::components::{Shortcut, shortcuts};
use crate::tui::effect::Effect;
use crate::types::{DashboardReports, TicketPriority, TicketStatus};

/// What a bar counts, used for its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Status(TicketStatus),
    Priority(TicketPriority),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRow {
    pub kind: BarKind,
    pub label: String,
    pub count: u64,
    /// Share of the report total, rounded; 0 when the total is 0
    pub percent: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: u64,
    pub open: u64,
    pub resolved: u64,
    pub priority_total: u64,
    pub status_bars: Vec<BarRow>,
    pub priority_bars: Vec<BarRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DashboardBody {
    #[default]
    Loading,
    Error(String),
    Ready(DashboardSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardViewModel {
    pub body: DashboardBody,
    pub is_refreshing: bool,
    pub shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Refresh,
    Back,
}

/// Rounded percentage of `count` in `total`
pub fn percent(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (count * 100 + total / 2) / total
}

/// Bar length in cells for `count`, scaled so `max` fills `width`
pub fn bar_width(count: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((count as u128 * width as u128) / max as u128) as usize
}

pub fn summarize(reports: &DashboardReports) -> DashboardSummary {
    let total: u64 = reports.status.iter().map(|s| s.count).sum();
    let count_of = |status: TicketStatus| {
        reports
            .status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    };
    let priority_total: u64 = reports.priority.iter().map(|p| p.count).sum();

    DashboardSummary {
        total,
        open: count_of(TicketStatus::Open),
        resolved: count_of(TicketStatus::Resolved),
        priority_total,
        status_bars: reports
            .status
            .iter()
            .map(|s| BarRow {
                kind: BarKind::Status(s.status),
                label: s.status.to_string(),
                count: s.count,
                percent: percent(s.count, total),
            })
            .collect(),
        priority_bars: reports
            .priority
            .iter()
            .map(|p| BarRow {
                kind: BarKind::Priority(p.priority),
                label: p.priority.to_string(),
                count: p.count,
                percent: percent(p.count, priority_total),
            })
            .collect(),
    }
}

/// Any error, even over older data, shows the error state
pub fn compute_dashboard_view_model(reports: &QueryState<DashboardReports>) -> DashboardViewModel {
    let body = match (reports.error(), reports.data()) {
        (Some(error), _) => DashboardBody::Error(error.to_string()),
        (None, Some(data)) => DashboardBody::Ready(summarize(data)),
        (None, None) => DashboardBody::Loading,
    };

    DashboardViewModel {
        body,
        is_refreshing: reports.is_fetching() && reports.data().is_some(),
        shortcuts: shortcuts([("r", "Refresh"), ("Esc", "Back"), ("q", "Quit")]),
    }
}

pub fn reduce_dashboard(action: DashboardAction) -> Vec<Effect> {
    match action {
        DashboardAction::Refresh => vec![Effect::Refresh(vec![QueryKey::dashboard_reports()])],
        DashboardAction::Back => vec![Effect::Back],
    }
}

pub fn key_to_action(code: KeyCode, modifiers: KeyModifiers) -> Option<DashboardAction> {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match code {
        KeyCode::Char('r') => Some(DashboardAction::Refresh),
        KeyCode::Esc => Some(DashboardAction::Back),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriorityCount, StatusCount};

    fn reports() -> DashboardReports {
        DashboardReports {
            status: vec![
                StatusCount { status: TicketStatus::Open, count: 5 },
                StatusCount { status: TicketStatus::InProgress, count: 2 },
                StatusCount { status: TicketStatus::Resolved, count: 3 },
            ],
            priority: vec![
                PriorityCount { priority: TicketPriority::Low, count: 1 },
                PriorityCount { priority: TicketPriority::Urgent, count: 2 },
            ],
        }
    }

    #[test]
    fn test_summary_totals() {
        let summary = summarize(&reports());
        assert_eq!(summary.total, 10);
        assert_eq!(summary.open, 5);
        assert_eq!(summary.resolved, 3);
        assert_eq!(summary.priority_total, 3);
        assert_eq!(summary.status_bars[0].percent, 50);
        assert_eq!(summary.priority_bars[1].percent, 67);
    }

    #[test]
    fn test_bar_rows_snapshot() {
        let summary = summarize(&reports());
        let rows: Vec<(String, u64, u64)> = summary
            .status_bars
            .iter()
            .chain(&summary.priority_bars)
            .map(|bar| (bar.label.clone(), bar.count, bar.percent))
            .collect();
        insta::assert_debug_snapshot!(rows, @r#"
        [
            (
                "Open",
                5,
                50,
            ),
            (
                "InProgress",
                2,
                20,
            ),
            (
                "Resolved",
                3,
                30,
            ),
            (
                "Low",
                1,
                33,
            ),
            (
                "Urgent",
                2,
                67,
            ),
        ]
        "#);
    }

    #[test]
    fn test_missing_status_counts_as_zero() {
        let summary = summarize(&DashboardReports::default());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.open, 0);
        assert!(summary.status_bars.is_empty());
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(5, 10, 40), 20);
        assert_eq!(bar_width(10, 10, 40), 40);
        assert_eq!(bar_width(3, 0, 40), 0);
    }

    #[test]
    fn test_error_hides_stale_data() {
        let state = QueryState::Ready(reports()).begin().fail("API error (500)");
        let vm = compute_dashboard_view_model(&state);
        assert_eq!(vm.body, DashboardBody::Error("API error (500)".to_string()));
    }

    #[test]
    fn test_loading_then_ready() {
        let vm = compute_dashboard_view_model(&QueryState::Loading);
        assert_eq!(vm.body, DashboardBody::Loading);
        let vm = compute_dashboard_view_model(&QueryState::Ready(reports()).begin());
        assert!(vm.is_refreshing);
        assert!(matches!(vm.body, DashboardBody::Ready(_)));
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            key_to_action(KeyCode::Char('r'), KeyModifiers::NONE),
            Some(DashboardAction::Refresh)
        );
        assert_eq!(
            reduce_dashboard(DashboardAction::Refresh),
            vec![Effect::Refresh(vec![QueryKey::dashboard_reports()])]
        );
    }
}
