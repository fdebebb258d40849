//! Dashboard screen: summary cards and two horizontal bar charts

use iocraft::prelude::*;

use crate::tui::components::{Message, MessageKind};
use crate::tui::theme::theme;

use super::model::{BarKind, BarRow, DashboardBody, DashboardSummary, DashboardViewModel, bar_width};

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: u32 = 12;

/// Props for the DashboardScreen component
#[derive(Default, Props)]
pub struct DashboardScreenProps {
    pub view_model: DashboardViewModel,
}

#[component]
pub fn DashboardScreen(props: &DashboardScreenProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(
            width: 100pct,
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
            padding_left: 1,
            padding_right: 1,
        ) {
            #(render_body(&props.view_model.body))
        }
    }
}

fn render_body(body: &DashboardBody) -> Option<AnyElement<'static>> {
    match body {
        DashboardBody::Loading => Some(
            element! {
                Message(kind: MessageKind::Loading, title: "Loading reports...")
            }
            .into_any(),
        ),
        DashboardBody::Error(error) => Some(
            element! {
                Message(
                    kind: MessageKind::Error,
                    title: "Dashboard data could not be loaded.",
                    detail: Some(error.clone()),
                    hint: Some("Press 'r' to retry.".to_string()),
                )
            }
            .into_any(),
        ),
        DashboardBody::Ready(summary) => Some(render_summary(summary)),
    }
}

fn render_summary(summary: &DashboardSummary) -> AnyElement<'static> {
    let theme = theme();
    let cards = [
        ("Total Tickets", summary.total),
        ("Open Tickets", summary.open),
        ("Resolved Tickets", summary.resolved),
    ];

    element! {
        View(width: 100pct, flex_direction: FlexDirection::Column, gap: 1) {
            Text(content: "Ticket Analytics", color: theme.text, weight: Weight::Bold)
            View(flex_direction: FlexDirection::Row, gap: 2) {
                #(cards.iter().map(|(label, value)| element! {
                    View(
                        flex_direction: FlexDirection::Column,
                        border_style: BorderStyle::Round,
                        border_color: theme.border,
                        padding_left: 1,
                        padding_right: 1,
                        min_width: 20,
                    ) {
                        Text(content: *label, color: theme.text_dimmed)
                        Text(content: value.to_string(), color: theme.text, weight: Weight::Bold)
                    }
                }))
            }
            BarChart(title: "Tickets by Status", rows: summary.status_bars.clone())
            BarChart(
                title: format!("Tickets by Priority ({} total)", summary.priority_total),
                rows: summary.priority_bars.clone(),
            )
        }
    }
    .into_any()
}

/// Props for the BarChart component
#[derive(Default, Props)]
pub struct BarChartProps {
    pub title: String,
    pub rows: Vec<BarRow>,
}

#[component]
pub fn BarChart(props: &BarChartProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let max = props.rows.iter().map(|r| r.count).max().unwrap_or(0);

    element! {
        View(
            width: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: props.title.clone(), color: theme.text, weight: Weight::Bold)
            #(props.rows.iter().map(|row| {
                let color = match row.kind {
                    BarKind::Status(status) => theme.status_color(status),
                    BarKind::Priority(priority) => theme.priority_color(priority),
                };
                let bar = "█".repeat(bar_width(row.count, max, BAR_WIDTH));
                element! {
                    View(height: 1, flex_direction: FlexDirection::Row) {
                        View(width: LABEL_WIDTH, flex_shrink: 0.0) {
                            Text(content: row.label.clone(), color: theme.text)
                        }
                        Text(content: bar, color: color)
                        Text(
                            content: format!(" {} ({}%)", row.count, row.percent),
                            color: theme.text_dimmed,
                        )
                    }
                }
            }))
        }
    }
}
