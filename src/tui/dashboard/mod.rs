//! Report aggregates rendered as bar charts

pub mod model;
pub mod view;

pub use model::{
    DashboardAction, DashboardViewModel, compute_dashboard_view_model, key_to_action,
    reduce_dashboard,
};
pub use view::{DashboardScreen, DashboardScreenProps};
