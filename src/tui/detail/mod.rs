//! Single ticket with inline editing and comments

pub mod model;
pub mod view;

pub use model::{
    DetailAction, DetailState, DetailViewModel, compute_detail_view_model, key_to_action,
    reduce_detail,
};
pub use view::{TicketDetailScreen, TicketDetailScreenProps};
