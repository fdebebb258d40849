//! Paginated, filterable ticket list

pub mod model;
pub mod view;

pub use model::{
    ListAction, ListFocus, ListState, ListViewModel, compute_list_view_model, key_to_action,
    reduce_list,
};
pub use view::{TicketListScreen, TicketListScreenProps};
