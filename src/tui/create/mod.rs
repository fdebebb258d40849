//! New ticket form

pub mod model;
pub mod view;

pub use model::{
    CreateAction, CreateState, CreateViewModel, compute_create_view_model, key_to_action,
    reduce_create,
};
pub use view::{CreateTicketScreen, CreateTicketScreenProps};
