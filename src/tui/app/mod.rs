//! Root of the interactive client

pub mod model;
pub mod view;

pub use model::{
    AppAction, AppState, Command, ServerSnapshot, dispatch, execute, key_to_action, reduce_app,
};
pub use view::{App, AppProps};
