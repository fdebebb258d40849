//! Interactive terminal client
//!
//! Each screen is split into a pure `model` (state, actions, reducer, view
//! model, key mapping) and an iocraft `view`. The `app` module routes between
//! screens and owns the only task that mutates state.

pub mod action_queue;
pub mod app;
pub mod components;
pub mod create;
pub mod dashboard;
pub mod detail;
pub mod edit_state;
pub mod effect;
pub mod form;
pub mod list;
pub mod theme;

pub use app::{App, AppProps};
pub use theme::Theme;
