//! Side effects requested by the view reducers
//!
//! Reducers stay pure: anything that touches the network or the navigator
//! is returned as an [`Effect`] and carried out by the app.

use crate::query::{Mutation, QueryKey};
use crate::router::Route;
use crate::tui::components::Toast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Navigate(Route),
    /// Navigate to a route without leaving a history entry
    Redirect(Route),
    Back,
    Mutate(Mutation),
    /// Explicit user refresh of these key prefixes
    Refresh(Vec<QueryKey>),
    Toast(Toast),
    Quit,
}
