//! Create-ticket form model

use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::query::{Mutation, MutationOutcome};
use crate::router::Route;
use crate::tui::components::{Shortcut, Toast, shortcuts};
use crate::tui::detail::model::TicketField;
use crate::tui::effect::Effect;
use crate::tui::form::{TextEdit, TextField, non_blank, text_edit_for_key};
use crate::types::{CreateTicketRequest, TicketPriority, TicketStatus};

// ============================================================================
// State Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateState {
    pub title: TextField,
    pub description: TextField,
    /// Shown on the form; new tickets always start Open on the server
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: TextField,
    /// Free text, sent as typed (trimmed)
    pub tags: TextField,
    pub focus: TicketField,
    pub pending: Option<Mutation>,
    pub error: Option<String>,
}

impl CreateState {
    /// Request body, or `None` while title or description is blank
    pub fn to_request(&self) -> Option<CreateTicketRequest> {
        if self.title.is_blank() || self.description.is_blank() {
            return None;
        }
        Some(CreateTicketRequest {
            title: self.title.trimmed().to_string(),
            description: self.description.trimmed().to_string(),
            priority: self.priority,
            assignee: self.assignee.optional(),
            tags: non_blank(self.tags.value()),
        })
    }

    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && self.to_request().is_some()
    }

    fn text_field_mut(&mut self, field: TicketField) -> Option<&mut TextField> {
        match field {
            TicketField::Title => Some(&mut self.title),
            TicketField::Description => Some(&mut self.description),
            TicketField::Assignee => Some(&mut self.assignee),
            TicketField::Tags => Some(&mut self.tags),
            TicketField::Status | TicketField::Priority => None,
        }
    }
}

// ============================================================================
// Action Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateAction {
    NextField,
    PrevField,
    Input(TextEdit),
    CycleSelect { forward: bool },
    Submit,
    Cancel,
    Settled {
        mutation: Mutation,
        result: Result<MutationOutcome, String>,
    },
}

// ============================================================================
// View Model Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateViewModel {
    pub title: TextField,
    pub description: TextField,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: TextField,
    pub tags: TextField,
    pub focus: TicketField,
    pub can_submit: bool,
    pub is_pending: bool,
    pub error: Option<String>,
    pub shortcuts: Vec<Shortcut>,
}

pub fn compute_create_view_model(state: &CreateState) -> CreateViewModel {
    let mut keys = shortcuts([("Tab", "Next Field"), ("C-s", "Create"), ("Esc", "Cancel")]);
    if state.focus.is_select() {
        keys.insert(1, Shortcut::new("Left/Right", "Change"));
    }

    CreateViewModel {
        title: state.title.clone(),
        description: state.description.clone(),
        status: state.status,
        priority: state.priority,
        assignee: state.assignee.clone(),
        tags: state.tags.clone(),
        focus: state.focus,
        can_submit: state.can_submit(),
        is_pending: state.pending.is_some(),
        error: state.error.clone(),
        shortcuts: keys,
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Pure function: apply an action to the create form
pub fn reduce_create(mut state: CreateState, action: CreateAction) -> (CreateState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        CreateAction::NextField => state.focus = state.focus.next(),
        CreateAction::PrevField => state.focus = state.focus.prev(),
        CreateAction::Input(edit) => {
            let focus = state.focus;
            if let Some(field) = state.text_field_mut(focus) {
                field.apply(edit);
            }
        }
        CreateAction::CycleSelect { forward } => match state.focus {
            TicketField::Status => {
                state.status = if forward { state.status.next() } else { state.status.prev() };
            }
            TicketField::Priority => {
                state.priority = if forward {
                    state.priority.next()
                } else {
                    state.priority.prev()
                };
            }
            _ => {}
        },
        CreateAction::Submit => {
            if state.pending.is_some() {
                return (state, effects);
            }
            match state.to_request() {
                Some(request) => {
                    let mutation = Mutation::CreateTicket(request);
                    state.error = None;
                    state.pending = Some(mutation.clone());
                    effects.push(Effect::Mutate(mutation));
                }
                None => {
                    state.error = Some("Title and description are required.".to_string());
                }
            }
        }
        CreateAction::Cancel => {
            if state.pending.is_none() {
                effects.push(Effect::Back);
            }
        }
        CreateAction::Settled { mutation, result } => {
            if state.pending.as_ref() == Some(&mutation) {
                state.pending = None;
            }
            match result {
                Ok(MutationOutcome::TicketCreated(ticket)) => {
                    state = CreateState::default();
                    effects.push(Effect::Toast(Toast::success("Ticket created.")));
                    effects.push(Effect::Navigate(Route::TicketDetail(ticket.id)));
                }
                Ok(_) => {}
                Err(error) => {
                    state.error = Some(error);
                    effects.push(Effect::Toast(Toast::error("Ticket could not be created.")));
                }
            }
        }
    }

    (state, effects)
}

/// Convert a key event to a CreateAction (pure function)
///
/// Every field takes text, so only chords and navigation keys are commands.
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &CreateState,
) -> Option<CreateAction> {
    let on_select = state.focus.is_select();

    match code {
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(CreateAction::Submit)
        }
        KeyCode::Esc => Some(CreateAction::Cancel),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => Some(CreateAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(CreateAction::PrevField),
        KeyCode::Left if on_select => Some(CreateAction::CycleSelect { forward: false }),
        KeyCode::Right if on_select => Some(CreateAction::CycleSelect { forward: true }),
        _ if on_select => None,
        _ => text_edit_for_key(code, modifiers).map(CreateAction::Input),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ticket;

    fn fill(state: CreateState, field: TicketField, text: &str) -> CreateState {
        let mut state = CreateState {
            focus: field,
            ..state
        };
        for c in text.chars() {
            state = reduce_create(state, CreateAction::Input(TextEdit::Insert(c))).0;
        }
        state
    }

    fn filled() -> CreateState {
        let state = fill(CreateState::default(), TicketField::Title, "  Printer jam ");
        fill(state, TicketField::Description, "Floor 3 printer")
    }

    #[test]
    fn test_defaults() {
        let state = CreateState::default();
        assert_eq!(state.status, TicketStatus::Open);
        assert_eq!(state.priority, TicketPriority::Medium);
        assert!(!state.can_submit());
    }

    #[test]
    fn test_whitespace_title_never_submits() {
        let state = fill(CreateState::default(), TicketField::Title, "   ");
        let state = fill(state, TicketField::Description, "something");
        let (state, effects) = reduce_create(state, CreateAction::Submit);
        assert!(effects.is_empty());
        assert!(state.pending.is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn test_submit_payload_is_trimmed() {
        let state = fill(filled(), TicketField::Tags, "  bug, hw ");
        let (state, effects) = reduce_create(state, CreateAction::Submit);
        assert!(state.pending.is_some());
        assert_eq!(
            effects,
            vec![Effect::Mutate(Mutation::CreateTicket(CreateTicketRequest {
                title: "Printer jam".to_string(),
                description: "Floor 3 printer".to_string(),
                priority: TicketPriority::Medium,
                assignee: None,
                tags: Some("bug, hw".to_string()),
            }))]
        );
    }

    #[test]
    fn test_submit_while_pending_is_ignored() {
        let (state, _) = reduce_create(filled(), CreateAction::Submit);
        let (_, effects) = reduce_create(state, CreateAction::Submit);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_success_navigates_to_new_ticket() {
        let (state, effects) = reduce_create(filled(), CreateAction::Submit);
        let Some(Effect::Mutate(mutation)) = effects.into_iter().next() else {
            panic!("expected a mutation");
        };
        let created = Ticket {
            id: 42,
            title: "Printer jam".to_string(),
            description: "Floor 3 printer".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            created_at: "2025-02-01T00:00:00Z".to_string(),
            updated_at: None,
            assignee: None,
            tags: None,
            comments: None,
        };
        let (state, effects) = reduce_create(
            state,
            CreateAction::Settled {
                mutation,
                result: Ok(MutationOutcome::TicketCreated(created)),
            },
        );
        assert_eq!(state, CreateState::default());
        assert!(effects.contains(&Effect::Navigate(Route::TicketDetail(42))));
    }

    #[test]
    fn test_failure_keeps_form() {
        let (state, effects) = reduce_create(filled(), CreateAction::Submit);
        let Some(Effect::Mutate(mutation)) = effects.into_iter().next() else {
            panic!("expected a mutation");
        };
        let (state, _) = reduce_create(
            state,
            CreateAction::Settled {
                mutation,
                result: Err("API error (400 Bad Request): title too long".to_string()),
            },
        );
        assert_eq!(state.title.value(), "  Printer jam ");
        assert!(state.pending.is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn test_priority_select_keys() {
        let state = CreateState {
            focus: TicketField::Priority,
            ..CreateState::default()
        };
        let action = key_to_action(KeyCode::Right, KeyModifiers::NONE, &state).unwrap();
        let (state, _) = reduce_create(state, action);
        assert_eq!(state.priority, TicketPriority::High);
        assert_eq!(
            key_to_action(KeyCode::Char('x'), KeyModifiers::NONE, &state),
            None
        );
    }
}
