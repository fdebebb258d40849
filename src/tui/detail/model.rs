//! Ticket detail model: ticket editing, comments and their forms
//!
//! The ticket and each comment have their own viewing/editing state. They are
//! independent: several comment edits may be open while the ticket is being
//! edited. Only mutations are serialized, through the single `pending` slot.

use std::collections::BTreeMap;

use iocraft::prelude::{KeyCode, KeyModifiers};
use jiff::tz::TimeZone;

use crate::formatting::{MISSING, format_timestamp};
use crate::query::{Mutation, MutationOutcome, QueryKey, QueryState};
use crate::router::Route;
use crate::tui::components::{Shortcut, Toast, shortcuts};
use crate::tui::edit_state::EditState;
use crate::tui::effect::Effect;
use crate::tui::form::{TextEdit, TextField, parse_tags, text_edit_for_key};
use crate::types::{
    Comment, CommentId, CommentRequest, Ticket, TicketId, TicketPriority, TicketStatus,
    UpdateTicketRequest,
};

// ============================================================================
// Drafts
// ============================================================================

/// Fields of the ticket form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketField {
    #[default]
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    Tags,
}

impl TicketField {
    pub const ALL: [TicketField; 6] = [
        TicketField::Title,
        TicketField::Description,
        TicketField::Status,
        TicketField::Priority,
        TicketField::Assignee,
        TicketField::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TicketField::Title => "Title",
            TicketField::Description => "Description",
            TicketField::Status => "Status",
            TicketField::Priority => "Priority",
            TicketField::Assignee => "Assignee",
            TicketField::Tags => "Tags",
        }
    }

    pub fn is_select(self) -> bool {
        matches!(self, TicketField::Status | TicketField::Priority)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable copy of a ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: TextField,
    pub description: TextField,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee: TextField,
    /// Free text, comma separated
    pub tags: TextField,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl TicketDraft {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            title: TextField::new(ticket.title.clone()),
            description: TextField::new(ticket.description.clone()),
            status: ticket.status,
            priority: ticket.priority,
            assignee: TextField::new(ticket.assignee.clone().unwrap_or_default()),
            tags: TextField::new(ticket.tags.as_deref().unwrap_or_default().join(", ")),
            created_at: ticket.created_at.clone(),
            updated_at: ticket.updated_at.clone(),
        }
    }

    /// Title and description are required
    pub fn is_valid(&self) -> bool {
        !self.title.is_blank() && !self.description.is_blank()
    }

    /// Request body for saving this draft, or `None` while it is invalid
    pub fn to_update_request(&self) -> Option<UpdateTicketRequest> {
        if !self.is_valid() {
            return None;
        }
        Some(UpdateTicketRequest {
            title: self.title.trimmed().to_string(),
            description: self.description.trimmed().to_string(),
            status: self.status,
            priority: self.priority,
            assignee: self.assignee.optional(),
            tags: parse_tags(self.tags.value()),
        })
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

    fn cycle(&mut self, field: TicketField, forward: bool) {
        match field {
            TicketField::Status => {
                self.status = if forward { self.status.next() } else { self.status.prev() };
            }
            TicketField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.prev()
                };
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentField {
    #[default]
    Author,
    Message,
}

impl CommentField {
    fn toggle(self) -> Self {
        match self {
            CommentField::Author => CommentField::Message,
            CommentField::Message => CommentField::Author,
        }
    }
}

/// Author and message being typed, for a new or an existing comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub author: TextField,
    pub message: TextField,
    pub focus: CommentField,
}

impl CommentDraft {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            author: TextField::new(comment.author.clone()),
            message: TextField::new(comment.message.clone()),
            focus: CommentField::Message,
        }
    }

    /// Request body, or `None` unless both fields are non-blank
    pub fn to_request(&self) -> Option<CommentRequest> {
        if self.author.is_blank() || self.message.is_blank() {
            return None;
        }
        Some(CommentRequest {
            author: self.author.trimmed().to_string(),
            message: self.message.trimmed().to_string(),
        })
    }

    fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            CommentField::Author => &mut self.author,
            CommentField::Message => &mut self.message,
        }
    }
}

// ============================================================================
// State Types
// ============================================================================

/// Which panel of the detail screen receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailSection {
    #[default]
    Ticket,
    Comments,
    NewComment,
}

impl DetailSection {
    fn next(self) -> Self {
        match self {
            DetailSection::Ticket => DetailSection::Comments,
            DetailSection::Comments => DetailSection::NewComment,
            DetailSection::NewComment => DetailSection::Ticket,
        }
    }

    fn prev(self) -> Self {
        match self {
            DetailSection::Ticket => DetailSection::NewComment,
            DetailSection::Comments => DetailSection::Ticket,
            DetailSection::NewComment => DetailSection::Comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub ticket_id: TicketId,
    /// `None` until the ticket has loaded once
    pub ticket: Option<EditState<TicketDraft>>,
    pub ticket_field: TicketField,
    pub ticket_error: Option<String>,
    /// Open comment edits, keyed by comment
    pub comment_edits: BTreeMap<CommentId, CommentDraft>,
    pub comment_error: Option<String>,
    pub selected_comment: usize,
    pub new_comment: CommentDraft,
    pub new_comment_error: Option<String>,
    pub section: DetailSection,
    /// Asked to confirm deleting the ticket
    pub confirm_delete: bool,
    /// Write in flight; blocks every other write from this view
    pub pending: Option<Mutation>,
}

impl DetailState {
    pub fn new(ticket_id: TicketId) -> Self {
        Self {
            ticket_id,
            ticket: None,
            ticket_field: TicketField::default(),
            ticket_error: None,
            comment_edits: BTreeMap::new(),
            comment_error: None,
            selected_comment: 0,
            new_comment: CommentDraft::default(),
            new_comment_error: None,
            section: DetailSection::default(),
            confirm_delete: false,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_editing_ticket(&self) -> bool {
        self.ticket.as_ref().is_some_and(EditState::is_editing)
    }

    /// Comment under the selection, if it exists
    pub fn selected_comment_id(&self, comments: &[Comment]) -> Option<CommentId> {
        comments.get(self.selected_comment).map(|c| c.id)
    }

    /// Whether keys go to a text field (global shortcuts are suspended)
    pub fn is_text_input_active(&self, comments: &[Comment]) -> bool {
        match self.section {
            DetailSection::Ticket => self.is_editing_ticket(),
            DetailSection::Comments => self
                .selected_comment_id(comments)
                .is_some_and(|id| self.comment_edits.contains_key(&id)),
            DetailSection::NewComment => true,
        }
    }

    fn start(&mut self, mutation: Mutation, effects: &mut Vec<Effect>) {
        self.pending = Some(mutation.clone());
        effects.push(Effect::Mutate(mutation));
    }
}

// ============================================================================
// Action Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// Latest server data for this ticket
    Sync {
        ticket: Option<Ticket>,
        /// Comment ids currently on the server, when the comments are loaded
        comment_ids: Option<Vec<CommentId>>,
    },
    NextSection,
    PrevSection,
    NextField,
    PrevField,
    MoveUp,
    MoveDown,
    /// Open an edit for the ticket or the selected comment
    BeginEdit,
    /// Close the focused edit, or leave the screen when nothing is open
    Cancel,
    /// Save the focused edit or submit the new comment
    Save,
    Input(TextEdit),
    CycleSelect { forward: bool },
    DeleteComment,
    RequestDeleteTicket,
    ConfirmDeleteTicket,
    CancelDeleteTicket,
    Refresh,
    /// A write issued by this view has finished
    Settled {
        mutation: Mutation,
        result: Result<MutationOutcome, String>,
    },
}

// ============================================================================
// View Model Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentViewModel {
    pub id: CommentId,
    pub author: String,
    pub message: String,
    pub created: String,
    pub is_selected: bool,
    /// Open edit for this comment
    pub edit: Option<CommentDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TicketPanel {
    #[default]
    Loading,
    Error(String),
    Ready {
        draft: Box<TicketDraft>,
        is_editing: bool,
        can_save: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailViewModel {
    pub ticket_id: TicketId,
    pub ticket: TicketPanel,
    pub focused_field: Option<TicketField>,
    pub created: String,
    pub updated: String,
    pub ticket_error: Option<String>,
    /// Last refetch of a loaded ticket failed; the panel shows the last good data
    pub ticket_fetch_error: Option<String>,
    pub comments: Vec<CommentViewModel>,
    pub comments_loading: bool,
    pub comments_error: Option<String>,
    pub comment_error: Option<String>,
    pub new_comment: CommentDraft,
    pub new_comment_focused: bool,
    pub can_submit_comment: bool,
    pub new_comment_error: Option<String>,
    pub section: DetailSection,
    pub confirm_delete: bool,
    /// What is being written, e.g. `update ticket`
    pub pending: Option<&'static str>,
    pub is_refreshing: bool,
    pub shortcuts: Vec<Shortcut>,
}

// ============================================================================
// Reducer
// ============================================================================

fn settle(
    state: &mut DetailState,
    mutation: Mutation,
    result: Result<MutationOutcome, String>,
    effects: &mut Vec<Effect>,
) {
    if state.pending.as_ref() == Some(&mutation) {
        state.pending = None;
    }

    match (mutation, result) {
        (Mutation::UpdateTicket { .. }, Ok(_)) => {
            state.ticket = state.ticket.take().map(EditState::finish);
            state.ticket_error = None;
            effects.push(Effect::Toast(Toast::success("Ticket updated.")));
        }
        (Mutation::UpdateTicket { .. }, Err(error)) => {
            state.ticket_error = Some(error);
            effects.push(Effect::Toast(Toast::error("Ticket could not be updated.")));
        }
        (Mutation::DeleteTicket(_), Ok(_)) => {
            effects.push(Effect::Toast(Toast::success("Ticket deleted.")));
            effects.push(Effect::Redirect(Route::TicketList));
        }
        (Mutation::DeleteTicket(_), Err(error)) => {
            state.ticket_error = Some(error);
            effects.push(Effect::Toast(Toast::error("Ticket could not be deleted.")));
        }
        (Mutation::CreateComment { .. }, Ok(_)) => {
            state.new_comment = CommentDraft::default();
            state.new_comment_error = None;
            effects.push(Effect::Toast(Toast::success("Comment added.")));
        }
        (Mutation::CreateComment { .. }, Err(error)) => {
            state.new_comment_error = Some(error);
            effects.push(Effect::Toast(Toast::error("Comment could not be added.")));
        }
        (Mutation::UpdateComment { comment_id, .. }, Ok(_)) => {
            state.comment_edits.remove(&comment_id);
            state.comment_error = None;
            effects.push(Effect::Toast(Toast::success("Comment updated.")));
        }
        (Mutation::UpdateComment { .. }, Err(error)) => {
            state.comment_error = Some(error);
            effects.push(Effect::Toast(Toast::error("Comment could not be updated.")));
        }
        (Mutation::DeleteComment { comment_id, .. }, Ok(_)) => {
            state.comment_edits.remove(&comment_id);
            state.comment_error = None;
            effects.push(Effect::Toast(Toast::success("Comment deleted.")));
        }
        (Mutation::DeleteComment { .. }, Err(error)) => {
            state.comment_error = Some(error);
            effects.push(Effect::Toast(Toast::error("Comment could not be deleted.")));
        }
        (Mutation::CreateTicket(_), _) => {}
    }
}

fn cancel(state: &mut DetailState, comments: &[Comment], effects: &mut Vec<Effect>) {
    if state.confirm_delete {
        state.confirm_delete = false;
        return;
    }
    match state.section {
        DetailSection::Ticket if state.is_editing_ticket() => {
            state.ticket = state.ticket.take().map(EditState::cancel);
            state.ticket_error = None;
        }
        DetailSection::Comments => {
            let open = state
                .selected_comment_id(comments)
                .and_then(|id| state.comment_edits.remove(&id));
            if open.is_some() {
                state.comment_error = None;
            } else {
                effects.push(Effect::Back);
            }
        }
        DetailSection::NewComment => state.section = DetailSection::Ticket,
        DetailSection::Ticket => effects.push(Effect::Back),
    }
}

fn save(state: &mut DetailState, comments: &[Comment], effects: &mut Vec<Effect>) {
    if state.is_pending() {
        return;
    }
    let ticket_id = state.ticket_id;
    match state.section {
        DetailSection::Ticket => {
            let Some(EditState::Editing { draft, .. }) = &state.ticket else {
                return;
            };
            match draft.to_update_request() {
                Some(request) => {
                    state.ticket_error = None;
                    state.start(
                        Mutation::UpdateTicket {
                            id: ticket_id,
                            request,
                        },
                        effects,
                    );
                }
                None => {
                    state.ticket_error = Some("Title and description are required.".to_string());
                }
            }
        }
        DetailSection::Comments => {
            let Some(comment_id) = state.selected_comment_id(comments) else {
                return;
            };
            let Some(draft) = state.comment_edits.get(&comment_id) else {
                return;
            };
            match draft.to_request() {
                Some(request) => {
                    state.comment_error = None;
                    state.start(
                        Mutation::UpdateComment {
                            ticket_id,
                            comment_id,
                            request,
                        },
                        effects,
                    );
                }
                None => {
                    state.comment_error = Some("Author and message are required.".to_string());
                }
            }
        }
        DetailSection::NewComment => {
            if let Some(request) = state.new_comment.to_request() {
                state.new_comment_error = None;
                state.start(Mutation::CreateComment { ticket_id, request }, effects);
            }
        }
    }
}

/// Pure function: apply an action to the detail state
///
/// `comments` is the comment list currently displayed (server order).
pub fn reduce_detail(
    mut state: DetailState,
    action: DetailAction,
    comments: &[Comment],
) -> (DetailState, Vec<Effect>) {
    let mut effects = Vec::new();

    match action {
        DetailAction::Sync {
            ticket,
            comment_ids,
        } => {
            if let Some(ticket) = ticket {
                let draft = TicketDraft::from_ticket(&ticket);
                state.ticket = Some(match state.ticket.take() {
                    Some(edit) => edit.sync(draft),
                    None => EditState::new(draft),
                });
            }
            if let Some(ids) = comment_ids {
                state.comment_edits.retain(|id, _| ids.contains(id));
                state.selected_comment = state.selected_comment.min(ids.len().saturating_sub(1));
            }
        }
        DetailAction::NextSection => state.section = state.section.next(),
        DetailAction::PrevSection => state.section = state.section.prev(),
        DetailAction::NextField | DetailAction::PrevField => {
            let forward = action == DetailAction::NextField;
            match state.section {
                DetailSection::Ticket => {
                    state.ticket_field = if forward {
                        state.ticket_field.next()
                    } else {
                        state.ticket_field.prev()
                    };
                }
                DetailSection::Comments => {
                    if let Some(draft) = state
                        .selected_comment_id(comments)
                        .and_then(|id| state.comment_edits.get_mut(&id))
                    {
                        draft.focus = draft.focus.toggle();
                    }
                }
                DetailSection::NewComment => {
                    // Tabbing past the form leaves it
                    match (state.new_comment.focus, forward) {
                        (CommentField::Author, true) => {
                            state.new_comment.focus = CommentField::Message
                        }
                        (CommentField::Message, false) => {
                            state.new_comment.focus = CommentField::Author
                        }
                        (CommentField::Message, true) => state.section = DetailSection::Ticket,
                        (CommentField::Author, false) => state.section = DetailSection::Comments,
                    }
                }
            }
        }
        DetailAction::MoveUp => {
            state.selected_comment = state.selected_comment.saturating_sub(1);
        }
        DetailAction::MoveDown => {
            if !comments.is_empty() {
                state.selected_comment = (state.selected_comment + 1).min(comments.len() - 1);
            }
        }
        DetailAction::BeginEdit => {
            if state.is_pending() {
                return (state, effects);
            }
            match state.section {
                DetailSection::Ticket => {
                    state.ticket = state.ticket.take().map(EditState::begin);
                    state.ticket_field = TicketField::Title;
                }
                DetailSection::Comments => {
                    if let Some(comment) = comments.get(state.selected_comment) {
                        state
                            .comment_edits
                            .entry(comment.id)
                            .or_insert_with(|| CommentDraft::from_comment(comment));
                    }
                }
                DetailSection::NewComment => {}
            }
        }
        DetailAction::Cancel => cancel(&mut state, comments, &mut effects),
        DetailAction::Save => save(&mut state, comments, &mut effects),
        DetailAction::Input(edit) => match state.section {
            DetailSection::Ticket => {
                let field = state.ticket_field;
                if let Some(text) = state
                    .ticket
                    .as_mut()
                    .and_then(EditState::draft_mut)
                    .and_then(|draft| draft.text_field_mut(field))
                {
                    text.apply(edit);
                }
            }
            DetailSection::Comments => {
                if let Some(draft) = state
                    .selected_comment_id(comments)
                    .and_then(|id| state.comment_edits.get_mut(&id))
                {
                    draft.focused_mut().apply(edit);
                }
            }
            DetailSection::NewComment => {
                state.new_comment.focused_mut().apply(edit);
            }
        },
        DetailAction::CycleSelect { forward } => {
            let field = state.ticket_field;
            if let Some(draft) = state.ticket.as_mut().and_then(EditState::draft_mut) {
                draft.cycle(field, forward);
            }
        }
        DetailAction::DeleteComment => {
            if !state.is_pending()
                && let Some(comment_id) = state.selected_comment_id(comments)
            {
                let ticket_id = state.ticket_id;
                state.start(
                    Mutation::DeleteComment {
                        ticket_id,
                        comment_id,
                    },
                    &mut effects,
                );
            }
        }
        DetailAction::RequestDeleteTicket => {
            if !state.is_pending() && state.ticket.is_some() {
                state.confirm_delete = true;
            }
        }
        DetailAction::ConfirmDeleteTicket => {
            if state.confirm_delete && !state.is_pending() {
                state.confirm_delete = false;
                let id = state.ticket_id;
                state.start(Mutation::DeleteTicket(id), &mut effects);
            }
        }
        DetailAction::CancelDeleteTicket => state.confirm_delete = false,
        DetailAction::Refresh => effects.push(Effect::Refresh(vec![
            QueryKey::ticket(state.ticket_id),
            QueryKey::ticket_comments(state.ticket_id),
        ])),
        DetailAction::Settled { mutation, result } => {
            settle(&mut state, mutation, result, &mut effects);
        }
    }

    (state, effects)
}

// ============================================================================
// View Model
// ============================================================================

fn detail_shortcuts(state: &DetailState, comments: &[Comment]) -> Vec<Shortcut> {
    if state.confirm_delete {
        return shortcuts([("y", "Delete Ticket"), ("n/Esc", "Keep")]);
    }
    if state.is_text_input_active(comments) {
        let mut list = shortcuts([("Tab", "Next Field"), ("C-s", "Save"), ("Esc", "Cancel")]);
        if state.section == DetailSection::Ticket
            && state.ticket_field.is_select()
        {
            list.insert(1, Shortcut::new("Left/Right", "Change"));
        }
        if state.section == DetailSection::NewComment {
            list = shortcuts([("Tab", "Next Field"), ("C-s", "Add Comment"), ("Esc", "Leave")]);
        }
        return list;
    }
    match state.section {
        DetailSection::Ticket => shortcuts([
            ("e", "Edit"),
            ("d", "Delete"),
            ("Tab", "Comments"),
            ("r", "Refresh"),
            ("Esc", "Back"),
            ("q", "Quit"),
        ]),
        DetailSection::Comments => shortcuts([
            ("j/k", "Select"),
            ("e", "Edit"),
            ("x", "Delete"),
            ("Tab", "New Comment"),
            ("r", "Refresh"),
            ("Esc", "Back"),
        ]),
        DetailSection::NewComment => Vec::new(),
    }
}

/// Pure function: compute view model from state and the cached queries
pub fn compute_detail_view_model(
    state: &DetailState,
    ticket: &QueryState<Ticket>,
    comments: &QueryState<Vec<Comment>>,
    tz: &TimeZone,
) -> DetailViewModel {
    let comment_list: &[Comment] = comments.data().map(Vec::as_slice).unwrap_or_default();

    let panel = match (&state.ticket, ticket.error()) {
        (Some(edit), _) => TicketPanel::Ready {
            draft: Box::new(edit.current().clone()),
            is_editing: edit.is_editing(),
            can_save: edit.is_editing() && edit.current().is_valid() && !state.is_pending(),
        },
        (None, Some(error)) => TicketPanel::Error(error.to_string()),
        (None, None) => TicketPanel::Loading,
    };

    let ticket_fetch_error = matches!(panel, TicketPanel::Ready { .. })
        .then(|| ticket.error().map(str::to_string))
        .flatten();

    let (created, updated) = match &state.ticket {
        Some(edit) => (
            format_timestamp(Some(&edit.snapshot().created_at), tz),
            format_timestamp(edit.snapshot().updated_at.as_deref(), tz),
        ),
        None => (MISSING.to_string(), MISSING.to_string()),
    };

    let comment_rows = comment_list
        .iter()
        .enumerate()
        .map(|(i, comment)| CommentViewModel {
            id: comment.id,
            author: comment.author.clone(),
            message: comment.message.clone(),
            created: format_timestamp(Some(&comment.created_at), tz),
            is_selected: state.section == DetailSection::Comments && i == state.selected_comment,
            edit: state.comment_edits.get(&comment.id).cloned(),
        })
        .collect();

    DetailViewModel {
        ticket_id: state.ticket_id,
        ticket: panel,
        focused_field: (state.section == DetailSection::Ticket && state.is_editing_ticket())
            .then_some(state.ticket_field),
        created,
        updated,
        ticket_error: state.ticket_error.clone(),
        ticket_fetch_error,
        comments: comment_rows,
        comments_loading: comments.is_loading(),
        // A failed refetch still shows the last good comments
        comments_error: comments.error().map(str::to_string),
        comment_error: state.comment_error.clone(),
        new_comment: state.new_comment.clone(),
        new_comment_focused: state.section == DetailSection::NewComment,
        can_submit_comment: state.new_comment.to_request().is_some() && !state.is_pending(),
        new_comment_error: state.new_comment_error.clone(),
        section: state.section,
        confirm_delete: state.confirm_delete,
        pending: state.pending.as_ref().map(Mutation::label),
        is_refreshing: ticket.is_fetching() || comments.is_fetching(),
        shortcuts: detail_shortcuts(state, comment_list),
    }
}

// ============================================================================
// Key Mapping
// ============================================================================

/// Convert a key event to a DetailAction (pure function)
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &DetailState,
    comments: &[Comment],
) -> Option<DetailAction> {
    if state.confirm_delete {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(DetailAction::ConfirmDeleteTicket),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(DetailAction::CancelDeleteTicket)
            }
            _ => None,
        };
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if state.is_text_input_active(comments) {
        let on_select = state.section == DetailSection::Ticket && state.ticket_field.is_select();
        return match code {
            KeyCode::Char('s') if ctrl => Some(DetailAction::Save),
            KeyCode::Esc => Some(DetailAction::Cancel),
            KeyCode::Tab | KeyCode::Down if state.section != DetailSection::Comments || code == KeyCode::Tab => {
                Some(DetailAction::NextField)
            }
            KeyCode::BackTab | KeyCode::Up if state.section != DetailSection::Comments || code == KeyCode::BackTab => {
                Some(DetailAction::PrevField)
            }
            // Up/Down move between comments so several edits can stay open
            KeyCode::Down => Some(DetailAction::MoveDown),
            KeyCode::Up => Some(DetailAction::MoveUp),
            KeyCode::Left if on_select => Some(DetailAction::CycleSelect { forward: false }),
            KeyCode::Right if on_select => Some(DetailAction::CycleSelect { forward: true }),
            KeyCode::Enter if state.section == DetailSection::Ticket => Some(DetailAction::NextField),
            _ if on_select => None,
            _ => text_edit_for_key(code, modifiers).map(DetailAction::Input),
        };
    }

    if ctrl || modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match (code, state.section) {
        (KeyCode::Tab, _) => Some(DetailAction::NextSection),
        (KeyCode::BackTab, _) => Some(DetailAction::PrevSection),
        (KeyCode::Esc, _) => Some(DetailAction::Cancel),
        (KeyCode::Char('r'), _) => Some(DetailAction::Refresh),
        (KeyCode::Char('e') | KeyCode::Enter, DetailSection::Ticket | DetailSection::Comments) => {
            Some(DetailAction::BeginEdit)
        }
        (KeyCode::Char('d'), DetailSection::Ticket) => Some(DetailAction::RequestDeleteTicket),
        (KeyCode::Char('j') | KeyCode::Down, DetailSection::Comments) => Some(DetailAction::MoveDown),
        (KeyCode::Char('k') | KeyCode::Up, DetailSection::Comments) => Some(DetailAction::MoveUp),
        (KeyCode::Char('x') | KeyCode::Delete, DetailSection::Comments) => {
            Some(DetailAction::DeleteComment)
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
