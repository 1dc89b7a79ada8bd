//! Pure session controller.
//!
//! [`SessionController`] performs no I/O. Callers ask it for a decision,
//! run the collaborator call it asks for, then hand the result back with
//! the ticket they were given. Loads are tagged with a monotonic sequence
//! number; a result whose ticket is no longer the active one is stale and
//! is discarded.
//!
//! While a save is pending, loads queue behind it and `new` is rejected.
//! While a load is pending, saves are rejected.

use threatkit_core::{ModelKind, SessionError, ValidationError};

use super::{ExternalIdentity, SessionState};
use crate::model::{Document, DocumentId};

/// Identifies one issued load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: DocumentId,
    pub seq: u64,
}

/// Identifies one issued save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub seq: u64,
    /// Bound id at the time the save started; `None` creates.
    pub bound_id: Option<DocumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewDecision {
    /// Reset the view-model, viewport and reports.
    Reset,
    /// Already in a matching `New` state; do nothing.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDecision {
    /// Call the store with this ticket.
    Start(LoadTicket),
    /// A load for the same id is already pending.
    AlreadyInFlight,
    /// A save is pending; the load starts when it finishes.
    Queued,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadResolution {
    /// Apply this document to the view-model.
    Loaded(Document),
    /// The load failed; the view-model must be left untouched.
    Failed(SessionError),
    /// Superseded; drop the result.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveResolution {
    Saved {
        id: DocumentId,
        /// True on first save: the external identity must move to `id`.
        route_advanced: bool,
        /// A load that was queued behind the save and now starts.
        next_load: Option<LoadTicket>,
    },
    Failed {
        error: SessionError,
        next_load: Option<LoadTicket>,
    },
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityAction {
    /// Nothing to do.
    None,
    /// Start this load.
    Load(LoadTicket),
    /// The load waits for a pending save.
    Queued,
    /// Reset to a new document.
    Reset,
}

/// The session state machine.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    state: SessionState,
    bound_id: Option<DocumentId>,
    last_requested: Option<ExternalIdentity>,
    load_seq: u64,
    active_load: Option<LoadTicket>,
    save_seq: u64,
    active_save: Option<SaveTicket>,
    queued_load: Option<DocumentId>,
    route_echo: Option<DocumentId>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Id of the persisted document on screen; `None` for unsaved work.
    pub fn bound_id(&self) -> Option<&DocumentId> {
        self.bound_id.as_ref()
    }

    pub fn last_requested(&self) -> Option<&ExternalIdentity> {
        self.last_requested.as_ref()
    }

    pub fn active_load(&self) -> Option<&LoadTicket> {
        self.active_load.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.active_load.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.active_save.is_some()
    }

    /// Moves to a fresh unsaved document.
    ///
    /// Idempotent: a request matching the current `New` state returns
    /// [`NewDecision::Unchanged`]. Supersedes any pending load. Rejected
    /// while a save is pending.
    pub fn request_new(&mut self, name: &str, kind: ModelKind) -> Result<NewDecision, SessionError> {
        if self.is_saving() {
            tracing::info!("New document rejected, save in progress");
            return Err(SessionError::busy("save"));
        }

        let matching = matches!(
            &self.state,
            SessionState::New { name: n, kind: k } if n == name && *k == kind
        );
        if matching && self.active_load.is_none() && self.queued_load.is_none() {
            tracing::debug!(name = %name, "Already in matching new state");
            return Ok(NewDecision::Unchanged);
        }

        if let Some(ticket) = self.active_load.take() {
            tracing::debug!(document_id = %ticket.id, seq = ticket.seq, "Pending load superseded by new");
        }
        self.queued_load = None;
        self.route_echo = None;
        self.bound_id = None;
        self.last_requested = Some(ExternalIdentity::New);
        self.set_state(SessionState::New {
            name: name.to_string(),
            kind,
        });
        Ok(NewDecision::Reset)
    }

    /// Requests that `id` be loaded.
    pub fn request_load(&mut self, id: DocumentId) -> LoadDecision {
        if self.active_load.as_ref().is_some_and(|t| t.id == id) {
            tracing::debug!(document_id = %id, "Load already in flight");
            return LoadDecision::AlreadyInFlight;
        }

        self.last_requested = Some(ExternalIdentity::Existing(id.clone()));

        if self.is_saving() {
            tracing::info!(document_id = %id, "Load queued behind pending save");
            self.queued_load = Some(id);
            return LoadDecision::Queued;
        }

        LoadDecision::Start(self.start_load(id))
    }

    /// Resolves a load issued with `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Option<Document>, SessionError>,
    ) -> LoadResolution {
        if self.active_load.as_ref() != Some(ticket) {
            tracing::debug!(document_id = %ticket.id, seq = ticket.seq, "Discarding stale load");
            return LoadResolution::Stale;
        }
        self.active_load = None;

        match result {
            Ok(Some(document)) => {
                self.bound_id = Some(ticket.id.clone());
                self.set_state(SessionState::Ready(ticket.id.clone()));
                LoadResolution::Loaded(document)
            }
            Ok(None) => {
                let error = SessionError::NotFound {
                    id: ticket.id.to_string(),
                };
                self.set_state(SessionState::Error(error.to_string()));
                LoadResolution::Failed(error)
            }
            Err(error) => {
                self.set_state(SessionState::Error(error.to_string()));
                LoadResolution::Failed(error)
            }
        }
    }

    /// Starts a save of the document currently on screen.
    ///
    /// An empty name is rejected before anything changes. A pending save
    /// or load makes the request busy.
    pub fn begin_save(&mut self, name: &str) -> Result<SaveTicket, SessionError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.is_saving() {
            return Err(SessionError::busy("save"));
        }
        if self.is_loading() {
            return Err(SessionError::busy("load"));
        }

        self.save_seq += 1;
        let ticket = SaveTicket {
            seq: self.save_seq,
            bound_id: self.bound_id.clone(),
        };
        self.active_save = Some(ticket.clone());
        tracing::debug!(seq = ticket.seq, bound = ?ticket.bound_id, "Save started");
        Ok(ticket)
    }

    /// Resolves a save issued with `ticket`.
    ///
    /// On failure the state is left as it was before the save.
    pub fn finish_save(
        &mut self,
        ticket: &SaveTicket,
        result: Result<DocumentId, SessionError>,
    ) -> SaveResolution {
        if self.active_save.as_ref() != Some(ticket) {
            return SaveResolution::Stale;
        }
        self.active_save = None;

        let resolution = match result {
            Ok(id) => {
                let route_advanced = ticket.bound_id.as_ref() != Some(&id);
                self.bound_id = Some(id.clone());
                if route_advanced {
                    self.route_echo = Some(id.clone());
                    self.last_requested = Some(ExternalIdentity::Existing(id.clone()));
                }
                self.set_state(SessionState::Ready(id.clone()));
                SaveResolution::Saved {
                    id,
                    route_advanced,
                    next_load: None,
                }
            }
            Err(error) => SaveResolution::Failed {
                error,
                next_load: None,
            },
        };

        let queued = self.queued_load.take().map(|id| self.start_load(id));
        match resolution {
            SaveResolution::Saved {
                id, route_advanced, ..
            } => SaveResolution::Saved {
                id,
                route_advanced,
                next_load: queued,
            },
            SaveResolution::Failed { error, .. } => SaveResolution::Failed {
                error,
                next_load: queued,
            },
            SaveResolution::Stale => SaveResolution::Stale,
        }
    }

    /// Reacts to the external identity changing for a reason other than
    /// this session's own save.
    pub fn identity_changed(
        &mut self,
        identity: ExternalIdentity,
        graph_is_empty: bool,
        default_name: &str,
        default_kind: ModelKind,
    ) -> Result<IdentityAction, SessionError> {
        match identity {
            ExternalIdentity::Existing(id) => {
                if self.route_echo.as_ref() == Some(&id) {
                    self.route_echo = None;
                    return Ok(IdentityAction::None);
                }
                self.route_echo = None;

                let showing = self.bound_id.as_ref() == Some(&id)
                    && !graph_is_empty
                    && !self.state.is_error();
                if showing {
                    if self.active_load.as_ref().is_some_and(|t| t.id == id) {
                        return Ok(IdentityAction::None);
                    }
                    self.retarget_to_bound(id);
                    return Ok(IdentityAction::None);
                }

                Ok(match self.request_load(id) {
                    LoadDecision::Start(ticket) => IdentityAction::Load(ticket),
                    LoadDecision::Queued => IdentityAction::Queued,
                    LoadDecision::AlreadyInFlight => IdentityAction::None,
                })
            }
            ExternalIdentity::New => {
                self.route_echo = None;
                Ok(match self.request_new(default_name, default_kind)? {
                    NewDecision::Reset => IdentityAction::Reset,
                    NewDecision::Unchanged => IdentityAction::None,
                })
            }
        }
    }

    /// The identity points back at the document already on screen; any
    /// load or queued load for another id no longer matches the target.
    fn retarget_to_bound(&mut self, id: DocumentId) {
        if let Some(ticket) = self.active_load.take() {
            tracing::debug!(document_id = %ticket.id, seq = ticket.seq, "Pending load superseded by bound document");
        }
        if let Some(queued) = self.queued_load.take() {
            tracing::debug!(document_id = %queued, "Queued load dropped");
        }
        self.last_requested = Some(ExternalIdentity::Existing(id.clone()));
        self.set_state(SessionState::Ready(id));
    }

    fn start_load(&mut self, id: DocumentId) -> LoadTicket {
        self.load_seq += 1;
        let ticket = LoadTicket {
            id: id.clone(),
            seq: self.load_seq,
        };
        if let Some(previous) = self.active_load.replace(ticket.clone()) {
            tracing::debug!(document_id = %previous.id, seq = previous.seq, "Pending load superseded");
        }
        self.set_state(SessionState::Loading(id));
        ticket
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            tracing::info!(from = %self.state.label(), to = %state.label(), "Session state changed");
            self.state = state;
        }
    }
}
