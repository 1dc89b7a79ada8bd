//! New, load and save transitions for the editor state.

use threatkit_core::{ModelKind, SessionError, SessionEvent};

use super::EditorState;
use crate::graph::ElementRef;
use crate::model::{Document, DocumentId};
use crate::persistence::SaveRequest;
use crate::session::{
    ExternalIdentity, IdentityAction, LoadDecision, LoadResolution, LoadTicket, NewDecision,
    SaveResolution, SaveTicket,
};

/// Result of resolving a save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub result: Result<DocumentId, SessionError>,
    /// A load that waited for the save and must now be run.
    pub next_load: Option<LoadTicket>,
}

impl EditorState {
    /// Starts a fresh, unsaved document.
    ///
    /// Repeating the request while already showing a matching new
    /// document changes nothing and publishes nothing.
    pub fn request_new(&mut self, name: &str, kind: ModelKind) -> Result<NewDecision, SessionError> {
        let decision = self.session.request_new(name, kind)?;
        if decision == NewDecision::Reset {
            self.reset_to_new(name, kind);
        }
        Ok(decision)
    }

    fn reset_to_new(&mut self, name: &str, kind: ModelKind) {
        tracing::info!(name = %name, kind = %kind, "Resetting to new document");

        if self.edits.cancel() {
            tracing::debug!("Pending property edit dropped by reset");
        }
        let had_selection = self.selection.selected().is_some();
        self.selection.clear(&mut self.graph);
        self.graph.clear();

        self.viewport.reset();
        self.reports.clear();
        self.document_name = name.to_string();
        self.kind = kind;
        self.is_modified = false;
        self.refresh_snapshot();

        self.publish_session(SessionEvent::ViewportReset);
        self.publish_session(SessionEvent::ReportsCleared);
        self.publish_session(SessionEvent::NewDocument {
            name: name.to_string(),
            kind: kind.to_string(),
        });
        self.publish_membership();
        if had_selection {
            self.publish_selection();
        }
        self.sync_state();
    }

    /// Asks the controller to load `id`.
    pub fn begin_load(&mut self, id: DocumentId) -> LoadDecision {
        let decision = self.session.request_load(id);
        if let LoadDecision::Start(ticket) = &decision {
            tracing::info!(document_id = %ticket.id, seq = ticket.seq, "Load started");
        }
        self.sync_state();
        decision
    }

    /// Applies the result of a load.
    ///
    /// Returns `Ok(true)` when the document replaced the graph and
    /// `Ok(false)` when the result was stale and dropped. On failure the
    /// graph is left exactly as it was.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Option<Document>, SessionError>,
    ) -> Result<bool, SessionError> {
        let resolution = self.session.finish_load(ticket, result);
        let outcome = match resolution {
            LoadResolution::Stale => {
                tracing::info!(document_id = %ticket.id, seq = ticket.seq, "Stale load discarded");
                self.publish_session(SessionEvent::LoadDiscarded {
                    id: ticket.id.to_string(),
                    seq: ticket.seq,
                });
                Ok(false)
            }
            LoadResolution::Loaded(document) => {
                self.apply_document(&ticket.id, document);
                Ok(true)
            }
            LoadResolution::Failed(error) => {
                tracing::error!(document_id = %ticket.id, "Load failed: {}", error);
                self.notifier.error(&error);
                Err(error)
            }
        };
        self.sync_state();
        outcome
    }

    fn apply_document(&mut self, id: &DocumentId, document: Document) {
        if self.edits.cancel() {
            tracing::debug!("Pending property edit dropped by load");
        }

        let hydrated = self.mapper.hydrate(&document);
        if !hydrated.issues.is_empty() {
            tracing::warn!(
                document_id = %id,
                dropped = hydrated.issues.len(),
                "Document loaded with dangling connections"
            );
        }

        let persisted_selection = hydrated
            .nodes
            .iter()
            .find(|n| n.selected)
            .map(|n| ElementRef::node(&n.id));

        let snapshot = self.graph.replace_all(hydrated.nodes, hydrated.edges);
        self.selection.select(persisted_selection, &mut self.graph);
        self.viewport.restore(&document.viewport);

        self.document_name = document.name;
        self.kind = document.kind;
        self.reports = document.reports;
        self.is_modified = false;
        self.refresh_snapshot();

        tracing::info!(
            document_id = %id,
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Document loaded"
        );
        self.publish_session(SessionEvent::DocumentLoaded {
            id: id.to_string(),
            nodes: snapshot.nodes.len(),
            edges: snapshot.edges.len(),
        });
        self.publish_membership();
        self.publish_selection();
        self.notifier.confirm(format!("Loaded '{}'", self.document_name));
    }

    /// Starts a save and builds the request for the store.
    ///
    /// Once the controller accepts the save, pending property edits are
    /// committed so the request holds the live graph. A rejected save
    /// leaves them pending.
    pub fn begin_save(&mut self) -> Result<(SaveTicket, SaveRequest), SessionError> {
        let ticket = match self.session.begin_save(&self.document_name) {
            Ok(ticket) => ticket,
            Err(error) => {
                tracing::info!("Save rejected: {}", error);
                return Err(error);
            }
        };
        self.commit_edits();

        let (components, connections) = self.mapper.dehydrate(&self.graph);
        let request = SaveRequest {
            owner_id: self.defaults.owner_id.clone(),
            id: ticket.bound_id.clone(),
            name: self.document_name.clone(),
            kind: self.kind,
            components,
            connections,
            viewport: self.viewport.state(),
            reports: self.reports.clone(),
        };
        tracing::info!(
            document_id = ?ticket.bound_id.as_ref().map(DocumentId::as_str),
            components = request.components.len(),
            "Save started"
        );
        Ok((ticket, request))
    }

    /// Applies the result of a save.
    pub fn finish_save(
        &mut self,
        ticket: &SaveTicket,
        result: Result<DocumentId, SessionError>,
    ) -> SaveOutcome {
        let outcome = match self.session.finish_save(ticket, result) {
            SaveResolution::Saved {
                id,
                route_advanced,
                next_load,
            } => {
                tracing::info!(document_id = %id, route_advanced, "Save finished");
                self.is_modified = false;
                self.publish_session(SessionEvent::DocumentSaved { id: id.to_string() });
                if route_advanced {
                    self.publish_session(SessionEvent::RouteAdvanced { id: id.to_string() });
                }
                SaveOutcome {
                    result: Ok(id),
                    next_load,
                }
            }
            SaveResolution::Failed { error, next_load } => {
                tracing::error!("Save failed: {}", error);
                self.notifier.error(&error);
                SaveOutcome {
                    result: Err(error),
                    next_load,
                }
            }
            SaveResolution::Stale => {
                tracing::warn!(seq = ticket.seq, "Ignoring result of unknown save");
                SaveOutcome {
                    result: Err(SessionError::busy("save")),
                    next_load: None,
                }
            }
        };
        if let Some(next) = &outcome.next_load {
            tracing::info!(document_id = %next.id, seq = next.seq, "Queued load started");
        }
        self.sync_state();
        outcome
    }

    /// Reacts to the external identity changing.
    ///
    /// A [`IdentityAction::Load`] must be run by the caller; a reset has
    /// already been applied.
    pub fn on_identity_changed(
        &mut self,
        identity: ExternalIdentity,
    ) -> Result<IdentityAction, SessionError> {
        tracing::debug!(identity = %identity, "External identity changed");
        let name = self.defaults.default_name.clone();
        let kind = self.defaults.default_kind;

        let action = self
            .session
            .identity_changed(identity, self.graph.is_empty(), &name, kind)?;
        match &action {
            IdentityAction::Reset => self.reset_to_new(&name, kind),
            IdentityAction::Load(ticket) => {
                tracing::info!(document_id = %ticket.id, seq = ticket.seq, "Load started");
            }
            IdentityAction::None | IdentityAction::Queued => {}
        }
        self.sync_state();
        Ok(action)
    }
}
