//! Property edits, document metadata and assistant results.

use serde_json::Value;
use threatkit_core::{AppEvent, AssistantEvent, GraphError, GraphResult, ModelKind};

use super::EditorState;
use crate::model::{keys, PropertyBag, Report};

impl EditorState {
    /// Edits one property of a node or edge.
    ///
    /// A `name` edit is applied at once (after committing any pending
    /// edit) so the visible label never lags. Other edits are coalesced
    /// and committed by [`EditorState::tick`] once the delay has passed.
    /// Unusable geometry or parent values are rejected before scheduling.
    pub fn edit_property(&mut self, id: &str, key: &str, value: Value) -> GraphResult<()> {
        let mut patch = PropertyBag::new();
        patch.insert(key.to_string(), value);
        self.graph.check_patch(id, &patch)?;

        if key == keys::NAME {
            self.commit_edits();
            return self.apply_patch(id, patch);
        }

        let now = self.clock.now();
        if let Some((displaced, pending)) = self.edits.schedule(id.to_string(), patch, now) {
            tracing::debug!(element = %displaced, "Edit for another element committed early");
            self.apply_patch(&displaced, pending)?;
        }
        Ok(())
    }

    /// Commits the pending edit if its delay has elapsed.
    ///
    /// Returns true if an edit was applied.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.edits.take_due(now) {
            Some((id, patch)) => self.apply_patch(&id, patch).is_ok(),
            None => false,
        }
    }

    /// Commits the pending edit immediately (blur or explicit commit).
    pub fn commit_edits(&mut self) -> bool {
        match self.edits.flush() {
            Some((id, patch)) => self.apply_patch(&id, patch).is_ok(),
            None => false,
        }
    }

    /// Drops the pending edit without applying it.
    pub fn discard_edits(&mut self) -> bool {
        self.edits.cancel()
    }

    fn apply_patch(&mut self, id: &str, patch: PropertyBag) -> GraphResult<()> {
        match self.graph.update_properties(id, patch) {
            Ok(_) => {
                self.graph_changed(false);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(element = %id, "Property edit not applied: {}", e);
                Err(e)
            }
        }
    }

    /// Renames the open document. The name is validated on save.
    pub fn rename_document(&mut self, name: impl Into<String>) {
        self.document_name = name.into();
        self.is_modified = true;
        self.refresh_snapshot();
    }

    pub fn set_kind(&mut self, kind: ModelKind) {
        if self.kind != kind {
            self.kind = kind;
            self.is_modified = true;
            self.refresh_snapshot();
        }
    }

    /// Merges assistant suggestions into a node, keeping keys already set.
    ///
    /// Returns the number of keys added.
    pub fn apply_suggestions(&mut self, id: &str, suggestions: PropertyBag) -> GraphResult<usize> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::UnknownElement { id: id.to_string() })?;

        let patch: PropertyBag = suggestions
            .into_iter()
            .filter(|(key, _)| !node.data.contains_key(key))
            .collect();
        let added = patch.len();

        if added > 0 {
            self.graph.update_properties(id, patch)?;
            self.graph_changed(false);
        }
        tracing::info!(element = %id, added, "Suggestions applied");
        self.bus
            .publish(AppEvent::Assistant(AssistantEvent::SuggestionsApplied {
                element: id.to_string(),
                added,
            }));
        Ok(added)
    }

    /// Appends an assistant report verbatim.
    pub fn add_report(&mut self, content: impl Into<String>) -> Report {
        let report = Report::new(content);
        self.reports.push(report.clone());
        self.is_modified = true;
        self.bus
            .publish(AppEvent::Assistant(AssistantEvent::ReportStored {
                count: self.reports.len(),
            }));
        report
    }
}
