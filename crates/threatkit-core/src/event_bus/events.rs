//! Event type definitions for the event bus.
//!
//! Events are organized by category and are cloneable and serializable
//! for logging and replay.

use serde::{Deserialize, Serialize};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Session lifecycle (load, save, new)
    Session(SessionEvent),
    /// Graph membership and selection
    Graph(GraphEvent),
    /// User-visible notifications
    Notification(NotificationEvent),
    /// AI assistant results
    Assistant(AssistantEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Session(_) => EventCategory::Session,
            AppEvent::Graph(_) => EventCategory::Graph,
            AppEvent::Notification(_) => EventCategory::Notification,
            AppEvent::Assistant(_) => EventCategory::Assistant,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Session(e) => e.description(),
            AppEvent::Graph(e) => e.description(),
            AppEvent::Notification(e) => e.description(),
            AppEvent::Assistant(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Session,
    Graph,
    Notification,
    Assistant,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Session => write!(f, "Session"),
            EventCategory::Graph => write!(f, "Graph"),
            EventCategory::Notification => write!(f, "Notification"),
            EventCategory::Assistant => write!(f, "Assistant"),
        }
    }
}

/// Session lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The session state machine moved to a new state.
    StateChanged {
        /// Short state label.
        state: String,
    },
    /// A fresh, unsaved document replaced the view-model.
    NewDocument {
        /// Document name.
        name: String,
        /// Model kind label.
        kind: String,
    },
    /// A load resolved and replaced the view-model.
    DocumentLoaded {
        /// Loaded document id.
        id: String,
        /// Number of nodes hydrated.
        nodes: usize,
        /// Number of edges hydrated.
        edges: usize,
    },
    /// A load resolved after being superseded and was dropped.
    LoadDiscarded {
        /// The id the stale load was issued for.
        id: String,
        /// Sequence number of the stale load.
        seq: u64,
    },
    /// A save completed.
    DocumentSaved {
        /// The persisted id.
        id: String,
    },
    /// The external identity must now point at this id (first save).
    RouteAdvanced {
        /// The newly assigned id.
        id: String,
    },
    /// The camera was reset to the canonical default.
    ViewportReset,
    /// Session reports were cleared.
    ReportsCleared,
}

impl SessionEvent {
    fn description(&self) -> String {
        match self {
            SessionEvent::StateChanged { state } => format!("Session state: {}", state),
            SessionEvent::NewDocument { name, kind } => {
                format!("New {} document '{}'", kind, name)
            }
            SessionEvent::DocumentLoaded { id, nodes, edges } => {
                format!("Loaded {} ({} nodes, {} edges)", id, nodes, edges)
            }
            SessionEvent::LoadDiscarded { id, seq } => {
                format!("Discarded stale load of {} (#{})", id, seq)
            }
            SessionEvent::DocumentSaved { id } => format!("Saved {}", id),
            SessionEvent::RouteAdvanced { id } => format!("Route advanced to {}", id),
            SessionEvent::ViewportReset => "Viewport reset".to_string(),
            SessionEvent::ReportsCleared => "Reports cleared".to_string(),
        }
    }
}

/// Graph view-model events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    /// Nodes or edges were added or removed.
    MembershipChanged {
        /// Node count after the change.
        nodes: usize,
        /// Edge count after the change.
        edges: usize,
    },
    /// The selected element changed.
    SelectionChanged {
        /// Selected element id, if any.
        selected: Option<String>,
    },
}

impl GraphEvent {
    fn description(&self) -> String {
        match self {
            GraphEvent::MembershipChanged { nodes, edges } => {
                format!("Graph now has {} nodes, {} edges", nodes, edges)
            }
            GraphEvent::SelectionChanged { selected } => match selected {
                Some(id) => format!("Selected {}", id),
                None => "Selection cleared".to_string(),
            },
        }
    }
}

/// User-visible notifications (toasts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NotificationEvent {
    /// A success confirmation.
    Confirmation {
        /// Message text.
        message: String,
    },
    /// A dismissible error.
    Error {
        /// Message text.
        message: String,
        /// Error classification label.
        kind: String,
    },
}

impl NotificationEvent {
    fn description(&self) -> String {
        match self {
            NotificationEvent::Confirmation { message } => format!("Confirmation: {}", message),
            NotificationEvent::Error { message, kind } => format!("Error ({}): {}", kind, message),
        }
    }
}

/// AI assistant events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssistantEvent {
    /// A report was appended to the session reports.
    ReportStored {
        /// Total number of reports after the append.
        count: usize,
    },
    /// Suggested properties were merged into a node.
    SuggestionsApplied {
        /// Target node id.
        element: String,
        /// Number of keys actually added.
        added: usize,
    },
}

impl AssistantEvent {
    fn description(&self) -> String {
        match self {
            AssistantEvent::ReportStored { count } => format!("Report stored ({} total)", count),
            AssistantEvent::SuggestionsApplied { element, added } => {
                format!("Applied {} suggested properties to {}", added, element)
            }
        }
    }
}
