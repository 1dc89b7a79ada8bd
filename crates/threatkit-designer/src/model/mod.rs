//! Persisted document types and property bag helpers.

mod document;
pub mod properties;

pub use document::{
    Component, Connection, Document, DocumentId, DocumentSnapshot, DocumentSummary, Report,
    ViewportState,
};
pub use properties::{keys, PropertyBag};
