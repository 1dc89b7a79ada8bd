//! # ThreatKit Core
//!
//! Core types shared by the ThreatKit crates: the error taxonomy, the
//! application event bus, time sources, and engine-wide defaults.

pub mod clock;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{
    ErrorKind, GraphError, GraphResult, Result, SessionError, ValidationError,
};

pub use event_bus::{
    AppEvent, AssistantEvent, EventBus, EventBusConfig, EventCategory, EventFilter, GraphEvent,
    NotificationEvent, SessionEvent, SubscriptionId,
};

pub use types::{ModelKind, ParseModelKindError};
