//! # Event Bus Module
//!
//! Decoupled publish/subscribe between the session engine and whatever
//! hosts it (renderer, toast layer, router).
//!
//! ## Usage
//!
//! ```rust
//! use threatkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, SessionEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Session]),
//!     |event| {
//!         if let AppEvent::Session(SessionEvent::RouteAdvanced { id }) = event {
//!             println!("navigate to {}", id);
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::Session(SessionEvent::RouteAdvanced {
//!     id: "doc-1".to_string(),
//! }));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
