//! The bus itself.
//!
//! Each editor owns a handle to its bus (usually an `Arc<EventBus>`);
//! there is no process-wide instance.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{AppEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a handler wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn Fn(&AppEvent) + Send + Sync>,
}

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Capacity of the broadcast channel behind [`EventBus::receiver`].
    pub channel_capacity: usize,
    /// Record published events so they can be read back with [`EventBus::history`].
    pub enable_history: bool,
    /// Oldest recorded events are dropped past this many.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
        }
    }
}

/// Publish/subscribe hub for editor events.
///
/// Handlers run synchronously on the publishing thread in subscription
/// order. Async consumers poll a broadcast [`receiver`](Self::receiver)
/// instead.
pub struct EventBus {
    config: EventBusConfig,
    sender: broadcast::Sender<AppEvent>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    history: Mutex<VecDeque<AppEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            config,
            sender,
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Deliver `event` to every matching handler and to the broadcast channel.
    ///
    /// Returns how many handlers and receivers saw it; zero is fine.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::trace!(category = %event.category(), event = %event.description(), "publish");

        if self.config.enable_history {
            let mut history = self.history.lock();
            history.push_back(event.clone());
            let excess = history.len().saturating_sub(self.config.max_history_size);
            history.drain(..excess);
        }

        let handled = self
            .subscribers
            .read()
            .iter()
            .filter(|sub| sub.filter.matches(&event))
            .inspect(|sub| (sub.handler)(&event))
            .count();

        handled + self.sender.send(event).unwrap_or(0)
    }

    /// Register a synchronous handler.
    ///
    /// The handler must not publish on, or subscribe to, the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!(subscription = %id, "subscribed");
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|sub| sub.id != id);
        let removed = subscribers.len() != before;
        if removed {
            tracing::debug!(subscription = %id, "unsubscribed");
        }
        removed
    }

    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Recorded events, oldest first. Empty unless history is enabled.
    pub fn history(&self) -> Vec<AppEvent> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("recorded", &self.history.lock().len())
            .field("config", &self.config)
            .finish()
    }
}
