use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// A [`Layer`] which keeps the message of every event emitted while it is installed, in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().expect("the event log isn't poisoned").clone()
    }

    pub fn count(&self, message: &str) -> usize {
        self.messages().iter().filter(|m| *m == message).count()
    }

    /// Buffer storage acquired, either fresh or as a copy.
    pub fn allocations(&self) -> usize {
        self.count("allocated buffer storage") + self.count("copied buffer storage")
    }

    pub fn releases(&self) -> usize {
        self.count("released buffer storage")
    }
}

struct Message(Option<String>);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message(None);
        event.record(&mut message);
        if let Some(message) = message.0 {
            self.0.lock().expect("the event log isn't poisoned").push(message);
        }
    }
}

/// Runs `run` with an [`EventLog`] installed as the subscriber for the current thread.
pub fn capture<R>(run: impl FnOnce() -> R) -> (R, EventLog) {
    let log = EventLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    let result = tracing::subscriber::with_default(subscriber, run);
    (result, log)
}
