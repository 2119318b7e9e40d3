//! Captures the log lines a session observer emits.
//!
//! A [`Layer`] on top of `tracing_subscriber::registry()` flattens each event
//! into a [`SessionLog`] holding the fields the session reports. It is
//! installed for the duration of one closure only.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{
    Event,
    Level,
    Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

/// One event as logged by `TracingObserver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionLog {
    pub(crate) level: Level,
    pub(crate) message: String,
    pub(crate) endpoint: Option<String>,
    pub(crate) request_id: Option<u64>,
    pub(crate) action: Option<String>,
    pub(crate) bytes: Option<u64>,
    pub(crate) error: Option<String>,
}

#[derive(Default)]
struct SessionFields {
    message: String,
    endpoint: Option<String>,
    request_id: Option<u64>,
    action: Option<String>,
    bytes: Option<u64>,
    error: Option<String>,
}

impl SessionFields {
    fn into_log(self, level: Level) -> SessionLog {
        SessionLog {
            level,
            message: self.message,
            endpoint: self.endpoint,
            request_id: self.request_id,
            action: self.action,
            bytes: self.bytes,
            error: self.error,
        }
    }
}

impl Visit for SessionFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        match field.name() {
            "message" => self.message = text,
            "endpoint" => self.endpoint = Some(text),
            "error" => self.error = Some(text),
            "action" => self.action = Some(text),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "action" {
            self.action = Some(value.to_owned());
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "request_id" => self.request_id = Some(value),
            "bytes" => self.bytes = Some(value),
            _ => {}
        }
    }
}

struct SessionLogLayer {
    logs: Arc<Mutex<Vec<SessionLog>>>,
}

impl<S: Subscriber> Layer<S> for SessionLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = SessionFields::default();
        event.record(&mut fields);
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fields.into_log(*event.metadata().level()));
    }
}

/// Run `f` and return the session logs it produced, in order.
pub(crate) fn capture_session_logs(f: impl FnOnce()) -> Vec<SessionLog> {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let subscriber = registry().with(SessionLogLayer {
        logs: Arc::clone(&logs),
    });
    tracing::subscriber::with_default(subscriber, f);
    let mut guard = logs.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::take(&mut *guard)
}
