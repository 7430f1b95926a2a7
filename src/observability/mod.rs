//! Observability for query derivation
//!
//! Typed events emitted through `tracing`. The library never installs a
//! subscriber; applications decide where events go.
//!
//! Fields are rendered in sorted key order so the same event always
//! produces the same line.

mod events;

pub use events::{Event, Severity};

/// Log an event with the given fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let rendered = render_fields(fields);
    match event.severity() {
        Severity::Trace => tracing::trace!(event = event.as_str(), fields = %rendered),
        Severity::Debug => tracing::debug!(event = event.as_str(), fields = %rendered),
        Severity::Info => tracing::info!(event = event.as_str(), fields = %rendered),
        Severity::Warn => tracing::warn!(event = event.as_str(), fields = %rendered),
    }
}

fn render_fields(fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}
