/// Structured progress events emitted while a model is assembled.
///
/// The core never configures a process-wide logger; callers that want
/// build telemetry inject a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    VariablesDefined { count: usize },
    ConstraintAdded { name: String },
    ObjectiveSet { variables: usize },
}

pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// Collects events; handy for tests and batch diagnostics.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}
