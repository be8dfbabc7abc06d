use crate::event::EventKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("No events found")]
    EmptyDemo,
    #[error("Malformed {field} in {kind:?} event: {value}")]
    MalformedEvent {
        kind: EventKind,
        field: &'static str,
        value: String,
    },
}
