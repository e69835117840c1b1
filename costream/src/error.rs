use thiserror::Error;

/// Misuse detected while forcing or walking a stream.
///
/// Arithmetic faults raised by element operators are not represented here: they
/// surface as the operator's own panic when the dependent cell is forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("binding was read before any stream was bound to it")]
    UnboundBinding,

    #[error("binding refers to a stream that has already been dropped")]
    DroppedBinding,

    #[error("binding is already bound to a stream")]
    AlreadyBound,

    #[error("cell was re-entered while being forced: the element depends on itself")]
    CyclicForce,
}

pub type StreamResult<T> = Result<T, StreamError>;
