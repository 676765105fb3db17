#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Event(#[from] neuromorphic_event_types::Error),

    #[error("invalid event offset {index} (capacity {capacity})")]
    OutOfBounds { index: i32, capacity: i32 },

    #[error("validate called on an already valid event")]
    AlreadyValid,

    #[error("invalidate called on an already invalid event")]
    AlreadyInvalid,

    #[error("event {index} skips unwritten slots (next slot is {event_number})")]
    Unwritten { index: i32, event_number: i32 },

    #[error("the packet already holds {capacity} events")]
    Full { capacity: i32 },

    #[error("the event capacity must be strictly positive (got {0})")]
    Capacity(i32),

    #[error("allocating {capacity} events of {event_size} bytes failed")]
    Allocation { capacity: i32, event_size: i32 },

    #[error("buffer size mismatch (expected {expected} bytes, read {read})")]
    Size { expected: usize, read: usize },

    #[error("inconsistent packet header ({0})")]
    Header(&'static str),
}
