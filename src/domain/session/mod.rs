//! Session domain module

mod machine;
mod state;

pub use machine::{Effect, Session};
pub use state::{
    InvalidStateTransition, RecordingState, SessionError, SessionSnapshot, SessionState,
};
