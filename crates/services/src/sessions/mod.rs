mod phase;
mod service;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use phase::{PendingRequest, Phase};
pub use service::{
    BeginSubmit, GenerateOutcome, GenerateTicket, QuizSession, Submission, SubmitOutcome,
    SubmitTicket,
};
pub use timer::{TICK_INTERVAL, Timer};
pub use workflow::QuizSessionService;
