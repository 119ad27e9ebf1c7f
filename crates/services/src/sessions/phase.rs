use std::fmt;

/// Lifecycle stage of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Landing,
    Setup,
    Active,
    Reviewing,
}

impl Phase {
    /// Phases in which a start timestamp exists.
    #[must_use]
    pub fn has_quiz(self) -> bool {
        matches!(self, Self::Active | Self::Reviewing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Landing => "landing",
            Self::Setup => "setup",
            Self::Active => "active",
            Self::Reviewing => "reviewing",
        };
        f.write_str(label)
    }
}

/// Remote call a session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    Generate,
    Submit,
}

impl PendingRequest {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Generate => "generation",
            Self::Submit => "scoring",
        }
    }
}
