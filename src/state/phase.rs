/// Phase definitions for the crawl state machine
///
/// This module defines the three phases a crawl run can be in. The phase is
/// persisted between executions; an absent or unreadable phase is treated as
/// `Idle`.
use std::fmt;

/// Represents the current phase of the crawl state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No run in progress; waiting for operator input
    #[default]
    Idle,

    /// On the search-results view, collecting candidate item ids
    Discovering,

    /// Visiting item pages one by one and extracting comments
    Harvesting,
}

impl Phase {
    /// Returns true if a run is in progress (a query must be present)
    pub fn requires_query(&self) -> bool {
        matches!(self, Self::Discovering | Self::Harvesting)
    }

    /// Converts the phase to its store string representation
    pub fn to_store_string(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Harvesting => "harvesting",
        }
    }

    /// Parses a phase from its store string representation
    ///
    /// Returns None if the string doesn't match any known phase.
    pub fn from_store_string(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "discovering" => Some(Self::Discovering),
            "harvesting" => Some(Self::Harvesting),
            _ => None,
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![Self::Idle, Self::Discovering, Self::Harvesting]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_store_string())
    }
}
