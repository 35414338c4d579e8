//! Application and account status values and the application state machine.
//!
//! Statuses are stored as TEXT in the database using the exact strings
//! returned by `as_str`, which are also the wire representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Application status
// ---------------------------------------------------------------------------

/// Lifecycle status of a shift application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    CancellationRequested,
}

/// Statuses that count as "covering" a (date, slot) pair.
///
/// A cancellation request still covers the slot until an admin resolves it.
pub const COVERING_STATUSES: [ApplicationStatus; 3] = [
    ApplicationStatus::Approved,
    ApplicationStatus::Pending,
    ApplicationStatus::CancellationRequested,
];

/// Statuses that count towards a volunteer's shift history.
pub const HISTORY_STATUSES: [ApplicationStatus; 2] = [
    ApplicationStatus::Approved,
    ApplicationStatus::CancellationRequested,
];

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::CancellationRequested => "CancellationRequested",
        }
    }

    /// Whether this status covers its (date, slot) pair for gap analysis.
    pub fn is_covering(self) -> bool {
        COVERING_STATUSES.contains(&self)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "CancellationRequested" => Ok(Self::CancellationRequested),
            other => Err(format!(
                "Invalid application status '{other}'. Must be one of: \
                 Pending, Approved, Rejected, CancellationRequested"
            )),
        }
    }
}

/// Application state machine.
///
/// Admin review moves `Pending` to `Approved` or `Rejected`. A volunteer may
/// ask to cancel an `Approved` shift; the admin then either deletes the
/// application (no target status) or returns it to `Approved`.
pub mod state_machine {
    use super::ApplicationStatus::{self, *};

    /// Returns the set of statuses reachable from `from`.
    pub fn valid_transitions(from: ApplicationStatus) -> &'static [ApplicationStatus] {
        match from {
            Pending => &[Approved, Rejected],
            Approved => &[CancellationRequested],
            CancellationRequested => &[Approved],
            Rejected => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a transition, returning an error message for invalid ones.
    pub fn validate_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!("Invalid transition: {from} -> {to}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Account status
// ---------------------------------------------------------------------------

/// Review status of a volunteer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "Invalid account status '{other}'. Must be one of: Pending, Approved, Rejected"
            )),
        }
    }
}
