//! Status enums.

use serde::{Deserialize, Serialize};

/// Phase of a checkout attempt.
///
/// ```text
/// Idle ──submit──▶ Validating ──valid──▶ Processing ──complete──▶ Confirmed
///   ▲                  │
///   └────invalid───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Form is editable.
    #[default]
    Idle,
    /// Form values are being checked.
    Validating,
    /// Order is being placed; further submissions are ignored.
    Processing,
    /// Order placed. Terminal.
    Confirmed,
}

impl CheckoutPhase {
    /// Whether form controls should be disabled in this phase.
    #[must_use]
    pub const fn locks_form(self) -> bool {
        matches!(self, Self::Processing | Self::Confirmed)
    }

    /// Lowercase name, as used in markup and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
