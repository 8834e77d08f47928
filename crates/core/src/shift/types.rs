//! Shift domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Shift status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Cashier is working; sales and cash movements are accepted.
    Open,
    /// Shift ended; no further transactions may reference it.
    Closed,
}

impl ShiftStatus {
    /// Returns true for [`ShiftStatus::Open`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// What the shift rules need to know about the acting cashier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashierProfile {
    /// User ID.
    pub user_id: Uuid,
    /// User's role.
    pub role: Role,
    /// Home airport.
    pub airport_id: Option<Uuid>,
}

/// What the shift rules need to know about a cash desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashDeskProfile {
    /// Cash desk ID.
    pub id: Uuid,
    /// Airport the desk stands in.
    pub airport_id: Uuid,
    /// Inactive desks cannot host shifts.
    pub is_active: bool,
}

/// A shift as seen by the lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftState {
    /// Shift ID.
    pub id: Uuid,
    /// Cashier working the shift.
    pub cashier_id: Uuid,
    /// Cash desk the shift runs on.
    pub cash_desk_id: Uuid,
    /// Current status.
    pub status: ShiftStatus,
}
