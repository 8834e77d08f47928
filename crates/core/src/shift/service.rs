//! Shift lifecycle rules.
//!
//! The repository loads the rows involved (under row locks) and asks these
//! functions whether the transition is allowed. The partial unique indexes on
//! `shifts` back the same rules at the database level.

use uuid::Uuid;

use crate::auth::{Permission, Role};

use super::error::{DeskUnavailableReason, ShiftError};
use super::types::{CashDeskProfile, CashierProfile, ShiftState};

/// Shift lifecycle service.
pub struct ShiftService;

impl ShiftService {
    /// Validates opening a shift.
    ///
    /// `cashier_open` and `desk_open` are the currently open shifts of the
    /// cashier and of the desk, if any. Checks run in this order: the user is
    /// a cashier bound to an airport, the cashier has no open shift, the desk
    /// has no open shift, the desk is active and in the cashier's airport.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn check_open(
        cashier: &CashierProfile,
        desk: &CashDeskProfile,
        cashier_open: Option<Uuid>,
        desk_open: Option<Uuid>,
    ) -> Result<(), ShiftError> {
        if !cashier.role.allows(Permission::OperateShift) {
            return Err(ShiftError::NotACashier(cashier.user_id));
        }
        let Some(home_airport) = cashier.airport_id else {
            return Err(ShiftError::CashierWithoutAirport(cashier.user_id));
        };
        if let Some(shift_id) = cashier_open {
            return Err(ShiftError::ShiftAlreadyOpen {
                cashier_id: cashier.user_id,
                shift_id,
            });
        }
        if let Some(shift_id) = desk_open {
            return Err(ShiftError::CashDeskBusy {
                cash_desk_id: desk.id,
                shift_id,
            });
        }
        if !desk.is_active {
            return Err(ShiftError::CashDeskUnavailable {
                cash_desk_id: desk.id,
                reason: DeskUnavailableReason::Inactive,
            });
        }
        if desk.airport_id != home_airport {
            return Err(ShiftError::CashDeskUnavailable {
                cash_desk_id: desk.id,
                reason: DeskUnavailableReason::OtherAirport,
            });
        }
        Ok(())
    }

    /// Validates closing the cashier's shift.
    ///
    /// # Errors
    ///
    /// `NoOpenShift` when `open` is `None` or not actually open.
    pub fn check_close(cashier_id: Uuid, open: Option<&ShiftState>) -> Result<Uuid, ShiftError> {
        match open {
            Some(shift) if shift.status.is_open() => Ok(shift.id),
            _ => Err(ShiftError::NoOpenShift(cashier_id)),
        }
    }

    /// Validates the admin-only reopen of a closed shift.
    ///
    /// `cashier_open` and `desk_open` are the open shifts currently held by the
    /// shift's cashier and desk.
    ///
    /// # Errors
    ///
    /// `ReopenForbidden` for non-admins, `ShiftAlreadyOpen` when the shift or
    /// another shift of its cashier is open, `CashDeskBusy` when the desk is
    /// taken.
    pub fn check_reopen(
        actor_id: Uuid,
        actor_role: Role,
        shift: &ShiftState,
        cashier_open: Option<Uuid>,
        desk_open: Option<Uuid>,
    ) -> Result<(), ShiftError> {
        if !actor_role.allows(Permission::ReopenShift) {
            return Err(ShiftError::ReopenForbidden(actor_id));
        }
        if shift.status.is_open() {
            return Err(ShiftError::ShiftAlreadyOpen {
                cashier_id: shift.cashier_id,
                shift_id: shift.id,
            });
        }
        if let Some(shift_id) = cashier_open {
            return Err(ShiftError::ShiftAlreadyOpen {
                cashier_id: shift.cashier_id,
                shift_id,
            });
        }
        if let Some(shift_id) = desk_open {
            return Err(ShiftError::CashDeskBusy {
                cash_desk_id: shift.cash_desk_id,
                shift_id,
            });
        }
        Ok(())
    }
}
