//! Property-based tests for the shift lifecycle.
//!
//! Drives an in-memory model through random open/close/reopen attempts and
//! checks the uniqueness invariant after every step.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use super::service::ShiftService;
use super::types::{CashDeskProfile, CashierProfile, ShiftState, ShiftStatus};
use crate::auth::Role;

const CASHIERS: usize = 4;
const DESKS: usize = 3;

#[derive(Debug, Clone)]
enum Step {
    Open { cashier: usize, desk: usize },
    Close { cashier: usize },
    Reopen { shift: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..CASHIERS, 0..DESKS).prop_map(|(cashier, desk)| Step::Open { cashier, desk }),
        (0..CASHIERS).prop_map(|cashier| Step::Close { cashier }),
        (0..32usize).prop_map(|shift| Step::Reopen { shift }),
    ]
}

struct Model {
    airport: Uuid,
    cashiers: Vec<CashierProfile>,
    desks: Vec<CashDeskProfile>,
    shifts: Vec<ShiftState>,
}

impl Model {
    fn new() -> Self {
        let airport = Uuid::new_v4();
        Self {
            airport,
            cashiers: (0..CASHIERS)
                .map(|_| CashierProfile {
                    user_id: Uuid::new_v4(),
                    role: Role::Cashier,
                    airport_id: Some(airport),
                })
                .collect(),
            desks: (0..DESKS)
                .map(|_| CashDeskProfile {
                    id: Uuid::new_v4(),
                    airport_id: airport,
                    is_active: true,
                })
                .collect(),
            shifts: Vec::new(),
        }
    }

    fn open_for_cashier(&self, cashier_id: Uuid) -> Option<&ShiftState> {
        self.shifts
            .iter()
            .find(|s| s.cashier_id == cashier_id && s.status.is_open())
    }

    fn open_for_desk(&self, desk_id: Uuid) -> Option<&ShiftState> {
        self.shifts
            .iter()
            .find(|s| s.cash_desk_id == desk_id && s.status.is_open())
    }

    fn apply(&mut self, step: &Step) {
        match *step {
            Step::Open { cashier, desk } => {
                let cashier = self.cashiers[cashier];
                let desk = self.desks[desk];
                let cashier_open = self.open_for_cashier(cashier.user_id).map(|s| s.id);
                let desk_open = self.open_for_desk(desk.id).map(|s| s.id);
                if ShiftService::check_open(&cashier, &desk, cashier_open, desk_open).is_ok() {
                    self.shifts.push(ShiftState {
                        id: Uuid::new_v4(),
                        cashier_id: cashier.user_id,
                        cash_desk_id: desk.id,
                        status: ShiftStatus::Open,
                    });
                }
            }
            Step::Close { cashier } => {
                let cashier_id = self.cashiers[cashier].user_id;
                let open = self.open_for_cashier(cashier_id).copied();
                if let Ok(id) = ShiftService::check_close(cashier_id, open.as_ref()) {
                    if let Some(shift) = self.shifts.iter_mut().find(|s| s.id == id) {
                        shift.status = ShiftStatus::Closed;
                    }
                }
            }
            Step::Reopen { shift } => {
                if self.shifts.is_empty() {
                    return;
                }
                let index = shift % self.shifts.len();
                let target = self.shifts[index];
                let cashier_open = self
                    .open_for_cashier(target.cashier_id)
                    .filter(|s| s.id != target.id)
                    .map(|s| s.id);
                let desk_open = self
                    .open_for_desk(target.cash_desk_id)
                    .filter(|s| s.id != target.id)
                    .map(|s| s.id);
                if ShiftService::check_reopen(
                    Uuid::new_v4(),
                    Role::Admin,
                    &target,
                    cashier_open,
                    desk_open,
                )
                .is_ok()
                {
                    self.shifts[index].status = ShiftStatus::Open;
                }
            }
        }
    }

    fn max_open_per<F: Fn(&ShiftState) -> Uuid>(&self, key: F) -> usize {
        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for shift in self.shifts.iter().filter(|s| s.status.is_open()) {
            *counts.entry(key(shift)).or_default() += 1;
        }
        counts.values().copied().max().unwrap_or(0)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// At most one open shift per cashier and per desk after any sequence.
    #[test]
    fn prop_at_most_one_open_shift(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut model = Model::new();
        for step in &steps {
            model.apply(step);
            prop_assert!(model.max_open_per(|s| s.cashier_id) <= 1);
            prop_assert!(model.max_open_per(|s| s.cash_desk_id) <= 1);
        }
        prop_assert!(model.shifts.iter().all(|s| model.desks.iter().any(|d| d.id == s.cash_desk_id && d.airport_id == model.airport)));
    }

    /// Opening always succeeds for a free cashier on a free desk.
    #[test]
    fn prop_free_cashier_and_desk_can_open(cashier in 0..CASHIERS, desk in 0..DESKS) {
        let model = Model::new();
        let result = ShiftService::check_open(&model.cashiers[cashier], &model.desks[desk], None, None);
        prop_assert!(result.is_ok());
    }
}
