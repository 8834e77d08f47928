//! Shift lifecycle against a real schema.

mod common;

use aerodesk_core::shift::{DeskUnavailableReason, ShiftError};
use aerodesk_db::{
    CashDeskRepository, ShiftRepository, StoreError,
    entities::sea_orm_active_enums::ShiftStatus,
    repositories::{ShiftFilter, UpdateCashDeskInput},
};
use aerodesk_shared::types::PageRequest;
use common::{airport, cash_desk, fixture, user};

#[tokio::test]
async fn test_open_shift_sets_open_state() {
    let f = fixture().await;
    let shift = ShiftRepository::new(f.db.clone()).get(f.shift_id).await.unwrap();

    assert_eq!(shift.status, ShiftStatus::Open);
    assert_eq!(shift.cashier_id, f.cashier_id);
    assert_eq!(shift.cash_desk_id, f.cash_desk_id);
    assert!(shift.closed_at.is_none());
}

#[tokio::test]
async fn test_second_open_for_cashier_fails() {
    let f = fixture().await;
    let other_desk = cash_desk(&f.db, f.airport_id).await;

    let err = ShiftRepository::new(f.db.clone())
        .open(f.cashier_id, other_desk)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Shift(ShiftError::ShiftAlreadyOpen { shift_id, .. }) if shift_id == f.shift_id
    ));
}

#[tokio::test]
async fn test_busy_desk_rejects_second_cashier() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());
    let second = user(&f.db, "cashier", Some(f.airport_id)).await;

    let err = repo.open(second, f.cash_desk_id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Shift(ShiftError::CashDeskBusy { shift_id, .. }) if shift_id == f.shift_id
    ));

    let original = repo.get(f.shift_id).await.unwrap();
    assert_eq!(original.status, ShiftStatus::Open);
    assert_eq!(original.cashier_id, f.cashier_id);
    assert!(repo.current(second).await.unwrap().is_none());
}

#[tokio::test]
async fn test_inactive_desk_is_unavailable() {
    let f = fixture().await;
    let desk = cash_desk(&f.db, f.airport_id).await;
    CashDeskRepository::new(f.db.clone())
        .update(
            desk,
            UpdateCashDeskInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let cashier = user(&f.db, "cashier", Some(f.airport_id)).await;

    let err = ShiftRepository::new(f.db.clone())
        .open(cashier, desk)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Shift(ShiftError::CashDeskUnavailable {
            reason: DeskUnavailableReason::Inactive,
            ..
        })
    ));
}

#[tokio::test]
async fn test_desk_in_other_airport_is_unavailable() {
    let f = fixture().await;
    let lviv = airport(&f.db, "LWO").await;
    let desk = cash_desk(&f.db, lviv).await;
    let cashier = user(&f.db, "cashier", Some(f.airport_id)).await;

    let err = ShiftRepository::new(f.db.clone())
        .open(cashier, desk)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Shift(ShiftError::CashDeskUnavailable {
            reason: DeskUnavailableReason::OtherAirport,
            ..
        })
    ));
}

#[tokio::test]
async fn test_only_cashiers_open_shifts() {
    let f = fixture().await;
    let desk = cash_desk(&f.db, f.airport_id).await;

    let err = ShiftRepository::new(f.db.clone())
        .open(f.admin_id, desk)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Shift(ShiftError::NotACashier(_))));
}

#[tokio::test]
async fn test_close_then_close_again() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());

    let closed = repo.close(f.cashier_id).await.unwrap();
    assert_eq!(closed.id, f.shift_id);
    assert_eq!(closed.status, ShiftStatus::Closed);
    assert!(closed.closed_at.is_some());

    let err = repo.close(f.cashier_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Shift(ShiftError::NoOpenShift(_))));
}

#[tokio::test]
async fn test_closed_desk_can_be_reused() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());
    repo.close(f.cashier_id).await.unwrap();

    let next = user(&f.db, "cashier", Some(f.airport_id)).await;
    let shift = repo.open(next, f.cash_desk_id).await.unwrap();
    assert_eq!(shift.status, ShiftStatus::Open);
}

#[tokio::test]
async fn test_admin_reopens_closed_shift() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());
    repo.close(f.cashier_id).await.unwrap();

    let reopened = repo.reopen(f.admin_id, f.shift_id).await.unwrap();
    assert_eq!(reopened.status, ShiftStatus::Open);
    assert!(reopened.closed_at.is_none());
    assert_eq!(reopened.reopened_by, Some(f.admin_id));
    assert!(reopened.reopened_at.is_some());
}

#[tokio::test]
async fn test_reopen_rules() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());

    let err = repo.reopen(f.admin_id, f.shift_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Shift(ShiftError::ShiftAlreadyOpen { .. })));

    repo.close(f.cashier_id).await.unwrap();
    let err = repo.reopen(f.cashier_id, f.shift_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Shift(ShiftError::ReopenForbidden(_))));

    let next = user(&f.db, "cashier", Some(f.airport_id)).await;
    let taken = repo.open(next, f.cash_desk_id).await.unwrap();
    let err = repo.reopen(f.admin_id, f.shift_id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Shift(ShiftError::CashDeskBusy { shift_id, .. }) if shift_id == taken.id
    ));
}

#[tokio::test]
async fn test_available_desks_excludes_busy_and_inactive() {
    let f = fixture().await;
    let desks = CashDeskRepository::new(f.db.clone());
    let free = cash_desk(&f.db, f.airport_id).await;
    let inactive = cash_desk(&f.db, f.airport_id).await;
    desks
        .update(
            inactive,
            UpdateCashDeskInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let available: Vec<_> = desks
        .available(f.airport_id)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(available, vec![free]);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let f = fixture().await;
    let repo = ShiftRepository::new(f.db.clone());
    repo.close(f.cashier_id).await.unwrap();
    let next = user(&f.db, "cashier", Some(f.airport_id)).await;
    repo.open(next, f.cash_desk_id).await.unwrap();

    let (open, total) = repo
        .list(
            &ShiftFilter {
                status: Some(ShiftStatus::Open),
                ..Default::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(open[0].cashier_id, next);

    let (all, total) = repo
        .list(
            &ShiftFilter {
                cash_desk_id: Some(f.cash_desk_id),
                ..Default::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);
}
