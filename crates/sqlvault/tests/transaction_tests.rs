mod common;

use common::{all_rows, insert_row, open_test_driver};
use sqlvault::DriverError;

#[test]
fn outer_commit_persists_effects() {
    let driver = open_test_driver();

    let txn = driver.new_transaction().expect("Failed to begin");
    insert_row(&driver, 1, "Alec");
    driver
        .end_transaction(txn, true)
        .expect("Failed to commit");

    assert_eq!(all_rows(&driver), vec![(1, "Alec".to_string())]);
}

#[test]
fn outer_rollback_discards_effects() {
    let driver = open_test_driver();

    let txn = driver.new_transaction().expect("Failed to begin");
    insert_row(&driver, 1, "Alec");
    driver
        .end_transaction(txn, false)
        .expect("Failed to roll back");

    assert!(all_rows(&driver).is_empty());
}

#[test]
fn inner_commit_with_outer_commit_persists_everything() {
    let driver = open_test_driver();

    let outer = driver.new_transaction().expect("Failed to begin outer");
    insert_row(&driver, 1, "Alec");
    let inner = driver.new_transaction().expect("Failed to begin inner");
    insert_row(&driver, 2, "Jake");
    driver
        .end_transaction(inner, true)
        .expect("Failed to end inner");
    driver
        .end_transaction(outer, true)
        .expect("Failed to end outer");

    assert_eq!(
        all_rows(&driver),
        vec![(1, "Alec".to_string()), (2, "Jake".to_string())]
    );
}

#[test]
fn inner_commit_with_outer_rollback_discards_everything() {
    let driver = open_test_driver();

    let outer = driver.new_transaction().expect("Failed to begin outer");
    let inner = driver.new_transaction().expect("Failed to begin inner");
    insert_row(&driver, 1, "Alec");
    driver
        .end_transaction(inner, true)
        .expect("Failed to end inner");
    insert_row(&driver, 2, "Jake");
    driver
        .end_transaction(outer, false)
        .expect("Failed to roll back outer");

    assert!(all_rows(&driver).is_empty());
}

#[test]
fn inner_rollback_does_not_force_outer_rollback() {
    let driver = open_test_driver();

    let outer = driver.new_transaction().expect("Failed to begin outer");
    insert_row(&driver, 1, "Alec");
    let inner = driver.new_transaction().expect("Failed to begin inner");
    insert_row(&driver, 2, "Jake");
    // Inner scopes are bookkeeping only; their outcome defers to the outer
    // scope.
    driver
        .end_transaction(inner, false)
        .expect("Failed to end inner");
    driver
        .end_transaction(outer, true)
        .expect("Failed to commit outer");

    assert_eq!(
        all_rows(&driver),
        vec![(1, "Alec".to_string()), (2, "Jake".to_string())]
    );
}

#[test]
fn current_transaction_tracks_the_open_chain() {
    let driver = open_test_driver();
    assert!(driver.current_transaction().is_none());

    let outer = driver.new_transaction().expect("Failed to begin outer");
    assert_eq!(driver.current_transaction(), Some(outer));
    assert!(outer.is_outermost());

    let inner = driver.new_transaction().expect("Failed to begin inner");
    assert_eq!(driver.current_transaction(), Some(inner));
    assert!(!inner.is_outermost());

    driver
        .end_transaction(inner, true)
        .expect("Failed to end inner");
    assert_eq!(driver.current_transaction(), Some(outer));

    driver
        .end_transaction(outer, true)
        .expect("Failed to end outer");
    assert!(driver.current_transaction().is_none());
}

#[test]
fn out_of_order_end_is_rejected_and_the_driver_stays_usable() {
    let driver = open_test_driver();

    let outer = driver.new_transaction().expect("Failed to begin outer");
    let inner = driver.new_transaction().expect("Failed to begin inner");

    assert!(matches!(
        driver.end_transaction(outer, true),
        Err(DriverError::TransactionDiscipline)
    ));
    assert_eq!(driver.current_transaction(), Some(inner));

    driver
        .end_transaction(inner, true)
        .expect("Failed to end inner");
    driver
        .end_transaction(outer, true)
        .expect("Failed to end outer");

    insert_row(&driver, 1, "Alec");
    assert_eq!(all_rows(&driver), vec![(1, "Alec".to_string())]);
}

#[test]
fn with_transaction_commits_on_ok() {
    let driver = open_test_driver();

    driver
        .with_transaction(|driver| {
            insert_row(driver, 1, "Alec");
            Ok(())
        })
        .expect("Transaction body failed");

    assert_eq!(all_rows(&driver), vec![(1, "Alec".to_string())]);
    assert!(driver.current_transaction().is_none());
}

#[test]
fn with_transaction_rolls_back_on_err() {
    let driver = open_test_driver();

    let result: Result<(), _> = driver.with_transaction(|driver| {
        insert_row(driver, 1, "Alec");
        Err(DriverError::schema("boom"))
    });

    assert!(matches!(result, Err(DriverError::Schema { .. })));
    assert!(all_rows(&driver).is_empty());
    assert!(driver.current_transaction().is_none());
}
