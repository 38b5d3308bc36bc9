//! Shared fixtures for driver integration tests.

use std::cell::Cell;

use sqlvault::{DatabaseConfig, Driver, ParamBinder, Result, Schema};

/// Schema fixture that counts hook invocations.
pub struct TestSchema {
    version: i64,
    pub create_calls: Cell<usize>,
    pub upgrade_calls: Cell<usize>,
    pub last_upgrade: Cell<Option<(i64, i64)>>,
}

impl TestSchema {
    pub fn at_version(version: i64) -> Self {
        Self {
            version,
            create_calls: Cell::new(0),
            upgrade_calls: Cell::new(0),
            last_upgrade: Cell::new(None),
        }
    }
}

impl Schema for TestSchema {
    fn version(&self) -> i64 {
        self.version
    }

    fn create(&self, driver: &Driver) -> Result<()> {
        self.create_calls.set(self.create_calls.get() + 1);
        driver.execute(
            None,
            "CREATE TABLE test (id INTEGER PRIMARY KEY, value TEXT)",
            0,
            None,
        )?;
        Ok(())
    }

    fn upgrade(&self, driver: &Driver, from: i64, to: i64) -> Result<()> {
        self.upgrade_calls.set(self.upgrade_calls.get() + 1);
        self.last_upgrade.set(Some((from, to)));
        driver.execute(None, "ALTER TABLE test ADD COLUMN extra TEXT", 0, None)?;
        Ok(())
    }
}

/// Opens an in-memory driver with the version-1 test schema.
pub fn open_test_driver() -> Driver {
    Driver::open(DatabaseConfig::memory(), &TestSchema::at_version(1))
        .expect("Failed to open test driver")
}

/// Inserts a row into the `test` table through the fingerprinted call site.
pub fn insert_row(driver: &Driver, id: i64, value: &str) {
    driver
        .execute(
            Some(1),
            "INSERT INTO test (id, value) VALUES (?, ?)",
            2,
            Some(&|binder: &mut ParamBinder| {
                binder.bind_long(Some(id));
                binder.bind_string(Some(value));
            }),
        )
        .expect("Failed to insert row");
}

/// Collects all `(id, value)` pairs from the `test` table in id order.
pub fn all_rows(driver: &Driver) -> Vec<(i64, String)> {
    let mut cursor = driver
        .execute_query(Some(2), "SELECT id, value FROM test ORDER BY id", 0, None)
        .expect("Failed to query rows");
    let mut rows = Vec::new();
    while cursor.next() {
        let id = cursor
            .get_long(0)
            .expect("Failed to read id")
            .expect("id is not null");
        let value = cursor
            .get_string(1)
            .expect("Failed to read value")
            .expect("value is not null")
            .to_string();
        rows.push((id, value));
    }
    rows
}
