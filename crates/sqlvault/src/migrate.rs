//! Version-gated schema migration, run once per driver construction.

use log::{debug, info};

use crate::{
    config::Schema,
    error::{DriverError, Result},
};

impl super::Driver {
    /// Compares the persisted schema version against the configured one and
    /// runs the matching hook inside a transaction.
    ///
    /// Version 0 means a fresh database and runs `create`; an older stored
    /// version runs `upgrade`; a newer stored version is fatal and mutates
    /// nothing. The new version is persisted inside the same transaction as
    /// the hook, so a failed hook leaves the stored version untouched.
    pub(crate) fn migrate_if_needed(&self, schema: &dyn Schema) -> Result<()> {
        let stored = self.version()?;
        let target = schema.version();

        if stored == 0 {
            info!("creating schema at version {target}");
            self.with_transaction(|driver| {
                schema.create(driver)?;
                driver.set_version(target)
            })
        } else if stored > target {
            Err(DriverError::VersionSkew {
                stored,
                configured: target,
            })
        } else if stored < target {
            info!("upgrading schema from version {stored} to {target}");
            self.with_transaction(|driver| {
                schema.upgrade(driver, stored, target)?;
                driver.set_version(target)
            })
        } else {
            debug!("schema already at version {target}");
            Ok(())
        }
    }
}
