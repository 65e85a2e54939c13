// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use archive_codec::realms::DB_VERSION;

use crate::error::StoreError;
use crate::realm::Realm;

/// Status byte recorded alongside the schema version in a health record. The legacy writer sets
/// `Corrupted` if it crashed mid-write and `Tainted` if it was shut down uncleanly; either one
/// means the data on disk cannot be trusted without operator intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Corrupted,
    Tainted,
}

impl HealthStatus {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Healthy),
            1 => Some(Self::Corrupted),
            2 => Some(Self::Tainted),
            _ => None,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Corrupted => "corrupted",
            Self::Tainted => "tainted",
        }
    }
}

/// Reads and validates the health record for a single database. Called once per database at
/// startup; `bypass` mirrors the debug flag that lets an operator force-open a database the
/// legacy writer left corrupted or tainted.
pub fn check(realm: &Realm, db_path: &str, bypass: bool) -> Result<(), StoreError> {
    use archive_codec::realms::HEALTH_KEY;

    let record = realm.get(HEALTH_KEY)?;
    let record = match record {
        Some(bytes) => bytes,
        None => {
            // No health record at all: treat a fresh/empty database as healthy so the service
            // can bootstrap against an empty directory during tests.
            return Ok(());
        }
    };

    if record.len() != 2 {
        if bypass {
            return Ok(());
        }
        return Err(StoreError::HealthCheckFailed { path: db_path.to_string(), reason: "malformed health record" });
    }

    let found_version = record[0];
    if found_version != DB_VERSION && !bypass {
        return Err(StoreError::SchemaMismatch {
            path: db_path.to_string(),
            expected: DB_VERSION,
            found: found_version,
        });
    }

    let status = HealthStatus::from_byte(record[1]).unwrap_or(HealthStatus::Corrupted);
    if status != HealthStatus::Healthy && !bypass {
        return Err(StoreError::HealthCheckFailed { path: db_path.to_string(), reason: status.reason() });
    }

    Ok(())
}
