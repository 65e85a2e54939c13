// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Store-prefix byte constants. Each prefix names one "realm" within one of the three
//! underlying databases; the prefix byte is always the first byte of every key written
//! under that realm.

/// Current on-disk schema version. Bumped only by the legacy writer; this service never
/// migrates, it only refuses to open a database whose health record disagrees.
pub const DB_VERSION: u8 = 2;

/// Health record realm, present in all three databases.
pub const HEALTH: u8 = 0;

// `tangle` database realms.
pub const TRANSACTION: u8 = 1;
pub const TRANSACTION_METADATA: u8 = 2;
pub const BUNDLE: u8 = 3;
pub const ADDRESS: u8 = 4;
pub const APPROVER: u8 = 5;
pub const BUNDLE_TRANSACTION: u8 = 6;
pub const TAG: u8 = 7;
pub const MILESTONE: u8 = 8;
pub const LEDGER_DIFF: u8 = 9;

// `snapshot` database realms.
pub const SNAPSHOT_INFO: u8 = 10;
pub const SOLID_ENTRY_POINTS: u8 = 11;
pub const LEDGER_BALANCE: u8 = 12;
pub const LEDGER_INDEX: u8 = 13;

/// Decommissioned realm, unused by this service; present only so startup can clean it up.
pub const UNUSED_AUTO_TRANSACTION: u8 = 14;

// `spent` database realm.
pub const SPENT_ADDRESS: u8 = 15;

/// Decommissioned realms, unused by this service; present only so startup can clean them up.
pub const UNUSED_ADDRESS_TAG: u8 = 16;
pub const UNUSED_TRANSACTION_TAG: u8 = 17;

/// Realms that are no longer written or read by this service. Deleted once at startup so an
/// old on-disk directory does not keep carrying dead weight.
pub const DECOMMISSIONED: [u8; 3] = [UNUSED_AUTO_TRANSACTION, UNUSED_ADDRESS_TAG, UNUSED_TRANSACTION_TAG];

/// The three independent embedded databases. A realm belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    Tangle,
    Snapshot,
    Spent,
}

/// Returns which physical database a given realm prefix lives in.
pub const fn database_of(realm: u8) -> Database {
    match realm {
        SNAPSHOT_INFO | SOLID_ENTRY_POINTS | LEDGER_BALANCE | LEDGER_INDEX => Database::Snapshot,
        SPENT_ADDRESS | UNUSED_ADDRESS_TAG | UNUSED_TRANSACTION_TAG => Database::Spent,
        _ => Database::Tangle,
    }
}

/// Fixed key under which `SnapshotInfo` is stored (realm `SNAPSHOT_INFO`).
pub const SNAPSHOT_INFO_KEY: &[u8] = b"snapshotInfo";

/// Fixed key under which the `SolidEntryPoints` blob is stored (realm `SOLID_ENTRY_POINTS`).
pub const SOLID_ENTRY_POINTS_KEY: &[u8] = b"solidEntryPoints";

/// Fixed key under which the health record is stored (realm `HEALTH`), one per database.
pub const HEALTH_KEY: &[u8] = b"health";

/// Fixed key under which the current ledger index (the latest solid milestone index the
/// `ledger_balance` realm is consistent with) is stored (realm `LEDGER_INDEX`), as `u32_le`.
pub const LEDGER_INDEX_KEY: &[u8] = b"ledgerIndex";
