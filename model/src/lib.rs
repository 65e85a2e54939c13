// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Lazily-decoded entities over [`archive_codec`]'s flat records. Entities are immutable values
//! constructed on demand from a borrowed byte slice; once constructed they own their decoded
//! fields and never hold a reference back into the store. Expensive derivations are memoized
//! once per entity via `once_cell::sync::OnceCell`.

pub mod bundle;
pub mod hash;
pub mod milestone;
pub mod snapshot_info;
pub mod solid_entry_points;
pub mod transaction;
pub mod tx_metadata;

pub use archive_codec::TOTAL_SUPPLY;
pub use bundle::Bundle;
pub use hash::Hash;
pub use milestone::Milestone;
pub use snapshot_info::SnapshotInfo;
pub use solid_entry_points::SolidEntryPoints;
pub use transaction::Transaction;
pub use tx_metadata::TransactionMetadata;
