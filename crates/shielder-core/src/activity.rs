//! Display identity for shielding activity.
//!
//! A record starts with a local id when it is submitted and gains a chain
//! hash once observed on chain. Its identity is the local id whenever one
//! exists, so the surface opened for a pending transaction is still the
//! surface for it after confirmation. Detail lookups go the other way and
//! prefer the chain hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state_machine::{activity_transition, ActivityAction, ActivityStage, StageTransition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActivityError {
    #[error("invalid activity record: neither localId nor txHash is set")]
    InvalidRecord,
    #[error("tx hash conflict for {identity}: {existing} already attached, got {incoming}")]
    TxHashConflict {
        identity: ActivityIdentity,
        existing: TxHash,
        incoming: TxHash,
    },
    #[error("local id conflict for {identity}: {existing} already attached, got {incoming}")]
    LocalIdConflict {
        identity: ActivityIdentity,
        existing: LocalId,
        incoming: LocalId,
    },
    #[error("activity state error: {0}")]
    State(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(String);

impl LocalId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chain transaction hash; hex case is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activity as handed over by the SDK. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl RawActivity {
    pub fn pending(local_id: impl Into<String>) -> Self {
        Self {
            local_id: Some(local_id.into()),
            tx_hash: None,
        }
    }

    pub fn confirmed(local_id: impl Into<String>, tx_hash: impl Into<String>) -> Self {
        Self {
            local_id: Some(local_id.into()),
            tx_hash: Some(tx_hash.into()),
        }
    }

    pub fn chain_only(tx_hash: impl Into<String>) -> Self {
        Self {
            local_id: None,
            tx_hash: Some(tx_hash.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRecord {
    PendingOnly { local_id: LocalId },
    ConfirmedWithLocal { local_id: LocalId, tx_hash: TxHash },
    ConfirmedOnly { tx_hash: TxHash },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityIdentity {
    Local(LocalId),
    Chain(TxHash),
}

impl ActivityIdentity {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityIdentity::Local(id) => id.as_str(),
            ActivityIdentity::Chain(hash) => hash.as_str(),
        }
    }
}

impl fmt::Display for ActivityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key for fetching activity details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLookup {
    ByTxHash(TxHash),
    ByLocalId(LocalId),
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl TryFrom<&RawActivity> for ActivityRecord {
    type Error = ActivityError;

    fn try_from(raw: &RawActivity) -> Result<Self, Self::Error> {
        let local_id = non_blank(raw.local_id.as_ref()).map(LocalId::new);
        let tx_hash = non_blank(raw.tx_hash.as_ref()).map(TxHash::new);
        match (local_id, tx_hash) {
            (Some(local_id), None) => Ok(ActivityRecord::PendingOnly { local_id }),
            (Some(local_id), Some(tx_hash)) => {
                Ok(ActivityRecord::ConfirmedWithLocal { local_id, tx_hash })
            }
            (None, Some(tx_hash)) => Ok(ActivityRecord::ConfirmedOnly { tx_hash }),
            (None, None) => Err(ActivityError::InvalidRecord),
        }
    }
}

impl TryFrom<RawActivity> for ActivityRecord {
    type Error = ActivityError;

    fn try_from(raw: RawActivity) -> Result<Self, Self::Error> {
        ActivityRecord::try_from(&raw)
    }
}

impl From<&ActivityRecord> for RawActivity {
    fn from(record: &ActivityRecord) -> Self {
        RawActivity {
            local_id: record.local_id().map(|id| id.as_str().to_owned()),
            tx_hash: record.tx_hash().map(|hash| hash.as_str().to_owned()),
        }
    }
}

impl ActivityRecord {
    pub fn local_id(&self) -> Option<&LocalId> {
        match self {
            ActivityRecord::PendingOnly { local_id }
            | ActivityRecord::ConfirmedWithLocal { local_id, .. } => Some(local_id),
            ActivityRecord::ConfirmedOnly { .. } => None,
        }
    }

    pub fn tx_hash(&self) -> Option<&TxHash> {
        match self {
            ActivityRecord::PendingOnly { .. } => None,
            ActivityRecord::ConfirmedWithLocal { tx_hash, .. }
            | ActivityRecord::ConfirmedOnly { tx_hash } => Some(tx_hash),
        }
    }

    pub fn stage(&self) -> ActivityStage {
        match self {
            ActivityRecord::PendingOnly { .. } => ActivityStage::Pending,
            _ => ActivityStage::Confirmed,
        }
    }

    /// Stable identity: the local id if present, else the tx hash.
    pub fn identity(&self) -> ActivityIdentity {
        match self {
            ActivityRecord::PendingOnly { local_id }
            | ActivityRecord::ConfirmedWithLocal { local_id, .. } => {
                ActivityIdentity::Local(local_id.clone())
            }
            ActivityRecord::ConfirmedOnly { tx_hash } => ActivityIdentity::Chain(tx_hash.clone()),
        }
    }

    /// Detail lookup key: the tx hash if present, else the local id.
    pub fn display_lookup(&self) -> DetailLookup {
        match self {
            ActivityRecord::ConfirmedWithLocal { tx_hash, .. }
            | ActivityRecord::ConfirmedOnly { tx_hash } => DetailLookup::ByTxHash(tx_hash.clone()),
            ActivityRecord::PendingOnly { local_id } => DetailLookup::ByLocalId(local_id.clone()),
        }
    }

    /// Pending -> Confirmed. Re-attaching the hash already set is a no-op
    /// and returns `Ok(None)`; a different hash is rejected.
    pub fn attach_tx_hash(
        &mut self,
        tx_hash: TxHash,
    ) -> Result<Option<StageTransition>, ActivityError> {
        let existing = self.tx_hash().cloned();
        if existing.as_ref() == Some(&tx_hash) {
            return Ok(None);
        }
        let (_, transition) = activity_transition(self.stage(), ActivityAction::AttachTxHash)
            .map_err(|e| match existing {
                Some(existing) => ActivityError::TxHashConflict {
                    identity: self.identity(),
                    existing,
                    incoming: tx_hash.clone(),
                },
                None => ActivityError::State(e.to_string()),
            })?;
        if let Some(local_id) = self.local_id().cloned() {
            *self = ActivityRecord::ConfirmedWithLocal { local_id, tx_hash };
        }
        Ok(Some(transition))
    }

    /// Adds the local id to a record first seen on chain. The record's
    /// stage does not change.
    fn adopt_local_id(&mut self, local_id: LocalId) -> Result<(), ActivityError> {
        match self {
            ActivityRecord::ConfirmedOnly { tx_hash } => {
                let tx_hash = tx_hash.clone();
                *self = ActivityRecord::ConfirmedWithLocal { local_id, tx_hash };
                Ok(())
            }
            ActivityRecord::PendingOnly { local_id: existing }
            | ActivityRecord::ConfirmedWithLocal {
                local_id: existing, ..
            } => {
                if *existing == local_id {
                    return Ok(());
                }
                let existing = existing.clone();
                Err(ActivityError::LocalIdConflict {
                    identity: self.identity(),
                    existing,
                    incoming: local_id,
                })
            }
        }
    }

    fn absorb(&mut self, incoming: &ActivityRecord) -> Result<(), ActivityError> {
        if let Some(local_id) = incoming.local_id() {
            self.adopt_local_id(local_id.clone())?;
        }
        if let Some(tx_hash) = incoming.tx_hash() {
            self.attach_tx_hash(tx_hash.clone())?;
        }
        Ok(())
    }

    fn shares_id_with(&self, other: &ActivityRecord) -> bool {
        let same_local = matches!((self.local_id(), other.local_id()), (Some(a), Some(b)) if a == b);
        let same_hash = matches!((self.tx_hash(), other.tx_hash()), (Some(a), Some(b)) if a == b);
        same_local || same_hash
    }
}

pub fn resolve_identity(raw: &RawActivity) -> Result<ActivityIdentity, ActivityError> {
    ActivityRecord::try_from(raw).map(|record| record.identity())
}

pub fn resolve_display_props(raw: &RawActivity) -> Result<DetailLookup, ActivityError> {
    ActivityRecord::try_from(raw).map(|record| record.display_lookup())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedActivity {
    record: ActivityRecord,
}

impl TrackedActivity {
    /// Same identity `resolve_identity` gives for the current record.
    pub fn identity(&self) -> ActivityIdentity {
        self.record.identity()
    }

    pub fn record(&self) -> &ActivityRecord {
        &self.record
    }

    pub fn display_lookup(&self) -> DetailLookup {
        self.record.display_lookup()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserveOutcome {
    Added(ActivityIdentity),
    Updated(ActivityIdentity),
    Unchanged(ActivityIdentity),
    /// A record first seen on chain gained its local id; surfaces keyed by
    /// `from` should move to `to`.
    Rekeyed {
        from: ActivityIdentity,
        to: ActivityIdentity,
    },
    /// The snapshot linked two tracked entries. `removed` no longer
    /// identifies anything tracked.
    Merged {
        kept: ActivityIdentity,
        removed: ActivityIdentity,
    },
}

impl ObserveOutcome {
    /// Identity of the entry the snapshot landed in.
    pub fn identity(&self) -> &ActivityIdentity {
        match self {
            ObserveOutcome::Added(identity)
            | ObserveOutcome::Updated(identity)
            | ObserveOutcome::Unchanged(identity) => identity,
            ObserveOutcome::Rekeyed { to, .. } => to,
            ObserveOutcome::Merged { kept, .. } => kept,
        }
    }
}

/// De-duplicates activity snapshots, in observation order.
///
/// An entry's identity is always its record's identity, so it matches
/// `resolve_identity` for every snapshot the entry absorbed. A chain-only
/// entry that gains a local id is reported as `Rekeyed`.
#[derive(Debug, Clone, Default)]
pub struct ActivityLedger {
    entries: Vec<TrackedActivity>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, raw: &RawActivity) -> Result<ObserveOutcome, ActivityError> {
        let incoming = ActivityRecord::try_from(raw)?;
        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.record.shares_id_with(&incoming))
            .map(|(idx, _)| idx)
            .collect();

        match matches.as_slice() {
            [] => {
                let identity = incoming.identity();
                self.entries.push(TrackedActivity { record: incoming });
                Ok(ObserveOutcome::Added(identity))
            }
            [idx] => {
                let entry = &mut self.entries[*idx];
                let mut record = entry.record.clone();
                record.absorb(&incoming)?;
                let from = entry.identity();
                if record == entry.record {
                    return Ok(ObserveOutcome::Unchanged(from));
                }
                entry.record = record;
                let to = entry.identity();
                if from == to {
                    Ok(ObserveOutcome::Updated(to))
                } else {
                    Ok(ObserveOutcome::Rekeyed { from, to })
                }
            }
            [first, second] => {
                let (first, second) = (*first, *second);
                let mut record = self.entries[first].record.clone();
                record.absorb(&self.entries[second].record)?;
                record.absorb(&incoming)?;
                let kept = record.identity();
                let first_identity = self.entries[first].identity();
                let removed = if first_identity == kept {
                    self.entries[second].identity()
                } else {
                    first_identity
                };
                self.entries.remove(second);
                self.entries[first].record = record;
                Ok(ObserveOutcome::Merged { kept, removed })
            }
            // Entries never share an id with each other, and a snapshot has at
            // most two ids.
            _ => Err(ActivityError::State(format!(
                "snapshot matched {} tracked entries",
                matches.len()
            ))),
        }
    }

    pub fn get(&self, identity: &ActivityIdentity) -> Option<&TrackedActivity> {
        self.entries.iter().find(|entry| &entry.identity() == identity)
    }

    pub fn find_by_tx_hash(&self, tx_hash: &TxHash) -> Option<&TrackedActivity> {
        self.entries
            .iter()
            .find(|entry| entry.record.tx_hash() == Some(tx_hash))
    }

    pub fn forget(&mut self, identity: &ActivityIdentity) -> Option<TrackedActivity> {
        let idx = self
            .entries
            .iter()
            .position(|entry| &entry.identity() == identity)?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedActivity> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
