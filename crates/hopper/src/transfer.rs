//! Outcome of a single push or pull attempt.

use recreator_core::ItemStack;
use serde::{Deserialize, Serialize};

/// What happened to a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// One unit moved.
    Success,
    /// The transfer was blocked by configuration or settings.
    Denied,
    /// No permitted slot had room for the item.
    NoSpace,
    /// Nothing to pull.
    Empty,
    /// The engine has no opinion; the world should run its default transfer.
    PassThrough,
}

/// Immutable result of one push/pull attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    status: TransferStatus,
    item: Option<ItemStack>,
    slot: Option<usize>,
}

impl TransferResult {
    /// One unit of `item` moved through `slot`.
    pub fn success(item: ItemStack, slot: usize) -> Self {
        Self {
            status: TransferStatus::Success,
            item: Some(item),
            slot: Some(slot),
        }
    }

    /// One unit of `item` moved, slot unknown to the handler.
    pub fn success_unslotted(item: ItemStack) -> Self {
        Self {
            status: TransferStatus::Success,
            item: Some(item),
            slot: None,
        }
    }

    /// Blocked by configuration.
    pub fn denied() -> Self {
        Self::bare(TransferStatus::Denied)
    }

    /// No permitted slot had room.
    pub fn no_space() -> Self {
        Self::bare(TransferStatus::NoSpace)
    }

    /// Nothing to pull.
    pub fn empty() -> Self {
        Self::bare(TransferStatus::Empty)
    }

    /// Defer to default world behavior.
    pub fn pass_through() -> Self {
        Self::bare(TransferStatus::PassThrough)
    }

    fn bare(status: TransferStatus) -> Self {
        Self {
            status,
            item: None,
            slot: None,
        }
    }

    /// Outcome category.
    pub fn status(&self) -> TransferStatus {
        self.status
    }

    /// The unit that moved, for successful results.
    pub fn item(&self) -> Option<&ItemStack> {
        self.item.as_ref()
    }

    /// Slot the unit moved into or out of, when known.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// Whether a unit moved.
    pub fn is_successful(&self) -> bool {
        self.status == TransferStatus::Success
    }

    /// Whether the world must suppress its default transfer.
    ///
    /// Every status except [`TransferStatus::PassThrough`] means the engine
    /// fully handled the attempt, including denials.
    pub fn should_cancel(&self) -> bool {
        self.status != TransferStatus::PassThrough
    }
}
