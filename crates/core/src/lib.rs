#![warn(missing_docs)]
//! Core primitives shared across the workspace: materials, item stacks,
//! inventories, block references and extension identity.

pub mod block;
pub mod inventory;
pub mod item;
pub mod material;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use block::{Block, BlockPos, DimensionId};
pub use inventory::{Inventory, InventoryHandle, SlotInventory};
pub use item::ItemStack;
pub use material::{KeyError, Material, DEFAULT_MAX_STACK, DEFAULT_NAMESPACE};

/// Identity of an extension that registers configurations and handlers.
///
/// Ownership is only used to remove everything an extension registered when it
/// unloads. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionId(Arc<str>);

impl ExtensionId {
    /// Create an identity from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Extension name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExtensionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
