//! Block identity as seen by the routing engine.

use crate::inventory::InventoryHandle;
use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension a block lives in.
///
/// Positions in different dimensions never collide as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DimensionId {
    /// The Overworld dimension.
    Overworld = 0,
    /// The Nether dimension.
    Nether = 1,
    /// The End dimension.
    End = 2,
}

impl DimensionId {
    /// Canonical string key used in configs/logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::End => "end",
        }
    }
}

impl Default for DimensionId {
    fn default() -> Self {
        Self::Overworld
    }
}

/// Integer block coordinate, used as the key for location-scoped registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    /// Dimension of the coordinate.
    #[serde(default)]
    pub dimension: DimensionId,
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Overworld position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self {
            dimension: DimensionId::Overworld,
            x,
            y,
            z,
        }
    }

    /// Position in an explicit dimension.
    pub const fn in_dimension(dimension: DimensionId, x: i32, y: i32, z: i32) -> Self {
        Self { dimension, x, y, z }
    }

    /// Position offset by the given deltas, in the same dimension.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            dimension: self.dimension,
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Position directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Position directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{},{},{}",
            self.dimension.as_str(),
            self.x,
            self.y,
            self.z
        )
    }
}

/// Snapshot of a block handed to the engine by the world.
///
/// The engine reads the material, keys maps by the position and may borrow
/// the block's own inventory for the duration of one call.
#[derive(Clone)]
pub struct Block {
    pos: BlockPos,
    material: Material,
    inventory: Option<InventoryHandle>,
}

impl Block {
    /// Block without an inventory of its own.
    pub fn new(pos: BlockPos, material: Material) -> Self {
        Self {
            pos,
            material,
            inventory: None,
        }
    }

    /// Block exposing its intrinsic inventory (chests, furnaces, ...).
    pub fn with_inventory(pos: BlockPos, material: Material, inventory: InventoryHandle) -> Self {
        Self {
            pos,
            material,
            inventory: Some(inventory),
        }
    }

    /// Block coordinate.
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Block type.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The block's own inventory, if the world exposes one.
    pub fn intrinsic_inventory(&self) -> Option<InventoryHandle> {
        self.inventory.clone()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("pos", &self.pos)
            .field("material", &self.material)
            .field("has_inventory", &self.inventory.is_some())
            .finish()
    }
}
