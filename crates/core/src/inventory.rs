//! Slot-addressed inventories owned by the world.
//!
//! The routing engine never owns inventory contents. It receives an
//! [`InventoryHandle`] for the duration of a single transfer, locks it, mutates
//! at most one slot and lets it go.

use crate::item::ItemStack;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to a live inventory supplied by the world.
pub type InventoryHandle = Arc<Mutex<dyn Inventory>>;

/// Slot storage the hopper engine can read and mutate.
pub trait Inventory: Send {
    /// Number of addressable slots.
    fn size(&self) -> usize;

    /// Stack in `slot`, or `None` when empty or out of range.
    fn item(&self, slot: usize) -> Option<&ItemStack>;

    /// Mutable stack in `slot`, or `None` when empty or out of range.
    fn item_mut(&mut self, slot: usize) -> Option<&mut ItemStack>;

    /// Replace the contents of `slot`. Returns false when out of range.
    fn set_item(&mut self, slot: usize, stack: Option<ItemStack>) -> bool;

    /// True when `slot` holds no items.
    fn is_slot_empty(&self, slot: usize) -> bool {
        self.item(slot).map_or(true, ItemStack::is_empty)
    }
}

/// Fixed-size inventory backed by a vector of optional stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotInventory {
    slots: Vec<Option<ItemStack>>,
}

impl SlotInventory {
    /// Create an empty inventory with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Wrap this inventory into a shareable handle.
    pub fn into_handle(self) -> InventoryHandle {
        Arc::new(Mutex::new(self))
    }

    /// Total number of items across every slot.
    pub fn total_count(&self) -> u64 {
        self.slots
            .iter()
            .flatten()
            .map(|stack| u64::from(stack.count))
            .sum()
    }

    /// Iterate over `(slot, stack)` for occupied slots.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|stack| (idx, stack)))
    }
}

impl Inventory for SlotInventory {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    fn item_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot)?.as_mut()
    }

    fn set_item(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(existing) => {
                *existing = stack;
                true
            }
            None => false,
        }
    }
}
