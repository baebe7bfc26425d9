//! The handler capability and the single-unit slot primitives every
//! built-in handler shares.

use crate::transfer::TransferResult;
use recreator_core::{Block, Inventory, ItemStack};

/// Decides hopper transfers for the blocks it claims.
///
/// Implementations are stored as trait objects by the hopper manager and may
/// be supplied by any extension.
pub trait HopperHandler: Send + Sync {
    /// A hopper tries to move `item` into `target`.
    fn on_hopper_push(&self, target: &Block, item: &ItemStack, hopper: &Block) -> TransferResult;

    /// A hopper tries to take one item out of `source`.
    fn on_hopper_pull(&self, source: &Block, hopper: &Block) -> TransferResult;

    /// Whether this handler wants to process `block` at all.
    fn can_handle(&self, block: &Block) -> bool;

    /// Slots that receive pushes.
    fn input_slots(&self, _block: &Block) -> Vec<usize> {
        Vec::new()
    }

    /// Slots that yield to pulls.
    fn output_slots(&self, _block: &Block) -> Vec<usize> {
        Vec::new()
    }

    /// Whether a push of `item` into `slot` would be admitted.
    fn can_insert(&self, _block: &Block, _slot: usize, _item: &ItemStack) -> bool {
        false
    }

    /// Whether a pull from `slot` would be allowed.
    fn can_extract(&self, _block: &Block, _slot: usize) -> bool {
        false
    }

    /// Short label for log lines.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Put one unit of `item` into `slot`.
///
/// An empty slot receives a one-unit copy; a slot holding a similar,
/// non-full stack grows by one. Returns the unit placed, or `None` when the
/// slot cannot take it.
pub(crate) fn place_one(
    inventory: &mut dyn Inventory,
    slot: usize,
    item: &ItemStack,
) -> Option<ItemStack> {
    if slot >= inventory.size() {
        return None;
    }
    if inventory.is_slot_empty(slot) {
        let unit = item.single();
        inventory.set_item(slot, Some(unit.clone()));
        return Some(unit);
    }
    let existing = inventory.item_mut(slot)?;
    if existing.can_stack_with(item) {
        existing.count += 1;
        return Some(item.single());
    }
    None
}

/// Take one unit out of `slot`, clearing it when it reaches zero.
pub(crate) fn take_one(inventory: &mut dyn Inventory, slot: usize) -> Option<ItemStack> {
    if slot >= inventory.size() || inventory.is_slot_empty(slot) {
        return None;
    }
    let existing = inventory.item_mut(slot)?;
    let unit = existing.single();
    if existing.count <= 1 {
        inventory.set_item(slot, None);
    } else {
        existing.count -= 1;
    }
    Some(unit)
}
