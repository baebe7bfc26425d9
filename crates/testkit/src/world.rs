//! A tiny in-memory world: blocks at positions, some with inventories.

use anyhow::{anyhow, Result};
use recreator_core::{Block, BlockPos, Inventory, InventoryHandle, ItemStack, Material, SlotInventory};
use std::collections::BTreeMap;

/// Slots in a vanilla hopper.
pub const HOPPER_SLOTS: usize = 5;

/// Blocks keyed by position. Inventories are shared handles, so blocks
/// handed out by [`TestWorld::block`] observe later mutations.
#[derive(Default)]
pub struct TestWorld {
    blocks: BTreeMap<BlockPos, Block>,
}

impl TestWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a block without an inventory.
    pub fn place(&mut self, pos: BlockPos, material: Material) -> Block {
        let block = Block::new(pos, material);
        self.blocks.insert(pos, block.clone());
        block
    }

    /// Place a block owning a fresh inventory of `size` slots.
    pub fn place_container(&mut self, pos: BlockPos, material: Material, size: usize) -> Block {
        let block = Block::with_inventory(pos, material, SlotInventory::new(size).into_handle());
        self.blocks.insert(pos, block.clone());
        block
    }

    /// Place a hopper with the vanilla slot count.
    pub fn place_hopper(&mut self, pos: BlockPos) -> Block {
        self.place_container(pos, Material::vanilla("hopper"), HOPPER_SLOTS)
    }

    /// Block at `pos`, if placed.
    pub fn block(&self, pos: BlockPos) -> Option<Block> {
        self.blocks.get(&pos).cloned()
    }

    /// Inventory of the block at `pos`, if it has one.
    pub fn inventory(&self, pos: BlockPos) -> Option<InventoryHandle> {
        self.blocks.get(&pos)?.intrinsic_inventory()
    }

    fn require_inventory(&self, pos: BlockPos) -> Result<InventoryHandle> {
        self.inventory(pos)
            .ok_or_else(|| anyhow!("no inventory at {pos}"))
    }

    /// Overwrite `slot` of the block at `pos`.
    pub fn put(&self, pos: BlockPos, slot: usize, stack: ItemStack) -> Result<()> {
        let inventory = self.require_inventory(pos)?;
        if !inventory.lock().set_item(slot, Some(stack)) {
            return Err(anyhow!("slot {slot} out of range at {pos}"));
        }
        Ok(())
    }

    /// Add `stack` to the first slot at `pos` that can hold all of it, the way
    /// a hopper keeps what it pulled. Returns false when nothing fits.
    pub fn deposit(&self, pos: BlockPos, stack: &ItemStack) -> bool {
        let Some(inventory) = self.inventory(pos) else {
            return false;
        };
        let mut guard = inventory.lock();
        for slot in 0..guard.size() {
            if let Some(existing) = guard.item_mut(slot) {
                if existing.is_similar(stack)
                    && existing.count + stack.count <= existing.max_stack_size
                {
                    existing.count += stack.count;
                    return true;
                }
            }
        }
        match (0..guard.size()).find(|&slot| guard.is_slot_empty(slot)) {
            Some(slot) => guard.set_item(slot, Some(stack.clone())),
            None => false,
        }
    }

    /// Put `stack` back into `slot` at `pos`, merging with a similar stack.
    /// Returns false when the slot holds something else or would overflow.
    pub fn restore(&self, pos: BlockPos, slot: usize, stack: &ItemStack) -> bool {
        let Some(inventory) = self.inventory(pos) else {
            return false;
        };
        let mut guard = inventory.lock();
        if guard.is_slot_empty(slot) {
            return guard.set_item(slot, Some(stack.clone()));
        }
        match guard.item_mut(slot) {
            Some(existing)
                if existing.is_similar(stack)
                    && existing.count + stack.count <= existing.max_stack_size =>
            {
                existing.count += stack.count;
                true
            }
            _ => false,
        }
    }

    /// Copy of the stack in `slot` at `pos`.
    pub fn stack(&self, pos: BlockPos, slot: usize) -> Option<ItemStack> {
        let inventory = self.inventory(pos)?;
        let guard = inventory.lock();
        guard.item(slot).cloned()
    }

    /// Item count in `slot` at `pos`; zero when empty or missing.
    pub fn count(&self, pos: BlockPos, slot: usize) -> u32 {
        self.stack(pos, slot).map_or(0, |stack| stack.count)
    }

    /// Item count across every slot at `pos`.
    pub fn total(&self, pos: BlockPos) -> u64 {
        let Some(inventory) = self.inventory(pos) else {
            return 0;
        };
        let guard = inventory.lock();
        (0..guard.size())
            .filter_map(|slot| guard.item(slot))
            .map(|stack| u64::from(stack.count))
            .sum()
    }

    /// Positions of every placed block, ordered.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.blocks.keys().copied()
    }
}

/// Shorthand for a vanilla stack.
pub fn stack(path: &str, count: u32) -> ItemStack {
    ItemStack::new(Material::vanilla(path), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_share_inventory_state() {
        let mut world = TestWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        let chest = world.place_container(pos, Material::vanilla("chest"), 27);
        world.put(pos, 3, stack("dirt", 5)).unwrap();

        let handle = chest.intrinsic_inventory().unwrap();
        assert_eq!(handle.lock().item(3).unwrap().count, 5);
        assert_eq!(world.count(pos, 3), 5);
        assert_eq!(world.total(pos), 5);
    }

    #[test]
    fn put_reports_missing_targets() {
        let mut world = TestWorld::new();
        let stone = BlockPos::new(1, 0, 0);
        world.place(stone, Material::vanilla("stone"));
        assert!(world.put(stone, 0, stack("dirt", 1)).is_err());

        let hopper = BlockPos::new(2, 0, 0);
        world.place_hopper(hopper);
        assert!(world.put(hopper, HOPPER_SLOTS, stack("dirt", 1)).is_err());
        assert_eq!(world.positions().count(), 2);
        assert!(!world.deposit(stone, &stack("dirt", 1)));
    }

    #[test]
    fn deposit_stacks_before_taking_a_new_slot() {
        let mut world = TestWorld::new();
        let pos = BlockPos::new(0, 0, 0);
        world.place_hopper(pos);
        world.put(pos, 2, stack("dirt", 63)).unwrap();

        assert!(world.deposit(pos, &stack("dirt", 1)));
        assert_eq!(world.count(pos, 2), 64);
        assert!(world.deposit(pos, &stack("dirt", 1)));
        assert_eq!(world.count(pos, 0), 1);
        assert_eq!(world.total(pos), 65);
    }

    #[test]
    fn restore_merges_into_the_original_slot() {
        let mut world = TestWorld::new();
        let pos = BlockPos::new(0, 0, 0);
        world.place_container(pos, Material::vanilla("furnace"), 3);
        world.put(pos, 2, stack("iron_ingot", 3)).unwrap();

        assert!(world.restore(pos, 2, &stack("iron_ingot", 1)));
        assert_eq!(world.count(pos, 2), 4);
        assert!(world.restore(pos, 0, &stack("coal", 1)));
        assert_eq!(world.count(pos, 0), 1);
        assert!(!world.restore(pos, 2, &stack("coal", 1)));
        assert!(!world.restore(pos, 3, &stack("coal", 1)));
    }
}
