use crate::handler::{place_one, take_one, HopperHandler};
use crate::registry::WorkstationRegistry;
use crate::transfer::TransferResult;
use crate::workstation::{SlotConfig, SlotFunction, WorkstationConfig};
use recreator_core::{Block, ItemStack};
use std::sync::Arc;
use tracing::{debug, trace};

/// Handler for simple workstations.
///
/// Moves exactly one unit per call; bulk transfer is the caller repeating
/// the attempt.
pub struct SafeHopperHandler {
    registry: Arc<WorkstationRegistry>,
}

impl SafeHopperHandler {
    /// Handler routing through `registry`.
    pub fn new(registry: Arc<WorkstationRegistry>) -> Self {
        Self { registry }
    }

    fn admits(slot: &SlotConfig, item: &ItemStack) -> bool {
        if slot.function() == SlotFunction::Fuel && !item.material.is_fuel() {
            return false;
        }
        slot.can_accept_material(&item.material)
    }

    fn resolve(&self, block: &Block) -> Option<Arc<WorkstationConfig>> {
        self.registry
            .config_for(block)
            .filter(|cfg| cfg.is_enabled())
    }
}

impl HopperHandler for SafeHopperHandler {
    fn on_hopper_push(&self, target: &Block, item: &ItemStack, _hopper: &Block) -> TransferResult {
        let Some(config) = self.resolve(target) else {
            return TransferResult::pass_through();
        };
        let Some(inventory) = self.registry.inventory_for(target, Some(&*config)) else {
            return TransferResult::pass_through();
        };
        if config.input_slots().next().is_none() {
            return TransferResult::denied();
        }

        let mut inventory = inventory.lock();
        for slot in config.input_slots() {
            let index = slot.slot();
            if index >= inventory.size() {
                trace!(id = config.id(), slot = index, "input slot out of bounds");
                continue;
            }
            if !Self::admits(slot, item) {
                continue;
            }
            if let Some(unit) = place_one(&mut *inventory, index, item) {
                debug!(id = config.id(), slot = index, item = %item.material, "pushed");
                return TransferResult::success(unit, index);
            }
        }
        TransferResult::no_space()
    }

    fn on_hopper_pull(&self, source: &Block, _hopper: &Block) -> TransferResult {
        let Some(config) = self.resolve(source) else {
            return TransferResult::pass_through();
        };
        let Some(inventory) = self.registry.inventory_for(source, Some(&*config)) else {
            return TransferResult::pass_through();
        };
        if config.output_slots().next().is_none() {
            return TransferResult::denied();
        }

        let mut inventory = inventory.lock();
        for slot in config.output_slots() {
            if let Some(unit) = take_one(&mut *inventory, slot.slot()) {
                debug!(id = config.id(), slot = slot.slot(), item = %unit.material, "pulled");
                return TransferResult::success(unit, slot.slot());
            }
        }
        TransferResult::empty()
    }

    fn can_handle(&self, block: &Block) -> bool {
        self.registry.is_workstation(block)
    }

    fn input_slots(&self, block: &Block) -> Vec<usize> {
        self.resolve(block)
            .map(|cfg| cfg.input_slots().map(SlotConfig::slot).collect())
            .unwrap_or_default()
    }

    fn output_slots(&self, block: &Block) -> Vec<usize> {
        self.resolve(block)
            .map(|cfg| cfg.output_slots().map(SlotConfig::slot).collect())
            .unwrap_or_default()
    }

    fn can_insert(&self, block: &Block, slot: usize, item: &ItemStack) -> bool {
        self.resolve(block)
            .and_then(|cfg| {
                cfg.slot(slot)
                    .map(|s| s.accepts_hopper_input() && Self::admits(s, item))
            })
            .unwrap_or(false)
    }

    fn can_extract(&self, block: &Block, slot: usize) -> bool {
        self.resolve(block)
            .and_then(|cfg| cfg.slot(slot).map(SlotConfig::allows_hopper_output))
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "safe"
    }
}
