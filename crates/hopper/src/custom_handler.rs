use crate::custom::{CustomWorkstationConfig, SlotDefinition, SlotType};
use crate::handler::{place_one, take_one, HopperHandler};
use crate::registry::CustomWorkstationRegistry;
use crate::transfer::TransferResult;
use recreator_core::{Block, Inventory, ItemStack};
use std::sync::Arc;
use tracing::debug;

/// Handler for custom workstations with permissive input and fuel checks.
///
/// Pushes try input slots first and fuel slots second; the first slot that
/// takes the item wins.
pub struct CustomWorkstationHandler {
    registry: Arc<CustomWorkstationRegistry>,
}

impl CustomWorkstationHandler {
    /// Handler routing through `registry`.
    pub fn new(registry: Arc<CustomWorkstationRegistry>) -> Self {
        Self { registry }
    }

    fn resolve(&self, block: &Block) -> Option<Arc<CustomWorkstationConfig>> {
        self.registry
            .config_for(block)
            .filter(|cfg| cfg.is_enabled())
    }

    fn push_into<'a>(
        inventory: &mut dyn Inventory,
        slots: impl Iterator<Item = &'a SlotDefinition>,
        item: &ItemStack,
    ) -> Option<(ItemStack, usize)> {
        for def in slots {
            if def.slot() >= inventory.size() || !def.passes_filter(item) {
                continue;
            }
            if let Some(unit) = place_one(inventory, def.slot(), item) {
                return Some((unit, def.slot()));
            }
        }
        None
    }
}

impl HopperHandler for CustomWorkstationHandler {
    fn on_hopper_push(&self, target: &Block, item: &ItemStack, _hopper: &Block) -> TransferResult {
        let Some(config) = self.resolve(target) else {
            return TransferResult::pass_through();
        };
        let Some(inventory) = self.registry.inventory_for(target, Some(&*config)) else {
            return TransferResult::pass_through();
        };
        let mut inventory = inventory.lock();

        if config.can_accept_input(item) {
            let placed = Self::push_into(&mut *inventory, config.input_slots(), item);
            if let Some((unit, slot)) = placed {
                debug!(id = config.id(), slot, item = %item.material, "pushed input");
                return TransferResult::success(unit, slot);
            }
        }
        if config.can_accept_fuel(item) {
            let placed = Self::push_into(&mut *inventory, config.fuel_slots(), item);
            if let Some((unit, slot)) = placed {
                debug!(id = config.id(), slot, item = %item.material, "pushed fuel");
                return TransferResult::success(unit, slot);
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
        for def in config.output_slots() {
            if let Some(unit) = take_one(&mut *inventory, def.slot()) {
                debug!(id = config.id(), slot = def.slot(), item = %unit.material, "pulled");
                return TransferResult::success(unit, def.slot());
            }
        }
        TransferResult::empty()
    }

    fn can_handle(&self, block: &Block) -> bool {
        self.registry.is_workstation(block)
    }

    /// Input slots followed by fuel slots.
    fn input_slots(&self, block: &Block) -> Vec<usize> {
        self.resolve(block)
            .map(|cfg| {
                cfg.input_slots()
                    .chain(cfg.fuel_slots())
                    .map(SlotDefinition::slot)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn output_slots(&self, block: &Block) -> Vec<usize> {
        self.resolve(block)
            .map(|cfg| cfg.output_slots().map(SlotDefinition::slot).collect())
            .unwrap_or_default()
    }

    fn can_insert(&self, block: &Block, slot: usize, item: &ItemStack) -> bool {
        let Some(config) = self.resolve(block) else {
            return false;
        };
        match config.slot(slot).map(SlotDefinition::slot_type) {
            Some(SlotType::Input) => config.can_accept_input(item),
            Some(SlotType::Fuel) => config.can_accept_fuel(item),
            Some(SlotType::Storage) => true,
            _ => false,
        }
    }

    fn can_extract(&self, block: &Block, slot: usize) -> bool {
        self.resolve(block)
            .and_then(|cfg| cfg.slot(slot).map(SlotDefinition::allows_hopper_output))
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "custom"
    }
}
