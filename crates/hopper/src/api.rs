//! Extension-facing facade and the engine that owns it.

use crate::custom::CustomWorkstationConfig;
use crate::custom_handler::CustomWorkstationHandler;
use crate::handler::HopperHandler;
use crate::manager::HopperManager;
use crate::registry::{CustomWorkstationRegistry, InventoryProvider, WorkstationRegistry};
use crate::safe_handler::SafeHopperHandler;
use crate::settings::HopperSettings;
use crate::transfer::TransferResult;
use crate::workstation::WorkstationConfig;
use recreator_core::{Block, BlockPos, ExtensionId, InventoryHandle, ItemStack, Material};
use recreator_integration::IntegrationManager;
use std::sync::Arc;
use tracing::{debug, info};

/// Owner of the built-in handlers.
pub const BUILTIN_EXTENSION: &str = "recreator";

/// Single registration and query surface for extensions.
///
/// Cloning shares the underlying registries and manager.
#[derive(Clone, Default)]
pub struct HopperApi {
    manager: Arc<HopperManager>,
    workstations: Arc<WorkstationRegistry>,
    custom: Arc<CustomWorkstationRegistry>,
}

impl HopperApi {
    /// Facade over existing registries and manager.
    pub fn new(
        manager: Arc<HopperManager>,
        workstations: Arc<WorkstationRegistry>,
        custom: Arc<CustomWorkstationRegistry>,
    ) -> Self {
        Self {
            manager,
            workstations,
            custom,
        }
    }

    // Custom workstations.

    /// Register a custom workstation, replacing any config with its id.
    pub fn register_custom_workstation(
        &self,
        owner: &ExtensionId,
        config: CustomWorkstationConfig,
    ) -> Arc<CustomWorkstationConfig> {
        self.custom.register(owner, config)
    }

    /// Remove the custom workstation `id` and its inventory provider.
    pub fn unregister_custom_workstation(&self, id: &str) -> bool {
        self.custom.unregister(id)
    }

    /// Resolve inventories of blocks matched by custom workstation `id`.
    pub fn register_custom_inventory_provider(
        &self,
        owner: &ExtensionId,
        id: &str,
        provider: InventoryProvider,
    ) {
        self.custom.register_provider(owner, id, provider);
    }

    /// Drop the provider for custom workstation `id`, if any.
    pub fn unregister_custom_inventory_provider(&self, id: &str) -> bool {
        self.custom.unregister_provider(id)
    }

    /// Resolve the inventory at `pos` for custom workstation routing.
    pub fn register_custom_location_inventory(
        &self,
        owner: &ExtensionId,
        pos: BlockPos,
        provider: InventoryProvider,
    ) {
        self.custom.register_location_provider(owner, pos, provider);
    }

    /// Drop the custom location provider at `pos`, if any.
    pub fn unregister_custom_location(&self, pos: BlockPos) -> bool {
        self.custom.unregister_location(pos)
    }

    /// First enabled custom workstation claiming the block's material.
    pub fn custom_workstation_config(&self, block: &Block) -> Option<Arc<CustomWorkstationConfig>> {
        self.custom.config_for(block)
    }

    /// Custom workstation by id, enabled or not.
    pub fn custom_workstation_config_by_id(&self, id: &str) -> Option<Arc<CustomWorkstationConfig>> {
        self.custom.config(id)
    }

    /// Whether an enabled custom workstation claims the block.
    pub fn is_custom_workstation(&self, block: &Block) -> bool {
        self.custom.is_workstation(block)
    }

    // Simple workstations.

    /// Register a simple workstation, replacing any config with its id.
    pub fn register_workstation(
        &self,
        owner: &ExtensionId,
        config: WorkstationConfig,
    ) -> Arc<WorkstationConfig> {
        self.workstations.register(owner, config)
    }

    /// Remove the workstation `id` and its inventory provider.
    pub fn unregister_workstation(&self, id: &str) -> bool {
        self.workstations.unregister(id)
    }

    /// Resolve inventories of blocks matched by workstation `id`.
    pub fn register_inventory_provider(
        &self,
        owner: &ExtensionId,
        id: &str,
        provider: InventoryProvider,
    ) {
        self.workstations.register_provider(owner, id, provider);
    }

    /// Drop the provider for workstation `id`, if any.
    pub fn unregister_inventory_provider(&self, id: &str) -> bool {
        self.workstations.unregister_provider(id)
    }

    /// Resolve the inventory at `pos` for simple workstation routing.
    pub fn register_location_inventory(
        &self,
        owner: &ExtensionId,
        pos: BlockPos,
        provider: InventoryProvider,
    ) {
        self.workstations.register_location_provider(owner, pos, provider);
    }

    /// Drop location providers at `pos` from both registries.
    pub fn unregister_location(&self, pos: BlockPos) -> bool {
        let simple = self.workstations.unregister_location(pos);
        let custom = self.custom.unregister_location(pos);
        simple || custom
    }

    /// First enabled simple workstation claiming the block's material.
    pub fn workstation_config(&self, block: &Block) -> Option<Arc<WorkstationConfig>> {
        self.workstations.config_for(block)
    }

    /// Simple workstation by id, enabled or not.
    pub fn workstation_config_by_id(&self, id: &str) -> Option<Arc<WorkstationConfig>> {
        self.workstations.config(id)
    }

    /// Whether an enabled simple workstation claims the block.
    pub fn is_workstation(&self, block: &Block) -> bool {
        self.workstations.is_workstation(block)
    }

    /// Live inventory for `block`, preferring a custom workstation match.
    pub fn workstation_inventory(&self, block: &Block) -> Option<InventoryHandle> {
        if let Some(config) = self.custom.config_for(block) {
            return self.custom.inventory_for(block, Some(&*config));
        }
        let config = self.workstations.config_for(block);
        self.workstations.inventory_for(block, config.as_deref())
    }

    // Handlers.

    /// Candidate handler for blocks of `material`, after earlier ones.
    pub fn register_material_handler(
        &self,
        owner: &ExtensionId,
        material: Material,
        handler: Arc<dyn HopperHandler>,
    ) {
        self.manager.register_material_handler(owner, material, handler);
    }

    /// Drop the handlers `owner` registered for `material`.
    pub fn unregister_material_handler(&self, owner: &ExtensionId, material: &Material) -> usize {
        self.manager.unregister_material_handler(owner, material)
    }

    /// Handler for the block at exactly `pos`, replacing any previous one.
    pub fn register_location_handler(
        &self,
        owner: &ExtensionId,
        pos: BlockPos,
        handler: Arc<dyn HopperHandler>,
    ) {
        self.manager.register_location_handler(owner, pos, handler);
    }

    /// Fallback consulted after location and material handlers.
    pub fn register_global_handler(&self, owner: &ExtensionId, handler: Arc<dyn HopperHandler>) {
        self.manager.register_global_handler(owner, handler);
    }

    /// Drop the handler at `pos`, if any.
    pub fn unregister_location_handler(&self, pos: BlockPos) -> bool {
        self.manager.unregister_location(pos)
    }

    /// Handler responsible for `block`, if any.
    pub fn handler_for(&self, block: &Block) -> Option<Arc<dyn HopperHandler>> {
        self.manager.handler_for(block)
    }

    // Hopper settings.

    /// Override the behavior of the hopper at `hopper`.
    pub fn set_hopper_settings(&self, owner: &ExtensionId, hopper: BlockPos, settings: HopperSettings) {
        self.manager.set_hopper_settings(owner, hopper, settings);
    }

    /// Settings for the hopper at `hopper`, or defaults.
    pub fn hopper_settings(&self, hopper: BlockPos) -> HopperSettings {
        self.manager.hopper_settings(hopper)
    }

    /// Revert the hopper at `hopper` to defaults.
    pub fn remove_hopper_settings(&self, hopper: BlockPos) -> bool {
        self.manager.remove_hopper_settings(hopper)
    }

    /// Remove everything `owner` registered. Call when the extension unloads.
    pub fn unregister_all(&self, owner: &ExtensionId) {
        self.manager.unregister_all(owner);
        let simple = self.workstations.unregister_all(owner);
        let custom = self.custom.unregister_all(owner);
        info!(owner = %owner, simple, custom, "extension unregistered");
    }

    /// Handler manager shared by this facade.
    pub fn manager(&self) -> &Arc<HopperManager> {
        &self.manager
    }

    /// Simple workstation registry shared by this facade.
    pub fn workstation_registry(&self) -> &Arc<WorkstationRegistry> {
        &self.workstations
    }

    /// Custom workstation registry shared by this facade.
    pub fn custom_workstation_registry(&self) -> &Arc<CustomWorkstationRegistry> {
        &self.custom
    }
}

/// Owns one registry pair, one manager and the integrations, and drives
/// transfer attempts through them.
///
/// Engines are independent of each other; tests build one per case.
pub struct HopperEngine {
    api: HopperApi,
    integrations: IntegrationManager,
}

impl Default for HopperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HopperEngine {
    /// Engine with the built-in custom and simple handlers registered as
    /// global fallbacks, in that order.
    pub fn new() -> Self {
        let api = HopperApi::default();
        let builtin = ExtensionId::new(BUILTIN_EXTENSION);
        api.register_global_handler(
            &builtin,
            Arc::new(CustomWorkstationHandler::new(Arc::clone(
                api.custom_workstation_registry(),
            ))),
        );
        api.register_global_handler(
            &builtin,
            Arc::new(SafeHopperHandler::new(Arc::clone(api.workstation_registry()))),
        );
        Self {
            api,
            integrations: IntegrationManager::new(),
        }
    }

    /// Registration surface.
    pub fn api(&self) -> &HopperApi {
        &self.api
    }

    /// Loaded integrations.
    pub fn integrations(&self) -> &IntegrationManager {
        &self.integrations
    }

    /// The hopper at `hopper` tries to move one unit of `item` into `target`.
    pub fn push(&self, hopper: &Block, target: &Block, item: &ItemStack) -> TransferResult {
        let Some(handler) = self.api.handler_for(target) else {
            return TransferResult::pass_through();
        };
        let settings = self.api.hopper_settings(hopper.pos());
        if !settings.is_enabled() || !settings.push_enabled() || !settings.passes_filter(item) {
            debug!(hopper = %hopper.pos(), item = %item.material, "push denied by hopper settings");
            return TransferResult::denied();
        }
        let result = handler.on_hopper_push(target, item, hopper);
        debug!(
            hopper = %hopper.pos(),
            target = %target.pos(),
            handler = handler.name(),
            status = ?result.status(),
            "push"
        );
        result
    }

    /// The hopper at `hopper` tries to take one unit out of `source`.
    pub fn pull(&self, hopper: &Block, source: &Block) -> TransferResult {
        let Some(handler) = self.api.handler_for(source) else {
            return TransferResult::pass_through();
        };
        let settings = self.api.hopper_settings(hopper.pos());
        if !settings.is_enabled() || !settings.pull_enabled() {
            debug!(hopper = %hopper.pos(), "pull denied by hopper settings");
            return TransferResult::denied();
        }
        let result = handler.on_hopper_pull(source, hopper);
        debug!(
            hopper = %hopper.pos(),
            source = %source.pos(),
            handler = handler.name(),
            status = ?result.status(),
            "pull"
        );
        result
    }

    /// Clear every registry and unload integrations.
    pub fn shutdown(&self) {
        self.api.manager().clear();
        self.api.workstation_registry().clear();
        self.api.custom_workstation_registry().clear();
        self.integrations.unload_all();
        info!("hopper engine shut down");
    }
}
