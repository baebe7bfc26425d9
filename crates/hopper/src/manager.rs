//! Handler resolution and per-hopper settings.

use crate::handler::HopperHandler;
use crate::settings::HopperSettings;
use dashmap::DashMap;
use parking_lot::RwLock;
use recreator_core::{Block, BlockPos, ExtensionId, Material};
use std::sync::Arc;
use tracing::{debug, info};

/// A handler together with the extension that registered it.
#[derive(Clone)]
pub struct RegisteredHandler {
    owner: ExtensionId,
    handler: Arc<dyn HopperHandler>,
}

impl RegisteredHandler {
    /// Pair `handler` with the extension that owns it.
    pub fn new(owner: ExtensionId, handler: Arc<dyn HopperHandler>) -> Self {
        Self { owner, handler }
    }

    /// Extension that registered the handler.
    pub fn owner(&self) -> &ExtensionId {
        &self.owner
    }

    /// The handler itself.
    pub fn handler(&self) -> &Arc<dyn HopperHandler> {
        &self.handler
    }
}

#[derive(Clone)]
struct OwnedSettings {
    owner: ExtensionId,
    settings: HopperSettings,
}

/// Picks the one handler responsible for a block.
///
/// Resolution order is exact position, then material (registration order),
/// then global (registration order). Every candidate must also report
/// `can_handle` for the block. Candidate lists are copied out of the maps
/// before any handler is consulted.
#[derive(Default)]
pub struct HopperManager {
    by_location: DashMap<BlockPos, RegisteredHandler>,
    by_material: DashMap<Material, Vec<RegisteredHandler>>,
    global: RwLock<Vec<RegisteredHandler>>,
    settings: DashMap<BlockPos, OwnedSettings>,
}

impl HopperManager {
    /// Manager with no handlers and no settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the candidates for blocks of `material`.
    pub fn register_material_handler(
        &self,
        owner: &ExtensionId,
        material: Material,
        handler: Arc<dyn HopperHandler>,
    ) {
        info!(owner = %owner, %material, handler = handler.name(), "registered material handler");
        self.by_material
            .entry(material)
            .or_default()
            .push(RegisteredHandler::new(owner.clone(), handler));
    }

    /// Replaces any handler already registered at `pos`.
    pub fn register_location_handler(
        &self,
        owner: &ExtensionId,
        pos: BlockPos,
        handler: Arc<dyn HopperHandler>,
    ) {
        info!(owner = %owner, %pos, handler = handler.name(), "registered location handler");
        self.by_location
            .insert(pos, RegisteredHandler::new(owner.clone(), handler));
    }

    /// Append a fallback consulted for every block.
    pub fn register_global_handler(&self, owner: &ExtensionId, handler: Arc<dyn HopperHandler>) {
        info!(owner = %owner, handler = handler.name(), "registered global handler");
        self.global
            .write()
            .push(RegisteredHandler::new(owner.clone(), handler));
    }

    /// Drop the handler at `pos`, if any.
    pub fn unregister_location(&self, pos: BlockPos) -> bool {
        self.by_location.remove(&pos).is_some()
    }

    /// Drop the handlers `owner` registered for `material`. Returns how many
    /// were removed.
    pub fn unregister_material_handler(&self, owner: &ExtensionId, material: &Material) -> usize {
        let removed = match self.by_material.get_mut(material) {
            Some(mut bucket) => {
                let before = bucket.len();
                bucket.retain(|entry| &entry.owner != owner);
                before - bucket.len()
            }
            None => 0,
        };
        self.by_material
            .remove_if(material, |_, bucket| bucket.is_empty());

        if removed > 0 {
            info!(owner = %owner, %material, removed, "unregistered material handlers");
        }
        removed
    }

    /// Remove every handler and hopper setting owned by `owner`.
    pub fn unregister_all(&self, owner: &ExtensionId) {
        let owned = |entry: &RegisteredHandler| &entry.owner == owner;

        self.by_location.retain(|_, entry| !owned(&*entry));
        self.by_material.retain(|_, bucket| {
            bucket.retain(|entry| !owned(entry));
            !bucket.is_empty()
        });
        self.global.write().retain(|entry| !owned(entry));
        self.settings.retain(|_, entry| &entry.owner != owner);

        info!(owner = %owner, "unregistered hopper handlers");
    }

    /// Handler responsible for `block`, if any.
    pub fn handler_for(&self, block: &Block) -> Option<Arc<dyn HopperHandler>> {
        let at_location = self
            .by_location
            .get(&block.pos())
            .map(|entry| Arc::clone(&entry.handler));
        if let Some(handler) = at_location.filter(|h| h.can_handle(block)) {
            debug!(pos = %block.pos(), handler = handler.name(), "resolved location handler");
            return Some(handler);
        }

        let by_material: Vec<Arc<dyn HopperHandler>> = self
            .by_material
            .get(block.material())
            .map(|bucket| bucket.iter().map(|e| Arc::clone(&e.handler)).collect())
            .unwrap_or_default();
        if let Some(handler) = by_material.into_iter().find(|h| h.can_handle(block)) {
            debug!(pos = %block.pos(), handler = handler.name(), "resolved material handler");
            return Some(handler);
        }

        let global: Vec<Arc<dyn HopperHandler>> = self
            .global
            .read()
            .iter()
            .map(|e| Arc::clone(&e.handler))
            .collect();
        let handler = global.into_iter().find(|h| h.can_handle(block));
        if let Some(handler) = &handler {
            debug!(pos = %block.pos(), handler = handler.name(), "resolved global handler");
        }
        handler
    }

    /// Whether any handler claims `block`.
    pub fn has_handler(&self, block: &Block) -> bool {
        self.handler_for(block).is_some()
    }

    /// Replace the settings of the hopper at `pos`.
    pub fn set_hopper_settings(&self, owner: &ExtensionId, pos: BlockPos, settings: HopperSettings) {
        self.settings.insert(
            pos,
            OwnedSettings {
                owner: owner.clone(),
                settings,
            },
        );
    }

    /// Settings for the hopper at `pos`, or vanilla defaults.
    pub fn hopper_settings(&self, pos: BlockPos) -> HopperSettings {
        self.settings
            .get(&pos)
            .map(|entry| entry.settings.clone())
            .unwrap_or_default()
    }

    /// Revert the hopper at `pos` to defaults.
    pub fn remove_hopper_settings(&self, pos: BlockPos) -> bool {
        self.settings.remove(&pos).is_some()
    }

    /// Total number of registered handlers across all indexes.
    pub fn handler_count(&self) -> usize {
        let by_material: usize = self.by_material.iter().map(|e| e.value().len()).sum();
        self.by_location.len() + by_material + self.global.read().len()
    }

    /// Drop every handler and setting.
    pub fn clear(&self) {
        self.by_location.clear();
        self.by_material.clear();
        self.global.write().clear();
        self.settings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferResult;
    use recreator_core::ItemStack;

    struct Named {
        name: &'static str,
        claims: bool,
    }

    impl HopperHandler for Named {
        fn on_hopper_push(&self, _: &Block, _: &ItemStack, _: &Block) -> TransferResult {
            TransferResult::denied()
        }

        fn on_hopper_pull(&self, _: &Block, _: &Block) -> TransferResult {
            TransferResult::empty()
        }

        fn can_handle(&self, _: &Block) -> bool {
            self.claims
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn named(name: &'static str, claims: bool) -> Arc<dyn HopperHandler> {
        Arc::new(Named { name, claims })
    }

    fn chest() -> Block {
        Block::new(BlockPos::new(1, 2, 3), Material::vanilla("chest"))
    }

    #[test]
    fn location_beats_material_beats_global() {
        let manager = HopperManager::new();
        let ext = ExtensionId::new("ext");
        manager.register_global_handler(&ext, named("global", true));
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "global");

        manager.register_material_handler(&ext, Material::vanilla("chest"), named("material", true));
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "material");

        manager.register_location_handler(&ext, chest().pos(), named("location", true));
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "location");
    }

    #[test]
    fn declining_candidates_fall_through() {
        let manager = HopperManager::new();
        let ext = ExtensionId::new("ext");
        manager.register_location_handler(&ext, chest().pos(), named("location", false));
        manager.register_material_handler(&ext, Material::vanilla("chest"), named("m1", false));
        manager.register_material_handler(&ext, Material::vanilla("chest"), named("m2", true));
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "m2");

        let other = HopperManager::new();
        other.register_global_handler(&ext, named("g1", false));
        assert!(!other.has_handler(&chest()));
    }

    #[test]
    fn location_registration_replaces() {
        let manager = HopperManager::new();
        let ext = ExtensionId::new("ext");
        manager.register_location_handler(&ext, chest().pos(), named("old", true));
        manager.register_location_handler(&ext, chest().pos(), named("new", true));
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "new");
        assert_eq!(manager.handler_count(), 1);
        assert!(manager.unregister_location(chest().pos()));
        assert!(!manager.has_handler(&chest()));
    }

    #[test]
    fn unregister_all_drops_owned_handlers_and_settings() {
        let manager = HopperManager::new();
        let ours = ExtensionId::new("ours");
        let theirs = ExtensionId::new("theirs");
        manager.register_material_handler(&ours, Material::vanilla("chest"), named("a", true));
        manager.register_location_handler(&ours, BlockPos::new(0, 0, 0), named("b", true));
        manager.register_global_handler(&theirs, named("c", true));
        manager.set_hopper_settings(
            &ours,
            BlockPos::new(5, 5, 5),
            HopperSettings::builder().push_enabled(false).build(),
        );
        manager.set_hopper_settings(
            &theirs,
            BlockPos::new(6, 5, 5),
            HopperSettings::builder().pull_enabled(false).build(),
        );

        manager.unregister_all(&ours);
        assert_eq!(manager.handler_count(), 1);
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "c");
        assert!(manager.hopper_settings(BlockPos::new(5, 5, 5)).push_enabled());
        assert!(!manager.hopper_settings(BlockPos::new(6, 5, 5)).pull_enabled());
    }

    #[test]
    fn settings_default_when_unset() {
        let manager = HopperManager::new();
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(manager.hopper_settings(pos).transfer_speed(), 8);
        manager.set_hopper_settings(
            &ExtensionId::new("ext"),
            pos,
            HopperSettings::builder().transfer_speed(2).build(),
        );
        assert_eq!(manager.hopper_settings(pos).transfer_speed(), 2);
        assert!(manager.remove_hopper_settings(pos));
        assert_eq!(manager.hopper_settings(pos).transfer_speed(), 8);
    }

    #[test]
    fn handlers_may_reenter_the_manager() {
        struct Reentrant(Arc<HopperManager>);

        impl HopperHandler for Reentrant {
            fn on_hopper_push(&self, _: &Block, _: &ItemStack, _: &Block) -> TransferResult {
                TransferResult::pass_through()
            }

            fn on_hopper_pull(&self, _: &Block, _: &Block) -> TransferResult {
                TransferResult::pass_through()
            }

            fn can_handle(&self, block: &Block) -> bool {
                self.0.unregister_all(&ExtensionId::new("ext"));
                block.material() == &Material::vanilla("chest")
            }
        }

        let manager = Arc::new(HopperManager::new());
        let ext = ExtensionId::new("ext");
        manager.register_material_handler(
            &ext,
            Material::vanilla("chest"),
            Arc::new(Reentrant(Arc::clone(&manager))),
        );
        assert!(manager.handler_for(&chest()).is_some());
        assert_eq!(manager.handler_count(), 0);
    }

    #[test]
    fn unregister_material_handler_is_scoped() {
        let manager = HopperManager::new();
        let ours = ExtensionId::new("ours");
        let theirs = ExtensionId::new("theirs");
        let chest_material = Material::vanilla("chest");
        manager.register_material_handler(&ours, chest_material.clone(), named("a", true));
        manager.register_material_handler(&theirs, chest_material.clone(), named("b", true));
        manager.register_material_handler(&ours, chest_material.clone(), named("c", true));

        assert_eq!(manager.unregister_material_handler(&ours, &chest_material), 2);
        assert_eq!(manager.handler_for(&chest()).unwrap().name(), "b");
        assert_eq!(manager.unregister_material_handler(&ours, &chest_material), 0);

        assert_eq!(manager.unregister_material_handler(&theirs, &chest_material), 1);
        assert!(manager.by_material.get(&chest_material).is_none());
        assert_eq!(manager.handler_count(), 0);
    }
}
