//! Registries binding block materials to workstation configurations and
//! blocks to live inventories.

use crate::custom::CustomWorkstationConfig;
use crate::workstation::WorkstationConfig;
use dashmap::DashMap;
use parking_lot::Mutex;
use recreator_core::{Block, BlockPos, ExtensionId, InventoryHandle, Material};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves the live inventory backing a block.
pub type InventoryProvider = Arc<dyn Fn(&Block) -> Option<InventoryHandle> + Send + Sync>;

/// Wrap a closure as an [`InventoryProvider`].
pub fn provider<F>(resolve: F) -> InventoryProvider
where
    F: Fn(&Block) -> Option<InventoryHandle> + Send + Sync + 'static,
{
    Arc::new(resolve)
}

/// What a registry needs to know about a configuration.
pub trait WorkstationDefinition: Send + Sync + 'static {
    /// Label used in log lines.
    const KIND: &'static str;

    /// Unique id within the registry.
    fn id(&self) -> &str;
    /// Block materials the configuration claims.
    fn materials(&self) -> &HashSet<Material>;
    /// Disabled configurations stay registered but are skipped by lookups.
    fn is_enabled(&self) -> bool;
}

impl WorkstationDefinition for WorkstationConfig {
    const KIND: &'static str = "workstation";

    fn id(&self) -> &str {
        WorkstationConfig::id(self)
    }

    fn materials(&self) -> &HashSet<Material> {
        WorkstationConfig::materials(self)
    }

    fn is_enabled(&self) -> bool {
        WorkstationConfig::is_enabled(self)
    }
}

impl WorkstationDefinition for CustomWorkstationConfig {
    const KIND: &'static str = "custom workstation";

    fn id(&self) -> &str {
        CustomWorkstationConfig::id(self)
    }

    fn materials(&self) -> &HashSet<Material> {
        CustomWorkstationConfig::materials(self)
    }

    fn is_enabled(&self) -> bool {
        CustomWorkstationConfig::is_enabled(self)
    }
}

/// Registry of simple workstations.
pub type WorkstationRegistry = ConfigRegistry<WorkstationConfig>;
/// Registry of custom workstations.
pub type CustomWorkstationRegistry = ConfigRegistry<CustomWorkstationConfig>;

struct OwnedProvider {
    owner: ExtensionId,
    provider: InventoryProvider,
}

/// Concurrent registry of one kind of workstation configuration.
///
/// Configurations are indexed by id and by every material they declare, in
/// registration order. Inventory providers are keyed by config id or by
/// exact block position; the position always wins.
///
/// Lookups never block. Writers are serialized so that replacing a config
/// and re-indexing its materials happen as one step.
pub struct ConfigRegistry<C> {
    by_id: DashMap<String, Arc<C>>,
    by_material: DashMap<Material, Vec<Arc<C>>>,
    owners: DashMap<String, ExtensionId>,
    id_providers: DashMap<String, OwnedProvider>,
    location_providers: DashMap<BlockPos, OwnedProvider>,
    writes: Mutex<()>,
}

impl<C> Default for ConfigRegistry<C> {
    fn default() -> Self {
        Self {
            by_id: DashMap::new(),
            by_material: DashMap::new(),
            owners: DashMap::new(),
            id_providers: DashMap::new(),
            location_providers: DashMap::new(),
            writes: Mutex::new(()),
        }
    }
}

impl<C: WorkstationDefinition> ConfigRegistry<C> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `config` for `owner` and return the shared handle.
    ///
    /// An existing config with the same id is replaced and pruned from every
    /// material index first.
    pub fn register(&self, owner: &ExtensionId, config: C) -> Arc<C> {
        let config = Arc::new(config);
        let id = config.id().to_string();

        let _writes = self.writes.lock();
        if let Some(previous) = self.by_id.insert(id.clone(), Arc::clone(&config)) {
            warn!(kind = C::KIND, %id, "replacing existing registration");
            self.unindex(&previous);
        }
        self.owners.insert(id.clone(), owner.clone());

        for material in config.materials() {
            self.by_material
                .entry(material.clone())
                .or_default()
                .push(Arc::clone(&config));
        }

        info!(kind = C::KIND, %id, owner = %owner, "registered");
        config
    }

    /// Caller holds `writes`.
    fn unindex(&self, config: &Arc<C>) {
        for material in config.materials() {
            if let Some(mut bucket) = self.by_material.get_mut(material) {
                bucket.retain(|existing| !Arc::ptr_eq(existing, config));
            }
            self.by_material
                .remove_if(material, |_, bucket| bucket.is_empty());
        }
    }

    /// Caller holds `writes`.
    fn remove_config(&self, id: &str) -> bool {
        self.owners.remove(id);
        self.id_providers.remove(id);
        match self.by_id.remove(id) {
            Some((_, config)) => {
                self.unindex(&config);
                true
            }
            None => false,
        }
    }

    /// Remove the configuration `id` along with its id provider.
    pub fn unregister(&self, id: &str) -> bool {
        let _writes = self.writes.lock();
        let removed = self.remove_config(id);
        if removed {
            info!(kind = C::KIND, %id, "unregistered");
        }
        removed
    }

    /// Resolve inventories for every block whose config is `id`.
    pub fn register_provider(
        &self,
        owner: &ExtensionId,
        id: impl Into<String>,
        provider: InventoryProvider,
    ) {
        let id = id.into();
        let _writes = self.writes.lock();
        debug!(kind = C::KIND, %id, owner = %owner, "provider registered");
        self.id_providers.insert(
            id,
            OwnedProvider {
                owner: owner.clone(),
                provider,
            },
        );
    }

    /// Drop the provider registered for config `id`, if any.
    pub fn unregister_provider(&self, id: &str) -> bool {
        let _writes = self.writes.lock();
        self.id_providers.remove(id).is_some()
    }

    /// Resolve the inventory of the block at exactly `pos`.
    pub fn register_location_provider(
        &self,
        owner: &ExtensionId,
        pos: BlockPos,
        provider: InventoryProvider,
    ) {
        let _writes = self.writes.lock();
        debug!(kind = C::KIND, %pos, owner = %owner, "location provider registered");
        self.location_providers.insert(
            pos,
            OwnedProvider {
                owner: owner.clone(),
                provider,
            },
        );
    }

    /// Drop the provider registered at `pos`, if any.
    pub fn unregister_location(&self, pos: BlockPos) -> bool {
        let _writes = self.writes.lock();
        self.location_providers.remove(&pos).is_some()
    }

    /// First enabled configuration for the block's material.
    pub fn config_for(&self, block: &Block) -> Option<Arc<C>> {
        let bucket = self.by_material.get(block.material())?;
        bucket.iter().find(|cfg| cfg.is_enabled()).cloned()
    }

    /// Configuration by id, enabled or not.
    pub fn config(&self, id: &str) -> Option<Arc<C>> {
        self.by_id.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Live inventory for `block`: location provider, then the provider for
    /// `config`, then the block's own inventory.
    pub fn inventory_for(&self, block: &Block, config: Option<&C>) -> Option<InventoryHandle> {
        let location = self
            .location_providers
            .get(&block.pos())
            .map(|entry| Arc::clone(&entry.provider));
        if let Some(provider) = location {
            return provider(block);
        }

        let by_id = config.and_then(|cfg| {
            self.id_providers
                .get(cfg.id())
                .map(|entry| Arc::clone(&entry.provider))
        });
        if let Some(provider) = by_id {
            return provider(block);
        }

        block.intrinsic_inventory()
    }

    /// Whether an enabled configuration claims the block's material.
    pub fn is_workstation(&self, block: &Block) -> bool {
        self.config_for(block).is_some()
    }

    /// Whether a provider, rather than the block itself, would resolve the
    /// block's inventory.
    pub fn has_custom_provider(&self, block: &Block) -> bool {
        if self.location_providers.contains_key(&block.pos()) {
            return true;
        }
        self.config_for(block)
            .is_some_and(|cfg| self.id_providers.contains_key(cfg.id()))
    }

    /// Remove every configuration and provider registered by `owner`, plus
    /// the id providers of the removed configurations. Returns the number of
    /// configurations removed.
    pub fn unregister_all(&self, owner: &ExtensionId) -> usize {
        let _writes = self.writes.lock();
        let ids: Vec<String> = self
            .owners
            .iter()
            .filter(|entry| entry.value() == owner)
            .map(|entry| entry.key().clone())
            .collect();

        for id in &ids {
            self.remove_config(id);
        }

        let before = self.id_providers.len() + self.location_providers.len();
        self.id_providers.retain(|_, entry| &entry.owner != owner);
        self.location_providers.retain(|_, entry| &entry.owner != owner);
        let providers = before - self.id_providers.len() - self.location_providers.len();

        if !ids.is_empty() || providers > 0 {
            info!(kind = C::KIND, owner = %owner, removed = ids.len(), providers, "unregistered");
        }
        ids.len()
    }

    /// Ids of every registered configuration, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.by_id.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Materials that currently have at least one configuration indexed.
    pub fn indexed_materials(&self) -> Vec<Material> {
        self.by_material.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of index entries for `material`, enabled or not.
    pub fn indexed_count(&self, material: &Material) -> usize {
        self.by_material.get(material).map_or(0, |bucket| bucket.len())
    }

    /// Drop every configuration and provider.
    pub fn clear(&self) {
        let _writes = self.writes.lock();
        self.by_id.clear();
        self.by_material.clear();
        self.owners.clear();
        self.id_providers.clear();
        self.location_providers.clear();
    }
}
