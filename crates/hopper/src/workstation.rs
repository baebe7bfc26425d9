//! Simple workstations: a fixed inventory with one function per slot.

use crate::error::ConfigError;
use recreator_core::Material;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default inventory size for workstations that do not declare one.
pub const DEFAULT_INVENTORY_SIZE: usize = 27;

/// Role a slot plays in a simple workstation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFunction {
    /// Receives items to process.
    Input,
    /// Holds results.
    Output,
    /// Receives fuel-capable items only.
    Fuel,
    /// General storage, both directions.
    Storage,
    /// Never touched by hoppers.
    Locked,
    /// Cosmetic slot, never touched by hoppers.
    Decoration,
}

impl SlotFunction {
    /// Whether a slot with this function receives hopper pushes by default.
    pub const fn accepts_hopper_input(self) -> bool {
        matches!(self, Self::Input | Self::Fuel | Self::Storage)
    }

    /// Whether a slot with this function yields items to hopper pulls by default.
    pub const fn allows_hopper_output(self) -> bool {
        matches!(self, Self::Output | Self::Storage)
    }
}

/// One slot of a [`WorkstationConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConfig {
    slot: usize,
    function: SlotFunction,
    accepts_hopper_input: bool,
    allows_hopper_output: bool,
    allowed_materials: Option<HashSet<Material>>,
    blocked_materials: HashSet<Material>,
}

impl SlotConfig {
    /// Slot with hopper flags derived from `function`.
    pub fn new(slot: usize, function: SlotFunction) -> Self {
        Self {
            slot,
            function,
            accepts_hopper_input: function.accepts_hopper_input(),
            allows_hopper_output: function.allows_hopper_output(),
            allowed_materials: None,
            blocked_materials: HashSet::new(),
        }
    }

    /// Restrict the slot to these materials. Repeated calls extend the set.
    pub fn allow<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.allowed_materials
            .get_or_insert_with(HashSet::new)
            .extend(materials);
        self
    }

    /// Reject these materials. Blocked wins over allowed.
    pub fn block<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.blocked_materials.extend(materials);
        self
    }

    /// Override the derived hopper-input flag.
    pub fn hopper_input(mut self, accepts: bool) -> Self {
        self.accepts_hopper_input = accepts;
        self
    }

    /// Override the derived hopper-output flag.
    pub fn hopper_output(mut self, allows: bool) -> Self {
        self.allows_hopper_output = allows;
        self
    }

    /// Inventory index.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Declared role.
    pub fn function(&self) -> SlotFunction {
        self.function
    }

    /// Whether hoppers may push into this slot.
    pub fn accepts_hopper_input(&self) -> bool {
        self.accepts_hopper_input
    }

    /// Whether hoppers may pull from this slot.
    pub fn allows_hopper_output(&self) -> bool {
        self.allows_hopper_output
    }

    /// Allow set, when one is declared.
    pub fn allowed_materials(&self) -> Option<&HashSet<Material>> {
        self.allowed_materials.as_ref()
    }

    /// Materials this slot rejects.
    pub fn blocked_materials(&self) -> &HashSet<Material> {
        &self.blocked_materials
    }

    /// Blocked wins; then allow-set membership when one is declared.
    pub fn can_accept_material(&self, material: &Material) -> bool {
        if self.blocked_materials.contains(material) {
            return false;
        }
        self.allowed_materials
            .as_ref()
            .map_or(true, |allowed| allowed.contains(material))
    }
}

/// Declarative description of a simple workstation.
///
/// Built through [`WorkstationConfig::builder`]; only `enabled` can change
/// after construction.
#[derive(Debug)]
pub struct WorkstationConfig {
    id: String,
    materials: HashSet<Material>,
    inventory_size: usize,
    slots: Vec<SlotConfig>,
    enabled: AtomicBool,
}

impl WorkstationConfig {
    /// Start a configuration with id `id`.
    pub fn builder(id: impl Into<String>) -> WorkstationConfigBuilder {
        WorkstationConfigBuilder::new(id)
    }

    /// Unique id within its registry.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Block materials this workstation claims.
    pub fn materials(&self) -> &HashSet<Material> {
        &self.materials
    }

    /// Whether the workstation claims `material`.
    pub fn applies_to(&self, material: &Material) -> bool {
        self.materials.contains(material)
    }

    /// Slot count of the backing inventory.
    pub fn inventory_size(&self) -> usize {
        self.inventory_size
    }

    /// All slots in declaration order.
    pub fn slots(&self) -> &[SlotConfig] {
        &self.slots
    }

    /// Configuration of slot `slot`, if declared.
    pub fn slot(&self, slot: usize) -> Option<&SlotConfig> {
        self.slots.iter().find(|cfg| cfg.slot == slot)
    }

    /// Slots that receive hopper pushes, in declaration order.
    pub fn input_slots(&self) -> impl Iterator<Item = &SlotConfig> {
        self.slots.iter().filter(|cfg| cfg.accepts_hopper_input)
    }

    /// Slots that yield to hopper pulls, in declaration order.
    pub fn output_slots(&self) -> impl Iterator<Item = &SlotConfig> {
        self.slots.iter().filter(|cfg| cfg.allows_hopper_output)
    }

    /// Disabled configs are skipped by material lookup.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Toggle without unregistering. Disabled configs are skipped by
    /// material lookup but stay reachable by id.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

/// Fluent assembly for [`WorkstationConfig`].
#[derive(Debug, Clone)]
pub struct WorkstationConfigBuilder {
    id: String,
    materials: HashSet<Material>,
    inventory_size: usize,
    slots: Vec<SlotConfig>,
    enabled: bool,
}

impl WorkstationConfigBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            materials: HashSet::new(),
            inventory_size: DEFAULT_INVENTORY_SIZE,
            slots: Vec::new(),
            enabled: true,
        }
    }

    /// Claim blocks of `material`.
    pub fn material(mut self, material: Material) -> Self {
        self.materials.insert(material);
        self
    }

    /// Claim blocks of every material in `materials`.
    pub fn materials<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.materials.extend(materials);
        self
    }

    /// Slot count of the backing inventory.
    pub fn inventory_size(mut self, size: usize) -> Self {
        self.inventory_size = size;
        self
    }

    /// Declare a slot. Re-declaring an index replaces the earlier entry in place.
    pub fn slot(mut self, slot: SlotConfig) -> Self {
        match self.slots.iter_mut().find(|cfg| cfg.slot == slot.slot) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
        self
    }

    /// Shorthand for an input slot.
    pub fn input_slot(self, slot: usize) -> Self {
        self.slot(SlotConfig::new(slot, SlotFunction::Input))
    }

    /// Shorthand for an output slot.
    pub fn output_slot(self, slot: usize) -> Self {
        self.slot(SlotConfig::new(slot, SlotFunction::Output))
    }

    /// Shorthand for a fuel slot.
    pub fn fuel_slot(self, slot: usize) -> Self {
        self.slot(SlotConfig::new(slot, SlotFunction::Fuel))
    }

    /// Shorthand for a storage slot.
    pub fn storage_slot(self, slot: usize) -> Self {
        self.slot(SlotConfig::new(slot, SlotFunction::Storage))
    }

    /// Initial enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<WorkstationConfig, ConfigError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.materials.is_empty() {
            return Err(ConfigError::NoMaterials { id });
        }
        Ok(WorkstationConfig {
            id,
            materials: self.materials,
            inventory_size: self.inventory_size,
            slots: self.slots,
            enabled: AtomicBool::new(self.enabled),
        })
    }
}
