//! Custom workstations with permissive recipe and fuel admission.
//!
//! A custom workstation admits anything that *could* take part in some
//! recipe. Exact input/fuel pairing is left to whatever processes the
//! workstation's contents, so the checks here are unions over the general
//! sets and every recipe group.

use crate::error::ConfigError;
use crate::filter::{FilterMode, SlotItemFilter};
use crate::workstation::DEFAULT_INVENTORY_SIZE;
use recreator_core::{ItemStack, Material};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Role of a slot in a custom workstation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// Receives items that could be a recipe input.
    Input,
    /// Receives fuel.
    Fuel,
    /// Drained by hoppers below; never filled by them.
    Output,
    /// Open to hoppers in both directions.
    Storage,
    /// Closed to hoppers.
    Locked,
}

impl SlotType {
    /// Whether hoppers may push into slots of this type.
    pub const fn accepts_hopper_input(self) -> bool {
        matches!(self, Self::Input | Self::Fuel | Self::Storage)
    }

    /// Whether hoppers may pull from slots of this type.
    pub const fn allows_hopper_output(self) -> bool {
        matches!(self, Self::Output | Self::Storage)
    }
}

/// A slot of a [`CustomWorkstationConfig`] and its optional admission filter.
#[derive(Debug, Clone)]
pub struct SlotDefinition {
    slot: usize,
    slot_type: SlotType,
    filter: Option<SlotItemFilter>,
}

impl SlotDefinition {
    /// Slot `slot` of type `slot_type`. A `None` filter admits everything.
    pub fn new(slot: usize, slot_type: SlotType, filter: Option<SlotItemFilter>) -> Self {
        Self {
            slot,
            slot_type,
            filter,
        }
    }

    /// Inventory index.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Declared role.
    pub fn slot_type(&self) -> SlotType {
        self.slot_type
    }

    /// Admission filter, if any.
    pub fn filter(&self) -> Option<&SlotItemFilter> {
        self.filter.as_ref()
    }

    /// Whether hoppers may push into this slot.
    pub fn accepts_hopper_input(&self) -> bool {
        self.slot_type.accepts_hopper_input()
    }

    /// Whether hoppers may pull from this slot.
    pub fn allows_hopper_output(&self) -> bool {
        self.slot_type.allows_hopper_output()
    }

    /// True when no filter is attached or the filter admits `item`.
    pub fn passes_filter(&self, item: &ItemStack) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter.test(item))
    }
}

/// Named pairing of inputs with the fuels that process them.
///
/// Used for admission only: an input listed here is accepted into any input
/// slot, and a fuel listed here into any fuel slot, independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeGroup {
    name: String,
    input_items: HashSet<Material>,
    fuel_sources: HashSet<Material>,
}

impl RecipeGroup {
    /// Start an empty group named `name`.
    pub fn builder(name: impl Into<String>) -> RecipeGroupBuilder {
        RecipeGroupBuilder {
            group: RecipeGroup {
                name: name.into(),
                input_items: HashSet::new(),
                fuel_sources: HashSet::new(),
            },
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materials accepted into input slots.
    pub fn input_items(&self) -> &HashSet<Material> {
        &self.input_items
    }

    /// Materials accepted into fuel slots.
    pub fn fuel_sources(&self) -> &HashSet<Material> {
        &self.fuel_sources
    }
}

/// Fluent assembly for [`RecipeGroup`].
#[derive(Debug, Clone)]
pub struct RecipeGroupBuilder {
    group: RecipeGroup,
}

impl RecipeGroupBuilder {
    /// Add input materials.
    pub fn input<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.group.input_items.extend(materials);
        self
    }

    /// Add fuel materials.
    pub fn fuel<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.group.fuel_sources.extend(materials);
        self
    }

    /// Finish the group.
    pub fn build(self) -> RecipeGroup {
        self.group
    }
}

/// Workstation whose inputs and fuels are validated permissively.
#[derive(Debug)]
pub struct CustomWorkstationConfig {
    id: String,
    materials: HashSet<Material>,
    inventory_size: usize,
    slots: Vec<SlotDefinition>,
    vanilla_recipes: bool,
    vanilla_fuel: bool,
    general_fuels: HashSet<Material>,
    general_inputs: HashSet<Material>,
    recipe_groups: Vec<RecipeGroup>,
    enabled: AtomicBool,
}

impl CustomWorkstationConfig {
    /// Start a configuration with id `id`.
    pub fn builder(id: impl Into<String>) -> CustomWorkstationConfigBuilder {
        CustomWorkstationConfigBuilder::new(id)
    }

    /// Unique id within its registry.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Block materials this workstation claims.
    pub fn materials(&self) -> &HashSet<Material> {
        &self.materials
    }

    /// Slot count of the backing inventory.
    pub fn inventory_size(&self) -> usize {
        self.inventory_size
    }

    /// All slots in declaration order.
    pub fn slots(&self) -> &[SlotDefinition] {
        &self.slots
    }

    /// Definition of slot `slot`, if declared.
    pub fn slot(&self, slot: usize) -> Option<&SlotDefinition> {
        self.slots.iter().find(|def| def.slot == slot)
    }

    /// Whether any vanilla smeltable is accepted in input slots.
    pub fn vanilla_recipes_enabled(&self) -> bool {
        self.vanilla_recipes
    }

    /// Whether any vanilla fuel is accepted in fuel slots.
    pub fn vanilla_fuel_enabled(&self) -> bool {
        self.vanilla_fuel
    }

    /// Fuels accepted regardless of recipe group.
    pub fn general_fuels(&self) -> &HashSet<Material> {
        &self.general_fuels
    }

    /// Inputs accepted regardless of recipe group.
    pub fn general_inputs(&self) -> &HashSet<Material> {
        &self.general_inputs
    }

    /// Recipe groups in declaration order.
    pub fn recipe_groups(&self) -> &[RecipeGroup] {
        &self.recipe_groups
    }

    /// Disabled configs are skipped by material lookup.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Toggle without unregistering.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    fn slots_of(&self, slot_type: SlotType) -> impl Iterator<Item = &SlotDefinition> {
        self.slots
            .iter()
            .filter(move |def| def.slot_type == slot_type)
    }

    /// Input slots in declaration order.
    pub fn input_slots(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots_of(SlotType::Input)
    }

    /// Fuel slots in declaration order.
    pub fn fuel_slots(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots_of(SlotType::Fuel)
    }

    /// Output slots in declaration order.
    pub fn output_slots(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots_of(SlotType::Output)
    }

    /// Storage slots in declaration order.
    pub fn storage_slots(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots_of(SlotType::Storage)
    }

    /// Whether `item` could be an input to some recipe of this workstation.
    ///
    /// A workstation declaring neither general inputs nor recipe groups is
    /// fully open.
    pub fn can_accept_input(&self, item: &ItemStack) -> bool {
        let mat = &item.material;
        self.vanilla_recipes
            || self.general_inputs.contains(mat)
            || self
                .recipe_groups
                .iter()
                .any(|group| group.input_items.contains(mat))
            || (self.general_inputs.is_empty() && self.recipe_groups.is_empty())
    }

    /// Whether `item` could fuel some recipe. There is no open fallback.
    pub fn can_accept_fuel(&self, item: &ItemStack) -> bool {
        let mat = &item.material;
        (self.vanilla_fuel && mat.is_fuel())
            || self.general_fuels.contains(mat)
            || self
                .recipe_groups
                .iter()
                .any(|group| group.fuel_sources.contains(mat))
    }
}

#[derive(Debug, Clone)]
struct PendingSlot {
    slot: usize,
    slot_type: SlotType,
    // `None` means "use the default filter for this slot type".
    filter: Option<Option<SlotItemFilter>>,
}

/// Fluent assembly for [`CustomWorkstationConfig`].
#[derive(Debug, Clone)]
pub struct CustomWorkstationConfigBuilder {
    id: String,
    materials: HashSet<Material>,
    inventory_size: usize,
    slots: Vec<PendingSlot>,
    vanilla_recipes: bool,
    vanilla_fuel: bool,
    general_fuels: HashSet<Material>,
    general_inputs: HashSet<Material>,
    recipe_groups: Vec<RecipeGroup>,
    enabled: bool,
}

impl CustomWorkstationConfigBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            materials: HashSet::new(),
            inventory_size: DEFAULT_INVENTORY_SIZE,
            slots: Vec::new(),
            vanilla_recipes: false,
            vanilla_fuel: false,
            general_fuels: HashSet::new(),
            general_inputs: HashSet::new(),
            recipe_groups: Vec::new(),
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

    fn declare(mut self, pending: PendingSlot) -> Self {
        match self.slots.iter_mut().find(|p| p.slot == pending.slot) {
            Some(existing) => *existing = pending,
            None => self.slots.push(pending),
        }
        self
    }

    /// Declare a slot with the default filter for its type.
    pub fn slot(self, slot: usize, slot_type: SlotType) -> Self {
        self.declare(PendingSlot {
            slot,
            slot_type,
            filter: None,
        })
    }

    /// Declare a slot with an explicit filter (`None` disables filtering).
    pub fn slot_with_filter(
        self,
        slot: usize,
        slot_type: SlotType,
        filter: Option<SlotItemFilter>,
    ) -> Self {
        self.declare(PendingSlot {
            slot,
            slot_type,
            filter: Some(filter),
        })
    }

    /// Shorthand for an [`SlotType::Input`] slot.
    pub fn input_slot(self, slot: usize) -> Self {
        self.slot(slot, SlotType::Input)
    }

    /// Shorthand for an [`SlotType::Fuel`] slot.
    pub fn fuel_slot(self, slot: usize) -> Self {
        self.slot(slot, SlotType::Fuel)
    }

    /// Shorthand for an [`SlotType::Output`] slot.
    pub fn output_slot(self, slot: usize) -> Self {
        self.slot(slot, SlotType::Output)
    }

    /// Shorthand for an [`SlotType::Storage`] slot.
    pub fn storage_slot(self, slot: usize) -> Self {
        self.slot(slot, SlotType::Storage)
    }

    /// Accept every vanilla smeltable as input.
    pub fn vanilla_recipes(mut self, enabled: bool) -> Self {
        self.vanilla_recipes = enabled;
        self
    }

    /// Accept every vanilla fuel.
    pub fn vanilla_fuel(mut self, enabled: bool) -> Self {
        self.vanilla_fuel = enabled;
        self
    }

    /// Fuels accepted outside any recipe group.
    pub fn general_fuel<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.general_fuels.extend(materials);
        self
    }

    /// Inputs accepted outside any recipe group.
    pub fn general_input<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.general_inputs.extend(materials);
        self
    }

    /// Append a recipe group.
    pub fn recipe_group(mut self, group: RecipeGroup) -> Self {
        self.recipe_groups.push(group);
        self
    }

    /// Initial enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    // Fuel slots default to permissive fuel widened by every declared fuel,
    // so group-only fuels are not rejected at the slot level.
    fn default_filter(&self, slot_type: SlotType) -> Option<SlotItemFilter> {
        match slot_type {
            SlotType::Input => Some(SlotItemFilter::permissive_input()),
            SlotType::Fuel => {
                let group_fuels = self
                    .recipe_groups
                    .iter()
                    .flat_map(|group| group.fuel_sources.iter().cloned());
                Some(
                    SlotItemFilter::builder()
                        .mode(FilterMode::PermissiveFuel)
                        .allow_vanilla_fuel(true)
                        .fuel_sources(self.general_fuels.iter().cloned())
                        .fuel_sources(group_fuels)
                        .build(),
                )
            }
            SlotType::Output | SlotType::Locked => Some(SlotItemFilter::block_all()),
            SlotType::Storage => None,
        }
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<CustomWorkstationConfig, ConfigError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.materials.is_empty() {
            return Err(ConfigError::NoMaterials { id });
        }

        let slots = self
            .slots
            .iter()
            .map(|pending| {
                let filter = match &pending.filter {
                    Some(explicit) => explicit.clone(),
                    None => self.default_filter(pending.slot_type),
                };
                SlotDefinition::new(pending.slot, pending.slot_type, filter)
            })
            .collect();

        Ok(CustomWorkstationConfig {
            id,
            materials: self.materials,
            inventory_size: self.inventory_size,
            slots,
            vanilla_recipes: self.vanilla_recipes,
            vanilla_fuel: self.vanilla_fuel,
            general_fuels: self.general_fuels,
            general_inputs: self.general_inputs,
            recipe_groups: self.recipe_groups,
            enabled: AtomicBool::new(self.enabled),
        })
    }
}
