//! Per-slot item admission rules.
//!
//! Filters are permissive by intent: a slot admits anything that could be
//! valid for some recipe and leaves exact pairing to the processing system.

use recreator_core::{ItemStack, Material};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Arbitrary item predicate supplied by an extension.
pub type ItemPredicate = Arc<dyn Fn(&ItemStack) -> bool + Send + Sync>;

/// How a [`SlotItemFilter`] decides once the block set has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Everything not blocked.
    AllowAll,
    /// Nothing.
    BlockAll,
    /// Only materials in the allow set.
    Whitelist,
    /// Vanilla fuel (when enabled) or the custom fuel set.
    FuelSlot,
    /// Vanilla smeltables (when enabled) or the custom input set.
    InputSlot,
    /// Any vanilla fuel or the custom fuel set.
    PermissiveFuel,
    /// Anything when the custom input set is empty, otherwise that set or
    /// vanilla smeltables (when enabled).
    PermissiveInput,
    /// Allow-set membership; normally paired with a custom predicate.
    Custom,
}

/// Admission rule for one workstation slot.
#[derive(Clone)]
pub struct SlotItemFilter {
    mode: FilterMode,
    allowed: Option<HashSet<Material>>,
    blocked: HashSet<Material>,
    validator: Option<ItemPredicate>,
    allow_vanilla_fuel: bool,
    allow_vanilla_smeltable: bool,
    fuel_sources: HashSet<Material>,
    input_items: HashSet<Material>,
}

impl SlotItemFilter {
    /// Builder starting from [`FilterMode::AllowAll`].
    pub fn builder() -> SlotItemFilterBuilder {
        SlotItemFilterBuilder::default()
    }

    /// Admit everything.
    pub fn allow_all() -> Self {
        Self::builder().mode(FilterMode::AllowAll).build()
    }

    /// Admit nothing.
    pub fn block_all() -> Self {
        Self::builder().mode(FilterMode::BlockAll).build()
    }

    /// Any vanilla fuel.
    pub fn permissive_fuel() -> Self {
        Self::builder()
            .mode(FilterMode::PermissiveFuel)
            .allow_vanilla_fuel(true)
            .build()
    }

    /// Anything, until input items are declared.
    pub fn permissive_input() -> Self {
        Self::builder()
            .mode(FilterMode::PermissiveInput)
            .allow_vanilla_smeltable(true)
            .build()
    }

    /// Only `materials`.
    pub fn whitelist<I>(materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        Self::builder()
            .mode(FilterMode::Whitelist)
            .allow(materials)
            .build()
    }

    /// Filter decided entirely by `predicate` (the block set still applies).
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&ItemStack) -> bool + Send + Sync + 'static,
    {
        Self::builder()
            .mode(FilterMode::Custom)
            .validator(predicate)
            .build()
    }

    /// Decision mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Evaluate the filter against `item`.
    pub fn test(&self, item: &ItemStack) -> bool {
        let mat = &item.material;
        if mat.is_air() || self.blocked.contains(mat) {
            return false;
        }
        if let Some(validator) = &self.validator {
            return validator(item);
        }

        match self.mode {
            FilterMode::AllowAll => true,
            FilterMode::BlockAll => false,
            FilterMode::Whitelist | FilterMode::Custom => {
                self.allowed.as_ref().is_some_and(|set| set.contains(mat))
            }
            FilterMode::FuelSlot => {
                (self.allow_vanilla_fuel && mat.is_fuel()) || self.fuel_sources.contains(mat)
            }
            FilterMode::InputSlot => {
                (self.allow_vanilla_smeltable && mat.is_item()) || self.input_items.contains(mat)
            }
            FilterMode::PermissiveFuel => mat.is_fuel() || self.fuel_sources.contains(mat),
            FilterMode::PermissiveInput => {
                self.input_items.is_empty()
                    || self.input_items.contains(mat)
                    || (self.allow_vanilla_smeltable && mat.is_item())
            }
        }
    }
}

impl fmt::Debug for SlotItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotItemFilter")
            .field("mode", &self.mode)
            .field("allowed", &self.allowed)
            .field("blocked", &self.blocked)
            .field("has_validator", &self.validator.is_some())
            .field("allow_vanilla_fuel", &self.allow_vanilla_fuel)
            .field("allow_vanilla_smeltable", &self.allow_vanilla_smeltable)
            .field("fuel_sources", &self.fuel_sources)
            .field("input_items", &self.input_items)
            .finish()
    }
}

/// Fluent assembly for [`SlotItemFilter`].
#[derive(Clone)]
pub struct SlotItemFilterBuilder {
    mode: FilterMode,
    allowed: Option<HashSet<Material>>,
    blocked: HashSet<Material>,
    validator: Option<ItemPredicate>,
    allow_vanilla_fuel: bool,
    allow_vanilla_smeltable: bool,
    fuel_sources: HashSet<Material>,
    input_items: HashSet<Material>,
}

impl Default for SlotItemFilterBuilder {
    fn default() -> Self {
        Self {
            mode: FilterMode::AllowAll,
            allowed: None,
            blocked: HashSet::new(),
            validator: None,
            allow_vanilla_fuel: false,
            allow_vanilla_smeltable: false,
            fuel_sources: HashSet::new(),
            input_items: HashSet::new(),
        }
    }
}

impl SlotItemFilterBuilder {
    /// Decision mode applied after the block set.
    pub fn mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add to the allow set.
    pub fn allow<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.allowed.get_or_insert_with(HashSet::new).extend(materials);
        self
    }

    /// Materials always rejected, whatever the mode.
    pub fn block<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.blocked.extend(materials);
        self
    }

    /// Predicate consulted by [`FilterMode::Custom`].
    pub fn validator<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ItemStack) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(predicate));
        self
    }

    /// Let the fuel modes admit any vanilla fuel.
    pub fn allow_vanilla_fuel(mut self, allow: bool) -> Self {
        self.allow_vanilla_fuel = allow;
        self
    }

    /// Let the input modes admit any vanilla smeltable.
    pub fn allow_vanilla_smeltable(mut self, allow: bool) -> Self {
        self.allow_vanilla_smeltable = allow;
        self
    }

    /// Custom fuel set for the fuel modes.
    pub fn fuel_sources<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.fuel_sources.extend(materials);
        self
    }

    /// Custom input set for the input modes.
    pub fn input_items<I>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        self.input_items.extend(materials);
        self
    }

    /// Finish the filter.
    pub fn build(self) -> SlotItemFilter {
        SlotItemFilter {
            mode: self.mode,
            allowed: self.allowed,
            blocked: self.blocked,
            validator: self.validator,
            allow_vanilla_fuel: self.allow_vanilla_fuel,
            allow_vanilla_smeltable: self.allow_vanilla_smeltable,
            fuel_sources: self.fuel_sources,
            input_items: self.input_items,
        }
    }
}
