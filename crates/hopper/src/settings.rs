//! Per-hopper behavior overrides.

use crate::filter::ItemPredicate;
use recreator_core::ItemStack;
use std::fmt;
use std::sync::Arc;

/// Vanilla hopper cooldown in ticks.
pub const DEFAULT_TRANSFER_SPEED: u32 = 8;
/// Largest batch a single hopper may be configured to move.
pub const MAX_TRANSFER_AMOUNT: u32 = 64;

/// Overrides stored per hopper position. Unset hoppers behave like vanilla.
#[derive(Clone)]
pub struct HopperSettings {
    enabled: bool,
    transfer_speed: u32,
    transfer_amount: u32,
    item_filter: Option<ItemPredicate>,
    push_enabled: bool,
    pull_enabled: bool,
    custom_input_slots: Option<Vec<usize>>,
    custom_output_slots: Option<Vec<usize>>,
}

impl Default for HopperSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            transfer_speed: DEFAULT_TRANSFER_SPEED,
            transfer_amount: 1,
            item_filter: None,
            push_enabled: true,
            pull_enabled: true,
            custom_input_slots: None,
            custom_output_slots: None,
        }
    }
}

impl HopperSettings {
    /// Builder starting from vanilla defaults.
    pub fn builder() -> HopperSettingsBuilder {
        HopperSettingsBuilder {
            settings: Self::default(),
        }
    }

    /// Disabled hoppers are denied every transfer.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ticks between transfers.
    pub fn transfer_speed(&self) -> u32 {
        self.transfer_speed
    }

    /// Units moved per transfer.
    pub fn transfer_amount(&self) -> u32 {
        self.transfer_amount
    }

    /// Whether the hopper may push into the block below.
    pub fn push_enabled(&self) -> bool {
        self.push_enabled
    }

    /// Whether the hopper may pull from the block above.
    pub fn pull_enabled(&self) -> bool {
        self.pull_enabled
    }

    /// Whether an item filter is set.
    pub fn has_filter(&self) -> bool {
        self.item_filter.is_some()
    }

    /// True when no filter is set or the filter admits `item`.
    pub fn passes_filter(&self, item: &ItemStack) -> bool {
        self.item_filter.as_ref().map_or(true, |filter| filter(item))
    }

    /// Slot override for pushes, if any.
    pub fn custom_input_slots(&self) -> Option<&[usize]> {
        self.custom_input_slots.as_deref()
    }

    /// Slot override for pulls, if any.
    pub fn custom_output_slots(&self) -> Option<&[usize]> {
        self.custom_output_slots.as_deref()
    }
}

impl fmt::Debug for HopperSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HopperSettings")
            .field("enabled", &self.enabled)
            .field("transfer_speed", &self.transfer_speed)
            .field("transfer_amount", &self.transfer_amount)
            .field("has_filter", &self.item_filter.is_some())
            .field("push_enabled", &self.push_enabled)
            .field("pull_enabled", &self.pull_enabled)
            .field("custom_input_slots", &self.custom_input_slots)
            .field("custom_output_slots", &self.custom_output_slots)
            .finish()
    }
}

/// Fluent assembly for [`HopperSettings`].
#[derive(Clone, Debug)]
pub struct HopperSettingsBuilder {
    settings: HopperSettings,
}

impl HopperSettingsBuilder {
    /// Disable the hopper entirely.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }

    /// Clamped to at least one tick.
    pub fn transfer_speed(mut self, ticks: u32) -> Self {
        self.settings.transfer_speed = ticks.max(1);
        self
    }

    /// Clamped to `1..=MAX_TRANSFER_AMOUNT`.
    pub fn transfer_amount(mut self, amount: u32) -> Self {
        self.settings.transfer_amount = amount.clamp(1, MAX_TRANSFER_AMOUNT);
        self
    }

    /// Only items the predicate admits are pushed.
    pub fn item_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ItemStack) -> bool + Send + Sync + 'static,
    {
        self.settings.item_filter = Some(Arc::new(filter));
        self
    }

    /// Allow or forbid pushes.
    pub fn push_enabled(mut self, enabled: bool) -> Self {
        self.settings.push_enabled = enabled;
        self
    }

    /// Allow or forbid pulls.
    pub fn pull_enabled(mut self, enabled: bool) -> Self {
        self.settings.pull_enabled = enabled;
        self
    }

    /// Push only into these slots.
    pub fn custom_input_slots(mut self, slots: impl Into<Vec<usize>>) -> Self {
        self.settings.custom_input_slots = Some(slots.into());
        self
    }

    /// Pull only from these slots.
    pub fn custom_output_slots(mut self, slots: impl Into<Vec<usize>>) -> Self {
        self.settings.custom_output_slots = Some(slots.into());
        self
    }

    /// Finish the settings.
    pub fn build(self) -> HopperSettings {
        self.settings
    }
}
