//! Hopper transfer routing.
//!
//! Extensions describe workstations (simple per-slot functions, or custom
//! ones with permissive recipe/fuel admission), register them with a
//! [`HopperApi`], and the [`HopperEngine`] decides for each hopper attempt
//! whether one unit moves, into or out of which slot.

#![warn(missing_docs)]

mod api;
mod custom;
mod custom_handler;
mod error;
mod filter;
mod handler;
mod manager;
mod registry;
mod safe_handler;
mod settings;
mod transfer;
mod workstation;

pub use api::{HopperApi, HopperEngine, BUILTIN_EXTENSION};
pub use custom::{
    CustomWorkstationConfig, CustomWorkstationConfigBuilder, RecipeGroup, RecipeGroupBuilder,
    SlotDefinition, SlotType,
};
pub use custom_handler::CustomWorkstationHandler;
pub use error::ConfigError;
pub use filter::{FilterMode, ItemPredicate, SlotItemFilter, SlotItemFilterBuilder};
pub use handler::HopperHandler;
pub use manager::{HopperManager, RegisteredHandler};
pub use registry::{
    provider, ConfigRegistry, CustomWorkstationRegistry, InventoryProvider, WorkstationDefinition,
    WorkstationRegistry,
};
pub use safe_handler::SafeHopperHandler;
pub use settings::{HopperSettings, HopperSettingsBuilder, DEFAULT_TRANSFER_SPEED, MAX_TRANSFER_AMOUNT};
pub use transfer::{TransferResult, TransferStatus};
pub use workstation::{
    SlotConfig, SlotFunction, WorkstationConfig, WorkstationConfigBuilder, DEFAULT_INVENTORY_SIZE,
};
