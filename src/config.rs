use anyhow::{Context, Result};
use recreator_core::{BlockPos, ItemStack, Material};
use recreator_hopper::{
    ConfigError, CustomWorkstationConfig, HopperSettings, RecipeGroup, SlotConfig, SlotFunction,
    SlotType, WorkstationConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::Path};

/// A workstation pack: configurations, the blocks to place and the transfer
/// attempts to drive against them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkstationPack {
    #[serde(rename = "workstation")]
    pub workstations: Vec<WorkstationDef>,
    #[serde(rename = "custom_workstation")]
    pub custom_workstations: Vec<CustomWorkstationDef>,
    #[serde(rename = "hopper")]
    pub hoppers: Vec<HopperDef>,
    #[serde(rename = "block")]
    pub blocks: Vec<BlockDef>,
    #[serde(rename = "transfer")]
    pub transfers: Vec<TransferDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkstationDef {
    pub id: String,
    pub materials: Vec<Material>,
    #[serde(default)]
    pub inventory_size: Option<usize>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub slots: Vec<SlotDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlotDef {
    pub slot: usize,
    pub function: SlotFunction,
    /// When present, only these materials are accepted.
    #[serde(default)]
    pub allowed: Option<Vec<Material>>,
    #[serde(default)]
    pub blocked: Vec<Material>,
    /// Overrides the input flag derived from `function`.
    #[serde(default)]
    pub hopper_input: Option<bool>,
    #[serde(default)]
    pub hopper_output: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomWorkstationDef {
    pub id: String,
    pub materials: Vec<Material>,
    #[serde(default)]
    pub inventory_size: Option<usize>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub input_slots: Vec<usize>,
    #[serde(default)]
    pub fuel_slots: Vec<usize>,
    #[serde(default)]
    pub output_slots: Vec<usize>,
    #[serde(default)]
    pub storage_slots: Vec<usize>,
    #[serde(default)]
    pub locked_slots: Vec<usize>,
    #[serde(default)]
    pub vanilla_recipes: bool,
    #[serde(default)]
    pub vanilla_fuel: bool,
    #[serde(default)]
    pub general_fuel: Vec<Material>,
    #[serde(default)]
    pub general_input: Vec<Material>,
    #[serde(default)]
    pub recipe_group: Vec<RecipeGroupDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecipeGroupDef {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Material>,
    #[serde(default)]
    pub fuels: Vec<Material>,
}

/// Per-hopper overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HopperDef {
    pub pos: [i32; 3],
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "enabled_by_default")]
    pub push: bool,
    #[serde(default = "enabled_by_default")]
    pub pull: bool,
    /// When present, the hopper only moves these materials.
    #[serde(default)]
    pub only: Option<Vec<Material>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockDef {
    pub pos: [i32; 3],
    pub material: Material,
    /// Blocks without a size get no inventory of their own.
    #[serde(default)]
    pub inventory_size: Option<usize>,
    #[serde(default)]
    pub contents: Vec<SlotContentDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlotContentDef {
    pub slot: usize,
    pub item: Material,
    #[serde(default = "one")]
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    Push,
    Pull,
}

impl TransferKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferDef {
    pub kind: TransferKind,
    pub hopper: [i32; 3],
    pub target: [i32; 3],
    /// Item offered by the hopper; required for pushes.
    #[serde(default)]
    pub item: Option<Material>,
    #[serde(default = "one")]
    pub repeat: u32,
}

fn enabled_by_default() -> bool {
    true
}

fn one() -> u32 {
    1
}

pub fn block_pos([x, y, z]: [i32; 3]) -> BlockPos {
    BlockPos::new(x, y, z)
}

impl WorkstationPack {
    /// Load a pack from TOML on disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pack {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid pack {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let pack: WorkstationPack = toml::from_str(contents)?;
        pack.validate()?;
        Ok(pack)
    }

    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for id in self.workstations.iter().map(|def| def.id.as_str()) {
            if !ids.insert(id) {
                anyhow::bail!("Duplicate workstation id {id}");
            }
        }
        let mut ids = HashSet::new();
        for id in self.custom_workstations.iter().map(|def| def.id.as_str()) {
            if !ids.insert(id) {
                anyhow::bail!("Duplicate custom workstation id {id}");
            }
        }
        for (index, transfer) in self.transfers.iter().enumerate() {
            if transfer.kind == TransferKind::Push && transfer.item.is_none() {
                anyhow::bail!("Transfer #{index} is a push without an item");
            }
        }
        Ok(())
    }
}

impl WorkstationDef {
    pub fn build(&self) -> Result<WorkstationConfig, ConfigError> {
        let mut builder = WorkstationConfig::builder(self.id.as_str())
            .materials(self.materials.iter().cloned())
            .enabled(self.enabled);
        if let Some(size) = self.inventory_size {
            builder = builder.inventory_size(size);
        }
        for def in &self.slots {
            let mut slot = SlotConfig::new(def.slot, def.function).block(def.blocked.iter().cloned());
            if let Some(allowed) = &def.allowed {
                slot = slot.allow(allowed.iter().cloned());
            }
            if let Some(input) = def.hopper_input {
                slot = slot.hopper_input(input);
            }
            if let Some(output) = def.hopper_output {
                slot = slot.hopper_output(output);
            }
            builder = builder.slot(slot);
        }
        builder.build()
    }
}

impl CustomWorkstationDef {
    pub fn build(&self) -> Result<CustomWorkstationConfig, ConfigError> {
        let mut builder = CustomWorkstationConfig::builder(self.id.as_str())
            .materials(self.materials.iter().cloned())
            .vanilla_recipes(self.vanilla_recipes)
            .vanilla_fuel(self.vanilla_fuel)
            .general_fuel(self.general_fuel.iter().cloned())
            .general_input(self.general_input.iter().cloned())
            .enabled(self.enabled);
        if let Some(size) = self.inventory_size {
            builder = builder.inventory_size(size);
        }
        let declared = [
            (SlotType::Input, &self.input_slots),
            (SlotType::Fuel, &self.fuel_slots),
            (SlotType::Output, &self.output_slots),
            (SlotType::Storage, &self.storage_slots),
            (SlotType::Locked, &self.locked_slots),
        ];
        for (slot_type, slots) in declared {
            for &slot in slots {
                builder = builder.slot(slot, slot_type);
            }
        }
        for group in &self.recipe_group {
            builder = builder.recipe_group(
                RecipeGroup::builder(group.name.as_str())
                    .input(group.inputs.iter().cloned())
                    .fuel(group.fuels.iter().cloned())
                    .build(),
            );
        }
        builder.build()
    }
}

impl HopperDef {
    pub fn settings(&self) -> HopperSettings {
        let mut builder = HopperSettings::builder()
            .enabled(self.enabled)
            .push_enabled(self.push)
            .pull_enabled(self.pull);
        if let Some(only) = &self.only {
            let only: HashSet<Material> = only.iter().cloned().collect();
            builder = builder.item_filter(move |item: &ItemStack| only.contains(&item.material));
        }
        builder.build()
    }
}
