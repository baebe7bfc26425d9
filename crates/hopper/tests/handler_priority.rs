//! Location handlers beat material handlers, which beat global handlers.

use recreator_core::{Block, BlockPos, ExtensionId, ItemStack, Material};
use recreator_hopper::{HopperEngine, HopperHandler, TransferResult, WorkstationConfig};
use recreator_testkit::{stack, TestWorld};
use std::sync::Arc;

/// Claims every block and reports its own tag as the pushed item.
struct Tagged(&'static str);

impl HopperHandler for Tagged {
    fn on_hopper_push(&self, _: &Block, _: &ItemStack, _: &Block) -> TransferResult {
        TransferResult::success_unslotted(stack(self.0, 1))
    }

    fn on_hopper_pull(&self, _: &Block, _: &Block) -> TransferResult {
        TransferResult::denied()
    }

    fn can_handle(&self, _: &Block) -> bool {
        true
    }

    fn name(&self) -> &str {
        self.0
    }
}

/// Never claims anything.
struct Declines;

impl HopperHandler for Declines {
    fn on_hopper_push(&self, _: &Block, _: &ItemStack, _: &Block) -> TransferResult {
        TransferResult::denied()
    }

    fn on_hopper_pull(&self, _: &Block, _: &Block) -> TransferResult {
        TransferResult::denied()
    }

    fn can_handle(&self, _: &Block) -> bool {
        false
    }
}

fn handled_by(engine: &HopperEngine, world: &TestWorld, pos: BlockPos) -> Option<String> {
    let block = world.block(pos)?;
    let hopper = world.block(pos.up())?;
    engine
        .push(&hopper, &block, &stack("dirt", 1))
        .item()
        .map(|item| item.material.path().to_string())
}

#[test]
fn location_beats_material_beats_global() {
    let engine = HopperEngine::new();
    let api = engine.api();
    let owner = ExtensionId::new("priority");
    let barrel = Material::vanilla("barrel");

    let mut world = TestWorld::new();
    let located = BlockPos::new(0, 64, 0);
    let plain = BlockPos::new(4, 64, 0);
    for pos in [located, plain] {
        world.place_container(pos, barrel.clone(), 27);
        world.place_hopper(pos.up());
    }
    let chest = BlockPos::new(8, 64, 0);
    world.place_container(chest, Material::vanilla("chest"), 27);
    world.place_hopper(chest.up());

    api.register_global_handler(&owner, Arc::new(Tagged("global")));
    api.register_material_handler(&owner, barrel, Arc::new(Tagged("material")));
    api.register_location_handler(&owner, located, Arc::new(Tagged("location")));

    assert_eq!(handled_by(&engine, &world, located).as_deref(), Some("location"));
    assert_eq!(handled_by(&engine, &world, plain).as_deref(), Some("material"));
    assert_eq!(handled_by(&engine, &world, chest).as_deref(), Some("global"));

    assert!(api.unregister_location_handler(located));
    assert_eq!(handled_by(&engine, &world, located).as_deref(), Some("material"));
}

#[test]
fn declining_candidates_fall_through() {
    let engine = HopperEngine::new();
    let api = engine.api();
    let owner = ExtensionId::new("priority");
    let barrel = Material::vanilla("barrel");

    let mut world = TestWorld::new();
    let pos = BlockPos::new(0, 64, 0);
    world.place_container(pos, barrel.clone(), 27);
    world.place_hopper(pos.up());

    api.register_location_handler(&owner, pos, Arc::new(Declines));
    api.register_material_handler(&owner, barrel.clone(), Arc::new(Declines));
    api.register_material_handler(&owner, barrel, Arc::new(Tagged("second")));
    assert_eq!(handled_by(&engine, &world, pos).as_deref(), Some("second"));
}

#[test]
fn builtin_globals_resolve_before_later_globals() {
    let engine = HopperEngine::new();
    let api = engine.api();
    let owner = ExtensionId::new("priority");
    api.register_workstation(
        &owner,
        WorkstationConfig::builder("press")
            .material(Material::vanilla("piston"))
            .input_slot(0)
            .build()
            .expect("valid config"),
    );

    let mut world = TestWorld::new();
    let pos = BlockPos::new(0, 64, 0);
    world.place_container(pos, Material::vanilla("piston"), 1);
    world.place_hopper(pos.up());

    let block = world.block(pos).expect("placed");
    let builtin = api.handler_for(&block).expect("safe handler claims it");
    assert_eq!(builtin.name(), "safe");

    // Built-ins were registered first, so a later global never outranks them.
    api.register_global_handler(&owner, Arc::new(Tagged("late_global")));
    assert_eq!(api.handler_for(&block).expect("claimed").name(), "safe");
    assert_eq!(handled_by(&engine, &world, pos).as_deref(), Some("dirt"));
}
