//! Worldtest: end-to-end hopper routing through a `HopperEngine`.
//!
//! Validates:
//! - Simple furnace push and pull
//! - Recipe group admission for custom workstations
//! - Stacking onto a partially filled slot
//! - Bulk unregistration of an extension, providers included
//! - Disabled configs, slot priority and id re-registration

use recreator_core::{BlockPos, ExtensionId, Inventory, Material};
use recreator_hopper::{
    provider, CustomWorkstationConfig, HopperEngine, HopperHandler, RecipeGroup, TransferResult,
    TransferStatus, WorkstationConfig,
};
use recreator_testkit::{stack, JsonlSink, TestWorld, TransferRecord};
use std::sync::Arc;

const TARGET: BlockPos = BlockPos::new(0, 64, 0);
const HOPPER: BlockPos = BlockPos::new(0, 65, 0);

fn ext() -> ExtensionId {
    ExtensionId::new("test_extension")
}

fn furnace_world(engine: &HopperEngine, size: usize) -> TestWorld {
    engine.api().register_workstation(
        &ext(),
        WorkstationConfig::builder("furnace")
            .material(Material::vanilla("furnace"))
            .inventory_size(3)
            .input_slot(0)
            .fuel_slot(1)
            .output_slot(2)
            .build()
            .expect("valid furnace config"),
    );
    let mut world = TestWorld::new();
    world.place_container(TARGET, Material::vanilla("furnace"), size);
    world.place_hopper(HOPPER);
    world
}

fn push(engine: &HopperEngine, world: &TestWorld, path: &str) -> TransferResult {
    let hopper = world.block(HOPPER).expect("hopper placed");
    let target = world.block(TARGET).expect("target placed");
    engine.push(&hopper, &target, &stack(path, 1))
}

fn pull(engine: &HopperEngine, world: &TestWorld) -> TransferResult {
    let hopper = world.block(HOPPER).expect("hopper placed");
    let source = world.block(TARGET).expect("source placed");
    engine.pull(&hopper, &source)
}

#[test]
fn simple_furnace_worldtest() {
    let log_path = std::env::temp_dir().join("simple_furnace_worldtest.jsonl");
    let mut log = JsonlSink::create(&log_path).expect("create transfer log");

    let engine = HopperEngine::new();
    let world = furnace_world(&engine, 3);

    let pushed = push(&engine, &world, "coal_ore");
    log.write(&TransferRecord {
        step: 0,
        kind: "push",
        hopper: HOPPER,
        target: TARGET,
        result: &pushed,
    })
    .expect("write record");
    assert_eq!(pushed.status(), TransferStatus::Success);
    assert_eq!(pushed.slot(), Some(0));
    assert_eq!(world.stack(TARGET, 0), Some(stack("coal_ore", 1)));

    let pulled = pull(&engine, &world);
    log.write(&TransferRecord {
        step: 1,
        kind: "pull",
        hopper: HOPPER,
        target: TARGET,
        result: &pulled,
    })
    .expect("write record");
    assert_eq!(pulled.status(), TransferStatus::Empty);
    assert_eq!(world.total(TARGET), 1);

    world.put(TARGET, 2, stack("iron_ingot", 2)).expect("seed output");
    let pulled = pull(&engine, &world);
    assert_eq!(pulled.status(), TransferStatus::Success);
    assert_eq!(pulled.item(), Some(&stack("iron_ingot", 1)));
    assert_eq!(world.count(TARGET, 2), 1);

    log.flush().expect("flush log");
    assert_eq!(log.written(), 2);
}

#[test]
fn fuel_slot_only_takes_fuel() {
    let engine = HopperEngine::new();
    let world = furnace_world(&engine, 3);
    world.put(TARGET, 0, stack("cobblestone", 64)).expect("fill input");

    assert_eq!(push(&engine, &world, "dirt").status(), TransferStatus::NoSpace);
    let coal = push(&engine, &world, "coal");
    assert_eq!(coal.status(), TransferStatus::Success);
    assert_eq!(coal.slot(), Some(1));
}

#[test]
fn recipe_group_gating_worldtest() {
    let engine = HopperEngine::new();
    engine.api().register_custom_workstation(
        &ext(),
        CustomWorkstationConfig::builder("soul_furnace")
            .material(Material::vanilla("blast_furnace"))
            .input_slot(0)
            .fuel_slot(1)
            .output_slot(2)
            .vanilla_recipes(false)
            .vanilla_fuel(false)
            .recipe_group(
                RecipeGroup::builder("soul")
                    .input([Material::vanilla("soul_sand")])
                    .fuel([Material::vanilla("magma_block")])
                    .build(),
            )
            .build()
            .expect("valid custom config"),
    );
    let mut world = TestWorld::new();
    world.place_container(TARGET, Material::vanilla("blast_furnace"), 3);
    world.place_hopper(HOPPER);

    let soul = push(&engine, &world, "soul_sand");
    assert_eq!(soul.status(), TransferStatus::Success);
    assert_eq!(soul.slot(), Some(0));

    let magma = push(&engine, &world, "magma_block");
    assert_eq!(magma.status(), TransferStatus::Success);
    assert_eq!(magma.slot(), Some(1));

    assert_eq!(push(&engine, &world, "dirt").status(), TransferStatus::NoSpace);
    assert_eq!(push(&engine, &world, "coal").status(), TransferStatus::NoSpace);
    assert_eq!(world.total(TARGET), 2);
}

#[test]
fn stacking_worldtest() {
    let engine = HopperEngine::new();
    let world = furnace_world(&engine, 3);
    world.put(TARGET, 0, stack("cobblestone", 5)).expect("seed input");

    let result = push(&engine, &world, "cobblestone");
    assert_eq!(result.status(), TransferStatus::Success);
    assert_eq!(result.slot(), Some(0));
    assert_eq!(world.count(TARGET, 0), 6);
    assert!(world.stack(TARGET, 1).is_none());
    assert_eq!(world.total(TARGET), 6);
}

struct Claims;

impl HopperHandler for Claims {
    fn on_hopper_push(
        &self,
        _: &recreator_core::Block,
        item: &recreator_core::ItemStack,
        _: &recreator_core::Block,
    ) -> TransferResult {
        TransferResult::success_unslotted(item.single())
    }

    fn on_hopper_pull(&self, _: &recreator_core::Block, _: &recreator_core::Block) -> TransferResult {
        TransferResult::empty()
    }

    fn can_handle(&self, _: &recreator_core::Block) -> bool {
        true
    }
}

#[test]
fn bulk_unload_worldtest() {
    let engine = HopperEngine::new();
    let api = engine.api();
    let owner = ext();
    let mut world = TestWorld::new();

    for (id, path) in [("press", "piston"), ("kiln", "smoker")] {
        api.register_workstation(
            &owner,
            WorkstationConfig::builder(id)
                .material(Material::vanilla(path))
                .input_slot(0)
                .build()
                .expect("valid config"),
        );
    }
    api.register_custom_workstation(
        &owner,
        CustomWorkstationConfig::builder("altar")
            .material(Material::vanilla("enchanting_table"))
            .input_slot(0)
            .build()
            .expect("valid config"),
    );
    let claimed = [BlockPos::new(10, 64, 10), BlockPos::new(11, 64, 10)];
    for pos in claimed {
        api.register_location_handler(&owner, pos, Arc::new(Claims));
        world.place_container(pos, Material::vanilla("chest"), 27);
    }
    let blocks = [
        world.place_container(BlockPos::new(0, 64, 0), Material::vanilla("piston"), 27),
        world.place_container(BlockPos::new(1, 64, 0), Material::vanilla("smoker"), 27),
        world.place_container(BlockPos::new(2, 64, 0), Material::vanilla("enchanting_table"), 27),
    ];
    for block in &blocks {
        assert!(api.handler_for(block).is_some());
    }

    // Providers: one at a position, one for a config another extension owns.
    let backing = BlockPos::new(20, 64, 20);
    world.place_container(backing, Material::vanilla("chest"), 9);
    let shared = world.inventory(backing).expect("backing inventory");
    api.register_location_inventory(
        &owner,
        blocks[0].pos(),
        provider(move |_| Some(Arc::clone(&shared))),
    );
    api.register_custom_workstation(
        &ExtensionId::new("other_extension"),
        CustomWorkstationConfig::builder("lectern")
            .material(Material::vanilla("lectern"))
            .input_slot(0)
            .build()
            .expect("valid config"),
    );
    api.register_custom_inventory_provider(&owner, "lectern", provider(|_| None));
    let lectern = world.place_container(BlockPos::new(3, 64, 0), Material::vanilla("lectern"), 1);
    assert_eq!(api.workstation_inventory(&blocks[0]).expect("provided").lock().size(), 9);
    assert!(api.workstation_inventory(&lectern).is_none());

    api.unregister_all(&owner);

    for block in &blocks {
        assert!(api.handler_for(block).is_none());
        assert!(api.workstation_config(block).is_none());
        assert!(api.custom_workstation_config(block).is_none());
    }
    for pos in claimed {
        let block = world.block(pos).expect("placed");
        assert!(api.handler_for(&block).is_none());
    }
    assert!(api.workstation_registry().indexed_materials().is_empty());
    assert!(api.workstation_registry().registered_ids().is_empty());
    assert_eq!(
        api.custom_workstation_registry().registered_ids(),
        vec!["lectern".to_string()]
    );

    assert!(!api.workstation_registry().has_custom_provider(&blocks[0]));
    assert_eq!(api.workstation_inventory(&blocks[0]).expect("intrinsic").lock().size(), 27);
    assert!(!api.custom_workstation_registry().has_custom_provider(&lectern));
    assert_eq!(api.workstation_inventory(&lectern).expect("intrinsic").lock().size(), 1);
    // Built-in fallbacks survive.
    assert_eq!(api.manager().handler_count(), 2);
}

#[test]
fn disabled_config_is_invisible_to_routing() {
    let engine = HopperEngine::new();
    let world = furnace_world(&engine, 3);
    let config = engine
        .api()
        .workstation_config_by_id("furnace")
        .expect("registered");

    config.set_enabled(false);
    let target = world.block(TARGET).expect("placed");
    assert!(engine.api().workstation_config(&target).is_none());
    assert!(engine.api().workstation_config_by_id("furnace").is_some());
    assert_eq!(push(&engine, &world, "coal_ore").status(), TransferStatus::PassThrough);
    assert_eq!(world.total(TARGET), 0);

    config.set_enabled(true);
    assert!(push(&engine, &world, "coal_ore").is_successful());
}

#[test]
fn slot_priority_follows_declaration_order() {
    let engine = HopperEngine::new();
    engine.api().register_workstation(
        &ext(),
        WorkstationConfig::builder("sorter")
            .material(Material::vanilla("barrel"))
            .input_slot(4)
            .input_slot(1)
            .input_slot(3)
            .build()
            .expect("valid config"),
    );
    let mut world = TestWorld::new();
    world.place_container(TARGET, Material::vanilla("barrel"), 5);
    world.place_hopper(HOPPER);
    world.put(TARGET, 4, stack("sand", 1)).expect("block slot 4");

    let landed: Vec<_> = (0..2)
        .map(|_| push(&engine, &world, "gravel").slot())
        .collect();
    assert_eq!(landed, vec![Some(1), Some(1)]);
    assert_eq!(world.count(TARGET, 1), 2);
    assert!(world.stack(TARGET, 3).is_none());
}

#[test]
fn out_of_range_slots_are_skipped() {
    let engine = HopperEngine::new();
    // Declares three slots but the world block only has one.
    let world = furnace_world(&engine, 1);
    assert_eq!(push(&engine, &world, "coal").slot(), Some(0));
    assert_eq!(push(&engine, &world, "dirt").status(), TransferStatus::NoSpace);
    assert_eq!(pull(&engine, &world).status(), TransferStatus::Empty);
}

#[test]
fn reregistration_leaves_no_stale_entry() {
    let engine = HopperEngine::new();
    let api = engine.api();
    let build = |path: &str| {
        WorkstationConfig::builder("press")
            .material(Material::vanilla(path))
            .input_slot(0)
            .build()
            .expect("valid config")
    };
    api.register_workstation(&ext(), build("piston"));
    api.register_workstation(&ext(), build("sticky_piston"));

    let registry = api.workstation_registry();
    assert_eq!(registry.indexed_count(&Material::vanilla("piston")), 0);
    assert_eq!(registry.indexed_count(&Material::vanilla("sticky_piston")), 1);
    assert_eq!(registry.registered_ids(), vec!["press".to_string()]);
}

#[test]
fn location_provider_overrides_intrinsic_inventory() {
    let engine = HopperEngine::new();
    let mut world = furnace_world(&engine, 3);
    let backing = BlockPos::new(5, 5, 5);
    world.place_container(backing, Material::vanilla("chest"), 3);
    let shared = world.inventory(backing).expect("backing inventory");
    engine.api().register_location_inventory(
        &ext(),
        TARGET,
        provider(move |_| Some(Arc::clone(&shared))),
    );

    assert!(push(&engine, &world, "coal_ore").is_successful());
    assert_eq!(world.total(TARGET), 0);
    assert_eq!(world.count(backing, 0), 1);

    assert!(engine.api().unregister_location(TARGET));
    assert!(push(&engine, &world, "coal_ore").is_successful());
    assert_eq!(world.count(TARGET, 0), 1);
}
