//! Property-based tests for transfer routing
//!
//! Validates routing invariants:
//! - A single push or pull moves at most one unit
//! - Blocks without an enabled configuration are never touched
//! - Custom input admission is the union of its sources

use proptest::prelude::*;
use recreator_core::{BlockPos, ExtensionId, ItemStack, Material};
use recreator_hopper::{
    CustomWorkstationConfig, HopperEngine, RecipeGroup, TransferStatus, WorkstationConfig,
};
use recreator_testkit::{stack, TestWorld};

const TARGET: BlockPos = BlockPos::new(0, 64, 0);
const HOPPER: BlockPos = BlockPos::new(0, 65, 0);

const PATHS: &[&str] = &[
    "coal",
    "coal_ore",
    "dirt",
    "cobblestone",
    "oak_log",
    "soul_sand",
    "magma_block",
    "blaze_rod",
    "iron_ingot",
    "diamond_sword",
];

fn material() -> impl Strategy<Value = Material> {
    prop::sample::select(PATHS).prop_map(Material::vanilla)
}

fn materials() -> impl Strategy<Value = Vec<Material>> {
    prop::collection::vec(material(), 0..4)
}

#[derive(Debug, Clone)]
enum Op {
    Push(Material),
    Pull,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => material().prop_map(Op::Push),
        1 => Just(Op::Pull),
    ]
}

proptest! {
    /// Property: every attempt changes the target total by exactly one on
    /// success and by nothing otherwise.
    #[test]
    fn at_most_one_unit_moves(
        ops in prop::collection::vec(op(), 1..40),
        seed_output in 0u32..4,
    ) {
        let engine = HopperEngine::new();
        engine.api().register_workstation(
            &ExtensionId::new("prop"),
            WorkstationConfig::builder("furnace")
                .material(Material::vanilla("furnace"))
                .input_slot(0)
                .fuel_slot(1)
                .output_slot(2)
                .build()
                .unwrap(),
        );
        let mut world = TestWorld::new();
        let target = world.place_container(TARGET, Material::vanilla("furnace"), 3);
        let hopper = world.place_hopper(HOPPER);
        if seed_output > 0 {
            world.put(TARGET, 2, stack("iron_ingot", seed_output)).unwrap();
        }

        for op in ops {
            let before = world.total(TARGET);
            let result = match &op {
                Op::Push(material) => engine.push(&hopper, &target, &ItemStack::new(material.clone(), 16)),
                Op::Pull => engine.pull(&hopper, &target),
            };
            let after = world.total(TARGET);

            match (&op, result.is_successful()) {
                (Op::Push(_), true) => {
                    prop_assert_eq!(after, before + 1);
                }
                (Op::Pull, true) => {
                    prop_assert_eq!(after + 1, before);
                }
                (_, false) => {
                    prop_assert_eq!(after, before);
                }
            }
            if let Some(item) = result.item() {
                prop_assert_eq!(item.count, 1);
            }
        }
    }

    /// Property: an unconfigured block always passes through untouched.
    #[test]
    fn unconfigured_blocks_pass_through(
        item in material(),
        prefill in prop::option::of(material()),
        configured in material(),
    ) {
        let engine = HopperEngine::new();
        engine.api().register_workstation(
            &ExtensionId::new("prop"),
            WorkstationConfig::builder("other")
                .material(configured)
                .input_slot(0)
                .output_slot(0)
                .build()
                .unwrap(),
        );
        let mut world = TestWorld::new();
        let target = world.place_container(TARGET, Material::vanilla("chest"), 3);
        let hopper = world.place_hopper(HOPPER);
        if let Some(prefill) = prefill {
            world.put(TARGET, 0, ItemStack::new(prefill, 3)).unwrap();
        }
        let snapshot: Vec<_> = (0..3).map(|slot| world.stack(TARGET, slot)).collect();

        let pushed = engine.push(&hopper, &target, &ItemStack::new(item, 1));
        let pulled = engine.pull(&hopper, &target);
        prop_assert_eq!(pushed.status(), TransferStatus::PassThrough);
        prop_assert_eq!(pulled.status(), TransferStatus::PassThrough);
        prop_assert!(!pushed.should_cancel());

        let after: Vec<_> = (0..3).map(|slot| world.stack(TARGET, slot)).collect();
        prop_assert_eq!(snapshot, after);
    }

    /// Property: input admission is vanilla mode, or the general inputs, or
    /// any group's inputs, with everything open when nothing is declared.
    #[test]
    fn input_admission_is_union_of_sources(
        vanilla in any::<bool>(),
        general in materials(),
        groups in prop::collection::vec(materials(), 0..3),
        item in material(),
    ) {
        let mut builder = CustomWorkstationConfig::builder("union")
            .material(Material::vanilla("smoker"))
            .input_slot(0)
            .vanilla_recipes(vanilla)
            .general_input(general.clone());
        for (index, inputs) in groups.iter().enumerate() {
            builder = builder.recipe_group(
                RecipeGroup::builder(format!("group_{index}"))
                    .input(inputs.clone())
                    .build(),
            );
        }
        let config = builder.build().unwrap();

        let expected = vanilla
            || general.contains(&item)
            || groups.iter().any(|inputs| inputs.contains(&item))
            || (general.is_empty() && groups.is_empty());
        prop_assert_eq!(config.can_accept_input(&ItemStack::new(item, 1)), expected);
    }
}
