//! Drives a workstation pack through a [`HopperEngine`] against an in-memory
//! world and logs every attempt.

use crate::config::{block_pos, TransferKind, WorkstationPack};
use anyhow::{Context, Result};
use recreator_core::{ExtensionId, ItemStack};
use recreator_hopper::{HopperEngine, TransferResult, TransferStatus};
use recreator_testkit::{JsonlSink, TestWorld, TransferRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Owner of everything a pack registers.
pub const PACK_EXTENSION: &str = "pack";

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub attempts: u64,
    pub success: u64,
    pub denied: u64,
    pub no_space: u64,
    pub empty: u64,
    pub pass_through: u64,
}

impl RunSummary {
    fn record(&mut self, status: TransferStatus) {
        self.attempts += 1;
        let counter = match status {
            TransferStatus::Success => &mut self.success,
            TransferStatus::Denied => &mut self.denied,
            TransferStatus::NoSpace => &mut self.no_space,
            TransferStatus::Empty => &mut self.empty,
            TransferStatus::PassThrough => &mut self.pass_through,
        };
        *counter += 1;
    }
}

/// Register the pack, build its world and run every transfer in order.
pub fn run(
    engine: &HopperEngine,
    pack: &WorkstationPack,
    sink: &mut JsonlSink,
) -> Result<(TestWorld, RunSummary)> {
    let owner = ExtensionId::new(PACK_EXTENSION);
    let api = engine.api();

    for def in &pack.workstations {
        let config = def
            .build()
            .with_context(|| format!("Invalid workstation {}", def.id))?;
        api.register_workstation(&owner, config);
    }
    for def in &pack.custom_workstations {
        let config = def
            .build()
            .with_context(|| format!("Invalid custom workstation {}", def.id))?;
        api.register_custom_workstation(&owner, config);
    }
    for def in &pack.hoppers {
        api.set_hopper_settings(&owner, block_pos(def.pos), def.settings());
    }

    let mut world = TestWorld::new();
    for def in &pack.blocks {
        let pos = block_pos(def.pos);
        match def.inventory_size {
            Some(size) => world.place_container(pos, def.material.clone(), size),
            None => world.place(pos, def.material.clone()),
        };
        for content in &def.contents {
            world
                .put(pos, content.slot, ItemStack::new(content.item.clone(), content.count))
                .with_context(|| format!("Failed to fill block at {pos}"))?;
        }
    }

    let mut summary = RunSummary::default();
    for (index, transfer) in pack.transfers.iter().enumerate() {
        let hopper_pos = block_pos(transfer.hopper);
        let target_pos = block_pos(transfer.target);
        let hopper = match world.block(hopper_pos) {
            Some(block) => block,
            None => world.place_hopper(hopper_pos),
        };
        let target = world
            .block(target_pos)
            .with_context(|| format!("Transfer #{index} targets empty position {target_pos}"))?;

        for _ in 0..transfer.repeat {
            let result = match (transfer.kind, &transfer.item) {
                (TransferKind::Push, Some(material)) => {
                    engine.push(&hopper, &target, &ItemStack::new(material.clone(), 1))
                }
                (TransferKind::Pull, _) => engine.pull(&hopper, &target),
                (TransferKind::Push, None) => {
                    anyhow::bail!("Transfer #{index} is a push without an item")
                }
            };
            let pulled = match transfer.kind {
                TransferKind::Pull => result.item().cloned(),
                TransferKind::Push => None,
            };
            let result = match pulled {
                Some(unit) if !world.deposit(hopper_pos, &unit) => {
                    let restored = result
                        .slot()
                        .is_some_and(|slot| world.restore(target_pos, slot, &unit));
                    if !restored {
                        anyhow::bail!(
                            "Transfer #{index} pulled {} into full hopper {hopper_pos} and could not return it",
                            unit.material
                        );
                    }
                    warn!(hopper = %hopper_pos, item = %unit.material, "hopper full, pulled item returned");
                    TransferResult::no_space()
                }
                _ => result,
            };
            debug!(index, kind = transfer.kind.as_str(), status = ?result.status(), "transfer");
            sink.write(&TransferRecord {
                step: summary.attempts,
                kind: transfer.kind.as_str(),
                hopper: hopper_pos,
                target: target_pos,
                result: &result,
            })?;
            summary.record(result.status());
        }
    }
    sink.flush()?;

    info!(
        attempts = summary.attempts,
        success = summary.success,
        "scenario finished"
    );
    Ok((world, summary))
}
