//! Agent activation - per-tick ordering and behavior dispatch

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::crew::human_step;
use super::robots::robot_step;
use super::status::GlobalStatus;
use super::structures::structure_step;
use crate::components::{
    Equipment, EquipmentKind, Fire, GridPos, Human, Integrity, Robot, ZoneCode,
};
use crate::constants::StabilityThresholds;
use crate::facility::{Facility, OccupancyGrid};

/// How agents act when activated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorModel {
    /// Decay, fire, crew injury and robot repair work
    #[default]
    Standard,
    /// Agents do nothing; only aggregation and evaluation run
    Inert,
}

/// Read-only state every activation in a tick sees
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Status as aggregated at the end of the previous tick
    pub status: &'a GlobalStatus,
    pub thresholds: &'a StabilityThresholds,
    /// Cell of the first communications hub, if any
    pub hub: Option<GridPos>,
}

/// Cell of the first communications hub
pub fn hub_position(world: &World) -> Option<GridPos> {
    world
        .query::<(&Equipment, &GridPos)>()
        .iter()
        .find(|(_, (equipment, _))| equipment.kind == EquipmentKind::CommunicationsHub)
        .map(|(_, (_, pos))| *pos)
}

/// Every placed agent exactly once, in a fresh random order
pub fn activation_order(world: &World, rng: &mut impl Rng) -> Vec<Entity> {
    let mut agents: Vec<Entity> = world.query::<&GridPos>().iter().map(|(e, _)| e).collect();
    // Stable base order before shuffling
    agents.sort_unstable_by_key(|e| e.to_bits());
    agents.shuffle(rng);
    agents
}

/// Activate a single agent according to its capabilities
pub fn activate(
    model: BehaviorModel,
    world: &mut World,
    facility: &mut Facility,
    entity: Entity,
    ctx: &TickContext,
    rng: &mut impl Rng,
) {
    if model == BehaviorModel::Inert || !world.contains(entity) {
        return;
    }

    if world.get::<&Robot>(entity).is_ok() {
        robot_step(world, facility, entity, ctx, rng);
    } else if world.get::<&Human>(entity).is_ok() {
        human_step(world, facility, entity, ctx, rng);
    } else if world.get::<&Fire>(entity).is_ok() && world.get::<&Integrity>(entity).is_ok() {
        structure_step(world, &facility.grid, entity, ctx, rng);
    }
}

/// Activate every agent once in a shuffled order
pub fn run_activations(
    model: BehaviorModel,
    world: &mut World,
    facility: &mut Facility,
    ctx: &TickContext,
    rng: &mut impl Rng,
) -> usize {
    let order = activation_order(world, rng);
    for &entity in &order {
        activate(model, world, facility, entity, ctx, rng);
    }
    order.len()
}

/// Move an agent one cell, keeping the grid index and its position in sync
pub fn relocate(world: &mut World, grid: &mut OccupancyGrid, entity: Entity, to: GridPos) -> bool {
    let from = match world.get::<&GridPos>(entity) {
        Ok(pos) => *pos,
        Err(_) => return false,
    };
    if from == to || grid.move_agent(entity, from, to).is_err() {
        return false;
    }
    if let Ok(mut pos) = world.get::<&mut GridPos>(entity) {
        *pos = to;
    }
    true
}

/// Pick a random in-bounds neighbouring cell whose zone passes `allowed`
pub fn random_neighbor(
    facility: &Facility,
    pos: GridPos,
    allowed: impl Fn(ZoneCode) -> bool,
    rng: &mut impl Rng,
) -> Option<GridPos> {
    let candidates: Vec<GridPos> = pos
        .moore_neighbors()
        .filter(|&cell| facility.grid.in_bounds(cell))
        .filter(|&cell| facility.zones.zone_at(cell).is_some_and(&allowed))
        .collect();
    candidates.choose(rng).copied()
}
