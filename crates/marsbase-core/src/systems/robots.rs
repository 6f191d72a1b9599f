//! Robot behavior - energy, hub connectivity, task claiming and repair work
//!
//! A connected idle robot claims the nearest unclaimed target its role can
//! service, walks to it one king move per tick and works on it once
//! adjacent. Disconnected robots only see work within `DETECTION_RADIUS` and
//! otherwise search their operational zones.

use std::collections::HashSet;

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use super::behavior::{random_neighbor, relocate, TickContext};
use crate::components::*;
use crate::constants::robot::*;
use crate::constants::{crew, structure, StabilityThresholds};
use crate::facility::Facility;

/// Drain or recharge energy. Returns `false` when the robot spends the tick
/// charging.
pub fn update_energy(state: &mut RobotState) -> bool {
    if state.is_recharging {
        state.energy = (state.energy + RECHARGE_RATE).min(INITIAL_ENERGY);
        if state.energy >= INITIAL_ENERGY {
            state.is_recharging = false;
        }
        return false;
    }

    state.energy = (state.energy - ENERGY_DRAIN_RATE).max(0.0);
    if state.energy < LOW_ENERGY {
        state.is_recharging = true;
        state.current_task = None;
        return false;
    }
    true
}

/// Is a robot at `pos` with `range` in contact with the hub?
pub fn in_contact(pos: GridPos, range: i32, ctx: &TickContext) -> bool {
    ctx.status.communications_online && ctx.hub.is_some_and(|hub| hub.chebyshev(&pos) <= range)
}

fn damaged(world: &World, target: Entity, thresholds: &StabilityThresholds) -> bool {
    world
        .get::<&Integrity>(target)
        .is_ok_and(|integrity| integrity.0 < thresholds.structure)
}

fn wall_kind(world: &World, target: Entity) -> Option<WallKind> {
    world.get::<&Wall>(target).ok().map(|wall| wall.kind)
}

fn equipment_kind(world: &World, target: Entity) -> Option<EquipmentKind> {
    world.get::<&Equipment>(target).ok().map(|equipment| equipment.kind)
}

/// Does `target` currently need work of kind `capability`?
pub fn needs_work(
    world: &World,
    target: Entity,
    capability: Capability,
    thresholds: &StabilityThresholds,
) -> bool {
    match capability {
        Capability::FirstAid => world
            .get::<&Health>(target)
            .is_ok_and(|health| health.is_critical(crew::CRITICAL_HEALTH)),
        Capability::Fire => world
            .get::<&Fire>(target)
            .is_ok_and(|fire| fire.is_burning()),
        Capability::Hazard => {
            equipment_kind(world, target) == Some(EquipmentKind::HazmatStorage)
                && damaged(world, target, thresholds)
        }
        Capability::WallInterior => {
            wall_kind(world, target) == Some(WallKind::Interior) && damaged(world, target, thresholds)
        }
        Capability::WallExterior => {
            wall_kind(world, target) == Some(WallKind::Exterior) && damaged(world, target, thresholds)
        }
        Capability::Power => {
            let power_equipment = matches!(
                equipment_kind(world, target),
                Some(EquipmentKind::BatteryPack | EquipmentKind::PowerDistributionHub)
            );
            (power_equipment || wall_kind(world, target) == Some(WallKind::Power))
                && damaged(world, target, thresholds)
        }
        Capability::Control => {
            equipment_kind(world, target) == Some(EquipmentKind::CommunicationsHub)
                && damaged(world, target, thresholds)
        }
    }
}

/// Nearest target no other robot has claimed that `role` can service,
/// optionally limited to `reach` cells. Ties go to the lower entity id.
pub fn find_task(
    world: &World,
    robot: Entity,
    pos: GridPos,
    role: RobotRole,
    reach: Option<i32>,
    thresholds: &StabilityThresholds,
) -> Option<Task> {
    let claimed: HashSet<Entity> = world
        .query::<&RobotState>()
        .iter()
        .filter(|(other, _)| *other != robot)
        .filter_map(|(_, state)| state.current_task.map(|task| task.target))
        .collect();

    let mut best: Option<((i32, u64), Task)> = None;
    for (target, target_pos) in world.query::<&GridPos>().iter() {
        let distance = pos.chebyshev(target_pos);
        if target == robot
            || claimed.contains(&target)
            || reach.is_some_and(|reach| distance > reach)
        {
            continue;
        }
        let Some(&capability) = role
            .capabilities()
            .iter()
            .find(|&&capability| needs_work(world, target, capability, thresholds))
        else {
            continue;
        };
        let key = (distance, target.to_bits().get());
        if best.map_or(true, |(best_key, _)| key < best_key) {
            best = Some((key, Task { target, capability }));
        }
    }
    best.map(|(_, task)| task)
}

/// Apply one tick of work to the task's target
pub fn perform(world: &World, task: Task) {
    match task.capability {
        Capability::FirstAid => {
            if let Ok(mut health) = world.get::<&mut Health>(task.target) {
                health.0 = (health.0 + structure::BASE_FIX_RATE).min(crew::INITIAL_HEALTH);
            }
        }
        Capability::Fire => {
            if let Ok(mut fire) = world.get::<&mut Fire>(task.target) {
                fire.intensity = (fire.intensity - structure::FIRE_SUPPRESSION_RATE).max(0.0);
            }
        }
        _ => {
            if let Ok(mut integrity) = world.get::<&mut Integrity>(task.target) {
                integrity.repair(structure::BASE_FIX_RATE);
            }
        }
    }
}

fn set_task(world: &World, robot: Entity, task: Option<Task>) {
    if let Ok(mut state) = world.get::<&mut RobotState>(robot) {
        state.current_task = task;
    }
}

/// One activation of a robot
pub fn robot_step(
    world: &mut World,
    facility: &mut Facility,
    entity: Entity,
    ctx: &TickContext,
    rng: &mut impl Rng,
) {
    let (Ok(pos), Ok(role)) = (
        world.get::<&GridPos>(entity).map(|p| *p),
        world.get::<&Robot>(entity).map(|r| r.role),
    ) else {
        return;
    };

    let current = {
        let Ok(mut state) = world.get::<&mut RobotState>(entity) else {
            return;
        };
        if !update_energy(&mut state) {
            return;
        }
        state.current_task
    };

    let connected = match world.get::<&mut NetworkLink>(entity) {
        Ok(mut link) => {
            link.connected = in_contact(pos, link.range, ctx);
            link.connected
        }
        Err(_) => true,
    };

    // Drop tasks whose target vanished or was restored by someone else
    let current = current.filter(|task| {
        world.contains(task.target) && needs_work(world, task.target, task.capability, ctx.thresholds)
    });

    let task = match current {
        Some(task) => Some(task),
        None => {
            let reach = (!connected).then_some(DETECTION_RADIUS);
            let claimed = find_task(world, entity, pos, role, reach, ctx.thresholds);
            if let Some(task) = claimed {
                debug!(robot = ?entity, %role, target = ?task.target, capability = ?task.capability, connected, "task claimed");
            }
            claimed
        }
    };
    set_task(world, entity, task);

    let Some(task) = task else {
        if !connected {
            let zones = role.operational_zones();
            if let Some(next) = random_neighbor(facility, pos, |code| zones.contains(&code), rng) {
                relocate(world, &mut facility.grid, entity, next);
            }
        }
        return;
    };

    let Ok(target_pos) = world.get::<&GridPos>(task.target).map(|p| *p) else {
        set_task(world, entity, None);
        return;
    };
    if pos.chebyshev(&target_pos) > 1 {
        relocate(world, &mut facility.grid, entity, pos.step_towards(&target_pos));
        return;
    }

    perform(world, task);
    if !needs_work(world, task.target, task.capability, ctx.thresholds) {
        set_task(world, entity, None);
    }
}
