//! Crew behavior - injury from hazards, healing in the medical bay, wandering

use hecs::{Entity, World};
use rand::Rng;

use super::behavior::{random_neighbor, relocate, TickContext};
use crate::components::{Fire, GridPos, Health, OperatingEnvironment, ZoneCode};
use crate::constants::crew::*;
use crate::facility::{Facility, OccupancyGrid};

/// Does a burning structure share this cell?
pub fn cell_on_fire(world: &World, grid: &OccupancyGrid, pos: GridPos) -> bool {
    grid.agents_at(pos).iter().any(|&agent| {
        world
            .get::<&Fire>(agent)
            .is_ok_and(|fire| fire.is_burning())
    })
}

/// Is a human at `pos` exposed to something harmful this tick?
pub fn exposed(world: &World, grid: &OccupancyGrid, pos: GridPos, ctx: &TickContext) -> bool {
    ctx.status.atmospheric_condition < ctx.thresholds.atmosphere
        || ctx.status.contamination_level >= ctx.thresholds.contamination
        || cell_on_fire(world, grid, pos)
}

/// One activation of a crew member
pub fn human_step(
    world: &mut World,
    facility: &mut Facility,
    entity: Entity,
    ctx: &TickContext,
    rng: &mut impl Rng,
) {
    let Ok(pos) = world.get::<&GridPos>(entity).map(|p| *p) else {
        return;
    };
    let hazard = exposed(world, &facility.grid, pos, ctx);
    let in_medical_bay = facility.zones.zone_at(pos) == Some(ZoneCode::MedicalBay);

    let can_walk = {
        let Ok(mut health) = world.get::<&mut Health>(entity) else {
            return;
        };
        if !health.is_alive() {
            return;
        }
        if hazard {
            health.0 -= BASE_INJURE_RATE;
        } else if in_medical_bay {
            health.0 += BASE_HEALING_RATE;
        }
        health.0 = health.0.clamp(0.0, INITIAL_HEALTH);
        health.is_alive() && !health.is_critical(CRITICAL_HEALTH)
    };

    if can_walk {
        let walkable = |code: ZoneCode| OperatingEnvironment::Internal.can_access(code.environment());
        if let Some(next) = random_neighbor(facility, pos, walkable, rng) {
            relocate(world, &mut facility.grid, entity, next);
        }
    }
}
