//! Equipment, crew and robot population

use hecs::{Entity, World};
use rand::Rng;
use tracing::{info, warn};

use crate::components::*;
use crate::config::SimConfig;
use crate::constants::{crew, equipment};
use crate::error::Result;
use crate::facility::{Facility, OccupancyGrid};
use crate::layout::EquipmentPlacement;

use super::placement::{human_position, robot_position};

/// Entities created by [`populate`], in creation order
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub equipment: Vec<Entity>,
    pub humans: Vec<Entity>,
    pub robots: Vec<Entity>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.equipment.len() + self.humans.len() + self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn ranged((lo, hi): (u32, u32), rng: &mut impl Rng) -> f32 {
    rng.gen_range(lo..=hi) as f32
}

/// Roll the starting integrity of a piece of equipment
pub fn roll_equipment_integrity(kind: EquipmentKind, rng: &mut impl Rng) -> f32 {
    match kind {
        EquipmentKind::CommunicationsHub => equipment::COMMUNICATIONS_INTEGRITY,
        EquipmentKind::PowerDistributionHub => ranged(equipment::DISTRIBUTION_HUB_RANGE, rng),
        EquipmentKind::BatteryPack => {
            let integrity = ranged(equipment::BATTERY_RANGE, rng);
            if rng.gen_bool(equipment::BATTERY_FAILURE_CHANCE) {
                equipment::BATTERY_FAILED_INTEGRITY
            } else {
                integrity
            }
        }
        EquipmentKind::HazmatStorage => ranged(equipment::HAZMAT_RANGE, rng),
    }
}

/// Starting health of the `index`-th of `crew_size` humans
pub fn initial_health(index: u32, crew_size: u32) -> f32 {
    let injured = (crew_size as f64 * crew::INJURED_SHARE) as u32;
    if index < injured {
        crew::INJURED_HEALTH
    } else {
        crew::WOUNDED_HEALTH
    }
}

/// Put a freshly spawned agent on the grid, despawning it if the cell is invalid
fn place_spawned(
    world: &mut World,
    grid: &mut OccupancyGrid,
    entity: Entity,
    pos: GridPos,
) -> Result<Entity> {
    if let Err(e) = grid.place(entity, pos) {
        let _ = world.despawn(entity);
        return Err(e);
    }
    Ok(entity)
}

pub fn spawn_equipment(
    world: &mut World,
    grid: &mut OccupancyGrid,
    kind: EquipmentKind,
    pos: GridPos,
    integrity: f32,
) -> Result<Entity> {
    let entity = world.spawn((pos, Equipment { kind }, Integrity(integrity), Fire::default()));
    place_spawned(world, grid, entity, pos)
}

pub fn spawn_human(
    world: &mut World,
    grid: &mut OccupancyGrid,
    pos: GridPos,
    health: f32,
) -> Result<Entity> {
    let entity = world.spawn((pos, Human, Health(health)));
    place_spawned(world, grid, entity, pos)
}

pub fn spawn_robot(
    world: &mut World,
    grid: &mut OccupancyGrid,
    role: RobotRole,
    pos: GridPos,
) -> Result<Entity> {
    let entity = world.spawn((
        pos,
        Robot { role },
        RobotState::default(),
        NetworkLink::default(),
    ));
    place_spawned(world, grid, entity, pos)
}

/// Populate the facility: equipment first (layout order), then the crew,
/// then robots in role-name order.
pub fn populate(
    world: &mut World,
    facility: &mut Facility,
    equipment_list: &[EquipmentPlacement],
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<Population> {
    config.validate()?;
    let roster = config.robot_roster()?;
    let mut population = Population::default();

    for placement in equipment_list {
        let integrity = match placement.integrity {
            Some(fixed) => fixed,
            None => roll_equipment_integrity(placement.kind, rng),
        };
        let entity = spawn_equipment(
            world,
            &mut facility.grid,
            placement.kind,
            placement.pos,
            integrity,
        )?;
        population.equipment.push(entity);
    }

    if !equipment_list
        .iter()
        .any(|p| p.kind == EquipmentKind::CommunicationsHub)
    {
        warn!("facility has no communications hub; robots will never connect");
    }

    for i in 0..config.crew_size {
        let pos = human_position(&facility.zones, rng)?;
        let health = initial_health(i, config.crew_size);
        population
            .humans
            .push(spawn_human(world, &mut facility.grid, pos, health)?);
    }

    for (role, count) in roster {
        for i in 0..count as usize {
            let pos = robot_position(&facility.zones, role, i, rng)?;
            population
                .robots
                .push(spawn_robot(world, &mut facility.grid, role, pos)?);
        }
    }

    info!(
        equipment = population.equipment.len(),
        humans = population.humans.len(),
        robots = population.robots.len(),
        "population created"
    );

    Ok(population)
}
