//! Global status aggregation - facility-wide physical metrics

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::{Equipment, EquipmentKind, Fire, Integrity, Wall, WallKind};
use crate::constants::{atmosphere, StabilityThresholds};

/// Facility-wide state derived from the agent population once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatus {
    /// Mean integrity of power walls and battery packs
    pub power_level: f32,
    /// Cumulative; only ever decreases and is not clamped
    pub atmospheric_condition: f32,
    pub contamination_level: f32,
    pub communications_online: bool,
    pub fire_alarm_on: bool,
}

impl GlobalStatus {
    pub fn new(thresholds: &StabilityThresholds) -> Self {
        Self {
            power_level: thresholds.power - 10.0,
            atmospheric_condition: 100.0,
            contamination_level: 0.0,
            communications_online: false,
            fire_alarm_on: false,
        }
    }
}

impl Default for GlobalStatus {
    fn default() -> Self {
        Self::new(&StabilityThresholds::default())
    }
}

/// Is the first communications hub above the online threshold?
pub fn communications_online(world: &World, thresholds: &StabilityThresholds) -> bool {
    world
        .query::<(&Equipment, &Integrity)>()
        .iter()
        .find(|(_, (equipment, _))| equipment.kind == EquipmentKind::CommunicationsHub)
        .is_some_and(|(_, (_, integrity))| integrity.0 > thresholds.communications)
}

pub fn any_fire(world: &World) -> bool {
    world.query::<&Fire>().iter().any(|(_, fire)| fire.is_burning())
}

/// Mean integrity over power walls and battery packs, 0 when there are none
pub fn power_level(world: &World) -> f32 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for (_, (wall, integrity)) in world.query::<(&Wall, &Integrity)>().iter() {
        if wall.kind == WallKind::Power {
            sum += integrity.0;
            count += 1;
        }
    }
    for (_, (equipment, integrity)) in world.query::<(&Equipment, &Integrity)>().iter() {
        if equipment.kind == EquipmentKind::BatteryPack {
            sum += integrity.0;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Contamination as a fraction (1.0 == 100%) from hazmat storage damage
pub fn contamination_fraction(world: &World) -> f32 {
    let total: f32 = world
        .query::<(&Equipment, &Integrity)>()
        .iter()
        .filter(|(_, (equipment, _))| equipment.kind == EquipmentKind::HazmatStorage)
        .map(|(_, (_, integrity))| 100.0 - integrity.0)
        .sum();
    if total > 0.0 {
        total / (100.0 * atmosphere::CONTAMINATION_WEIGHT)
    } else {
        0.0
    }
}

/// Atmosphere lost this tick to breached interior walls, fires and contamination
pub fn atmosphere_decrease(world: &World) -> f32 {
    let mut decrease = 0.0;

    let mut damage = 0.0;
    let mut damaged = 0usize;
    for (_, (wall, integrity)) in world.query::<(&Wall, &Integrity)>().iter() {
        if wall.kind == WallKind::Interior && integrity.0 < 100.0 {
            damage += 100.0 - integrity.0;
            damaged += 1;
        }
    }
    if damaged > 0 {
        decrease += damage / (100.0 * damaged as f32 * atmosphere::WALL_DAMAGE_WEIGHT);
    }

    let fire: f32 = world.query::<&Fire>().iter().map(|(_, f)| f.intensity).sum();
    if fire > 0.0 {
        decrease += fire / atmosphere::FIRE_DIVISOR;
    }

    decrease + contamination_fraction(world)
}

/// Recompute `status` from the current population.
///
/// Read-only over agents. The fire alarm reads the power level from before
/// this update.
pub fn update_status(world: &World, status: &mut GlobalStatus, thresholds: &StabilityThresholds) {
    status.communications_online = communications_online(world, thresholds);
    status.fire_alarm_on = status.power_level > 0.0 && any_fire(world);
    status.power_level = power_level(world);
    status.contamination_level = contamination_fraction(world) * 100.0;
    status.atmospheric_condition -= atmosphere_decrease(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GridPos;

    fn wall(world: &mut World, kind: WallKind, integrity: f32, intensity: f32) {
        world.spawn((
            GridPos::new(0, 0),
            Wall { kind },
            Integrity(integrity),
            Fire { intensity },
        ));
    }

    fn equipment(world: &mut World, kind: EquipmentKind, integrity: f32) {
        world.spawn((
            GridPos::new(0, 0),
            Equipment { kind },
            Integrity(integrity),
            Fire::default(),
        ));
    }

    #[test]
    fn test_initial_status() {
        let status = GlobalStatus::default();
        assert_eq!(status.power_level, 60.0);
        assert_eq!(status.atmospheric_condition, 100.0);
        assert_eq!(status.contamination_level, 0.0);
        assert!(!status.communications_online);
        assert!(!status.fire_alarm_on);
    }

    #[test]
    fn test_empty_world() {
        let world = World::new();
        let thresholds = StabilityThresholds::default();
        let mut status = GlobalStatus::default();
        update_status(&world, &mut status, &thresholds);
        assert_eq!(status.power_level, 0.0);
        assert_eq!(status.atmospheric_condition, 100.0);
        assert!(!status.communications_online);
    }

    #[test]
    fn test_power_is_mean_of_power_walls_and_batteries() {
        let mut world = World::new();
        wall(&mut world, WallKind::Power, 100.0, 0.0);
        wall(&mut world, WallKind::Interior, 10.0, 0.0);
        equipment(&mut world, EquipmentKind::BatteryPack, 40.0);
        equipment(&mut world, EquipmentKind::HazmatStorage, 100.0);
        assert_eq!(power_level(&world), 70.0);
    }

    #[test]
    fn test_communications_threshold_is_strict() {
        let thresholds = StabilityThresholds::default();
        let mut world = World::new();
        equipment(&mut world, EquipmentKind::CommunicationsHub, 50.0);
        assert!(!communications_online(&world, &thresholds));

        let mut world = World::new();
        equipment(&mut world, EquipmentKind::CommunicationsHub, 50.5);
        assert!(communications_online(&world, &thresholds));
    }

    #[test]
    fn test_atmosphere_decrease_components() {
        let mut world = World::new();
        // two interior walls at 80 and 60: sum 60, count 2 -> 60 / 1600
        wall(&mut world, WallKind::Interior, 80.0, 0.0);
        wall(&mut world, WallKind::Interior, 60.0, 0.0);
        // exterior damage does not leak atmosphere
        wall(&mut world, WallKind::Exterior, 0.0, 0.0);
        let walls_only = atmosphere_decrease(&world);
        assert!((walls_only - 60.0 / 1600.0).abs() < 1e-6);

        // fire of total intensity 80 -> 0.1
        wall(&mut world, WallKind::Power, 100.0, 80.0);
        // hazmat at 70 -> 30 / 600 = 0.05
        equipment(&mut world, EquipmentKind::HazmatStorage, 70.0);
        let total = atmosphere_decrease(&world);
        assert!((total - (60.0 / 1600.0 + 0.1 + 0.05)).abs() < 1e-6);
        assert!((contamination_fraction(&world) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_fire_alarm_reads_previous_power() {
        let thresholds = StabilityThresholds::default();
        let mut world = World::new();
        // Burning battery at 0 integrity: power drops to 0 this tick
        world.spawn((
            GridPos::new(0, 0),
            Equipment {
                kind: EquipmentKind::BatteryPack,
            },
            Integrity(0.0),
            Fire { intensity: 20.0 },
        ));
        let mut status = GlobalStatus::default();

        update_status(&world, &mut status, &thresholds);
        assert!(status.fire_alarm_on, "previous power was 60");
        assert_eq!(status.power_level, 0.0);

        update_status(&world, &mut status, &thresholds);
        assert!(!status.fire_alarm_on, "previous power was 0");
    }

    #[test]
    fn test_contamination_level_percent() {
        let thresholds = StabilityThresholds::default();
        let mut world = World::new();
        equipment(&mut world, EquipmentKind::HazmatStorage, 40.0);
        let mut status = GlobalStatus::default();
        update_status(&world, &mut status, &thresholds);
        assert!((status.contamination_level - 10.0).abs() < 1e-4);
        assert!((status.atmospheric_condition - 99.9).abs() < 1e-4);
    }
}
