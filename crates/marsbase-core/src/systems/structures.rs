//! Structural decay and fire dynamics for walls and equipment

use hecs::{Entity, World};
use rand::Rng;

use super::behavior::TickContext;
use crate::components::{Fire, GridPos, Integrity};
use crate::constants::structure::*;
use crate::facility::OccupancyGrid;

/// What a burning structure does to its surroundings this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireSpread {
    pub damage_neighbors: bool,
    pub ignite_neighbors: bool,
}

/// Advance a fire by one tick. Returns how it spreads.
pub fn burn(integrity: &mut Integrity, fire: &mut Fire) -> FireSpread {
    if !fire.is_burning() {
        return FireSpread::default();
    }
    if integrity.0 <= 0.0 {
        fire.intensity = 0.0;
        return FireSpread::default();
    }

    fire.intensity = (fire.intensity + FIRE_INTENSITY_INCREASE_RATE).min(MAX_FIRE_INTENSITY);
    integrity.damage(fire.intensity * FIRE_DAMAGE_FACTOR);

    let spread = FireSpread {
        damage_neighbors: true,
        ignite_neighbors: fire.intensity >= FIRE_SPREAD_INTENSITY,
    };
    // Nothing left to burn
    if integrity.0 <= 0.0 {
        fire.intensity = 0.0;
    }
    spread
}

/// Structures adjacent to `pos` lose one deterioration step
pub fn spread_damage(world: &World, grid: &OccupancyGrid, pos: GridPos, radius: i32) {
    for neighbor in grid.neighbors(pos, radius) {
        if let Ok(mut integrity) = world.get::<&mut Integrity>(neighbor) {
            integrity.damage(BASE_DETERIORATION_RATE);
        }
    }
}

/// Ignite every non-burning structure within the spread radius
pub fn spread_fire(world: &World, grid: &OccupancyGrid, pos: GridPos, structure_threshold: f32) {
    for neighbor in grid.neighbors(pos, FIRE_SPREAD_RADIUS) {
        let Ok(mut fire) = world.get::<&mut Fire>(neighbor) else {
            continue;
        };
        if fire.is_burning() {
            continue;
        }
        fire.intensity = IGNITION_INTENSITY;
        if let Ok(mut integrity) = world.get::<&mut Integrity>(neighbor) {
            integrity.0 = integrity.0.min(structure_threshold - 1.0);
        }
    }
}

/// One activation of a wall or piece of equipment
pub fn structure_step(
    world: &mut World,
    grid: &OccupancyGrid,
    entity: Entity,
    ctx: &TickContext,
    rng: &mut impl Rng,
) {
    let Ok(pos) = world.get::<&GridPos>(entity).map(|p| *p) else {
        return;
    };

    let spread = {
        let (Ok(mut integrity), Ok(mut fire)) = (
            world.get::<&mut Integrity>(entity),
            world.get::<&mut Fire>(entity),
        ) else {
            return;
        };

        if rng.gen_bool(EQUIPMENT_DAMAGE_CHANCE) {
            integrity.damage(BASE_DETERIORATION_RATE);
        }

        if fire.is_burning() {
            burn(&mut integrity, &mut fire)
        } else {
            if integrity.0 > 0.0
                && integrity.0 < IGNITION_INTEGRITY
                && rng.gen_bool(FIRE_IGNITION_CHANCE)
            {
                fire.intensity = IGNITION_INTENSITY;
            }
            FireSpread::default()
        }
    };

    if spread.damage_neighbors {
        spread_damage(world, grid, pos, 1);
    }
    if spread.ignite_neighbors {
        spread_fire(world, grid, pos, ctx.thresholds.structure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Human, Wall, WallKind};
    use crate::constants::StabilityThresholds;
    use crate::systems::GlobalStatus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn wall_at(
        world: &mut World,
        grid: &mut OccupancyGrid,
        pos: GridPos,
        integrity: f32,
        intensity: f32,
    ) -> Entity {
        let e = world.spawn((
            pos,
            Wall {
                kind: WallKind::Interior,
            },
            Integrity(integrity),
            Fire { intensity },
        ));
        grid.place(e, pos).unwrap();
        e
    }

    #[test]
    fn test_burn_grows_and_damages() {
        let mut integrity = Integrity(50.0);
        let mut fire = Fire { intensity: 10.0 };
        let spread = burn(&mut integrity, &mut fire);
        assert_eq!(fire.intensity, 12.0);
        assert!((integrity.0 - (50.0 - 12.0 * 0.05)).abs() < 1e-5);
        assert!(spread.damage_neighbors);
        assert!(!spread.ignite_neighbors);
    }

    #[test]
    fn test_burn_caps_and_spreads() {
        let mut integrity = Integrity(90.0);
        let mut fire = Fire { intensity: 99.0 };
        let spread = burn(&mut integrity, &mut fire);
        assert_eq!(fire.intensity, MAX_FIRE_INTENSITY);
        assert!(spread.ignite_neighbors);

        let mut fire = Fire { intensity: 48.0 };
        assert!(burn(&mut Integrity(90.0), &mut fire).ignite_neighbors);
    }

    #[test]
    fn test_burn_out() {
        let mut integrity = Integrity(0.5);
        let mut fire = Fire { intensity: 40.0 };
        burn(&mut integrity, &mut fire);
        assert_eq!(integrity.0, 0.0);
        assert!(!fire.is_burning());

        let spread = burn(&mut Integrity(0.0), &mut Fire { intensity: 30.0 });
        assert_eq!(spread, FireSpread::default());
    }

    #[test]
    fn test_not_burning_is_untouched() {
        let mut integrity = Integrity(10.0);
        let mut fire = Fire::default();
        assert_eq!(burn(&mut integrity, &mut fire), FireSpread::default());
        assert_eq!(integrity.0, 10.0);
    }

    #[test]
    fn test_spread_damage_hits_structures_only() {
        let mut world = World::new();
        let mut grid = OccupancyGrid::new(4, 4);
        let source = wall_at(&mut world, &mut grid, GridPos::new(1, 1), 100.0, 60.0);
        let near = wall_at(&mut world, &mut grid, GridPos::new(2, 2), 100.0, 0.0);
        let far = wall_at(&mut world, &mut grid, GridPos::new(3, 3), 100.0, 0.0);
        let human = world.spawn((GridPos::new(0, 0), Human, Health(50.0)));
        grid.place(human, GridPos::new(0, 0)).unwrap();

        spread_damage(&world, &grid, GridPos::new(1, 1), 1);
        assert_eq!(world.get::<&Integrity>(source).unwrap().0, 100.0);
        assert_eq!(world.get::<&Integrity>(near).unwrap().0, 99.0);
        assert_eq!(world.get::<&Integrity>(far).unwrap().0, 100.0);
        assert_eq!(world.get::<&Health>(human).unwrap().0, 50.0);
    }

    #[test]
    fn test_spread_fire_ignites_within_radius() {
        let mut world = World::new();
        let mut grid = OccupancyGrid::new(6, 6);
        let burning = wall_at(&mut world, &mut grid, GridPos::new(0, 0), 100.0, 70.0);
        let in_range = wall_at(&mut world, &mut grid, GridPos::new(3, 2), 100.0, 0.0);
        let weak = wall_at(&mut world, &mut grid, GridPos::new(1, 0), 40.0, 0.0);
        let out_of_range = wall_at(&mut world, &mut grid, GridPos::new(4, 0), 100.0, 0.0);

        spread_fire(&world, &grid, GridPos::new(0, 0), 80.0);

        assert_eq!(world.get::<&Fire>(burning).unwrap().intensity, 70.0);
        assert_eq!(world.get::<&Fire>(in_range).unwrap().intensity, IGNITION_INTENSITY);
        assert_eq!(world.get::<&Integrity>(in_range).unwrap().0, 79.0);
        assert_eq!(world.get::<&Integrity>(weak).unwrap().0, 40.0);
        assert!(world.get::<&Fire>(weak).unwrap().is_burning());
        assert!(!world.get::<&Fire>(out_of_range).unwrap().is_burning());
    }

    #[test]
    fn test_structure_step_propagates_fire() {
        let thresholds = StabilityThresholds::default();
        let status = GlobalStatus::default();
        let ctx = TickContext {
            status: &status,
            thresholds: &thresholds,
            hub: None,
        };
        let mut world = World::new();
        let mut grid = OccupancyGrid::new(3, 1);
        let source = wall_at(&mut world, &mut grid, GridPos::new(0, 0), 100.0, 60.0);
        let target = wall_at(&mut world, &mut grid, GridPos::new(2, 0), 100.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        structure_step(&mut world, &grid, source, &ctx, &mut rng);

        assert_eq!(world.get::<&Fire>(source).unwrap().intensity, 62.0);
        assert!(world.get::<&Integrity>(source).unwrap().0 < 97.0);
        assert!(world.get::<&Fire>(target).unwrap().is_burning());
    }

    #[test]
    fn test_weak_structures_eventually_ignite() {
        let thresholds = StabilityThresholds::default();
        let status = GlobalStatus::default();
        let ctx = TickContext {
            status: &status,
            thresholds: &thresholds,
            hub: None,
        };
        let mut world = World::new();
        let mut grid = OccupancyGrid::new(1, 1);
        let wall = wall_at(&mut world, &mut grid, GridPos::new(0, 0), 29.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        let mut ignited = false;
        for _ in 0..500 {
            structure_step(&mut world, &grid, wall, &ctx, &mut rng);
            ignited |= world.get::<&Fire>(wall).unwrap().is_burning();
        }
        assert!(ignited);
    }
}
