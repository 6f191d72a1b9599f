//! Property tests for facility construction over random zone grids.

use hecs::World;
use marsbase_core::generation::{build_facility, build_zone_table};
use marsbase_core::prelude::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn zone_grid() -> impl Strategy<Value = Vec<Vec<ZoneCode>>> {
    (1usize..8, 1usize..8).prop_flat_map(|(width, height)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(ZoneCode::ALL.to_vec()), width),
            height,
        )
    })
}

proptest! {
    #[test]
    fn every_cell_lies_inside_its_zone(rows in zone_grid()) {
        let zones = build_zone_table(&rows).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let zone = zones.get(code).unwrap();
                prop_assert!(zone.bounds.contains(pos));
                prop_assert!(zones.zone_at(pos).is_some());
            }
        }
    }

    #[test]
    fn positions_skip_wall_cells(rows in zone_grid()) {
        let zones = build_zone_table(&rows).unwrap();
        for zone in zones.iter() {
            if zone.code.is_wall() {
                prop_assert!(zone.positions.is_empty());
            }
            for &pos in &zone.positions {
                prop_assert_eq!(rows[pos.y as usize][pos.x as usize], zone.code);
            }
        }

        let open_cells = rows.iter().flatten().filter(|c| !c.is_wall()).count();
        let positions: usize = zones.iter().map(|z| z.positions.len()).sum();
        prop_assert_eq!(positions, open_cells);
    }

    #[test]
    fn wall_count_matches_wall_cells(rows in zone_grid(), seed in any::<u64>()) {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let facility = build_facility(&mut world, &rows, &mut rng).unwrap();

        let cells = rows.iter().flatten();
        let habitat_walls = cells.clone().filter(|&&c| c == ZoneCode::HabitatWall).count();
        let power_walls = cells.filter(|&&c| c == ZoneCode::PowerWall).count();

        let walls = world.query::<&Wall>().iter().count();
        prop_assert_eq!(walls, 2 * habitat_walls + power_walls);
        prop_assert_eq!(facility.grid.occupancy(), walls);

        for (_, (integrity, fire)) in world.query::<(&Integrity, &Fire)>().iter() {
            prop_assert!([100.0, 85.0, 70.0, 55.0].contains(&integrity.0));
            prop_assert_eq!(fire.intensity, 0.0);
        }
    }
}
