//! Facility construction from a zone grid - zone table and wall agents

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use crate::components::{CellBounds, Fire, GridPos, Integrity, Wall, WallKind, Zone, ZoneCode, ZoneTable};
use crate::error::{ConfigError, Result};
use crate::facility::{Facility, OccupancyGrid};

/// Map a uniform `[0, 1)` draw to a starting wall integrity.
///
/// 80% pristine, 10% slightly damaged, 5% moderately, 5% badly damaged.
pub fn sample_wall_integrity(draw: f64) -> f32 {
    if draw < 0.8 {
        100.0
    } else if draw < 0.9 {
        85.0
    } else if draw < 0.95 {
        70.0
    } else {
        55.0
    }
}

/// Resolve zone code names, failing on the first unknown one
pub fn parse_zone_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Vec<Vec<ZoneCode>>> {
    rows.iter()
        .map(|row| row.iter().map(|code| code.as_ref().parse()).collect())
        .collect()
}

/// Group cells into zones with half-open bounds and placement positions
pub fn build_zone_table(rows: &[Vec<ZoneCode>]) -> Result<ZoneTable> {
    check_rectangular(rows)?;
    let mut zones = ZoneTable::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, &code) in row.iter().enumerate() {
            let pos = GridPos::new(x as i32, y as i32);
            match zones.get_mut(code) {
                Some(zone) => zone.bounds.include(pos),
                None => zones.insert(Zone::new(code, pos)),
            }
            if !code.is_wall() {
                if let Some(zone) = zones.get_mut(code) {
                    zone.positions.push(pos);
                }
            }
        }
    }

    // Max corner becomes exclusive
    for zone in zones.iter_mut() {
        zone.bounds = CellBounds {
            max_x: zone.bounds.max_x + 1,
            max_y: zone.bounds.max_y + 1,
            ..zone.bounds
        };
    }

    Ok(zones)
}

/// Wall agents hosted by a cell of the given zone code
pub fn wall_kinds(code: ZoneCode) -> &'static [WallKind] {
    match code {
        ZoneCode::HabitatWall => &[WallKind::Interior, WallKind::Exterior],
        ZoneCode::PowerWall => &[WallKind::Power],
        _ => &[],
    }
}

/// Spawn a wall entity (not yet placed on any grid)
pub fn spawn_wall(world: &mut World, kind: WallKind, pos: GridPos, integrity: f32) -> Entity {
    world.spawn((pos, Wall { kind }, Integrity(integrity), Fire::default()))
}

/// Second pass: instantiate and place wall agents
pub fn spawn_walls(
    world: &mut World,
    grid: &mut OccupancyGrid,
    rows: &[Vec<ZoneCode>],
    rng: &mut impl Rng,
) -> Result<Vec<Entity>> {
    let mut walls = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, &code) in row.iter().enumerate() {
            let pos = GridPos::new(x as i32, y as i32);
            for &kind in wall_kinds(code) {
                let integrity = sample_wall_integrity(rng.gen::<f64>());
                let wall = spawn_wall(world, kind, pos, integrity);
                grid.place(wall, pos)?;
                walls.push(wall);
            }
        }
    }
    Ok(walls)
}

/// Build the complete facility: zone table, occupancy grid and walls
pub fn build_facility(
    world: &mut World,
    rows: &[Vec<ZoneCode>],
    rng: &mut impl Rng,
) -> Result<Facility> {
    let zones = build_zone_table(rows)?;
    let width = check_rectangular(rows)?;
    let mut grid = OccupancyGrid::new(width as i32, rows.len() as i32);
    let walls = spawn_walls(world, &mut grid, rows, rng)?;

    debug!(
        width,
        height = rows.len(),
        zones = zones.len(),
        walls = walls.len(),
        "facility built"
    );

    Ok(Facility { zones, grid })
}

fn check_rectangular(rows: &[Vec<ZoneCode>]) -> std::result::Result<usize, ConfigError> {
    let width = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(ConfigError::EmptyGrid),
    };
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != width {
            return Err(ConfigError::RaggedGrid {
                row,
                expected: width,
                found: cells.len(),
            });
        }
    }
    Ok(width)
}
