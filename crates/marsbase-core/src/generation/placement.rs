//! Zone-aware placement of new agents.
//!
//! Humans are dropped into a randomly chosen preferred zone. Robots are dealt
//! round-robin across their role's operational zones, so large fleets spread
//! evenly, while the cell inside the chosen zone is still random.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{GridPos, RobotRole, ZoneCode, ZoneTable};
use crate::error::PlacementError;

/// Zones humans start in, in preference order
pub const HUMAN_PREFERRED_ZONES: [ZoneCode; 2] = [ZoneCode::Lab, ZoneCode::Habitat];

/// What is being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRequest {
    Human,
    /// The `index`-th robot of `role`
    Robot { role: RobotRole, index: usize },
    /// Anywhere inside a specific zone
    InZone(ZoneCode),
}

/// Choose a cell for a new agent
pub fn place(
    zones: &ZoneTable,
    request: PlacementRequest,
    rng: &mut impl Rng,
) -> Result<GridPos, PlacementError> {
    match request {
        PlacementRequest::Human => human_position(zones, rng),
        PlacementRequest::Robot { role, index } => robot_position(zones, role, index, rng),
        PlacementRequest::InZone(code) => position_in_zone(zones, code, rng),
    }
}

/// Uniformly random position inside `code`
pub fn position_in_zone(
    zones: &ZoneTable,
    code: ZoneCode,
    rng: &mut impl Rng,
) -> Result<GridPos, PlacementError> {
    let zone = zones.get(code).ok_or(PlacementError::ZoneNotFound(code))?;
    zone.positions
        .choose(rng)
        .copied()
        .ok_or(PlacementError::NoPositionsInZone(code))
}

/// Pick uniformly among the preferred zones that exist, then a cell in it
pub fn human_position(zones: &ZoneTable, rng: &mut impl Rng) -> Result<GridPos, PlacementError> {
    let available: Vec<ZoneCode> = HUMAN_PREFERRED_ZONES
        .iter()
        .copied()
        .filter(|&code| zones.contains(code))
        .collect();
    let chosen = *available
        .choose(rng)
        .ok_or(PlacementError::NoPreferredZone)?;
    position_in_zone(zones, chosen, rng)
}

/// Candidate zones for a role: operational zones with positions, else any
/// zone with positions (table order)
pub fn robot_candidate_zones(
    zones: &ZoneTable,
    role: RobotRole,
) -> Result<Vec<ZoneCode>, PlacementError> {
    let has_positions =
        |code: ZoneCode| zones.get(code).is_some_and(|z| !z.positions.is_empty());

    let operational: Vec<ZoneCode> = role
        .operational_zones()
        .iter()
        .copied()
        .filter(|&code| has_positions(code))
        .collect();
    if !operational.is_empty() {
        return Ok(operational);
    }

    let fallback: Vec<ZoneCode> = zones
        .iter()
        .filter(|z| !z.positions.is_empty())
        .map(|z| z.code)
        .collect();
    if fallback.is_empty() {
        return Err(PlacementError::NoValidZone(role));
    }
    Ok(fallback)
}

/// Zone the `index`-th robot of `role` is dealt into
pub fn robot_zone(
    zones: &ZoneTable,
    role: RobotRole,
    index: usize,
) -> Result<ZoneCode, PlacementError> {
    let candidates = robot_candidate_zones(zones, role)?;
    Ok(candidates[index % candidates.len()])
}

pub fn robot_position(
    zones: &ZoneTable,
    role: RobotRole,
    index: usize,
    rng: &mut impl Rng,
) -> Result<GridPos, PlacementError> {
    let zone = robot_zone(zones, role, index)?;
    position_in_zone(zones, zone, rng)
}
