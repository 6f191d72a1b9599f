//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::components::*;
use crate::config::SimConfig;
use crate::constants::StabilityThresholds;
use crate::error::Result;
use crate::facility::Facility;
use crate::generation::{self, build_facility, populate, Population};
use crate::layout::GridLayout;
use crate::systems::*;

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing every agent
    pub world: World,
    /// Zone table and occupancy grid
    pub facility: Facility,
    /// Entities created from the configuration
    pub population: Population,
    status: GlobalStatus,
    mission: MissionStatus,
    metrics: MetricsRecorder,
    thresholds: StabilityThresholds,
    behavior: BehaviorModel,
    rng: ChaCha8Rng,
    seed: u64,
    steps: u64,
}

impl SimulationEngine {
    /// Build the facility from a zone grid without populating it
    pub fn from_zone_rows(rows: &[Vec<ZoneCode>], seed: u64) -> Result<Self> {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let facility = build_facility(&mut world, rows, &mut rng)?;
        let thresholds = StabilityThresholds::default();

        Ok(Self {
            world,
            facility,
            population: Population::default(),
            status: GlobalStatus::new(&thresholds),
            mission: MissionStatus::Ongoing,
            metrics: MetricsRecorder::new(),
            thresholds,
            behavior: BehaviorModel::default(),
            rng,
            seed,
            steps: 0,
        })
    }

    /// Build a fully populated simulation from a layout and scenario
    /// configuration. `config.seed` wins over a random seed.
    pub fn build(layout: &GridLayout, config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut engine = Self::from_zone_rows(&layout.zones, seed)?;
        engine.population = populate(
            &mut engine.world,
            &mut engine.facility,
            &layout.equipment,
            config,
            &mut engine.rng,
        )?;

        info!(
            seed,
            width = engine.facility.width(),
            height = engine.facility.height(),
            agents = engine.world.len(),
            "simulation built"
        );
        Ok(engine)
    }

    pub fn with_behavior(mut self, behavior: BehaviorModel) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_thresholds(mut self, thresholds: StabilityThresholds) -> Self {
        self.thresholds = thresholds;
        self.status = GlobalStatus::new(&thresholds);
        self
    }

    /// Advance one tick: activate agents, aggregate status, record metrics
    /// and evaluate the mission. Does nothing once the mission has ended.
    pub fn step(&mut self) -> MissionStatus {
        if self.mission.is_terminal() {
            return self.mission;
        }

        let ctx = TickContext {
            status: &self.status,
            thresholds: &self.thresholds,
            hub: hub_position(&self.world),
        };
        run_activations(
            self.behavior,
            &mut self.world,
            &mut self.facility,
            &ctx,
            &mut self.rng,
        );
        self.steps += 1;

        update_status(&self.world, &mut self.status, &self.thresholds);
        let row = collect_metrics(&self.world, &self.status, &self.thresholds, self.steps);
        debug!(
            step = self.steps,
            power = row.power_level,
            atmosphere = row.atmospheric_condition,
            alive = row.alive_humans,
            fires = row.active_fires,
            "tick"
        );
        self.metrics.record(row);

        self.mission = evaluate(&self.world, &self.status, &self.thresholds);
        if self.mission.is_terminal() {
            info!(step = self.steps, mission = %self.mission, "mission ended");
        }
        self.mission
    }

    /// Step until the mission ends or `max_steps` ticks have run
    pub fn run(&mut self, max_steps: Option<u64>) -> MissionStatus {
        while !self.mission.is_terminal() {
            if max_steps.is_some_and(|max| self.steps >= max) {
                break;
            }
            self.step();
        }
        self.mission
    }

    pub fn spawn_equipment(
        &mut self,
        kind: EquipmentKind,
        pos: GridPos,
        integrity: f32,
    ) -> Result<Entity> {
        generation::spawn_equipment(&mut self.world, &mut self.facility.grid, kind, pos, integrity)
    }

    pub fn spawn_human(&mut self, pos: GridPos, health: f32) -> Result<Entity> {
        generation::spawn_human(&mut self.world, &mut self.facility.grid, pos, health)
    }

    pub fn spawn_robot(&mut self, role: RobotRole, pos: GridPos) -> Result<Entity> {
        generation::spawn_robot(&mut self.world, &mut self.facility.grid, role, pos)
    }

    /// Remove an agent from both the population and its grid cell
    pub fn remove_agent(&mut self, entity: Entity) -> bool {
        let Ok(pos) = self.world.get::<&GridPos>(entity).map(|p| *p) else {
            return false;
        };
        self.facility.grid.remove(entity, pos);
        self.world.despawn(entity).is_ok()
    }

    pub fn status(&self) -> &GlobalStatus {
        &self.status
    }

    pub fn mission(&self) -> MissionStatus {
        self.mission
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn thresholds(&self) -> &StabilityThresholds {
        &self.thresholds
    }

    pub fn behavior(&self) -> BehaviorModel {
        self.behavior
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks run so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn human_count(&self) -> usize {
        self.world.query::<&Human>().iter().count()
    }

    pub fn alive_human_count(&self) -> usize {
        alive_humans(&self.world)
    }

    pub fn robot_count(&self) -> usize {
        self.world.query::<&Robot>().iter().count()
    }

    pub fn wall_count(&self) -> usize {
        self.world.query::<&Wall>().iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<ZoneCode>> {
        vec![
            vec![ZoneCode::HabitatWall, ZoneCode::HabitatWall, ZoneCode::HabitatWall],
            vec![ZoneCode::Lab, ZoneCode::Habitat, ZoneCode::MedicalBay],
            vec![ZoneCode::Corridor, ZoneCode::PowerWall, ZoneCode::Airlock],
        ]
    }

    #[test]
    fn test_engine_from_zone_rows() {
        let engine = SimulationEngine::from_zone_rows(&rows(), 1).unwrap();
        assert_eq!(engine.wall_count(), 7);
        assert_eq!(engine.human_count(), 0);
        assert_eq!(engine.steps(), 0);
        assert_eq!(engine.status().power_level, 60.0);
        assert_eq!(engine.mission(), MissionStatus::Ongoing);
    }

    #[test]
    fn test_engine_build() {
        let layout = GridLayout {
            zones: rows(),
            equipment: Vec::new(),
        };
        let config = SimConfig {
            crew_size: 4,
            seed: Some(9),
            ..Default::default()
        }
        .with_robots(RobotRole::BioLabRobot, 2);
        let engine = SimulationEngine::build(&layout, &config).unwrap();
        assert_eq!(engine.seed(), 9);
        assert_eq!(engine.human_count(), 4);
        assert_eq!(engine.robot_count(), 2);
        assert_eq!(engine.population.len(), 6);
        assert_eq!(engine.facility.grid.occupancy(), 13);
    }

    #[test]
    fn test_step_records_metrics() {
        let mut engine = SimulationEngine::from_zone_rows(&rows(), 3).unwrap();
        engine.spawn_human(GridPos::new(1, 1), 90.0).unwrap();
        engine.step();
        engine.step();
        assert_eq!(engine.steps(), 2);
        assert_eq!(engine.metrics().len(), 2);
        assert_eq!(engine.metrics().rows()[1].step, 2);
    }

    #[test]
    fn test_terminal_mission_stops_the_clock() {
        // No crew and no power source: fails on the first tick
        let mut engine = SimulationEngine::from_zone_rows(&[vec![ZoneCode::Habitat]], 0).unwrap();
        assert_eq!(engine.step(), MissionStatus::Failure);
        let status = *engine.status();
        assert_eq!(engine.step(), MissionStatus::Failure);
        assert_eq!(engine.steps(), 1);
        assert_eq!(engine.metrics().len(), 1);
        assert_eq!(*engine.status(), status);
    }

    #[test]
    fn test_run_respects_max_steps() {
        let mut engine = SimulationEngine::from_zone_rows(&rows(), 5)
            .unwrap()
            .with_behavior(BehaviorModel::Inert);
        engine.spawn_human(GridPos::new(1, 1), 90.0).unwrap();
        engine
            .spawn_equipment(EquipmentKind::BatteryPack, GridPos::new(0, 2), 50.0)
            .unwrap();
        assert_eq!(engine.run(Some(5)), MissionStatus::Ongoing);
        assert_eq!(engine.steps(), 5);
    }

    #[test]
    fn test_remove_agent() {
        let mut engine = SimulationEngine::from_zone_rows(&rows(), 5).unwrap();
        let human = engine.spawn_human(GridPos::new(1, 1), 90.0).unwrap();
        assert!(engine.remove_agent(human));
        assert!(!engine.remove_agent(human));
        assert!(engine.facility.grid.agents_at(GridPos::new(1, 1)).is_empty());
        assert_eq!(engine.human_count(), 0);
    }
}
