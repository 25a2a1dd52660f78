//! Moving-body simulation driving the grid
//!
//! Ships drift around the world and bounce off its edges. Every step each
//! ship is re-inserted with `update`, then broad-phase candidates come from
//! a grid query and are confirmed with a circle-circle test.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use spatial_grid::config::{Config, ConfigError, GridConfig};
use spatial_grid::foundation::math::colors;
use spatial_grid::prelude::*;

/// Demo configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Grid tuning
    pub grid: GridConfig,
    /// Simulation parameters
    pub simulation: SimulationConfig,
}

impl Config for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.simulation.validate()
    }
}

/// Parameters of the moving-body simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world_width: f64,
    pub world_height: f64,
    pub ship_count: u32,
    pub min_radius: f64,
    pub max_radius: f64,
    pub max_speed: f64,
    pub steps: u32,
    pub delta_time: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            ship_count: 40,
            min_radius: 2.0,
            max_radius: 8.0,
            max_speed: 60.0,
            steps: 120,
            delta_time: 1.0 / 30.0,
            seed: 7,
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "world_width/world_height",
                reason: "world must have a positive size".to_string(),
            });
        }
        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius) {
            return Err(ConfigError::Invalid {
                field: "min_radius/max_radius",
                reason: format!("expected 0 < min_radius <= max_radius, got {}..{}", self.min_radius, self.max_radius),
            });
        }
        if self.max_radius * 2.0 >= self.world_width.min(self.world_height) {
            return Err(ConfigError::Invalid {
                field: "max_radius",
                reason: "ships must fit inside the world".to_string(),
            });
        }
        Ok(())
    }
}

/// A moving body, identified by id
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: u32,
    pub hull: Circle,
    pub velocity: Vec2,
}

impl PartialEq for Ship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Bounded<Rect> for Ship {
    fn intersects(&self, region: &Rect) -> bool {
        self.hull.intersects(region)
    }
}

impl Ship {
    fn query_region(&self) -> Rect {
        Rect::from_center_extents(self.hull.center, Vec2::new(self.hull.radius, self.hull.radius))
    }

    fn touches(&self, other: &Ship) -> bool {
        let reach = self.hull.radius + other.hull.radius;
        (self.hull.center - other.hull.center).norm_squared() <= reach * reach
    }
}

/// Per-step statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct StepStats {
    pub candidates: usize,
    pub contacts: usize,
    pub lost: usize,
}

/// Recorded debug shapes by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeCounts {
    pub rects: usize,
    pub circles: usize,
    pub points: usize,
}

/// Steps a ship hull stays visible in the debug trail
pub const TRAIL_STEPS: u32 = 4;

/// Ships plus the grid indexing them
pub struct Simulation {
    config: SimulationConfig,
    grid: SpatialNode<Ship>,
    ships: Vec<Ship>,
    debug_draw: DebugDrawSystem,
}

impl Simulation {
    pub fn new(config: AppConfig) -> Self {
        let sim = config.simulation;
        let mut rng = StdRng::seed_from_u64(sim.seed);
        let world = Rect::new(0.0, 0.0, sim.world_width, sim.world_height).with_color(colors::white());

        let ships: Vec<Ship> = (0..sim.ship_count)
            .map(|id| {
                let radius = rng.gen_range(sim.min_radius..=sim.max_radius);
                let center = Point2::new(
                    rng.gen_range(radius..sim.world_width - radius),
                    rng.gen_range(radius..sim.world_height - radius),
                );
                let velocity = Vec2::new(
                    rng.gen_range(-sim.max_speed..=sim.max_speed),
                    rng.gen_range(-sim.max_speed..=sim.max_speed),
                );
                Ship { id, hull: Circle::new(center, radius), velocity }
            })
            .collect();

        let grid = SpatialNode::with_elements(world, config.grid, ships.iter().cloned());
        log::info!(
            "Spawned {} ships, grid height {} with {} leaves",
            ships.len(),
            grid.height(),
            grid.leaf_count()
        );

        let mut debug_draw = DebugDrawSystem::new();
        debug_draw.draw_persistent(
            "world",
            DebugShape::Rect {
                bounds: world,
                color: world.color,
                filled: false,
                duration: f32::INFINITY,
            },
        );

        Self { config: sim, grid, ships, debug_draw }
    }

    pub fn grid(&self) -> &SpatialNode<Ship> {
        &self.grid
    }

    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }

    /// Tally every live debug shape, persistent ones included
    pub fn shape_counts(&self) -> ShapeCounts {
        let mut counts = ShapeCounts::default();
        for shape in self.debug_draw.get_shapes() {
            match shape {
                DebugShape::Rect { .. } => counts.rects += 1,
                DebugShape::Circle { .. } => counts.circles += 1,
                DebugShape::Point { .. } => counts.points += 1,
            }
        }
        counts
    }

    /// Record the current node layout on top of the ship trails
    pub fn draw_grid(&mut self, order: DrawOrder) {
        self.debug_draw.surface_duration = self.frame_time();
        self.grid.draw(&mut self.debug_draw, order);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn frame_time(&self) -> f32 {
        self.config.delta_time as f32
    }

    /// Advance every ship and re-index it
    pub fn step(&mut self) -> StepStats {
        let mut stats = StepStats::default();
        let dt = self.config.delta_time;
        let frame = self.frame_time();
        self.debug_draw.update(frame);
        let (width, height) = (self.config.world_width, self.config.world_height);

        for ship in &mut self.ships {
            let mut center = ship.hull.center + ship.velocity * dt;
            let radius = ship.hull.radius;
            if center.x - radius < 0.0 || center.x + radius > width {
                ship.velocity.x = -ship.velocity.x;
                center.x = center.x.clamp(radius, width - radius);
            }
            if center.y - radius < 0.0 || center.y + radius > height {
                ship.velocity.y = -ship.velocity.y;
                center.y = center.y.clamp(radius, height - radius);
            }
            ship.hull.center = center;
            self.debug_draw.draw_circle(center, radius, colors::cyan(), frame * TRAIL_STEPS as f32);

            if !self.grid.update(ship.clone()) {
                log::warn!("Ship {} dropped out of the grid", ship.id);
                stats.lost += 1;
            }
        }

        for ship in &self.ships {
            let candidates = self.grid.query(&ship.query_region());
            for other in &candidates {
                if other.id <= ship.id {
                    continue;
                }
                stats.candidates += 1;
                if ship.touches(other) {
                    stats.contacts += 1;
                    let midpoint = ship.hull.center + (other.hull.center - ship.hull.center) * 0.5;
                    self.debug_draw.draw_point(midpoint, colors::red(), 3.0, frame);
                }
            }
        }

        stats
    }

    pub fn run(&mut self) -> Vec<StepStats> {
        (0..self.config.steps)
            .map(|step| {
                let stats = self.step();
                log::debug!(
                    "Step {step}: {} candidate pairs, {} contacts, height {}",
                    stats.candidates,
                    stats.contacts,
                    self.grid.height()
                );
                stats
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_keeps_every_ship_indexed() {
        let config = AppConfig {
            simulation: SimulationConfig { steps: 30, ..SimulationConfig::default() },
            ..AppConfig::default()
        };
        let ship_count = config.simulation.ship_count as usize;
        let mut simulation = Simulation::new(config);

        let stats = simulation.run();

        assert_eq!(stats.len(), 30);
        assert!(stats.iter().all(|s| s.lost == 0));
        assert!(stats.iter().all(|s| s.contacts <= s.candidates));
        assert_eq!(simulation.grid().element_count(), ship_count);
    }

    #[test]
    fn test_debug_trail_expires_old_hulls() {
        let config = AppConfig {
            simulation: SimulationConfig { steps: 20, ..SimulationConfig::default() },
            ..AppConfig::default()
        };
        let ship_count = config.simulation.ship_count as usize;
        let mut simulation = Simulation::new(config);

        let stats = simulation.run();
        let counts = simulation.shape_counts();

        // Only the world outline is persistent, and hulls older than the trail are gone
        assert_eq!(counts.rects, 1);
        assert!(counts.circles >= ship_count);
        assert!(counts.circles <= ship_count * (TRAIL_STEPS as usize + 1));
        assert!(counts.points <= stats.last().map_or(0, |s| s.contacts));

        simulation.draw_grid(DrawOrder::LeavesFirst);
        let after = simulation.shape_counts();
        assert_eq!(after.rects, 1 + simulation.grid().node_count());
        assert_eq!(after.circles, counts.circles);
    }

    #[test]
    fn test_app_config_loads_from_toml() {
        let path = std::env::temp_dir().join(format!("grid_demo_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[grid]\nmax_elements_per_node = 6\n\n[simulation]\nship_count = 12\nseed = 99\n",
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();
        let config = loaded.unwrap();

        assert_eq!(config.grid.max_elements_per_node, 6);
        assert_eq!(config.grid.max_depth, GridConfig::default().max_depth);
        assert_eq!(config.simulation.ship_count, 12);
        assert_eq!(config.simulation.seed, 99);
        assert_eq!(config.simulation.world_width, SimulationConfig::default().world_width);
    }

    #[test]
    fn test_rejects_oversized_ships() {
        let config = AppConfig {
            simulation: SimulationConfig { max_radius: 400.0, ..SimulationConfig::default() },
            ..AppConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "max_radius", .. })));
    }
}
