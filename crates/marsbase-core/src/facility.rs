//! Facility layout: zone table plus the multi-occupancy grid index.

use hecs::Entity;

use crate::components::{GridPos, ZoneTable};
use crate::error::{BuildError, Result};

/// Which agents occupy each cell. Any number of agents may share a cell.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cells: Vec<Vec<Entity>>,
}

impl OccupancyGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Vec::new(); size],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok((pos.y * self.width + pos.x) as usize)
        } else {
            Err(BuildError::PositionOutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn place(&mut self, entity: Entity, pos: GridPos) -> Result<()> {
        let idx = self.index(pos)?;
        self.cells[idx].push(entity);
        Ok(())
    }

    /// Remove `entity` from `pos`; returns whether it was there
    pub fn remove(&mut self, entity: Entity, pos: GridPos) -> bool {
        let Ok(idx) = self.index(pos) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        match cell.iter().position(|&e| e == entity) {
            Some(i) => {
                cell.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn move_agent(&mut self, entity: Entity, from: GridPos, to: GridPos) -> Result<()> {
        let idx = self.index(to)?;
        self.remove(entity, from);
        self.cells[idx].push(entity);
        Ok(())
    }

    pub fn agents_at(&self, pos: GridPos) -> &[Entity] {
        match self.index(pos) {
            Ok(idx) => &self.cells[idx],
            Err(_) => &[],
        }
    }

    /// Agents within Chebyshev `radius` of `pos`, excluding the center cell
    pub fn neighbors(&self, pos: GridPos, radius: i32) -> Vec<Entity> {
        let mut found = Vec::new();
        for y in (pos.y - radius)..=(pos.y + radius) {
            for x in (pos.x - radius)..=(pos.x + radius) {
                let cell = GridPos::new(x, y);
                if cell != pos {
                    found.extend_from_slice(self.agents_at(cell));
                }
            }
        }
        found
    }

    /// Total number of placed agents
    pub fn occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

/// Static facility topology plus the live occupancy index
#[derive(Debug, Clone)]
pub struct Facility {
    pub zones: ZoneTable,
    pub grid: OccupancyGrid,
}

impl Facility {
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }
}
