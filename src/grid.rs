//! Tile grid and its fixed 8-neighbor topology.
//!
//! Tiles are stored row-major. Each tile keeps its neighbors as indices into the
//! tile array, computed once at allocation. The grid does not wrap.

use std::collections::VecDeque;

use crate::rivers::River;
use crate::terrain::{BonusResource, TerrainType};

/// Compass direction between two adjacent tiles. North is towards row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Coordinate delta of one step in this direction
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Direction of a unit step, or `None` if the delta is not between neighbors.
    pub fn from_delta(dx: i64, dy: i64) -> Option<Direction> {
        Direction::ALL.iter().copied().find(|d| d.offset() == (dx, dy))
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}

/// One cell of the map.
#[derive(Clone, Debug)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    /// Indices of the 3-8 adjacent tiles
    pub neighbors: Vec<usize>,
    pub terrain: TerrainType,
    /// Ruggedness in [0, 1]; 0 for water
    pub elevation: f64,
    /// Landmass the tile grew from (0 = none)
    pub continent: u32,
    /// Water connected to the forced map-edge ocean
    pub ocean: bool,
    /// Land adjacent to ocean
    pub coast: bool,
    /// Terrain was fixed by edge, pole or elevation rules, not by climate
    pub forced: bool,
    pub river: Option<River>,
    pub lost_city: bool,
    pub resource: BonusResource,
    /// Offset from the center column, roughly [-1, 1]
    pub longitude: f64,
    /// Offset from the center row, roughly [-1, 1]
    pub latitude: f64,
    /// Degrees, within the clamped climate range
    pub temperature: i32,
    /// [0, 1]
    pub humidity: f64,
}

impl Tile {
    pub fn is_water(&self) -> bool {
        self.terrain.is_water()
    }

    pub fn is_land(&self) -> bool {
        self.terrain.is_land()
    }

    pub fn is_lake(&self) -> bool {
        self.terrain == TerrainType::Lakes
    }

    /// Chebyshev distance, matching 8-directional movement.
    pub fn distance(&self, other: &Tile) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Fixed-size tile grid.
#[derive(Clone, Debug)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
    center: usize,
}

impl Grid {
    /// Allocate an all-ocean grid with topology and map coordinates filled in.
    pub fn new(width: usize, height: usize) -> Self {
        let center_x = width / 2;
        let center_y = height / 2;
        let center = center_y * width + center_x;

        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile {
                    x,
                    y,
                    neighbors: neighbors_8(width, height, x, y),
                    terrain: TerrainType::Ocean,
                    elevation: 0.0,
                    continent: 0,
                    ocean: false,
                    coast: false,
                    forced: false,
                    river: None,
                    lost_city: false,
                    resource: BonusResource::None,
                    longitude: normalized_offset(x, center_x),
                    latitude: normalized_offset(y, center_y),
                    temperature: 0,
                    humidity: 0.0,
                });
            }
        }

        Self {
            width,
            height,
            tiles,
            center,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn center_index(&self) -> usize {
        self.center
    }

    pub fn center(&self) -> &Tile {
        &self.tiles[self.center]
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    pub fn tile_mut(&mut self, index: usize) -> &mut Tile {
        &mut self.tiles[index]
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        if x < self.width && y < self.height {
            Some(&self.tiles[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.tiles[index].neighbors
    }

    pub fn distance(&self, a: usize, b: usize) -> usize {
        self.tiles[a].distance(&self.tiles[b])
    }

    /// Neighbor of `index` one step in `direction`, if it is on the map.
    pub fn step(&self, index: usize, direction: Direction) -> Option<usize> {
        let tile = &self.tiles[index];
        let (dx, dy) = direction.offset();
        let nx = tile.x as i64 + dx;
        let ny = tile.y as i64 + dy;
        if self.contains(nx, ny) {
            Some(self.index(nx as usize, ny as usize))
        } else {
            None
        }
    }

    /// Direction from tile `from` to adjacent tile `to`.
    pub fn direction_between(&self, from: usize, to: usize) -> Option<Direction> {
        let a = &self.tiles[from];
        let b = &self.tiles[to];
        Direction::from_delta(b.x as i64 - a.x as i64, b.y as i64 - a.y as i64)
    }

    pub fn land_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_land()).count()
    }

    pub fn has_water_neighbor(&self, index: usize) -> bool {
        self.neighbors(index).iter().any(|&n| self.tiles[n].is_water())
    }

    pub fn has_land_neighbor(&self, index: usize) -> bool {
        self.neighbors(index).iter().any(|&n| self.tiles[n].is_land())
    }

    /// Breadth-first fill from `starts` across tiles accepted by `passable`.
    /// Start tiles are always marked. Returns a reached-flag per tile.
    pub fn flood_fill<F>(&self, starts: impl IntoIterator<Item = usize>, passable: F) -> Vec<bool>
    where
        F: Fn(&Tile) -> bool,
    {
        let mut reached = vec![false; self.tiles.len()];
        let mut queue = VecDeque::new();

        for start in starts {
            if !reached[start] {
                reached[start] = true;
                queue.push_back(start);
            }
        }

        while let Some(current) = queue.pop_front() {
            for &n in &self.tiles[current].neighbors {
                if !reached[n] && passable(&self.tiles[n]) {
                    reached[n] = true;
                    queue.push_back(n);
                }
            }
        }

        reached
    }

    /// Connected groups of tiles accepted by `member`, in order of their first tile.
    pub fn regions<F>(&self, member: F) -> Vec<Vec<usize>>
    where
        F: Fn(&Tile) -> bool,
    {
        let mut assigned = vec![false; self.tiles.len()];
        let mut regions = Vec::new();

        for start in 0..self.tiles.len() {
            if assigned[start] || !member(&self.tiles[start]) {
                continue;
            }

            let mut region = Vec::new();
            let mut queue = VecDeque::from([start]);
            assigned[start] = true;
            while let Some(current) = queue.pop_front() {
                region.push(current);
                for &n in &self.tiles[current].neighbors {
                    if !assigned[n] && member(&self.tiles[n]) {
                        assigned[n] = true;
                        queue.push_back(n);
                    }
                }
            }
            regions.push(region);
        }

        regions
    }
}

/// Offset of `pos` relative to `center`, scaled so the map spans roughly [-1, 1].
fn normalized_offset(pos: usize, center: usize) -> f64 {
    if center == 0 {
        return 0.0;
    }
    pos as f64 / center as f64 - 1.0
}

/// 8-connected neighbors without wrapping, in row-major order.
fn neighbors_8(width: usize, height: usize, x: usize, y: usize) -> Vec<usize> {
    let mut result = Vec::with_capacity(8);

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }

            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
                result.push(ny as usize * width + nx as usize);
            }
        }
    }

    result
}
