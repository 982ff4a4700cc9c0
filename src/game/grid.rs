use rand::Rng;

use super::action::Direction;

/// A cell coordinate on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, without wrapping
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Square toroidal grid: leaving one edge re-enters on the opposite edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size: size as i32 }
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Number of cells on the grid
    pub fn area(&self) -> usize {
        self.size() * self.size()
    }

    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size && pos.y >= 0 && pos.y < self.size
    }

    /// Fold any coordinate back onto the grid
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.size), pos.y.rem_euclid(self.size))
    }

    /// Neighbour of `pos` in `direction`, wrapping around the edges
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.wrap(pos.moved_by(dx, dy))
    }

    /// Whether stepping from `pos` in `direction` crosses an edge
    pub fn crosses_edge(&self, pos: Position, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        !self.contains(pos.moved_by(dx, dy))
    }

    /// Uniformly random cell
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size))
    }
}
