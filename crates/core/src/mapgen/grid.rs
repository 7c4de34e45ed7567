//! Room placement on the square generator grid, connectivity and door-pair selection.

use std::collections::BTreeSet;

use tracing::debug;

use crate::geometry::euclidean;
use crate::rng::GameRng;

use super::model::RoomConnection;

pub type Cell = (usize, usize);

/// Occupancy matrix indexed `[x][y]`; `y + 1` is the cell above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupancy {
    size: usize,
    cells: Vec<bool>,
}

struct PlacementFrame {
    cell: Cell,
    probability: f64,
    next_neighbor: usize,
}

impl Occupancy {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![false; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn center(&self) -> Cell {
        (self.size / 2, self.size / 2)
    }

    pub fn is_occupied(&self, (x, y): Cell) -> bool {
        x < self.size && y < self.size && self.cells[x * self.size + y]
    }

    pub fn occupy(&mut self, (x, y): Cell) {
        if x < self.size && y < self.size {
            self.cells[x * self.size + y] = true;
        }
    }

    /// Occupied cells, x-major.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        (0..self.size)
            .flat_map(|x| (0..self.size).map(move |y| (x, y)))
            .filter(|&cell| self.is_occupied(cell))
            .collect()
    }

    pub fn room_count(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }

    /// Neighbour of `cell` towards `connection`, if it lies inside the grid.
    pub fn neighbor(&self, (x, y): Cell, connection: RoomConnection) -> Option<Cell> {
        let cell = match connection {
            RoomConnection::Left => (x.checked_sub(1)?, y),
            RoomConnection::Right => (x + 1, y),
            RoomConnection::Bottom => (x, y.checked_sub(1)?),
            RoomConnection::Top => (x, y + 1),
        };
        (cell.0 < self.size && cell.1 < self.size).then_some(cell)
    }

    /// Directions whose neighbouring cell is occupied.
    pub fn connections(&self, cell: Cell) -> BTreeSet<RoomConnection> {
        RoomConnection::ALL
            .into_iter()
            .filter(|&connection| {
                self.neighbor(cell, connection).is_some_and(|neighbor| self.is_occupied(neighbor))
            })
            .collect()
    }
}

/// Order in which placement visits the neighbours of a freshly placed room.
const EXPANSION_ORDER: [RoomConnection; 4] =
    [RoomConnection::Left, RoomConnection::Right, RoomConnection::Bottom, RoomConnection::Top];

/// Grows a connected region of rooms from the grid center.
///
/// The center is always occupied and each of its neighbours is tried with probability 1.
/// A room placed with probability `p` tries each empty neighbour with `p * decay`. Runs as
/// a depth-first walk over an explicit stack, drawing random numbers in the same order as
/// the equivalent recursion would.
pub fn place_rooms(size: usize, decay: f64, rng: &mut GameRng) -> Occupancy {
    let mut grid = Occupancy::new(size);
    let center = grid.center();
    grid.occupy(center);

    let mut stack = Vec::new();
    for connection in EXPANSION_ORDER {
        let Some(seed) = grid.neighbor(center, connection) else {
            continue;
        };
        if grid.is_occupied(seed) {
            continue;
        }
        try_place(&mut grid, &mut stack, seed, 1.0, rng);

        while let Some(frame) = stack.last_mut() {
            let Some(&connection) = EXPANSION_ORDER.get(frame.next_neighbor) else {
                stack.pop();
                continue;
            };
            frame.next_neighbor += 1;
            let (cell, probability) = (frame.cell, frame.probability);

            let Some(neighbor) = grid.neighbor(cell, connection) else {
                continue;
            };
            if grid.is_occupied(neighbor) {
                continue;
            }
            try_place(&mut grid, &mut stack, neighbor, probability * decay, rng);
        }
    }

    debug!(grid_size = size, decay, rooms = grid.room_count(), "rooms_placed");
    grid
}

fn try_place(
    grid: &mut Occupancy,
    stack: &mut Vec<PlacementFrame>,
    cell: Cell,
    probability: f64,
    rng: &mut GameRng,
) {
    if rng.unit() > probability {
        return;
    }
    grid.occupy(cell);
    stack.push(PlacementFrame { cell, probability, next_neighbor: 0 });
}

/// Picks the pair of candidate cells farthest apart.
///
/// Every ordered pair is compared in candidate order and only a strictly greater distance
/// replaces the best pair, so the first maximal pair wins. Returns `None` when no two
/// distinct candidates exist.
pub fn select_door_pair(candidates: &[Cell]) -> Option<(Cell, Cell)> {
    let mut best = None;
    let mut max_distance = 0.0;
    for &entry in candidates {
        for &exit in candidates {
            let distance = euclidean(entry, exit);
            if distance > max_distance {
                max_distance = distance;
                best = Some((entry, exit));
            }
        }
    }
    best
}
