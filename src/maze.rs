use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offset by a signed delta, `None` if either axis would go negative.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Pos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Cell grid of a maze. Rooms sit on odd coordinates, the cells between
/// them are either walls or carved passages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![cell; width]; height],
        }
    }

    /// Builds a grid from text rows, `#` for walls and `.` for open cells.
    ///
    /// Loader for hand-drawn layouts such as test fixtures; the game itself
    /// only plays grids from [`generate`].
    pub fn parse(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .chars()
                .map(|c| match c {
                    '#' => Ok(Cell::Wall),
                    '.' => Ok(Cell::Open),
                    other => Err(GameError::BadGridChar(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            cells.push(row);
        }
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GameError::RaggedGrid {
                row,
                len: r.len(),
                expected: width,
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        self.cells[pos.y][pos.x] = cell;
    }

    /// The neighbour one cell away in `dir`, if it is inside the grid.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        pos.offset(dx, dy).filter(|p| self.contains(*p))
    }

    /// Room dimensions, assuming the grid was laid out by [`generate`].
    pub fn rooms(&self) -> (usize, usize) {
        ((self.width - 1) / 2, (self.height - 1) / 2)
    }
}

/// The room the player starts in.
pub const ENTRY: Pos = Pos::new(1, 1);

struct Frame {
    room: Pos,
    dirs: [Dir; 4],
    next: usize,
}

impl Frame {
    fn new(room: Pos, rng: &mut impl Rng) -> Self {
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        Self { room, dirs, next: 0 }
    }
}

/// Carves a perfect maze of `width` x `height` rooms with a randomized
/// depth-first backtracker.
///
/// The walk keeps its own stack of pending rooms, each with the shuffled
/// directions it has yet to try, so depth is limited only by memory.
pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Result<Grid> {
    if width == 0 || height == 0 {
        return Err(GameError::InvalidDimensions { width, height });
    }
    let mut grid = Grid::filled(width * 2 + 1, height * 2 + 1, Cell::Wall);

    grid.set(ENTRY, Cell::Open);
    let mut stack = vec![Frame::new(ENTRY, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = frame.dirs[frame.next];
        frame.next += 1;
        let room = frame.room;

        let (dx, dy) = dir.delta();
        let Some(candidate) = room.offset(dx * 2, dy * 2) else {
            continue;
        };
        if !is_room_slot(&grid, candidate) || grid.is_open(candidate) {
            continue;
        }
        let Some(wall) = room.offset(dx, dy) else {
            continue;
        };
        grid.set(wall, Cell::Open);
        grid.set(candidate, Cell::Open);
        stack.push(Frame::new(candidate, rng));
    }

    // Exit room. Already open after a full walk, set unconditionally.
    grid.set(Pos::new(width * 2 - 1, height * 2 - 1), Cell::Open);

    Ok(grid)
}

fn is_room_slot(grid: &Grid, pos: Pos) -> bool {
    pos.x > 0 && pos.y > 0 && pos.x < grid.width() - 1 && pos.y < grid.height() - 1
}
