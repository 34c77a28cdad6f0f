//! Core data types for the game and solver.
//!
//! The board uses flat `Vec` storage with column-major layout:
//! `cells[x * height + y]` holds the cell at `(x, y)`, origin top-left.

use std::cmp::Ordering;
use std::fmt;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::error::BoardSizeError;

/// A 0-based coordinate on the board, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

// Row-major ordering, so sorted point sets follow scan order.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What a cell actually contains.
///
/// `Unknown` never appears on a live board; it is the opaque marker used
/// by the masked player view for cells that have not been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Content {
    /// A safe cell with the number of adjacent mines (0-8).
    Safe(u8),
    Mine,
    Unknown,
}

/// What the player currently sees of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

/// A single board cell: content plus visibility.
///
/// Invariants: a revealed mine means the game ended in loss, and a
/// flagged cell is never revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub content: Content,
    pub visibility: Visibility,
}

impl Cell {
    pub const fn new(content: Content, visibility: Visibility) -> Self {
        Self {
            content,
            visibility,
        }
    }

    /// A hidden safe cell with no adjacent mines; the initial fill.
    pub const EMPTY: Cell = Cell::new(Content::Safe(0), Visibility::Hidden);
}

/// Validated board dimensions and mine count.
///
/// Only obtainable through [`BoardSize::new`] or the conventional presets,
/// so `0 < mines < width * height` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    width: usize,
    height: usize,
    mines: usize,
}

impl BoardSize {
    /// The conventional beginner size: 9x9 with 10 mines.
    pub const BEGINNER: BoardSize = BoardSize {
        width: 9,
        height: 9,
        mines: 10,
    };
    /// The conventional intermediate size: 16x16 with 40 mines.
    pub const INTERMEDIATE: BoardSize = BoardSize {
        width: 16,
        height: 16,
        mines: 40,
    };
    /// The conventional expert size: 30x16 with 99 mines.
    pub const EXPERT: BoardSize = BoardSize {
        width: 30,
        height: 16,
        mines: 99,
    };

    /// Validate and construct a board size. Invalid combinations are
    /// rejected here, never clamped at use sites.
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self, BoardSizeError> {
        if width == 0 || height == 0 {
            return Err(BoardSizeError::ZeroDimension);
        }
        if mines == 0 {
            return Err(BoardSizeError::NoMines);
        }
        if mines >= width * height {
            return Err(BoardSizeError::TooManyMines);
        }
        Ok(Self {
            width,
            height,
            mines,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn mines(&self) -> usize {
        self.mines
    }

    #[inline(always)]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline(always)]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

/// The status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// The game has not been started yet.
    NeverStarted,
    Playing,
    Won,
    Lost,
}

/// The width x height matrix of cells.
///
/// Owned exclusively by the active game; every mutation happens on a
/// copy-then-replace basis so snapshots handed out never alias the
/// authoritative board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

impl Board {
    /// A board of hidden `Safe(0)` cells.
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size.cell_count()],
        }
    }

    /// A board with mines at the given points and every safe cell's
    /// number computed from its true neighborhood. All cells hidden.
    pub fn with_mines(size: BoardSize, mines: &[Point]) -> Self {
        let mut board = Board::new(size);
        for &p in mines {
            board.set(p.x, p.y, Cell::new(Content::Mine, Visibility::Hidden));
        }
        let cache = NeighborCache::new(size);
        for (y, x) in iproduct!(0..size.height(), 0..size.width()) {
            if board.get(x, y).content == Content::Mine {
                continue;
            }
            let count = cache
                .neighbors(Point::new(x, y))
                .iter()
                .filter(|n| board.get(n.x, n.y).content == Content::Mine)
                .count();
            board.set(
                x,
                y,
                Cell::new(Content::Safe(count as u8), Visibility::Hidden),
            );
        }
        board
    }

    #[inline(always)]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[x * self.size.height() + y]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[x * self.size.height() + y] = cell;
    }

    /// All coordinates in row-major (scan) order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let size = self.size;
        iproduct!(0..size.height(), 0..size.width()).map(|(y, x)| Point::new(x, y))
    }

    /// The player view: every non-revealed cell's content replaced with
    /// the opaque `Unknown` marker so hidden mine locations never leak.
    pub fn masked(&self) -> Board {
        let mut board = self.clone();
        for cell in &mut board.cells {
            if cell.visibility != Visibility::Revealed {
                cell.content = Content::Unknown;
            }
        }
        board
    }

    /// Whether the board is in a won position: no mine revealed and
    /// every safe cell revealed. Flags play no part in this.
    pub fn has_won(&self) -> bool {
        self.cells.iter().all(|cell| match cell.content {
            Content::Mine => cell.visibility != Visibility::Revealed,
            Content::Safe(_) => cell.visibility == Visibility::Revealed,
            Content::Unknown => true,
        })
    }

    /// Number of mines on the board.
    pub fn mine_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.content == Content::Mine)
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.height() {
            for x in 0..self.size.width() {
                let cell = self.get(x, y);
                let ch = match (cell.visibility, cell.content) {
                    (Visibility::Flagged, _) => '!',
                    (Visibility::Hidden, Content::Mine) => '*',
                    (Visibility::Hidden, _) => 'O',
                    (Visibility::Revealed, Content::Safe(0)) => ' ',
                    (Visibility::Revealed, Content::Safe(n)) => (b'0' + n) as char,
                    (Visibility::Revealed, Content::Mine) => 'X',
                    (Visibility::Revealed, Content::Unknown) => '?',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The full state of a game: status, board and the remaining mine
/// counter (total mines minus flags placed).
///
/// `remaining_mines` may go negative if the player over-flags; that is
/// allowed and never gates win detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub board: Board,
    pub remaining_mines: i32,
}

impl GameState {
    pub fn new(status: GameStatus, board: Board, remaining_mines: i32) -> Self {
        Self {
            status,
            board,
            remaining_mines,
        }
    }

    /// The state with the board masked per [`Board::masked`].
    pub fn masked(&self) -> GameState {
        GameState::new(self.status, self.board.masked(), self.remaining_mines)
    }
}

/// Pre-computed 8-neighborhoods (clipped to the board bounds) for every
/// cell, indexed by `x * height + y`.
pub struct NeighborCache {
    size: BoardSize,
    data: Vec<Point>,
    /// offsets[i]..offsets[i + 1] is the slice of `data` for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    pub fn new(size: BoardSize) -> Self {
        let total = size.cell_count();
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for x in 0..size.width() {
            for y in 0..size.height() {
                offsets.push(data.len());
                for dx in -1i32..=1 {
                    for dy in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx >= 0
                            && nx < size.width() as i32
                            && ny >= 0
                            && ny < size.height() as i32
                        {
                            data.push(Point::new(nx as usize, ny as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            size,
            data,
            offsets,
        }
    }

    /// The pre-computed neighbors of `point`.
    #[inline(always)]
    pub fn neighbors(&self, point: Point) -> &[Point] {
        let idx = point.x * self.size.height() + point.y;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}
