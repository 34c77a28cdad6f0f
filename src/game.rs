//! The reveal engine: the authoritative game state machine.
//!
//! `Game` owns the live [`GameState`] and enforces the rules: cascading
//! reveal, chording, flagging and win/loss detection. Every mutating
//! operation clones the board, applies the change and replaces the
//! authoritative state, then hands back a fresh snapshot; callers and
//! solvers never alias the live board.
//!
//! Rather than a type per game variant, one type carries two
//! capability flags: whether the player view masks hidden content, and
//! whether the state was preset (in which case `start` is programmer
//! misuse).

use std::sync::Arc;

use crate::board::{self, CancelToken};
use crate::error::GenerationInterrupted;
use crate::rng::GameRng;
use crate::solver::Solver;
use crate::types::{
    Board, BoardSize, Cell, Content, GameState, GameStatus, NeighborCache, Point, Visibility,
};

pub struct Game {
    size: BoardSize,
    cache: NeighborCache,
    masks_hidden_mines: bool,
    preset: bool,
    solver: Option<Arc<dyn Solver + Send + Sync>>,
    cancel: CancelToken,
    state: GameState,
    /// Set between `start_with` and the first reveal: the board does not
    /// exist yet and flagging is a no-op.
    first: bool,
    rng: GameRng,
}

impl Game {
    /// A fresh, not-yet-started game of the given size.
    pub fn new(size: BoardSize) -> Self {
        Self::with_rng(size, GameRng::new())
    }

    /// Like [`Game::new`] with an explicitly seeded generator, for
    /// deterministic board generation.
    pub fn with_rng(size: BoardSize, rng: GameRng) -> Self {
        Self {
            size,
            cache: NeighborCache::new(size),
            masks_hidden_mines: true,
            preset: false,
            solver: None,
            cancel: CancelToken::new(),
            state: GameState::new(GameStatus::NeverStarted, Board::new(size), 0),
            first: false,
            rng,
        }
    }

    /// A game over a preset state. All moves work normally, but `start`
    /// panics: there is nothing sensible to regenerate.
    pub fn from_state(state: GameState) -> Self {
        let size = state.board.size();
        Self {
            size,
            cache: NeighborCache::new(size),
            masks_hidden_mines: true,
            preset: true,
            solver: None,
            cancel: CancelToken::new(),
            state,
            first: false,
            rng: GameRng::new(),
        }
    }

    /// Toggle the masking capability. With masking off, `game_state`
    /// returns the true board even while playing.
    pub fn with_masking(mut self, masks_hidden_mines: bool) -> Self {
        self.masks_hidden_mines = masks_hidden_mines;
        self
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// A token that cancels an in-flight guaranteed-start generation
    /// from another thread.
    ///
    /// A cancellation is consumed by the generation it interrupts and a
    /// restart installs a fresh token, so call this again after either
    /// to keep a live handle.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The current snapshot, masked while playing (if the masking
    /// capability is on) so hidden mine locations never leak.
    pub fn game_state(&self) -> GameState {
        if self.masks_hidden_mines && self.state.status == GameStatus::Playing {
            self.state.masked()
        } else {
            self.state.clone()
        }
    }

    /// Start (or restart) with a uniformly random board.
    ///
    /// # Panics
    ///
    /// Panics if this game was constructed from a preset state.
    pub fn start(&mut self) -> GameState {
        assert!(
            !self.preset,
            "start is not supported for a game with a preset state"
        );
        self.solver = None;
        self.first = false;
        self.cancel = CancelToken::new();
        self.state = board::generate(self.size, &mut self.rng);
        self.game_state()
    }

    /// Start (or restart) with the guarantee that the board is solvable
    /// by `solver` from the first revealed cell.
    ///
    /// Generation is deferred to the first `reveal`, since only then is
    /// the candidate first move known; that reveal blocks (cancellably,
    /// see [`Game::cancel_token`]) until a solvable board is found.
    /// Until then flagging does nothing, as the board does not exist.
    ///
    /// # Panics
    ///
    /// Panics if this game was constructed from a preset state.
    pub fn start_with(&mut self, solver: Arc<dyn Solver + Send + Sync>) -> GameState {
        assert!(
            !self.preset,
            "start is not supported for a game with a preset state"
        );
        self.solver = Some(solver);
        self.first = true;
        self.cancel = CancelToken::new();
        self.state = GameState::new(
            GameStatus::Playing,
            Board::new(self.size),
            self.size.mines() as i32,
        );
        self.game_state()
    }

    /// Reveal a hidden cell, flood-filling zero regions. Reveals of a
    /// mine lose the game. No-op if the game is not playing, the
    /// coordinates are out of range, or the cell is not hidden.
    ///
    /// Only a cancelled guaranteed-start generation produces an error;
    /// every no-op condition returns the current state as `Ok`.
    pub fn reveal(&mut self, x: usize, y: usize) -> Result<GameState, GenerationInterrupted> {
        if self.state.status != GameStatus::Playing || !self.size.contains(x, y) {
            return Ok(self.game_state());
        }
        if self.first {
            if let Some(solver) = self.solver.clone() {
                let found = match board::generate_guaranteed(
                    self.size,
                    Point::new(x, y),
                    &*solver,
                    &self.cancel,
                ) {
                    Ok(found) => found,
                    Err(err) => {
                        // The cancellation only covers this generation;
                        // retrying the reveal starts a fresh search.
                        self.cancel = CancelToken::new();
                        return Err(err);
                    }
                };
                self.state = found;
            }
            self.first = false;
        }

        let mut board = self.state.board.clone();
        let survived = internal_reveal(&self.cache, &mut board, x, y);
        self.state.board = board;
        Ok(self.finish_move(survived))
    }

    /// Chord: if the cell is a revealed number and exactly that many of
    /// its neighbors are flagged, reveal every hidden neighbor (with the
    /// usual flood/loss rules). No-op otherwise.
    pub fn clear_around(&mut self, x: usize, y: usize) -> GameState {
        if self.state.status != GameStatus::Playing || !self.size.contains(x, y) {
            return self.game_state();
        }
        let cell = self.state.board.get(x, y);
        let number = match (cell.content, cell.visibility) {
            (Content::Safe(n), Visibility::Revealed) => n as usize,
            _ => return self.game_state(),
        };

        let point = Point::new(x, y);
        let flagged = self
            .cache
            .neighbors(point)
            .iter()
            .filter(|n| self.state.board.get(n.x, n.y).visibility == Visibility::Flagged)
            .count();
        if flagged != number {
            return self.game_state();
        }

        let mut board = self.state.board.clone();
        let mut survived = true;
        for &n in self.cache.neighbors(point) {
            survived = internal_reveal(&self.cache, &mut board, n.x, n.y) && survived;
        }
        self.state.board = board;
        self.finish_move(survived)
    }

    /// Flag or unflag a non-revealed cell, adjusting the remaining mine
    /// counter. No-op if the requested state already holds, the cell is
    /// revealed, or (in deferred guaranteed-start mode) no board exists
    /// yet.
    pub fn set_flagged(&mut self, x: usize, y: usize, flagged: bool) -> GameState {
        if self.state.status != GameStatus::Playing || !self.size.contains(x, y) || self.first {
            return self.game_state();
        }
        let cell = self.state.board.get(x, y);
        if cell.visibility == Visibility::Revealed {
            return self.game_state();
        }
        if (cell.visibility == Visibility::Flagged) == flagged {
            return self.game_state();
        }

        let mut board = self.state.board.clone();
        let visibility = if flagged {
            Visibility::Flagged
        } else {
            Visibility::Hidden
        };
        board.set(x, y, Cell::new(cell.content, visibility));
        self.state.board = board;
        self.state.remaining_mines += if flagged { -1 } else { 1 };
        self.game_state()
    }

    /// Flip the flag state of a non-revealed cell.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> GameState {
        if self.state.status != GameStatus::Playing || !self.size.contains(x, y) {
            return self.game_state();
        }
        let flagged = self.state.board.get(x, y).visibility == Visibility::Flagged;
        self.set_flagged(x, y, !flagged)
    }

    /// Conventional left click: chord on revealed numbers, reveal hidden
    /// cells, ignore flags.
    pub fn left_click(&mut self, x: usize, y: usize) -> Result<GameState, GenerationInterrupted> {
        if self.state.status != GameStatus::Playing || !self.size.contains(x, y) {
            return Ok(self.game_state());
        }
        let cell = self.state.board.get(x, y);
        match (cell.content, cell.visibility) {
            (Content::Safe(_), Visibility::Revealed) => Ok(self.clear_around(x, y)),
            (_, Visibility::Flagged) => Ok(self.game_state()),
            _ => self.reveal(x, y),
        }
    }

    /// Conventional right click: toggle the flag.
    pub fn right_click(&mut self, x: usize, y: usize) -> GameState {
        self.toggle_flag(x, y)
    }

    /// Apply loss/win detection after a board mutation and return the
    /// resulting snapshot.
    fn finish_move(&mut self, survived: bool) -> GameState {
        if !survived {
            self.state.status = GameStatus::Lost;
        } else if self.state.board.has_won() {
            self.state.status = GameStatus::Won;
        }
        self.game_state()
    }
}

/// Reveal one cell on `board`. Returns false iff a mine was revealed.
///
/// Hidden zeros flood-fill; flagged and already-revealed cells are left
/// untouched. `Unknown` content (only possible on boards built from a
/// masked snapshot) reveals as if safe.
fn internal_reveal(cache: &NeighborCache, board: &mut Board, x: usize, y: usize) -> bool {
    let cell = board.get(x, y);
    if cell.visibility != Visibility::Hidden {
        return true;
    }
    match cell.content {
        Content::Mine => {
            board.set(x, y, Cell::new(Content::Mine, Visibility::Revealed));
            false
        }
        Content::Safe(0) => {
            flood_reveal(cache, board, Point::new(x, y));
            true
        }
        content => {
            board.set(x, y, Cell::new(content, Visibility::Revealed));
            true
        }
    }
}

/// Flood fill from a hidden zero with an explicit work stack: zeros
/// recurse, numbered cells on the boundary are revealed without
/// recursing.
fn flood_reveal(cache: &NeighborCache, board: &mut Board, start: Point) {
    let mut stack = vec![start];
    while let Some(p) = stack.pop() {
        let cell = board.get(p.x, p.y);
        if cell.visibility != Visibility::Hidden || cell.content != Content::Safe(0) {
            continue;
        }
        board.set(p.x, p.y, Cell::new(Content::Safe(0), Visibility::Revealed));
        for &n in cache.neighbors(p) {
            let ncell = board.get(n.x, n.y);
            if ncell.visibility != Visibility::Hidden {
                continue;
            }
            match ncell.content {
                Content::Safe(0) => stack.push(n),
                Content::Safe(k) => {
                    board.set(n.x, n.y, Cell::new(Content::Safe(k), Visibility::Revealed));
                }
                _ => {}
            }
        }
    }
}
