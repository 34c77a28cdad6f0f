//! The deductive solver: layered inference over a masked game state.
//!
//! Layers, cheapest first; the first one that produces a move wins:
//! 1. Direct counting on single numbers (chord, flag-chord, flag
//!    contradiction).
//! 2. Region subtraction: subset and partial-overlap reasoning over
//!    number constraints, expanded to a fixed point.
//! 3. The zero-remaining-mines shortcut.
//! 4. Exhaustive enumeration of the frontier, with per-constraint and
//!    global-count pruning.
//!
//! Every move carries a [`Reason`] naming the rule and the numbered
//! cells that justify it, so a hint surface can explain the deduction.
//! The solver only ever acts on proofs; given a truthful state it
//! cannot lose, only win or resign.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::types::{Content, GameState, GameStatus, NeighborCache, Point, Visibility};

/// Frontiers at or above this size are not enumerated; the solver
/// resigns instead of trying 2^24 or more assignments.
pub const BRUTE_FORCE_LIMIT: usize = 24;

/// What a click does, in player terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal,
    ToggleFlag,
}

/// One input a solver wants played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub point: Point,
    pub action: Action,
}

impl Click {
    pub fn reveal(point: Point) -> Self {
        Self {
            point,
            action: Action::Reveal,
        }
    }

    pub fn toggle_flag(point: Point) -> Self {
        Self {
            point,
            action: Action::ToggleFlag,
        }
    }
}

/// The rule a move was deduced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logic {
    Chord,
    FlagChord,
    Contradiction,
    RegionReveal,
    RegionFlag,
    NoMinesLeft,
    BruteForce,
    BruteForceExhaustion,
}

impl Logic {
    /// Human-readable explanation, for hint surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            Logic::Chord => "every mine next to this number is flagged, so its other neighbors are safe",
            Logic::FlagChord => "the hidden neighbors of this number are exactly its missing mines",
            Logic::Contradiction => "this number has more flags around it than mines, so a flag must be wrong",
            Logic::RegionReveal => "these numbers together prove this region holds no mines",
            Logic::RegionFlag => "these numbers together prove every cell in this region is a mine",
            Logic::NoMinesLeft => "every mine is accounted for, so all remaining cells are safe",
            Logic::BruteForce => {
                "these cells hold the same value in every arrangement consistent with the numbers"
            }
            Logic::BruteForceExhaustion => {
                "every consistent arrangement spends all remaining mines on the border, so the cells beyond it are safe"
            }
        }
    }
}

/// Why a move is correct: the rule applied and the revealed numbers
/// that justify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub logic: Logic,
    pub sources: Vec<Point>,
}

/// A batch of clicks a solver asserts are safe to play together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub clicks: Vec<Click>,
    pub reason: Option<Reason>,
}

impl Move {
    fn deduced(clicks: Vec<Click>, logic: Logic, sources: Vec<Point>) -> Self {
        Self {
            clicks,
            reason: Some(Reason { logic, sources }),
        }
    }
}

/// How a driven game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    Won,
    Lost,
    Resigned,
}

/// A move source playing from the same masked view a player sees.
pub trait Solver {
    /// The next move, or `None` to resign. Must be deterministic for a
    /// given state.
    fn solve(&self, state: &GameState) -> Option<Move>;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Drive `game` to completion, playing one move at a time.
    fn play(&self, game: &mut Game) -> SolveOutcome {
        loop {
            let state = game.game_state();
            if let Some(outcome) = terminal_outcome(state.status) {
                return outcome;
            }
            let Some(mv) = self.solve(&state) else {
                return SolveOutcome::Resigned;
            };
            if !apply(game, mv) {
                return SolveOutcome::Resigned;
            }
        }
    }
}

fn terminal_outcome(status: GameStatus) -> Option<SolveOutcome> {
    match status {
        GameStatus::Won => Some(SolveOutcome::Won),
        GameStatus::Lost => Some(SolveOutcome::Lost),
        GameStatus::NeverStarted => Some(SolveOutcome::Resigned),
        GameStatus::Playing => None,
    }
}

/// Play out one move's clicks. Returns false if a reveal was
/// interrupted partway.
fn apply(game: &mut Game, mv: Move) -> bool {
    for click in mv.clicks {
        match click.action {
            Action::Reveal => {
                if game.left_click(click.point.x, click.point.y).is_err() {
                    return false;
                }
            }
            Action::ToggleFlag => {
                game.right_click(click.point.x, click.point.y);
            }
        }
    }
    true
}

/// The layered deductive solver. Stateless; every call re-derives from
/// the given snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeductiveSolver;

impl DeductiveSolver {
    /// One deduction step against a caller-provided neighbor cache, so
    /// a driven game builds the cache once instead of per step.
    pub fn solve_with(&self, state: &GameState, cache: &NeighborCache) -> Option<Move> {
        if state.status != GameStatus::Playing {
            return None;
        }
        direct_rules(state, cache)
            .or_else(|| region_rules(state, cache))
            .or_else(|| no_mines_left(state))
            .or_else(|| brute_force(state, cache))
    }
}

impl Solver for DeductiveSolver {
    fn solve(&self, state: &GameState) -> Option<Move> {
        let cache = NeighborCache::new(state.board.size());
        self.solve_with(state, &cache)
    }

    fn name(&self) -> &str {
        "deductive"
    }

    fn description(&self) -> &str {
        "Layered deduction: direct counting, region subtraction, then exhaustive \
         enumeration of the frontier. Never guesses."
    }

    fn play(&self, game: &mut Game) -> SolveOutcome {
        let cache = NeighborCache::new(game.size());
        loop {
            let state = game.game_state();
            if let Some(outcome) = terminal_outcome(state.status) {
                return outcome;
            }
            let Some(mv) = self.solve_with(&state, &cache) else {
                return SolveOutcome::Resigned;
            };
            if !apply(game, mv) {
                return SolveOutcome::Resigned;
            }
        }
    }
}

/// A pseudo-solver that accepts any board the first reveal survives.
///
/// Never produces a move. Handed to [`Game::start_with`] it reduces
/// the generation guarantee to "the first click is not a mine".
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeStart;

impl Solver for SafeStart {
    fn solve(&self, _state: &GameState) -> Option<Move> {
        None
    }

    fn name(&self) -> &str {
        "safe-start"
    }

    fn description(&self) -> &str {
        "Accepts any board whose first reveal survives. Only meaningful as a \
         generation guarantee."
    }

    fn play(&self, game: &mut Game) -> SolveOutcome {
        match game.game_state().status {
            GameStatus::Lost => SolveOutcome::Lost,
            GameStatus::NeverStarted => SolveOutcome::Resigned,
            _ => SolveOutcome::Won,
        }
    }
}

/// A pseudo-solver that accepts a board only when the first reveal
/// cascades, i.e. the clicked cell has no adjacent mines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroStart;

impl Solver for ZeroStart {
    fn solve(&self, _state: &GameState) -> Option<Move> {
        None
    }

    fn name(&self) -> &str {
        "zero-start"
    }

    fn description(&self) -> &str {
        "Accepts any board whose first reveal opens a zero cell. Only \
         meaningful as a generation guarantee."
    }

    fn play(&self, game: &mut Game) -> SolveOutcome {
        let state = game.game_state();
        match state.status {
            GameStatus::Lost => return SolveOutcome::Lost,
            GameStatus::NeverStarted => return SolveOutcome::Resigned,
            GameStatus::Playing | GameStatus::Won => {}
        }
        // Only the first move has been played, so a revealed zero can
        // only be the clicked cell itself (or its cascade).
        let opened_zero = state.board.points().any(|p| {
            let cell = state.board.get(p.x, p.y);
            cell.visibility == Visibility::Revealed && cell.content == Content::Safe(0)
        });
        if opened_zero {
            SolveOutcome::Won
        } else {
            SolveOutcome::Resigned
        }
    }
}

/// Hidden and flagged neighbors of one revealed number.
struct NumberContext {
    number: usize,
    hidden: Vec<Point>,
    flagged: Vec<Point>,
}

fn number_context(state: &GameState, cache: &NeighborCache, p: Point) -> Option<NumberContext> {
    let cell = state.board.get(p.x, p.y);
    let number = match (cell.content, cell.visibility) {
        (Content::Safe(n), Visibility::Revealed) => n as usize,
        _ => return None,
    };
    let mut hidden = Vec::new();
    let mut flagged = Vec::new();
    for &n in cache.neighbors(p) {
        match state.board.get(n.x, n.y).visibility {
            Visibility::Hidden => hidden.push(n),
            Visibility::Flagged => flagged.push(n),
            Visibility::Revealed => {}
        }
    }
    Some(NumberContext {
        number,
        hidden,
        flagged,
    })
}

/// Layer 1: single-number counting, scanned in row-major order.
fn direct_rules(state: &GameState, cache: &NeighborCache) -> Option<Move> {
    for p in state.board.points() {
        let Some(ctx) = number_context(state, cache, p) else {
            continue;
        };
        if ctx.flagged.len() == ctx.number && !ctx.hidden.is_empty() {
            // Chord: a single click on the number clears the rest.
            return Some(Move::deduced(vec![Click::reveal(p)], Logic::Chord, vec![p]));
        }
        if ctx.flagged.len() + ctx.hidden.len() == ctx.number && !ctx.hidden.is_empty() {
            let clicks = ctx.hidden.iter().copied().map(Click::toggle_flag).collect();
            return Some(Move::deduced(clicks, Logic::FlagChord, vec![p]));
        }
        if ctx.flagged.len() > ctx.number {
            // Over-flagged: some flag here is wrong, retract one and let
            // later passes re-derive the truth.
            let clicks = vec![Click::toggle_flag(ctx.flagged[0])];
            return Some(Move::deduced(clicks, Logic::Contradiction, vec![p]));
        }
    }
    None
}

/// An exact-count constraint: `required` mines among `cells`.
#[derive(Debug, Clone)]
struct Region {
    required: usize,
    cells: BTreeSet<Point>,
    sources: BTreeSet<Point>,
}

impl Region {
    fn key(&self) -> (usize, Vec<Point>) {
        (self.required, self.cells.iter().copied().collect())
    }

    /// A move if this constraint pins every one of its cells.
    fn actionable(&self) -> Option<Move> {
        if self.cells.is_empty() {
            return None;
        }
        let sources: Vec<Point> = self.sources.iter().copied().collect();
        if self.required == 0 {
            let clicks = self.cells.iter().copied().map(Click::reveal).collect();
            return Some(Move::deduced(clicks, Logic::RegionReveal, sources));
        }
        if self.required == self.cells.len() {
            let clicks = self.cells.iter().copied().map(Click::toggle_flag).collect();
            return Some(Move::deduced(clicks, Logic::RegionFlag, sources));
        }
        None
    }
}

/// Layer 2: subtract overlapping number constraints to a fixed point.
///
/// Subset rule: B inside A gives a constraint on A \ B with A.required
/// minus B.required mines. Partial overlap: if that difference equals
/// |A \ B| even though B sticks out of A, every cell of A \ B is a
/// mine.
fn region_rules(state: &GameState, cache: &NeighborCache) -> Option<Move> {
    let mut regions: Vec<Region> = Vec::new();
    let mut seen: HashSet<(usize, Vec<Point>)> = HashSet::new();
    for p in state.board.points() {
        let Some(ctx) = number_context(state, cache, p) else {
            continue;
        };
        if ctx.hidden.is_empty() {
            continue;
        }
        // Layer 1 already handled over-flagged numbers.
        let required = ctx.number.checked_sub(ctx.flagged.len())?;
        let region = Region {
            required,
            cells: ctx.hidden.iter().copied().collect(),
            sources: BTreeSet::from([p]),
        };
        if seen.insert(region.key()) {
            regions.push(region);
        }
    }

    loop {
        let mut derived: Vec<Region> = Vec::new();
        for a in &regions {
            for b in &regions {
                if a.cells == b.cells {
                    continue;
                }
                let only_a: BTreeSet<Point> = a.cells.difference(&b.cells).copied().collect();
                if b.cells.is_subset(&a.cells) {
                    let Some(required) = a.required.checked_sub(b.required) else {
                        continue;
                    };
                    let region = Region {
                        required,
                        cells: only_a,
                        sources: a.sources.union(&b.sources).copied().collect(),
                    };
                    if let Some(mv) = region.actionable() {
                        return Some(mv);
                    }
                    if seen.insert(region.key()) {
                        derived.push(region);
                    }
                } else if !a.cells.is_disjoint(&b.cells)
                    && !only_a.is_empty()
                    && a.required.checked_sub(b.required) == Some(only_a.len())
                {
                    // B's mines all fit inside the overlap, so the part
                    // of A outside B must absorb the whole difference.
                    let clicks = only_a.iter().copied().map(Click::toggle_flag).collect();
                    let sources = a.sources.union(&b.sources).copied().collect();
                    return Some(Move::deduced(clicks, Logic::RegionFlag, sources));
                }
            }
        }
        if derived.is_empty() {
            return None;
        }
        regions.extend(derived);
    }
}

/// Layer 3: with no mines left to find, everything hidden is safe.
fn no_mines_left(state: &GameState) -> Option<Move> {
    if state.remaining_mines != 0 {
        return None;
    }
    let clicks: Vec<Click> = state
        .board
        .points()
        .filter(|p| state.board.get(p.x, p.y).visibility == Visibility::Hidden)
        .map(Click::reveal)
        .collect();
    if clicks.is_empty() {
        return None;
    }
    Some(Move::deduced(clicks, Logic::NoMinesLeft, Vec::new()))
}

/// A constraint projected onto frontier indices, for enumeration.
struct FrontierConstraint {
    required: usize,
    len: usize,
    source: Point,
}

/// Layer 4: enumerate every consistent mine assignment over the
/// frontier (hidden cells touching a revealed number).
///
/// Cells forced to the same value in all assignments become a move; if
/// instead every assignment spends all remaining mines on the frontier,
/// the hidden cells beyond it are revealed.
fn brute_force(state: &GameState, cache: &NeighborCache) -> Option<Move> {
    if state.remaining_mines < 0 {
        return None;
    }
    let remaining = state.remaining_mines as usize;

    let frontier: Vec<Point> = state
        .board
        .points()
        .filter(|&p| {
            state.board.get(p.x, p.y).visibility == Visibility::Hidden
                && cache.neighbors(p).iter().any(|n| {
                    let cell = state.board.get(n.x, n.y);
                    matches!(cell.content, Content::Safe(_))
                        && cell.visibility == Visibility::Revealed
                })
        })
        .collect();
    if frontier.is_empty() || frontier.len() >= BRUTE_FORCE_LIMIT {
        return None;
    }
    let index_of = |p: Point| frontier.iter().position(|&q| q == p);

    let mut constraints: Vec<FrontierConstraint> = Vec::new();
    let mut membership: Vec<Vec<usize>> = vec![Vec::new(); frontier.len()];
    for p in state.board.points() {
        let Some(ctx) = number_context(state, cache, p) else {
            continue;
        };
        if ctx.hidden.is_empty() {
            continue;
        }
        let required = ctx.number.checked_sub(ctx.flagged.len())?;
        let c = constraints.len();
        for &cell in &ctx.hidden {
            if let Some(i) = index_of(cell) {
                membership[i].push(c);
            }
        }
        constraints.push(FrontierConstraint {
            required,
            len: ctx.hidden.len(),
            source: p,
        });
    }

    let mut solutions: Vec<(u32, usize)> = Vec::new();
    let mut placed = vec![0usize; constraints.len()];
    let mut assigned = vec![0usize; constraints.len()];
    enumerate(
        &constraints,
        &membership,
        remaining,
        0,
        0,
        0,
        &mut placed,
        &mut assigned,
        &mut solutions,
    );
    if solutions.is_empty() {
        return None;
    }

    let mut clicks: Vec<Click> = Vec::new();
    for (i, &p) in frontier.iter().enumerate() {
        let bit = 1u32 << i;
        if solutions.iter().all(|(mask, _)| mask & bit != 0) {
            clicks.push(Click::toggle_flag(p));
        } else if solutions.iter().all(|(mask, _)| mask & bit == 0) {
            clicks.push(Click::reveal(p));
        }
    }
    let sources: Vec<Point> = constraints.iter().map(|c| c.source).collect();
    if !clicks.is_empty() {
        return Some(Move::deduced(clicks, Logic::BruteForce, sources));
    }

    if solutions.iter().all(|&(_, used)| used == remaining) {
        let beyond: Vec<Click> = state
            .board
            .points()
            .filter(|&p| {
                state.board.get(p.x, p.y).visibility == Visibility::Hidden
                    && index_of(p).is_none()
            })
            .map(Click::reveal)
            .collect();
        if !beyond.is_empty() {
            return Some(Move::deduced(beyond, Logic::BruteForceExhaustion, sources));
        }
    }
    None
}

/// Backtracking assignment of mine/safe to each frontier cell in turn.
///
/// Prunes when a constraint is over-placed, when a constraint can no
/// longer be satisfied by its unassigned cells, and when the global
/// remaining-mine budget is spent.
#[allow(clippy::too_many_arguments)]
fn enumerate(
    constraints: &[FrontierConstraint],
    membership: &[Vec<usize>],
    remaining: usize,
    idx: usize,
    mask: u32,
    used: usize,
    placed: &mut [usize],
    assigned: &mut [usize],
    solutions: &mut Vec<(u32, usize)>,
) {
    if idx == membership.len() {
        if constraints
            .iter()
            .enumerate()
            .all(|(c, constraint)| placed[c] == constraint.required)
        {
            solutions.push((mask, used));
        }
        return;
    }

    if used < remaining
        && membership[idx]
            .iter()
            .all(|&c| placed[c] < constraints[c].required)
    {
        for &c in &membership[idx] {
            placed[c] += 1;
            assigned[c] += 1;
        }
        enumerate(
            constraints,
            membership,
            remaining,
            idx + 1,
            mask | 1 << idx,
            used + 1,
            placed,
            assigned,
            solutions,
        );
        for &c in &membership[idx] {
            placed[c] -= 1;
            assigned[c] -= 1;
        }
    }

    if membership[idx]
        .iter()
        .all(|&c| constraints[c].required - placed[c] <= constraints[c].len - assigned[c] - 1)
    {
        for &c in &membership[idx] {
            assigned[c] += 1;
        }
        enumerate(
            constraints,
            membership,
            remaining,
            idx + 1,
            mask,
            used,
            placed,
            assigned,
            solutions,
        );
        for &c in &membership[idx] {
            assigned[c] -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;
    use crate::types::{Board, BoardSize, Cell, GameState, GameStatus};
    use pretty_assertions::assert_eq;

    /// Build a masked playing state from ASCII rows: 'O' hidden, '!'
    /// flagged, ' ' a revealed zero, a digit a revealed number.
    fn masked_state(rows: &[&str], remaining_mines: i32) -> GameState {
        let height = rows.len();
        let width = rows[0].len();
        let size = BoardSize::new(width, height, 1).unwrap();
        let mut board = Board::new(size);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width);
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    'O' => Cell::new(Content::Unknown, Visibility::Hidden),
                    '!' => Cell::new(Content::Unknown, Visibility::Flagged),
                    ' ' => Cell::new(Content::Safe(0), Visibility::Revealed),
                    d => {
                        let n = d.to_digit(10).unwrap() as u8;
                        Cell::new(Content::Safe(n), Visibility::Revealed)
                    }
                };
                board.set(x, y, cell);
            }
        }
        GameState::new(GameStatus::Playing, board, remaining_mines)
    }

    fn solve(state: &GameState) -> Option<Move> {
        DeductiveSolver.solve(state)
    }

    #[test]
    fn test_chord_is_first_applicable_rule() {
        // Row of satisfied numbers over correctly flagged mines: the
        // first number in row-major order whose flags match chords.
        let state = masked_state(
            &[
                "     ", //
                "11211",
                "O!O!O",
                "OOOOO",
            ],
            2,
        );
        let mv = solve(&state).unwrap();
        assert_eq!(mv.clicks, vec![Click::reveal(Point::new(0, 1))]);
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::Chord);
        assert_eq!(reason.sources, vec![Point::new(0, 1)]);
    }

    #[test]
    fn test_flag_chord_flags_all_hidden_neighbors() {
        let state = masked_state(&["1", "O"], 1);
        let mv = solve(&state).unwrap();
        assert_eq!(mv.clicks, vec![Click::toggle_flag(Point::new(0, 1))]);
        assert_eq!(mv.reason.unwrap().logic, Logic::FlagChord);
    }

    #[test]
    fn test_contradiction_retracts_one_flag() {
        let state = masked_state(&["11", "!!"], -1);
        let mv = solve(&state).unwrap();
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::Contradiction);
        assert_eq!(reason.sources, vec![Point::new(0, 0)]);
        assert_eq!(mv.clicks.len(), 1);
        let click = mv.clicks[0];
        assert_eq!(click.action, Action::ToggleFlag);
        assert_eq!(
            state.board.get(click.point.x, click.point.y).visibility,
            Visibility::Flagged
        );
    }

    #[test]
    fn test_region_subset_flags_difference() {
        // The 1-2-1 pattern: the 1's region inside the 2's region
        // leaves one cell that must hold the difference.
        let state = masked_state(&["121", "OOO"], 2);
        let mv = solve(&state).unwrap();
        assert_eq!(mv.clicks, vec![Click::toggle_flag(Point::new(2, 1))]);
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::RegionFlag);
        assert_eq!(reason.sources, vec![Point::new(0, 0), Point::new(1, 0)]);
    }

    #[test]
    fn test_region_subset_reveals_difference() {
        // A flag satisfies part of the 2; what its region adds over the
        // 1's region needs zero mines.
        let state = masked_state(&["12!", "OOO"], 1);
        let mv = solve(&state).unwrap();
        assert_eq!(mv.clicks, vec![Click::reveal(Point::new(2, 1))]);
        assert_eq!(mv.reason.unwrap().logic, Logic::RegionReveal);
    }

    #[test]
    fn test_region_partial_overlap_flags_outside_cells() {
        // Neither region contains the other, but the count difference
        // equals the cells only the larger region sees.
        let state = masked_state(
            &[
                "OOOO", //
                "O121",
                "O1  ",
                "O1  ",
            ],
            3,
        );
        let mv = solve(&state).unwrap();
        assert_eq!(mv.clicks, vec![Click::toggle_flag(Point::new(3, 0))]);
        let reason = mv.reason.unwrap();
        assert_eq!(reason.logic, Logic::RegionFlag);
        assert_eq!(reason.sources, vec![Point::new(1, 1), Point::new(2, 1)]);
    }

    #[test]
    fn test_no_mines_left_reveals_everything_hidden() {
        // A wall of flags seals off a hidden column; with all mines
        // flagged, the column behind is safe wholesale.
        let state = masked_state(&["2!O", "3!O", "2!O"], 0);
        let mv = solve(&state).unwrap();
        assert_eq!(
            mv.clicks,
            vec![
                Click::reveal(Point::new(2, 0)),
                Click::reveal(Point::new(2, 1)),
                Click::reveal(Point::new(2, 2)),
            ]
        );
        assert_eq!(mv.reason.unwrap().logic, Logic::NoMinesLeft);
    }

    #[test]
    fn test_brute_force_finds_forced_cells() {
        // No direct or region rule applies, but only one arrangement
        // satisfies both numbers within the one remaining mine.
        let state = masked_state(
            &[
                " 1OOO", //
                "12OOO",
                "1!3!!",
                "11222",
            ],
            1,
        );
        let mv = solve(&state).unwrap();
        assert_eq!(
            mv.clicks,
            vec![
                Click::reveal(Point::new(2, 0)),
                Click::toggle_flag(Point::new(2, 1)),
                Click::reveal(Point::new(3, 1)),
            ]
        );
        assert_eq!(mv.reason.unwrap().logic, Logic::BruteForce);
    }

    #[test]
    fn test_brute_force_exhaustion_reveals_beyond_frontier() {
        // A 50/50 on the frontier eats the last mine either way, so the
        // hidden cells behind it must all be safe.
        let state = masked_state(&["OO", "OO", "11", "  "], 1);
        let mv = solve(&state).unwrap();
        assert_eq!(
            mv.clicks,
            vec![
                Click::reveal(Point::new(0, 0)),
                Click::reveal(Point::new(1, 0)),
            ]
        );
        assert_eq!(mv.reason.unwrap().logic, Logic::BruteForceExhaustion);
    }

    #[test]
    fn test_unsolvable_fifty_fifty_resigns() {
        let state = masked_state(&["OO", "11", "  "], 1);
        assert_eq!(solve(&state), None);
    }

    #[test]
    fn test_enumeration_unique_solution() {
        // 1-2-1 seen through the raw enumerator: corners are mines, the
        // middle is safe, all three forced.
        let state = masked_state(&["OOO", "121", "   "], 2);
        let cache = NeighborCache::new(state.board.size());
        let mv = brute_force(&state, &cache).unwrap();
        assert_eq!(
            mv.clicks,
            vec![
                Click::toggle_flag(Point::new(0, 0)),
                Click::reveal(Point::new(1, 0)),
                Click::toggle_flag(Point::new(2, 0)),
            ]
        );
    }

    #[test]
    fn test_large_frontier_is_refused() {
        // A full row of 24 hidden cells under a row of numbers exceeds
        // the enumeration limit.
        let hidden = "O".repeat(24);
        let numbers = "1".repeat(24);
        let state = masked_state(&[hidden.as_str(), numbers.as_str()], 12);
        let cache = NeighborCache::new(state.board.size());
        assert_eq!(brute_force(&state, &cache), None);
    }

    #[test]
    fn test_solve_noop_on_terminal_states() {
        let mut state = masked_state(&["11", "!O"], 0);
        state.status = GameStatus::Won;
        assert_eq!(solve(&state), None);
        state.status = GameStatus::Lost;
        assert_eq!(solve(&state), None);
    }

    #[test]
    fn test_play_reports_terminal_status_immediately() {
        let size = BoardSize::new(2, 2, 1).unwrap();
        let board = Board::with_mines(size, &[Point::new(0, 0)]);
        let mut game = Game::from_state(GameState::new(GameStatus::Lost, board, 1));
        assert_eq!(DeductiveSolver.play(&mut game), SolveOutcome::Lost);
    }

    #[test]
    fn test_solver_never_loses() {
        // Soundness: driven from any opening that survives, the solver
        // either wins or resigns, never reveals a mine.
        let size = BoardSize::new(9, 9, 10).unwrap();
        for seed in 0..50 {
            let mut game = Game::with_rng(size, GameRng::from_seed(seed));
            game.start();
            let state = game.left_click(4, 4).unwrap();
            if state.status == GameStatus::Lost {
                continue;
            }
            let outcome = DeductiveSolver.play(&mut game);
            assert_ne!(outcome, SolveOutcome::Lost, "seed {seed}");
        }
    }

    #[test]
    fn test_solve_with_shares_one_cache() {
        let state = masked_state(&["121", "OOO"], 2);
        let cache = NeighborCache::new(state.board.size());
        assert_eq!(
            DeductiveSolver.solve_with(&state, &cache),
            DeductiveSolver.solve(&state)
        );
    }

    #[test]
    fn test_safe_start_never_accepts_a_mined_first_click() {
        use crate::board::{generate_guaranteed_seeded, CancelToken};

        let size = BoardSize::new(5, 4, 4).unwrap();
        let first = Point::new(1, 1);
        let cancel = CancelToken::new();
        for seed in 0..200 {
            let mut rng = GameRng::from_seed(seed);
            let state =
                generate_guaranteed_seeded(size, first, &SafeStart, &cancel, &mut rng).unwrap();
            assert!(
                matches!(state.board.get(first.x, first.y).content, Content::Safe(_)),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn test_start_with_safe_start_survives_first_click() {
        use std::sync::Arc;

        let mut game = Game::new(BoardSize::new(5, 4, 4).unwrap());
        game.start_with(Arc::new(SafeStart));
        let state = game.reveal(2, 2).unwrap();
        assert_ne!(state.status, GameStatus::Lost);
        assert_eq!(state.board.get(2, 2).visibility, Visibility::Revealed);
    }

    #[test]
    fn test_zero_start_requires_a_cascading_first_click() {
        use crate::board::{generate_guaranteed_seeded, CancelToken};

        let size = BoardSize::new(5, 4, 4).unwrap();
        let first = Point::new(2, 2);
        let mut rng = GameRng::from_seed(11);
        let state =
            generate_guaranteed_seeded(size, first, &ZeroStart, &CancelToken::new(), &mut rng)
                .unwrap();
        assert_eq!(state.board.get(first.x, first.y).content, Content::Safe(0));
    }

    #[test]
    fn test_descriptions_are_stable() {
        assert!(Logic::Chord.description().contains("flagged"));
        assert_eq!(DeductiveSolver.name(), "deductive");
    }
}
