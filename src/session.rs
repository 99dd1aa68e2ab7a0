use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{GameError, Result};
use crate::level::maze_rooms;
use crate::maze::{self, Dir, Grid, Pos, ENTRY};
use crate::thread::{StepOutcome, Tension, Thread};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Active,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Wall, edge of the grid, or the attempt is already over.
    Ignored,
    Advanced,
    Retraced { returned: usize },
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: &'static str,
    pub text: String,
}

/// Read-only view of a session for whatever draws it.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub level: u32,
    pub steps: u32,
    pub thread_left: u32,
    pub max_thread: u32,
    pub thread_percent: u32,
    pub tension: Tension,
    pub rooms: (usize, usize),
    pub maze_seed: u64,
    pub grid: &'a Grid,
    pub path: &'a [Pos],
    pub player: Pos,
    pub exit: Pos,
    pub status: Status,
}

/// One player's run through the levels. Owns the maze, trail and
/// positions of the current attempt; starting a level replaces all of them.
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    rng: R,
    max_thread: u32,
    level: u32,
    steps: u32,
    maze_seed: u64,
    grid: Grid,
    thread: Thread,
    player: Pos,
    exit: Pos,
    status: Status,
}

impl Session<ChaCha8Rng> {
    pub fn seeded(max_thread: u32, seed: u64) -> Result<Self> {
        Self::new(max_thread, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session already playing level 1.
    pub fn new(max_thread: u32, mut rng: R) -> Result<Self> {
        if max_thread == 0 {
            return Err(GameError::InvalidThread(max_thread));
        }
        let (grid, maze_seed) = build_maze(&mut rng, 1)?;
        Ok(Self::assemble(rng, max_thread, 1, grid, maze_seed))
    }

    pub fn start_level(&mut self, level: u32) -> Result<()> {
        let (grid, seed) = build_maze(&mut self.rng, level)?;
        self.reset(level, grid, seed);
        Ok(())
    }

    /// Starts a fresh maze for the level that is up next: the same level
    /// after a loss or mid-attempt, the following one after a win.
    pub fn restart_level(&mut self) -> Result<()> {
        self.start_level(self.upcoming_level())
    }

    pub fn attempt_move(&mut self, dir: Dir) -> MoveOutcome {
        if self.status != Status::Active {
            return MoveOutcome::Ignored;
        }
        let Some(target) = self.grid.step(self.player, dir).filter(|p| self.grid.is_open(*p))
        else {
            trace!("move {dir:?} from {:?} blocked", self.player);
            return MoveOutcome::Ignored;
        };

        self.steps = self.steps.saturating_add(1);
        let outcome = match self.thread.attempt_step(target) {
            StepOutcome::Depleted => {
                self.status = Status::Lost;
                info!(
                    "thread ran out on level {} after {} steps",
                    self.level, self.steps
                );
                return MoveOutcome::Lost;
            }
            StepOutcome::Advanced => MoveOutcome::Advanced,
            StepOutcome::Retraced { returned } => MoveOutcome::Retraced { returned },
        };
        self.player = target;
        debug!(
            "step {} to {target:?}: {outcome:?}, thread {}/{}",
            self.steps,
            self.thread.left(),
            self.max_thread
        );

        if self.player == self.exit {
            self.status = Status::Won;
            info!("level {} cleared in {} steps", self.level, self.steps);
            return MoveOutcome::Won;
        }
        outcome
    }

    fn assemble(rng: R, max_thread: u32, level: u32, grid: Grid, maze_seed: u64) -> Self {
        Self {
            rng,
            max_thread,
            level,
            steps: 0,
            maze_seed,
            thread: Thread::new(ENTRY, max_thread),
            player: ENTRY,
            exit: exit_room(&grid),
            grid,
            status: Status::Active,
        }
    }

    fn reset(&mut self, level: u32, grid: Grid, maze_seed: u64) {
        self.exit = exit_room(&grid);
        self.grid = grid;
        self.maze_seed = maze_seed;
        self.level = level;
        self.steps = 0;
        self.player = ENTRY;
        self.thread = Thread::new(ENTRY, self.max_thread);
        self.status = Status::Active;
    }
}

impl<R> Session<R> {
    /// Level of the current (or just finished) attempt.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upcoming_level(&self) -> u32 {
        match self.status {
            Status::Won => self.level.saturating_add(1),
            _ => self.level,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn maze_seed(&self) -> u64 {
        self.maze_seed
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            level: self.level,
            steps: self.steps,
            thread_left: self.thread.left(),
            max_thread: self.max_thread,
            thread_percent: self.thread.percent_left(),
            tension: self.thread.tension(),
            rooms: self.grid.rooms(),
            maze_seed: self.maze_seed,
            grid: &self.grid,
            path: self.thread.path(),
            player: self.player,
            exit: self.exit,
            status: self.status,
        }
    }

    pub fn message(&self) -> Option<Message> {
        match self.status {
            Status::Active => None,
            Status::Won => Some(Message {
                title: "Level cleared!",
                text: format!("You found the exit in {} steps!", self.steps),
            }),
            Status::Lost => Some(Message {
                title: "The thread snapped!",
                text: format!(
                    "You are stuck in the maze on level {}. Try again!",
                    self.level
                ),
            }),
        }
    }
}

/// Bottom-right-most room slot of the grid.
fn exit_room(grid: &Grid) -> Pos {
    Pos::new(grid.width().saturating_sub(2), grid.height().saturating_sub(2))
}

fn build_maze(rng: &mut impl Rng, level: u32) -> Result<(Grid, u64)> {
    let (width, height) = maze_rooms(level)?;
    let seed: u64 = rng.gen();
    let grid = maze::generate(width, height, &mut ChaCha8Rng::seed_from_u64(seed))?;
    info!("level {level}: {width}x{height} rooms, maze seed {seed}");
    Ok((grid, seed))
}

#[cfg(test)]
impl<R: Rng> Session<R> {
    /// Session on a hand-built grid, exit in the bottom-right room slot.
    pub(crate) fn with_grid(grid: Grid, level: u32, max_thread: u32, rng: R) -> Self {
        Self::assemble(rng, max_thread, level, grid, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn corridor(len: usize, max_thread: u32) -> Session {
        let wall = "#".repeat(len + 2);
        let text = format!("{wall}\n#{}#\n{wall}", ".".repeat(len));
        Session::with_grid(
            Grid::parse(&text).unwrap(),
            1,
            max_thread,
            ChaCha8Rng::seed_from_u64(0),
        )
    }

    #[test]
    fn new_session_starts_level_one() {
        let session = Session::seeded(100, 5).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.steps, 0);
        assert_eq!(snap.thread_left, 100);
        assert_eq!(snap.max_thread, 100);
        assert_eq!(snap.rooms, (10, 10));
        assert_eq!(snap.grid.width(), 21);
        assert_eq!(snap.player, ENTRY);
        assert_eq!(snap.exit, Pos::new(19, 19));
        assert_eq!(snap.path, &[ENTRY]);
        assert_eq!(snap.status, Status::Active);
        assert!(session.message().is_none());
    }

    #[test]
    fn bad_configuration_fails_fast() {
        assert!(matches!(
            Session::seeded(0, 1),
            Err(GameError::InvalidThread(0))
        ));

        let mut session = Session::seeded(100, 1).unwrap();
        let seed = session.maze_seed();
        assert!(matches!(
            session.start_level(0),
            Err(GameError::InvalidLevel(0))
        ));
        assert_eq!(session.level(), 1);
        assert_eq!(session.maze_seed(), seed);
    }

    #[test]
    fn walls_and_edges_are_ignored() {
        let mut session = corridor(3, 10);
        assert_eq!(session.attempt_move(Dir::Up), MoveOutcome::Ignored);
        assert_eq!(session.attempt_move(Dir::Left), MoveOutcome::Ignored);
        assert_eq!(session.attempt_move(Dir::Down), MoveOutcome::Ignored);
        assert_eq!(session.steps(), 0);
        assert_eq!(session.thread().path(), &[ENTRY]);

        // a wall-less grid lets the player reach the outermost row
        let mut open = Session::with_grid(
            Grid::parse("....\n....\n....").unwrap(),
            1,
            10,
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(open.attempt_move(Dir::Up), MoveOutcome::Advanced);
        assert_eq!(open.attempt_move(Dir::Up), MoveOutcome::Ignored);
        assert_eq!(open.steps(), 1);
    }

    #[test]
    fn thread_scenario_on_corridor() {
        let mut session = corridor(5, 3);
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Advanced);
        assert_eq!(session.thread().left(), 2);
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Advanced);
        assert_eq!(session.thread().left(), 1);
        assert_eq!(session.thread().path().len(), 3);
        assert_eq!(
            session.attempt_move(Dir::Left),
            MoveOutcome::Retraced { returned: 1 }
        );
        assert_eq!(session.thread().left(), 2);
        assert_eq!(session.thread().path(), &[Pos::new(1, 1), Pos::new(2, 1)]);
        assert_eq!(session.player(), Pos::new(2, 1));
        assert_eq!(session.steps(), 3);
    }

    #[test_log::test]
    fn depletion_loses_without_moving() {
        let mut session = corridor(5, 1);
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Advanced);
        assert_eq!(session.thread().left(), 0);

        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Lost);
        assert_eq!(session.status(), Status::Lost);
        assert_eq!(session.player(), Pos::new(2, 1));
        assert_eq!(session.thread().path(), &[Pos::new(1, 1), Pos::new(2, 1)]);
        assert_eq!(session.steps(), 2);

        assert_eq!(session.attempt_move(Dir::Left), MoveOutcome::Ignored);
        assert_eq!(session.steps(), 2);

        let message = session.message().unwrap();
        assert_eq!(message.title, "The thread snapped!");
        assert_eq!(
            message.text,
            "You are stuck in the maze on level 1. Try again!"
        );
    }

    #[test]
    fn retrace_still_allowed_on_empty_spool() {
        let mut session = corridor(5, 1);
        session.attempt_move(Dir::Right);
        assert_eq!(
            session.attempt_move(Dir::Left),
            MoveOutcome::Retraced { returned: 1 }
        );
        assert_eq!(session.thread().left(), 1);
        assert_eq!(session.status(), Status::Active);
    }

    #[test_log::test]
    fn reaching_exit_wins_and_advances_next_start() {
        let mut session = corridor(3, 10);
        assert_eq!(session.exit(), Pos::new(3, 1));
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Advanced);
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Won);
        assert_eq!(session.status(), Status::Won);
        assert_eq!(session.level(), 1);
        assert_eq!(session.upcoming_level(), 2);
        assert_eq!(
            session.message().unwrap().text,
            "You found the exit in 2 steps!"
        );

        assert_eq!(session.attempt_move(Dir::Left), MoveOutcome::Ignored);
        assert_eq!(session.player(), Pos::new(3, 1));

        session.restart_level().unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.level, 2);
        assert_eq!(snap.rooms, (12, 12));
        assert_eq!(snap.exit, Pos::new(23, 23));
        assert_eq!(snap.status, Status::Active);
        assert_eq!(snap.steps, 0);
        assert_eq!(snap.thread_left, 10);
        assert_eq!(snap.path, &[ENTRY]);
    }

    #[test]
    fn restart_after_loss_replays_same_level() {
        let mut session = Session::seeded(1, 11).unwrap();
        session.start_level(3).unwrap();
        let first_seed = session.maze_seed();

        let dir = Dir::ALL
            .into_iter()
            .find(|d| session.grid().step(ENTRY, *d).is_some_and(|p| session.grid().is_open(p)))
            .unwrap();
        assert_eq!(session.attempt_move(dir), MoveOutcome::Advanced);
        let next = Dir::ALL
            .into_iter()
            .find(|d| {
                session
                    .grid()
                    .step(session.player(), *d)
                    .is_some_and(|p| session.grid().is_open(p) && p != ENTRY)
            })
            .unwrap();
        assert_eq!(session.attempt_move(next), MoveOutcome::Lost);

        session.restart_level().unwrap();
        assert_eq!(session.level(), 3);
        assert_eq!(session.status(), Status::Active);
        assert_eq!(session.steps(), 0);
        assert_eq!(session.thread().left(), 1);
        assert_ne!(session.maze_seed(), first_seed);
    }

    #[test]
    fn random_walks_keep_trail_and_budget_consistent() {
        for seed in 0..40u64 {
            let mut session = Session::seeded(100, seed).unwrap();
            let mut walk = ChaCha8Rng::seed_from_u64(seed + 1000);
            let max = session.snapshot().max_thread as usize;

            for _ in 0..600 {
                let before = session.thread().clone();
                let player_before = session.player();
                let dir = Dir::ALL[walk.gen_range(0..4)];
                let outcome = session.attempt_move(dir);

                let path = session.thread().path();
                let unique: HashSet<_> = path.iter().collect();
                assert_eq!(unique.len(), path.len(), "seed={seed}");
                assert_eq!(path[0], ENTRY);

                match outcome {
                    MoveOutcome::Lost => {
                        assert_eq!(before.left(), 0);
                        assert_eq!(session.thread(), &before);
                        assert_eq!(session.player(), player_before);
                        break;
                    }
                    MoveOutcome::Won => break,
                    _ => {
                        assert_eq!(path.last(), Some(&session.player()));
                        assert_eq!(
                            session.thread().left() as usize + path.len() - 1,
                            max,
                            "seed={seed}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn counters_saturate_instead_of_overflowing() {
        let mut session = corridor(3, 10);
        session.attempt_move(Dir::Right);
        session.steps = u32::MAX - 1;
        assert_eq!(
            session.attempt_move(Dir::Left),
            MoveOutcome::Retraced { returned: 1 }
        );
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Advanced);
        assert_eq!(session.steps(), u32::MAX);

        session.level = u32::MAX;
        assert_eq!(session.attempt_move(Dir::Right), MoveOutcome::Won);
        assert_eq!(session.upcoming_level(), u32::MAX);
    }

    #[test]
    fn snapshot_tracks_gauge() {
        let mut session = corridor(60, 10);
        for _ in 0..5 {
            session.attempt_move(Dir::Right);
        }
        let snap = session.snapshot();
        assert_eq!(snap.thread_left, 5);
        assert_eq!(snap.thread_percent, 50);
        assert_eq!(snap.tension, Tension::Danger);
        assert_eq!(snap.path.len(), 6);
    }
}
