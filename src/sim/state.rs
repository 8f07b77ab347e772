//! Session state and the level lifecycle.
//!
//! One `Session` owns everything a level needs: the maze, the player, the
//! rosters, the bombs and flames, the countdown and lives. It is rebuilt
//! wholesale on every level (re)start and never mutated from outside the
//! tick and the transition handlers; the presentation layer only reads.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Bomb, CharacterKind, Explosion, Heading, Npc, Pickup, Player};
use super::grid::Grid;
use crate::consts::*;
use crate::tile_center;
use crate::tuning::Tuning;

/// Why a run (or a life) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LossReason {
    TimeExpired,
    Explosion,
    EnemyContact,
}

/// Lifecycle phase of the session.
///
/// Terminal-per-level phases (`LevelComplete`, `Victory`, `GameOver`) pause
/// the simulation until the host delivers a confirmation via [`Session::confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for the first confirmation to build level 1.
    Loading,
    /// Simulation running.
    Active,
    /// Level cleared, next level pending confirmation.
    LevelComplete,
    /// Final level cleared; confirmation restarts from level 1.
    Victory,
    /// Out of lives or out of time; confirmation retries the level.
    GameOver { reason: LossReason },
}

/// Things that happened during a tick, drained once per frame by the shell
/// for overlays, HUD updates and sound.
#[derive(Debug, Clone, Serialize)]
pub enum GameEvent {
    BombPlaced { col: i32, row: i32 },
    BombExploded { col: i32, row: i32 },
    BrickDestroyed { col: i32, row: i32 },
    AutoBombSpawned { col: i32, row: i32 },
    EnemyKilled { by_ally: bool },
    PickupCollected { life_gained: bool },
    LifeLost { cause: LossReason, lives_left: u8 },
    LevelCleared { level: u32 },
    Victory,
    GameOver { reason: LossReason },
}

/// Complete game state for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Run seed for reproducibility.
    pub seed: u64,
    pub level: u32,
    pub lives: u8,
    /// Seconds left on the level clock, decremented by the host once per
    /// real-time second, independent of tick rate.
    pub countdown: u32,
    pub phase: Phase,
    pub grid: Grid,
    pub player: Player,
    pub enemies: Vec<Npc>,
    pub allies: Vec<Npc>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub pickups: Vec<Pickup>,
    /// Ticks elapsed in the current level.
    pub tick_count: u64,
    #[serde(skip)]
    pub(crate) tuning: Tuning,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    /// Create a session in the `Loading` phase. The character choice is
    /// fixed here and read-only afterwards.
    pub fn new(seed: u64, character: CharacterKind) -> Self {
        Self::with_tuning(seed, character, Tuning::default())
    }

    pub fn with_tuning(seed: u64, character: CharacterKind, tuning: Tuning) -> Self {
        Self {
            seed,
            level: 1,
            lives: MAX_LIVES,
            countdown: LEVEL_TIME_SECS,
            phase: Phase::Loading,
            grid: Grid::open(),
            player: Player::at_spawn(character),
            enemies: Vec::new(),
            allies: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            pickups: Vec::new(),
            tick_count: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Rebuild the whole session state for a level and go `Active`.
    pub fn start_level(&mut self, level: u32) {
        log::info!("starting level {level}");
        self.level = level;
        self.countdown = LEVEL_TIME_SECS;
        self.tick_count = 0;
        self.grid = Grid::generate(self.tuning.brick_density(level), &mut self.rng);
        self.player = Player::at_spawn(self.player.character);
        self.bombs.clear();
        self.explosions.clear();
        self.spawn_enemies();
        self.spawn_allies();
        self.spawn_pickups();
        self.phase = Phase::Active;
    }

    /// External confirmation from the overlay button. Drives every
    /// transition out of a paused phase.
    pub fn confirm(&mut self) {
        match self.phase {
            Phase::Loading => self.start_level(1),
            Phase::LevelComplete => {
                let next = self.level + 1;
                self.start_level(next);
            }
            Phase::Victory => self.start_level(1),
            Phase::GameOver { .. } => {
                self.lives = MAX_LIVES;
                let level = self.level;
                self.start_level(level);
            }
            Phase::Active => {}
        }
    }

    /// One real-time second elapsed. Host-driven, independent of the tick.
    pub fn countdown_second(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.end_run(LossReason::TimeExpired);
        }
    }

    /// Enemies still standing.
    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The player just died. Decrements lives and either respawns at the
    /// start tile or ends the run.
    pub(crate) fn lose_life(&mut self, cause: LossReason) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            cause,
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.end_run(cause);
        } else {
            self.player.pos = tile_center(SPAWN_COL, SPAWN_ROW);
            self.player.alive = true;
        }
    }

    pub(crate) fn end_run(&mut self, reason: LossReason) {
        log::info!("game over on level {}: {reason:?}", self.level);
        self.phase = Phase::GameOver { reason };
        self.events.push(GameEvent::GameOver { reason });
    }

    /// All enemies down: pause for the level-clear (or victory) overlay.
    pub(crate) fn complete_level(&mut self) {
        if self.level >= FINAL_LEVEL {
            log::info!("final level cleared");
            self.phase = Phase::Victory;
            self.events.push(GameEvent::Victory);
        } else {
            log::info!("level {} cleared", self.level);
            self.phase = Phase::LevelComplete;
            self.events.push(GameEvent::LevelCleared { level: self.level });
        }
    }

    fn spawn_enemies(&mut self) {
        let count = self.tuning.enemy_count(self.level);
        let speed = self.tuning.enemy_speed(self.level);
        self.enemies = self.scatter_npcs(count, speed, 5);
        log::debug!("placed {}/{} enemies", self.enemies.len(), count);
    }

    fn spawn_allies(&mut self) {
        let count = self.tuning.allies_for_level(self.level);
        let speed = self.tuning.ally_speed;
        self.allies = self.scatter_npcs(count, speed, 5);
        if count > 0 {
            log::debug!("placed {}/{} allies", self.allies.len(), count);
        }
    }

    fn spawn_pickups(&mut self) {
        self.pickups.clear();
        let count = if self.rng.random::<f32>() > 0.5 { 2 } else { 1 };
        for _ in 0..count {
            match find_open_tile(
                &self.grid,
                &mut self.rng,
                4,
                PICKUP_PLACEMENT_ATTEMPTS,
            ) {
                Some((col, row)) => self.pickups.push(Pickup::new(tile_center(col, row))),
                None => log::warn!("no open tile for pickup, dropping it for this level"),
            }
        }
    }

    /// Place `count` NPCs on random open tiles outside the spawn quadrant.
    /// A placement that exhausts its attempt limit is dropped for the
    /// level, never retried.
    fn scatter_npcs(&mut self, count: u32, speed: f32, spawn_exclusion: i32) -> Vec<Npc> {
        let mut placed = Vec::with_capacity(count as usize);
        for _ in 0..count {
            match find_open_tile(
                &self.grid,
                &mut self.rng,
                spawn_exclusion,
                NPC_PLACEMENT_ATTEMPTS,
            ) {
                Some((col, row)) => {
                    let heading = Heading::random(&mut self.rng);
                    placed.push(Npc::new(tile_center(col, row), speed, heading));
                }
                None => log::warn!("placement attempts exhausted, dropping one unit"),
            }
        }
        placed
    }
}

/// Sample random tiles until one is empty and outside the square exclusion
/// zone at the spawn corner, giving up after `attempts` tries.
fn find_open_tile(
    grid: &Grid,
    rng: &mut impl Rng,
    spawn_exclusion: i32,
    attempts: u32,
) -> Option<(i32, i32)> {
    for _ in 0..attempts {
        let col = rng.random_range(0..COLS);
        let row = rng.random_range(0..ROWS);
        if col < spawn_exclusion && row < spawn_exclusion {
            continue;
        }
        if grid.is_empty(col, row) {
            return Some((col, row));
        }
    }
    None
}
