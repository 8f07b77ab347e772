//! Sky Bomber - a destructible-maze arcade bomber game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, collisions, bombs, pursuit AI, session state)
//! - `audio`: Procedural Web Audio sound effects (wasm only)
//! - `tuning`: Data-driven game balance
//! - `error`: Setup/platform error types

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid tile in pixels
    pub const TILE_SIZE: f32 = 40.0;
    /// Grid width in tiles
    pub const COLS: i32 = 16;
    /// Grid height in tiles
    pub const ROWS: i32 = 11;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 12.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Fixed spawn tile (top-left open corner)
    pub const SPAWN_COL: i32 = 1;
    pub const SPAWN_ROW: i32 = 1;

    /// Enemy/ally collision radius
    pub const NPC_RADIUS: f32 = 12.0;

    /// Inward margin applied to corner probes; lets entities squeeze past
    /// diagonal gaps while still being blocked by overlapping tiles
    pub const COLLISION_MARGIN: f32 = 4.0;

    /// Bomb fuse length in ticks (~2 s at 60 ticks/s)
    pub const BOMB_FUSE_TICKS: u32 = 120;
    /// Explosion cell lifetime in ticks (~1/3 s)
    pub const EXPLOSION_FADE_TICKS: u32 = 20;

    /// An explosion cell kills entities closer than this to its center
    pub const BLAST_KILL_RANGE: f32 = TILE_SIZE * 0.8;
    /// Enemy-player and ally-enemy contact kill distance
    pub const CONTACT_RANGE: f32 = TILE_SIZE * 0.6;
    /// Pickup collection distance
    pub const PICKUP_RANGE: f32 = TILE_SIZE * 0.5;
    /// Enemies chase the player only inside this radius
    pub const ENEMY_SIGHT_RANGE: f32 = TILE_SIZE * 10.0;

    /// Lives at session start, also the cap pickups fill up to
    pub const MAX_LIVES: u8 = 3;
    /// Countdown armed at each level start, in seconds
    pub const LEVEL_TIME_SECS: u32 = 60;
    /// Clearing this level wins the game
    pub const FINAL_LEVEL: u32 = 3;

    /// Bounded random-placement attempts before an entity is dropped
    pub const NPC_PLACEMENT_ATTEMPTS: u32 = 100;
    pub const PICKUP_PLACEMENT_ATTEMPTS: u32 = 50;
}

/// Convert a pixel position to the (col, row) of the tile containing it
#[inline]
pub fn point_to_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / consts::TILE_SIZE).floor() as i32,
        (pos.y / consts::TILE_SIZE).floor() as i32,
    )
}

/// Pixel-space center of a tile
#[inline]
pub fn tile_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(
        col as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
        row as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
    )
}
