//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Per-frame ticks only, driven by the host
//! - Seeded RNG only, owned by the session
//! - No rendering, audio, or platform dependencies
//!
//! The presentation layer reads the tick-end `Session` (serialized once per
//! frame) and drains `GameEvent`s; it never mutates simulation state.

pub mod bomb;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod pursuit;
pub mod state;
pub mod tick;

pub use collision::{collides, probe, try_move};
pub use entity::{
    Body, Bomb, CharacterKind, Explosion, Facing, Heading, Npc, Pickup, Player,
};
pub use grid::{Cell, Grid};
pub use pursuit::Intent;
pub use state::{GameEvent, LossReason, Phase, Session};
pub use tick::{tick, TickInput};
