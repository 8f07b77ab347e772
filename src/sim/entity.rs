//! Entity records: everything that lives on or above the grid.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tile_center;

/// Cosmetic crew member the player picked before the session started.
/// Read-only once the simulation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    Stewardess,
    Steward,
    Pilot,
}

impl CharacterKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stewardess" => Some(CharacterKind::Stewardess),
            "steward" => Some(CharacterKind::Steward),
            "pilot" => Some(CharacterKind::Pilot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Stewardess => "stewardess",
            CharacterKind::Steward => "steward",
            CharacterKind::Pilot => "pilot",
        }
    }
}

/// Horizontal sprite orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// One of the four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Movement delta for one step at `speed` px/tick. Screen coordinates:
    /// y grows downward.
    #[inline]
    pub fn delta(self, speed: f32) -> Vec2 {
        match self {
            Heading::Up => Vec2::new(0.0, -speed),
            Heading::Right => Vec2::new(speed, 0.0),
            Heading::Down => Vec2::new(0.0, speed),
            Heading::Left => Vec2::new(-speed, 0.0),
        }
    }

    /// Unit tile offset (dc, dr).
    #[inline]
    pub fn tile_step(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }

    #[inline]
    pub fn clockwise(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    #[inline]
    pub fn counter_clockwise(self) -> Self {
        self.clockwise().clockwise().clockwise()
    }

    #[inline]
    pub fn reverse(self) -> Self {
        self.clockwise().clockwise()
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Anything the collision engine can test and the movement resolver can
/// push around.
pub trait Body {
    fn pos(&self) -> Vec2;
    fn pos_mut(&mut self) -> &mut Vec2;
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool;
}

/// The player avatar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub alive: bool,
    pub facing: Facing,
    /// Walk-cycle counter; advances only on successful movement.
    pub anim_frame: u32,
    pub character: CharacterKind,
}

impl Player {
    /// A fresh player standing on the spawn tile.
    pub fn at_spawn(character: CharacterKind) -> Self {
        Self {
            pos: tile_center(SPAWN_COL, SPAWN_ROW),
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            alive: true,
            facing: Facing::Right,
            anim_frame: 0,
            character,
        }
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A mobile NPC. Enemies and allies share the record; which list it sits in
/// decides its role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub alive: bool,
    pub heading: Heading,
}

impl Npc {
    pub fn new(pos: Vec2, speed: f32, heading: Heading) -> Self {
        Self {
            pos,
            radius: NPC_RADIUS,
            speed,
            alive: true,
            heading,
        }
    }
}

impl Body for Npc {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A ticking bomb occupying one tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub col: i32,
    pub row: i32,
    /// Ticks until detonation.
    pub fuse: u32,
    /// Blast reach in tiles per cardinal direction.
    pub range: i32,
    /// Chain-spawned by a burning brick rather than placed by the player;
    /// auto bombs don't count toward the player's one-bomb limit.
    pub auto: bool,
}

impl Bomb {
    pub fn player_placed(col: i32, row: i32, range: i32) -> Self {
        Self {
            col,
            row,
            fuse: BOMB_FUSE_TICKS,
            range,
            auto: false,
        }
    }

    pub fn chained(col: i32, row: i32, range: i32) -> Self {
        Self {
            col,
            row,
            fuse: BOMB_FUSE_TICKS,
            range,
            auto: true,
        }
    }
}

/// One burning tile of a blast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub col: i32,
    pub row: i32,
    /// Ticks until the flame fades out.
    pub fade: u32,
}

impl Explosion {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            col,
            row,
            fade: EXPLOSION_FADE_TICKS,
        }
    }

    /// Pixel center of the burning tile.
    pub fn center(&self) -> Vec2 {
        tile_center(self.col, self.row)
    }
}

/// A collectible plane granting an extra life. Stays in the list after
/// collection, merely flagged, so the presentation can fade it out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub collected: bool,
    /// Decorative bob counter.
    pub pulse: u32,
    /// Decorative rotation in radians.
    pub spin: f32,
}

impl Pickup {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
            pulse: 0,
            spin: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_rotations_cycle() {
        for h in Heading::ALL {
            assert_eq!(h.reverse().reverse(), h);
            assert_eq!(h.clockwise().counter_clockwise(), h);
            assert_ne!(h.reverse(), h);
        }
        assert_eq!(Heading::Up.clockwise(), Heading::Right);
        assert_eq!(Heading::Up.counter_clockwise(), Heading::Left);
    }

    #[test]
    fn heading_deltas_match_tile_steps() {
        for h in Heading::ALL {
            let d = h.delta(crate::consts::TILE_SIZE);
            let (dc, dr) = h.tile_step();
            assert_eq!(crate::point_to_tile(crate::tile_center(4, 4) + d), (4 + dc, 4 + dr));
        }
    }

    #[test]
    fn character_kind_round_trips_through_strings() {
        for kind in [
            CharacterKind::Stewardess,
            CharacterKind::Steward,
            CharacterKind::Pilot,
        ] {
            assert_eq!(CharacterKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(CharacterKind::from_str("copilot"), None);
    }

    #[test]
    fn player_spawns_alive_on_the_spawn_tile() {
        let p = Player::at_spawn(CharacterKind::Pilot);
        assert!(p.alive);
        assert_eq!(crate::point_to_tile(p.pos), (1, 1));
        assert_eq!(p.character, CharacterKind::Pilot);
    }
}
