//! Data-driven game balance.
//!
//! Every tuned constant that shapes difficulty lives here so a build (or a
//! hosting page) can override balance without touching simulation code.
//! Defaults are the shipped values.

use serde::{Deserialize, Serialize};

/// Tunable balance parameters, applied per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Chance that a pursuer refuses to consider reversing its heading.
    /// Produces hesitation instead of a hard no-reversal rule.
    pub reverse_hesitation: f64,
    /// Chance that a destroyed brick leaves a live bomb behind.
    pub auto_bomb_chance: f64,
    /// Blast range (tiles) of chain-spawned bombs.
    pub auto_bomb_range: i32,
    /// Player blast range = this + current level.
    pub blast_range_base: i32,

    /// Brick seeding probability = base + per_level * level.
    pub brick_density_base: f64,
    pub brick_density_per_level: f64,

    /// Enemy count = base + per_level * level.
    pub enemy_base_count: u32,
    pub enemies_per_level: u32,
    /// Enemy speed (px/tick) = base + per_level * level.
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,

    /// Allies join from this level onward, this many per level.
    pub ally_unlock_level: u32,
    pub ally_count: u32,
    pub ally_speed: f32,

    /// Score bonus for keeping the current heading while pursuing.
    pub heading_bias: f32,
    /// Distance scoring looks this many movement steps ahead.
    pub pursuit_lookahead: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reverse_hesitation: 0.7,
            auto_bomb_chance: 0.3,
            auto_bomb_range: 2,
            blast_range_base: 1,
            brick_density_base: 0.3,
            brick_density_per_level: 0.05,
            enemy_base_count: 2,
            enemies_per_level: 2,
            enemy_base_speed: 1.0,
            enemy_speed_per_level: 0.2,
            ally_unlock_level: 3,
            ally_count: 1,
            ally_speed: 1.3,
            heading_bias: 10.0,
            pursuit_lookahead: 3.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning override from JSON, clamping probabilities into range.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Clamp probability fields to [0, 1].
    pub fn sanitized(mut self) -> Self {
        self.reverse_hesitation = self.reverse_hesitation.clamp(0.0, 1.0);
        self.auto_bomb_chance = self.auto_bomb_chance.clamp(0.0, 1.0);
        self.brick_density_base = self.brick_density_base.clamp(0.0, 1.0);
        self.brick_density_per_level = self.brick_density_per_level.clamp(0.0, 1.0);
        self
    }

    /// Brick seeding probability for a level.
    pub fn brick_density(&self, level: u32) -> f64 {
        (self.brick_density_base + self.brick_density_per_level * level as f64).clamp(0.0, 1.0)
    }

    /// Enemy roster size for a level.
    pub fn enemy_count(&self, level: u32) -> u32 {
        self.enemy_base_count + self.enemies_per_level * level
    }

    /// Enemy movement speed for a level.
    pub fn enemy_speed(&self, level: u32) -> f32 {
        self.enemy_base_speed + self.enemy_speed_per_level * level as f32
    }

    /// Ally roster size for a level (zero before the unlock level).
    pub fn allies_for_level(&self, level: u32) -> u32 {
        if level >= self.ally_unlock_level {
            self.ally_count
        } else {
            0
        }
    }

    /// Player blast range for a level.
    pub fn blast_range(&self, level: u32) -> i32 {
        self.blast_range_base + level as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_balance() {
        let t = Tuning::default();
        assert_eq!(t.enemy_count(1), 4);
        assert_eq!(t.enemy_count(3), 8);
        assert!((t.enemy_speed(2) - 1.4).abs() < 1e-6);
        assert_eq!(t.allies_for_level(2), 0);
        assert_eq!(t.allies_for_level(3), 1);
        assert_eq!(t.blast_range(1), 2);
        assert!((t.brick_density(1) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn from_json_clamps_probabilities() {
        let t = Tuning::from_json(r#"{"auto_bomb_chance": 4.0, "reverse_hesitation": -1.0}"#)
            .expect("valid json");
        assert_eq!(t.auto_bomb_chance, 1.0);
        assert_eq!(t.reverse_hesitation, 0.0);
    }

    #[test]
    fn from_json_keeps_unset_fields_at_default() {
        let t = Tuning::from_json(r#"{"ally_speed": 2.0}"#).expect("valid json");
        assert_eq!(t.ally_speed, 2.0);
        assert_eq!(t.auto_bomb_chance, 0.3);
    }
}
