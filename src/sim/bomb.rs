//! Bomb fuses, blast propagation, and explosion damage.
//!
//! A blast is a center cell plus four cardinal walks. Each walk stops just
//! short of the first wall, or on the first brick, which burns down and may
//! leave a live auto bomb behind on the cleared tile: that is what chains
//! detonations across a brick field.

use rand::Rng;

use super::entity::{Bomb, Explosion, Heading};
use super::grid::{Cell, Grid};
use super::state::{GameEvent, LossReason, Session};
use crate::consts::*;
use crate::point_to_tile;
use crate::tuning::Tuning;
use rand_pcg::Pcg32;

/// Player bomb placement. Rejected while a player bomb is already ticking
/// (auto bombs don't count) or when the player's tile holds any bomb.
pub fn place_player_bomb(s: &mut Session) -> bool {
    if !s.player.alive {
        return false;
    }
    if s.bombs.iter().any(|b| !b.auto) {
        return false;
    }
    let (col, row) = point_to_tile(s.player.pos);
    if s.bombs.iter().any(|b| b.col == col && b.row == row) {
        return false;
    }
    let range = s.tuning.blast_range(s.level);
    s.bombs.push(Bomb::player_placed(col, row, range));
    s.events.push(GameEvent::BombPlaced { col, row });
    true
}

/// Burn down every fuse one tick and detonate the bombs that reach zero.
/// Detonations may push fresh auto bombs into the list; those start with a
/// full fuse and go off on a later tick.
pub fn update_bombs(s: &mut Session) {
    for bomb in &mut s.bombs {
        bomb.fuse = bomb.fuse.saturating_sub(1);
    }
    let (expired, live): (Vec<_>, Vec<_>) = s.bombs.drain(..).partition(|b| b.fuse == 0);
    s.bombs = live;
    for bomb in &expired {
        detonate(
            bomb,
            &mut s.grid,
            &mut s.bombs,
            &mut s.explosions,
            &mut s.events,
            &mut s.rng,
            &s.tuning,
        );
    }
}

fn detonate(
    bomb: &Bomb,
    grid: &mut Grid,
    bombs: &mut Vec<Bomb>,
    explosions: &mut Vec<Explosion>,
    events: &mut Vec<GameEvent>,
    rng: &mut Pcg32,
    tuning: &Tuning,
) {
    events.push(GameEvent::BombExploded {
        col: bomb.col,
        row: bomb.row,
    });
    explosions.push(Explosion::new(bomb.col, bomb.row));

    for heading in Heading::ALL {
        let (dc, dr) = heading.tile_step();
        for k in 1..=bomb.range {
            let col = bomb.col + dc * k;
            let row = bomb.row + dr * k;
            match grid.tile_at(col, row) {
                // walls (and out-of-bounds) absorb the blast without burning
                Cell::Wall => break,
                Cell::Empty => explosions.push(Explosion::new(col, row)),
                Cell::Brick => {
                    explosions.push(Explosion::new(col, row));
                    grid.clear(col, row);
                    events.push(GameEvent::BrickDestroyed { col, row });
                    if rng.random_bool(tuning.auto_bomb_chance) {
                        bombs.push(Bomb::chained(col, row, tuning.auto_bomb_range));
                        events.push(GameEvent::AutoBombSpawned { col, row });
                    }
                    break;
                }
            }
        }
    }
}

/// Age every flame one tick and apply blast damage: the player and enemies
/// die within [`BLAST_KILL_RANGE`] of a burning cell, allies walk through
/// fire unharmed. Death is idempotent; a body caught by several cells in
/// the same tick dies once.
pub fn update_explosions(s: &mut Session) {
    let mut player_killed = false;
    {
        let Session {
            explosions,
            enemies,
            player,
            events,
            ..
        } = s;
        for ex in explosions.iter_mut() {
            ex.fade = ex.fade.saturating_sub(1);
            let center = ex.center();
            if player.alive && player.pos.distance(center) < BLAST_KILL_RANGE {
                player.alive = false;
                player_killed = true;
            }
            for enemy in enemies.iter_mut() {
                if enemy.alive && enemy.pos.distance(center) < BLAST_KILL_RANGE {
                    enemy.alive = false;
                    events.push(GameEvent::EnemyKilled { by_ally: false });
                }
            }
        }
        explosions.retain(|ex| ex.fade > 0);
    }
    if player_killed {
        s.lose_life(LossReason::Explosion);
    }
}
