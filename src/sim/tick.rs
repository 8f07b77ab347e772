//! Per-frame simulation tick.
//!
//! The host's redraw callback drives this once per frame; the tick itself
//! never throttles or blocks. Order inside a tick is fixed: purge the dead,
//! move the player, run fuses and flames, collect pickups, check for a
//! cleared level, then let enemies and allies hunt. The clear-check runs
//! both before the enemy phase and after the ally phase so the level ends
//! in the same tick the last enemy falls, wherever it fell.

use glam::Vec2;

use super::bomb;
use super::collision;
use super::entity::Facing;
use super::pursuit::{self, Intent};
use super::state::{GameEvent, LossReason, Phase, Session};
use crate::consts::*;

/// Held controls sampled once per tick, plus the edge-triggered bomb drop.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// One-shot: set on the key/button edge, cleared by the shell after the
    /// tick runs.
    pub place_bomb: bool,
}

/// Advance the session by one frame.
pub fn tick(s: &mut Session, input: &TickInput) {
    if s.phase != Phase::Active {
        return;
    }
    s.tick_count += 1;

    // enemies confirmed dead last tick leave the roster now
    s.enemies.retain(|e| e.alive);

    move_player(s, input);
    if input.place_bomb {
        bomb::place_player_bomb(s);
    }
    bomb::update_bombs(s);
    bomb::update_explosions(s);
    if s.phase != Phase::Active {
        return;
    }
    collect_pickups(s);

    if s.living_enemies() == 0 {
        s.complete_level();
        return;
    }

    update_enemies(s);
    if s.phase != Phase::Active {
        return;
    }
    update_allies(s);

    // an ally may have felled the last enemy just now
    if s.living_enemies() == 0 {
        s.complete_level();
    }
}

fn move_player(s: &mut Session, input: &TickInput) {
    let mut delta = Vec2::ZERO;
    if input.up {
        delta.y -= s.player.speed;
    }
    if input.down {
        delta.y += s.player.speed;
    }
    if input.left {
        delta.x -= s.player.speed;
        s.player.facing = Facing::Left;
    }
    if input.right {
        delta.x += s.player.speed;
        s.player.facing = Facing::Right;
    }
    if delta != Vec2::ZERO && collision::try_move(&s.grid, &mut s.player, delta) {
        // the walk cycle only advances while actually moving
        s.player.anim_frame = s.player.anim_frame.wrapping_add(1);
    }
}

fn collect_pickups(s: &mut Session) {
    let Session {
        pickups,
        player,
        lives,
        events,
        ..
    } = s;
    for pickup in pickups.iter_mut().filter(|p| !p.collected) {
        if player.alive && player.pos.distance(pickup.pos) < PICKUP_RANGE {
            pickup.collected = true;
            let life_gained = *lives < MAX_LIVES;
            if life_gained {
                *lives += 1;
            }
            events.push(GameEvent::PickupCollected { life_gained });
        } else {
            pickup.pulse = pickup.pulse.wrapping_add(1);
            pickup.spin += 0.05;
        }
    }
}

fn update_enemies(s: &mut Session) {
    let mut player_caught = false;
    {
        let Session {
            grid,
            player,
            enemies,
            rng,
            tuning,
            ..
        } = s;
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if player.alive && enemy.pos.distance(player.pos) < ENEMY_SIGHT_RANGE {
                pursuit::steer(grid, enemy, player.pos, Intent::Seek, rng, tuning);
            }
            pursuit::advance(grid, enemy);
            if player.alive && enemy.pos.distance(player.pos) < CONTACT_RANGE {
                player.alive = false;
                player_caught = true;
            }
        }
    }
    if player_caught {
        s.lose_life(LossReason::EnemyContact);
    }
}

fn update_allies(s: &mut Session) {
    let Session {
        grid,
        enemies,
        allies,
        rng,
        tuning,
        events,
        ..
    } = s;
    for ally in allies.iter_mut().filter(|a| a.alive) {
        // hunt whichever enemy is closest right now
        let Some(target) = enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| e.pos)
            .min_by(|a, b| ally.pos.distance(*a).total_cmp(&ally.pos.distance(*b)))
        else {
            break;
        };
        pursuit::steer(grid, ally, target, Intent::Seek, rng, tuning);
        pursuit::advance(grid, ally);
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if ally.pos.distance(enemy.pos) < CONTACT_RANGE {
                enemy.alive = false;
                events.push(GameEvent::EnemyKilled { by_ally: true });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{CharacterKind, Explosion, Heading, Npc};
    use crate::sim::grid::Grid;
    use crate::tile_center;
    use crate::Tuning;

    fn quiet_session(seed: u64) -> Session {
        // open maze, no randomly placed units: tests stage their own
        let mut s = Session::with_tuning(seed, CharacterKind::Stewardess, Tuning::default());
        s.start_level(1);
        s.grid = Grid::open();
        s.enemies.clear();
        s.allies.clear();
        s.bombs.clear();
        s.explosions.clear();
        s.pickups.clear();
        s
    }

    fn held(
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    ) -> TickInput {
        TickInput {
            up,
            down,
            left,
            right,
            place_bomb: false,
        }
    }

    /// A faraway enemy that keeps the level from completing mid-test.
    fn bystander() -> Npc {
        Npc::new(tile_center(13, 9), 1.2, Heading::Up)
    }

    #[test]
    fn held_keys_move_the_player() {
        let mut s = quiet_session(1);
        s.enemies.push(bystander());
        let start = s.player.pos;
        tick(&mut s, &held(false, false, false, true));
        assert_eq!(s.player.pos, start + Vec2::new(s.player.speed, 0.0));
        assert_eq!(s.player.facing, Facing::Right);
        assert_eq!(s.player.anim_frame, 1);

        tick(&mut s, &held(false, false, true, false));
        assert_eq!(s.player.facing, Facing::Left);
    }

    #[test]
    fn blocked_movement_leaves_the_player_in_place() {
        let mut s = quiet_session(2);
        s.enemies.push(bystander());
        // shove against the left border wall until pinned
        for _ in 0..20 {
            tick(&mut s, &held(false, false, true, false));
        }
        let pinned = s.player.pos;
        let frames = s.player.anim_frame;
        tick(&mut s, &held(false, false, true, false));
        assert_eq!(s.player.pos, pinned);
        assert_eq!(s.player.anim_frame, frames, "walk cycle ran while blocked");
    }

    #[test]
    fn bomb_input_drops_a_bomb_on_the_player_tile() {
        let mut s = quiet_session(3);
        s.enemies.push(bystander());
        let input = TickInput {
            place_bomb: true,
            ..TickInput::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.bombs.len(), 1);
        assert_eq!((s.bombs[0].col, s.bombs[0].row), (1, 1));
        assert!(!s.bombs[0].auto);
        assert!(s
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::BombPlaced { col: 1, row: 1 })));
    }

    #[test]
    fn enemy_contact_costs_a_life() {
        let mut s = quiet_session(4);
        s.enemies.push(bystander());
        s.player.pos = tile_center(9, 5);
        s.enemies
            .push(Npc::new(s.player.pos + Vec2::new(5.0, 0.0), 1.2, Heading::Up));
        tick(&mut s, &TickInput::default());
        assert_eq!(s.lives, MAX_LIVES - 1);
        assert!(s.player.alive);
        assert_eq!(s.player.pos, tile_center(SPAWN_COL, SPAWN_ROW));
    }

    #[test]
    fn explosion_clearing_the_field_completes_the_level_before_enemy_ai() {
        let mut s = quiet_session(5);
        let enemy_pos = tile_center(9, 5);
        s.enemies.push(Npc::new(enemy_pos, 1.2, Heading::Up));
        s.player.pos = tile_center(13, 9);
        s.explosions.push(Explosion::new(9, 5));
        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, Phase::LevelComplete);
        // the dying enemy never got its AI turn
        assert_eq!(s.enemies[0].pos, enemy_pos);
        assert!(!s.enemies[0].alive);
    }

    #[test]
    fn ally_kill_completes_the_level_in_the_same_tick() {
        let mut s = quiet_session(6);
        let spot = tile_center(9, 5);
        s.player.pos = tile_center(13, 9);
        s.enemies.push(Npc::new(spot, 1.2, Heading::Up));
        s.allies
            .push(Npc::new(spot + Vec2::new(10.0, 0.0), 1.3, Heading::Up));
        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, Phase::LevelComplete);
    }

    #[test]
    fn dead_enemies_leave_the_roster_next_tick() {
        let mut s = quiet_session(7);
        s.enemies.push(bystander());
        s.enemies.push(Npc::new(tile_center(9, 5), 1.2, Heading::Up));
        s.enemies[1].alive = false;
        assert_eq!(s.enemies.len(), 2);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.phase, Phase::Active);
    }

    #[test]
    fn pickup_collection_grants_a_life_up_to_the_cap() {
        let mut s = quiet_session(8);
        s.enemies.push(bystander());
        s.lives = 2;
        s.pickups
            .push(crate::sim::entity::Pickup::new(s.player.pos + Vec2::new(4.0, 0.0)));
        tick(&mut s, &TickInput::default());
        assert!(s.pickups[0].collected);
        assert_eq!(s.lives, 3);
        assert_eq!(s.pickups.len(), 1, "collected pickups stay listed");

        // at the cap: still collected, no extra life
        s.pickups
            .push(crate::sim::entity::Pickup::new(s.player.pos + Vec2::new(4.0, 0.0)));
        tick(&mut s, &TickInput::default());
        assert!(s.pickups[1].collected);
        assert_eq!(s.lives, 3);
    }

    #[test]
    fn uncollected_pickups_keep_animating() {
        let mut s = quiet_session(9);
        s.enemies.push(bystander());
        s.pickups
            .push(crate::sim::entity::Pickup::new(tile_center(9, 5)));
        tick(&mut s, &TickInput::default());
        tick(&mut s, &TickInput::default());
        assert_eq!(s.pickups[0].pulse, 2);
        assert!(!s.pickups[0].collected);
    }

    #[test]
    fn tick_is_inert_outside_the_active_phase() {
        let mut s = Session::new(10, CharacterKind::Pilot);
        let ticks_before = s.tick_count;
        tick(&mut s, &held(false, false, false, true));
        assert_eq!(s.tick_count, ticks_before);
        assert_eq!(s.phase, Phase::Loading);
    }

    #[test]
    fn enemies_close_in_on_the_player_over_time() {
        let mut s = quiet_session(11);
        let enemy_start = tile_center(9, 1);
        s.enemies.push(Npc::new(enemy_start, 1.2, Heading::Left));
        s.player.pos = tile_center(1, 1);
        let before = s.enemies[0].pos.distance(s.player.pos);
        for _ in 0..30 {
            tick(&mut s, &TickInput::default());
            if s.phase != Phase::Active {
                break;
            }
        }
        if s.phase == Phase::Active {
            let after = s.enemies[0].pos.distance(s.player.pos);
            assert!(after < before, "enemy never closed in: {after} >= {before}");
        }
    }
}
