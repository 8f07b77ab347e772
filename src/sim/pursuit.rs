//! Greedy pursuit steering shared by enemies and allies.
//!
//! The same scorer drives both roles: enemies feed it the player's position,
//! allies feed it their closest living enemy. Candidate headings are scored
//! by how much a short lookahead step closes (or opens) the distance to the
//! target, with a bonus for keeping the current heading so movement stays
//! committed instead of jittering at every intersection.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::entity::{Heading, Npc};
use super::grid::Grid;
use crate::tuning::Tuning;

/// Whether the mover closes on the target or opens distance from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Seek,
    Evade,
}

/// Re-evaluate the NPC's heading against a target point.
///
/// The reverse of the current heading is skipped with `reverse_hesitation`
/// probability, which reads as hesitation rather than a hard ban. Headings
/// whose immediate step would collide are rejected outright; the rest are
/// scored on the lookahead distance plus the keep-heading bonus. Ties and
/// an empty candidate set leave the heading unchanged.
pub fn steer(
    grid: &Grid,
    npc: &mut Npc,
    target: Vec2,
    intent: Intent,
    rng: &mut impl Rng,
    tuning: &Tuning,
) {
    let mut best = npc.heading;
    let mut best_score = f32::NEG_INFINITY;

    for heading in Heading::ALL {
        if heading == npc.heading.reverse() && rng.random_bool(tuning.reverse_hesitation) {
            continue;
        }
        // one movement step must be walkable before the heading is worth scoring
        let step = npc.pos + heading.delta(npc.speed);
        if collision::probe(grid, step, npc.radius) {
            continue;
        }
        let ahead = npc.pos + heading.delta(npc.speed * tuning.pursuit_lookahead);
        let distance = ahead.distance(target);
        let closeness = match intent {
            Intent::Seek => -distance,
            Intent::Evade => distance,
        };
        let score = closeness
            + if heading == npc.heading {
                tuning.heading_bias
            } else {
                0.0
            };
        if score > best_score {
            best_score = score;
            best = heading;
        }
    }

    npc.heading = best;
}

/// Move one step along the current heading, falling back through a right
/// turn, a left turn, and finally the reverse when blocked. The first
/// heading that moves is adopted. Returns whether the NPC moved at all.
pub fn advance(grid: &Grid, npc: &mut Npc) -> bool {
    let order = [
        npc.heading,
        npc.heading.clockwise(),
        npc.heading.counter_clockwise(),
        npc.heading.reverse(),
    ];
    for heading in order {
        if collision::try_move(grid, npc, heading.delta(npc.speed)) {
            npc.heading = heading;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NPC_RADIUS;
    use crate::tile_center;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn no_reversal_tuning() -> Tuning {
        // make steering deterministic: the reverse candidate is always skipped
        Tuning {
            reverse_hesitation: 1.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn steer_turns_toward_the_target_when_blocked_ahead() {
        let grid = Grid::open();
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = no_reversal_tuning();
        // pressed against the top wall so Up is rejected; Down is the skipped
        // reverse, leaving Left/Right to be scored against a target far right
        let mut npc = Npc::new(Vec2::new(tile_center(3, 1).x, 48.5), 1.0, Heading::Up);
        steer(
            &grid,
            &mut npc,
            tile_center(12, 1),
            Intent::Seek,
            &mut rng,
            &tuning,
        );
        assert_eq!(npc.heading, Heading::Right);
    }

    #[test]
    fn steer_keeps_heading_on_small_differences() {
        let grid = Grid::open();
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = no_reversal_tuning();
        // target straight ahead: the keep-heading bonus must win
        let mut npc = Npc::new(tile_center(3, 1), 1.0, Heading::Right);
        steer(
            &grid,
            &mut npc,
            tile_center(12, 1),
            Intent::Seek,
            &mut rng,
            &tuning,
        );
        assert_eq!(npc.heading, Heading::Right);
    }

    #[test]
    fn evade_intent_picks_the_opening_heading() {
        let grid = Grid::open();
        let mut rng = Pcg32::seed_from_u64(17);
        let tuning = no_reversal_tuning();
        // fast enough that the lookahead gain outweighs the keep-heading
        // bonus; threat to the right, so fleeing left must win
        let mut npc = Npc::new(tile_center(7, 1), 5.0, Heading::Down);
        steer(
            &grid,
            &mut npc,
            tile_center(12, 1),
            Intent::Evade,
            &mut rng,
            &tuning,
        );
        assert_eq!(npc.heading, Heading::Left);
    }

    #[test]
    fn blocked_candidates_are_rejected() {
        let grid = Grid::open();
        let mut rng = Pcg32::seed_from_u64(23);
        let tuning = no_reversal_tuning();
        // hugging the left border wall: Left would collide even though the
        // target sits that way, so the NPC must pick something walkable
        let mut npc = Npc::new(Vec2::new(49.0, tile_center(1, 1).y), 3.0, Heading::Down);
        assert_eq!(npc.radius, NPC_RADIUS);
        let target = npc.pos - Vec2::new(200.0, 0.0);
        steer(
            &grid,
            &mut npc,
            target,
            Intent::Seek,
            &mut rng,
            &tuning,
        );
        assert_ne!(npc.heading, Heading::Left);
    }

    #[test]
    fn advance_falls_back_when_walled() {
        let grid = Grid::open();
        // wedged into the spawn corner: Left is walled and so is its
        // clockwise fallback Up, so the NPC settles on Down
        let start = Vec2::new(49.0, 49.0);
        let mut npc = Npc::new(start, 3.0, Heading::Left);
        assert!(advance(&grid, &mut npc));
        assert_eq!(npc.heading, Heading::Down);
        assert_ne!(npc.pos, start);
    }
}
