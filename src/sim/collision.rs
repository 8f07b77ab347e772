//! Circle-vs-grid collision and the movement resolver.
//!
//! Collision is a four-corner sample of the entity's bounding square, pulled
//! inward by a fixed margin. The margin is what lets entities slip through
//! diagonal gaps in the maze while any genuinely overlapping wall or brick
//! still blocks them. A single center-point test would tunnel; a full
//! bounding-box test would wedge entities in corridors.

use glam::Vec2;

use super::entity::Body;
use super::grid::Grid;
use crate::consts::COLLISION_MARGIN;
use crate::point_to_tile;

/// Does a body overlap any non-empty tile? Dead bodies and non-finite
/// positions report collision, so nothing undefined ever moves.
pub fn collides(grid: &Grid, body: &impl Body) -> bool {
    if !body.is_alive() {
        return true;
    }
    probe(grid, body.pos(), body.radius())
}

/// Corner-sample test at an arbitrary position, used both by `collides` and
/// by AI candidate probing (which must not mutate the entity).
pub fn probe(grid: &Grid, pos: Vec2, radius: f32) -> bool {
    if !pos.x.is_finite() || !pos.y.is_finite() {
        return true;
    }
    let reach = radius - COLLISION_MARGIN;
    let corners = [
        Vec2::new(pos.x - reach, pos.y - reach),
        Vec2::new(pos.x + reach, pos.y - reach),
        Vec2::new(pos.x - reach, pos.y + reach),
        Vec2::new(pos.x + reach, pos.y + reach),
    ];
    corners.iter().any(|&corner| {
        let (col, row) = point_to_tile(corner);
        // out-of-bounds reads as Wall
        !grid.is_empty(col, row)
    })
}

/// Attempt a position delta; roll back atomically when blocked. This is the
/// only way any entity position changes, so no entity ever ends a tick
/// overlapping a non-empty tile.
pub fn try_move(grid: &Grid, body: &mut impl Body, delta: Vec2) -> bool {
    if delta == Vec2::ZERO || !body.is_alive() {
        return false;
    }
    let prev = body.pos();
    *body.pos_mut() = prev + delta;
    if collides(grid, body) {
        *body.pos_mut() = prev;
        return false;
    }
    true
}
