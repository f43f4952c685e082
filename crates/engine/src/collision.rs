//! Collision and predation predicates.
//!
//! Pure geometry shared by the resolver passes in `game`. The
//! predation gate is the central balancing rule: near-equal entities
//! can never eat each other.

use glam::Vec2;

/// Food is absorbed once the eater's edge reaches the food's center,
/// a deliberately generous radius-only test.
#[inline]
pub fn eats_food(eater_pos: Vec2, eater_radius: f32, food_pos: Vec2) -> bool {
    eater_pos.distance_squared(food_pos) < eater_radius * eater_radius
}

/// Contact condition for predation between two moving entities:
/// center distance inside the larger radius.
#[inline]
pub fn predation_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let larger = a_radius.max(b_radius);
    a_pos.distance_squared(b_pos) < larger * larger
}

/// Mass-ratio gate: the attacker needs a strict relative-size
/// advantage before it may consume the victim.
#[inline]
pub fn may_eat(attacker_radius: f32, victim_radius: f32, predation_ratio: f32) -> bool {
    attacker_radius > victim_radius * predation_ratio
}

/// Overlap test for a cell against a virus.
#[inline]
pub fn virus_contact(cell_pos: Vec2, cell_radius: f32, virus_pos: Vec2, overlap_factor: f32) -> bool {
    let reach = cell_radius * overlap_factor;
    cell_pos.distance_squared(virus_pos) < reach * reach
}

/// Separation push for two overlapping sibling cells that are not
/// eligible to fuse. Returns the displacement to add to `a` (and
/// subtract from `b`), proportional to the penetration depth, or
/// `None` when the discs do not overlap.
pub fn separation_push(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Vec2> {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    let overlap = (a_radius + b_radius) - dist;
    if overlap <= 0.0 {
        return None;
    }
    // Coincident centers get an arbitrary fixed axis.
    let dir = if dist > 1e-4 { delta / dist } else { Vec2::X };
    Some(dir * overlap * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_test_uses_eater_radius_only() {
        let eater = Vec2::new(0.0, 0.0);
        // Food center just inside the eater's edge.
        assert!(eats_food(eater, 30.0, Vec2::new(29.0, 0.0)));
        // Touching discs whose centers are farther apart do not count.
        assert!(!eats_food(eater, 30.0, Vec2::new(31.0, 0.0)));
    }

    #[test]
    fn predation_gate_is_monotonic() {
        let ratio = 1.1;
        // Near ties never resolve in either direction.
        assert!(!may_eat(100.0, 95.0, ratio));
        assert!(!may_eat(95.0, 100.0, ratio));
        assert!(!may_eat(100.0, 100.0, ratio));
        // A clear advantage resolves in exactly one direction.
        assert!(may_eat(120.0, 100.0, ratio));
        assert!(!may_eat(100.0, 120.0, ratio));
    }

    #[test]
    fn predation_contact_uses_larger_radius() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(90.0, 0.0);
        assert!(predation_contact(a, 100.0, b, 10.0));
        assert!(predation_contact(a, 10.0, b, 100.0));
        assert!(!predation_contact(a, 50.0, b, 50.0));
    }

    #[test]
    fn separation_push_scales_with_penetration() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let shallow = separation_push(a, 6.0, b, 6.0).unwrap();
        let deep = separation_push(a, 10.0, b, 10.0).unwrap();
        assert!(deep.length() > shallow.length());
        assert!(shallow.x < 0.0, "a is pushed away from b");
        assert!(separation_push(a, 4.0, b, 4.0).is_none());
    }

    #[test]
    fn coincident_centers_still_separate() {
        let push = separation_push(Vec2::ZERO, 5.0, Vec2::ZERO, 5.0).unwrap();
        assert!(push.length() > 0.0);
    }
}
