//! Per-entity physics bodies and axis-separated movement against impassable boxes.

use slotmap::SecondaryMap;

use crate::types::{EntityId, Rect, Vec2};

/// Per-frame displacement of a physics-bound entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    /// Impulse from the last hit, held until the flinch window ends.
    pub knockback: Vec2,
}

impl PhysicsBody {
    pub fn displacement(&self) -> Vec2 {
        self.velocity + self.knockback
    }
}

/// Bodies keyed by entity id. Insert and remove alongside the entity itself.
#[derive(Clone, Debug, Default)]
pub struct PhysicsBodies {
    bodies: SecondaryMap<EntityId, PhysicsBody>,
}

impl PhysicsBodies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId) {
        self.bodies.insert(id, PhysicsBody::default());
    }

    pub fn remove(&mut self, id: EntityId) -> Option<PhysicsBody> {
        self.bodies.remove(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&PhysicsBody> {
        self.bodies.get(id)
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.velocity = velocity;
        }
    }

    pub fn set_knockback(&mut self, id: EntityId, knockback: Vec2) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.knockback = knockback;
        }
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.bodies.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}

/// An impassable box. Walls have no owner; entity boxes never block their owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub owner: Option<EntityId>,
    pub bounds: Rect,
}

/// Moves a box by `delta`, x axis first, then y. An axis step is undone when it pushes
/// the box into an obstacle. A box that already overlaps something may still move
/// away from it, so spawning against a wall never pins an entity in place.
pub fn slide(mover: EntityId, bounds: Rect, delta: Vec2, obstacles: &[Obstacle]) -> Vec2 {
    let mut current = bounds;

    let moved_x = Rect { center: current.center + Vec2::new(delta.x, 0.0), ..current };
    if !blocked(mover, &current, &moved_x, obstacles, |a, b| (a.x - b.x).abs()) {
        current = moved_x;
    }

    let moved_y = Rect { center: current.center + Vec2::new(0.0, delta.y), ..current };
    if !blocked(mover, &current, &moved_y, obstacles, |a, b| (a.y - b.y).abs()) {
        current = moved_y;
    }

    current.center
}

fn blocked(
    mover: EntityId,
    from: &Rect,
    to: &Rect,
    obstacles: &[Obstacle],
    axis_distance: fn(Vec2, Vec2) -> f32,
) -> bool {
    obstacles.iter().filter(|obstacle| obstacle.owner != Some(mover)).any(|obstacle| {
        let target = &obstacle.bounds;
        if !to.overlaps(target) {
            return false;
        }
        !from.overlaps(target)
            || axis_distance(to.center, target.center) < axis_distance(from.center, target.center)
    })
}
