//! Reference motor: a point character on a flat floor with vertical walls.
//!
//! Motion is confined to the XY plane (constraint axis +Z, up +Y). The floor
//! is a single infinite line that may be tilted; walls are infinite vertical
//! lines at fixed x. The character occupies `[x - radius, x + radius]`
//! horizontally and touches the floor at its position.

use std::collections::BTreeSet;

use glam::Vec3;
use kinetic_content::WorldSpec;
use kinetic_core::physics::plane::project_on_plane;
use kinetic_core::{
    Collider, ColliderId, ColliderTags, CollisionFilter, HitReport, Motor, MotorEvent,
    StabilityReport,
};
use tracing::trace;

/// Distance within which the ground probe snaps to the floor.
const SNAP_DISTANCE: f32 = 0.05;
/// Speed away from the floor above which the probe lets go.
const SEPARATION_SPEED: f32 = 1e-3;

/// Collider id of the floor. Scenario walls must not reuse it.
pub const FLOOR_ID: ColliderId = ColliderId(u32::MAX);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Wall {
    collider: Collider,
    x: f32,
}

#[derive(Clone, Debug)]
pub struct PlaneMotor {
    radius: f32,
    max_stable_slope: f32,
    floor_origin: Vec3,
    floor_normal: Vec3,
    floor_slope: f32,
    walls: Vec<Wall>,

    position: Vec3,
    velocity: Vec3,
    grounded: bool,
    unground_requested: bool,
    overlapping: BTreeSet<ColliderId>,
    ended_overlaps: Vec<ColliderId>,
}

impl PlaneMotor {
    pub const DEFAULT_RADIUS: f32 = 0.5;
    pub const DEFAULT_MAX_STABLE_SLOPE: f32 = 60.0;

    pub fn new(world: &WorldSpec) -> Self {
        let slope = world.floor_slope.to_radians();
        Self {
            radius: Self::DEFAULT_RADIUS,
            max_stable_slope: Self::DEFAULT_MAX_STABLE_SLOPE,
            floor_origin: Vec3::new(0.0, world.floor_height, 0.0),
            floor_normal: Vec3::new(-slope.sin(), slope.cos(), 0.0),
            floor_slope: world.floor_slope.abs(),
            walls: world
                .walls
                .iter()
                .map(|wall| Wall {
                    collider: Collider::new(ColliderId(wall.id), wall.tags),
                    x: wall.x,
                })
                .collect(),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: false,
            unground_requested: false,
            overlapping: BTreeSet::new(),
            ended_overlaps: Vec::new(),
        }
    }

    pub fn with_max_stable_slope(mut self, degrees: f32) -> Self {
        self.max_stable_slope = degrees;
        self
    }

    /// Teleports the character and probes for ground without sweeping.
    pub fn place(&mut self, position: Vec3, velocity: Vec3) {
        self.position = flatten(position);
        self.velocity = flatten(velocity);
        self.overlapping.clear();
        self.ended_overlaps.clear();
        let distance = self.floor_distance(self.position);
        self.grounded = distance.abs() <= SNAP_DISTANCE && self.floor_is_stable();
        if self.grounded {
            self.position -= self.floor_normal * distance;
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Height of the floor under `x`.
    pub fn floor_height_at(&self, x: f32) -> f32 {
        let tangent_slope = -self.floor_normal.x / self.floor_normal.y;
        self.floor_origin.y + x * tangent_slope
    }

    /// Colliders the character stopped overlapping since the last call.
    pub fn take_ended_overlaps(&mut self) -> Vec<ColliderId> {
        std::mem::take(&mut self.ended_overlaps)
    }

    pub fn is_overlapping(&self, collider: ColliderId) -> bool {
        self.overlapping.contains(&collider)
    }

    fn floor_distance(&self, point: Vec3) -> f32 {
        (point - self.floor_origin).dot(self.floor_normal)
    }

    fn floor_is_stable(&self) -> bool {
        self.floor_slope <= self.max_stable_slope
    }

    fn floor_collider() -> Collider {
        Collider::new(FLOOR_ID, ColliderTags::SOLID)
    }

    /// Clamps horizontal motion against walls the filter accepts.
    fn resolve_walls(
        &mut self,
        target: &mut Vec3,
        filter: &dyn CollisionFilter,
        events: &mut Vec<MotorEvent>,
    ) {
        for wall in &self.walls {
            if !wall.collider.tags.contains(ColliderTags::SOLID)
                || !filter.is_collider_valid_for_collisions(&wall.collider)
            {
                continue;
            }
            let clear_left = self.position.x + self.radius <= wall.x;
            let clear_right = self.position.x - self.radius >= wall.x;
            let normal = if clear_left && target.x + self.radius > wall.x {
                target.x = wall.x - self.radius;
                Vec3::NEG_X
            } else if clear_right && target.x - self.radius < wall.x {
                target.x = wall.x + self.radius;
                Vec3::X
            } else {
                continue;
            };

            let into = self.velocity.dot(normal);
            if into < 0.0 {
                self.velocity -= normal * into;
            }
            let report = HitReport {
                collider: wall.collider,
                normal,
                point: Vec3::new(wall.x, target.y, 0.0),
                stability: StabilityReport {
                    is_stable: false,
                    slope_angle: 90.0,
                },
            };
            trace!(target: "kinetic::motor", collider = %wall.collider.id, "wall hit");
            events.push(MotorEvent::MovementHit(report));
        }
    }

    /// Keeps the character above the floor and runs the ground probe.
    fn resolve_floor(
        &mut self,
        target: &mut Vec3,
        filter: &dyn CollisionFilter,
        events: &mut Vec<MotorEvent>,
    ) {
        let floor = Self::floor_collider();
        let forced = std::mem::take(&mut self.unground_requested);
        self.grounded = false;
        if !filter.is_collider_valid_for_collisions(&floor) {
            return;
        }

        let distance = self.floor_distance(*target);
        let separating = self.velocity.dot(self.floor_normal);
        let penetrating = distance < 0.0;
        let probed = !forced && distance <= SNAP_DISTANCE && separating <= SEPARATION_SPEED;
        if !penetrating && !probed {
            return;
        }

        *target -= self.floor_normal * distance;
        if separating < 0.0 || probed {
            self.velocity = project_on_plane(self.velocity, self.floor_normal);
        }

        let stability = StabilityReport {
            is_stable: self.floor_is_stable(),
            slope_angle: self.floor_slope,
        };
        let report = HitReport {
            collider: floor,
            normal: self.floor_normal,
            point: *target,
            stability,
        };
        if !forced && stability.is_stable {
            self.grounded = true;
            events.push(MotorEvent::GroundHit(report));
        } else if penetrating {
            events.push(MotorEvent::MovementHit(report));
        }
    }

    /// Overlap bookkeeping for walls the character is inside of or passed
    /// through during this sweep.
    fn track_overlaps(&mut self, from: Vec3) {
        for wall in &self.walls {
            let id = wall.collider.id;
            let inside = (self.position.x - wall.x).abs() < self.radius;
            let crossed = (from.x - wall.x).signum() != (self.position.x - wall.x).signum()
                && from.x != wall.x;

            if inside {
                self.overlapping.insert(id);
            } else if self.overlapping.remove(&id) || crossed {
                trace!(target: "kinetic::motor", collider = %id, "overlap ended");
                self.ended_overlaps.push(id);
            }
        }
    }
}

impl Motor for PlaneMotor {
    fn is_grounded_this_update(&self) -> bool {
        self.grounded
    }

    fn effective_ground_normal(&self) -> Vec3 {
        if self.grounded {
            self.floor_normal
        } else {
            Vec3::Y
        }
    }

    fn planar_constraint_axis(&self) -> Vec3 {
        Vec3::Z
    }

    fn max_stable_slope_angle(&self) -> f32 {
        self.max_stable_slope
    }

    fn base_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_base_velocity(&mut self, velocity: Vec3) {
        self.velocity = flatten(velocity);
    }

    fn force_unground(&mut self) {
        self.unground_requested = true;
        self.grounded = false;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn sweep(&mut self, dt: f32, filter: &dyn CollisionFilter) -> Vec<MotorEvent> {
        let mut events = Vec::new();
        let from = self.position;
        let mut target = self.position + self.velocity * dt;

        self.resolve_walls(&mut target, filter, &mut events);
        self.resolve_floor(&mut target, filter, &mut events);

        self.position = flatten(target);
        self.track_overlaps(from);
        events
    }
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

#[cfg(test)]
mod tests {
    use kinetic_content::WallSpec;
    use kinetic_core::physics::AcceptAll;

    use super::*;

    struct RejectAll;

    impl CollisionFilter for RejectAll {
        fn is_collider_valid_for_collisions(&self, _collider: &Collider) -> bool {
            false
        }
    }

    fn world_with_wall(tags: ColliderTags) -> WorldSpec {
        WorldSpec {
            walls: vec![WallSpec { id: 1, x: 2.0, tags }],
            ..WorldSpec::default()
        }
    }

    #[test]
    fn placing_on_the_floor_grounds() {
        let mut motor = PlaneMotor::new(&WorldSpec::default());
        motor.place(Vec3::new(0.0, 0.01, 3.0), Vec3::ZERO);
        assert!(motor.is_grounded_this_update());
        assert_eq!(motor.position(), Vec3::ZERO);
    }

    #[test]
    fn falling_lands_with_a_ground_hit() {
        let mut motor = PlaneMotor::new(&WorldSpec::default());
        motor.place(Vec3::new(0.0, 0.2, 0.0), Vec3::new(1.0, -10.0, 0.0));
        assert!(!motor.is_grounded_this_update());

        let events = motor.sweep(0.1, &AcceptAll);
        assert!(motor.is_grounded_this_update());
        assert_eq!(motor.position().y, 0.0);
        assert_eq!(motor.base_velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(events.as_slice(), [MotorEvent::GroundHit(_)]));
    }

    #[test]
    fn forced_unground_skips_the_probe() {
        let mut motor = PlaneMotor::new(&WorldSpec::default());
        motor.place(Vec3::ZERO, Vec3::ZERO);
        motor.force_unground();
        motor.set_base_velocity(Vec3::new(0.0, 5.0, 0.0));

        motor.sweep(0.01, &AcceptAll);
        assert!(!motor.is_grounded_this_update());
        assert!(motor.position().y > 0.0);

        motor.set_base_velocity(Vec3::new(0.0, -5.0, 0.0));
        motor.sweep(0.1, &AcceptAll);
        assert!(motor.is_grounded_this_update());
    }

    #[test]
    fn solid_wall_blocks_and_reports() {
        let mut motor = PlaneMotor::new(&world_with_wall(ColliderTags::SOLID));
        motor.place(Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0));

        let events = motor.sweep(0.1, &AcceptAll);
        assert_eq!(motor.position().x, 1.5);
        assert_eq!(motor.base_velocity().x, 0.0);
        let hit = events
            .iter()
            .find_map(|event| match event {
                MotorEvent::MovementHit(hit) => Some(hit),
                MotorEvent::GroundHit(_) => None,
            })
            .unwrap();
        assert_eq!(hit.collider.id, ColliderId(1));
        assert_eq!(hit.normal, Vec3::NEG_X);
    }

    #[test]
    fn rejected_wall_is_passed_and_overlap_ends() {
        let mut motor = PlaneMotor::new(&world_with_wall(
            ColliderTags::SOLID | ColliderTags::PERMEABLE,
        ));
        motor.place(Vec3::new(1.2, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0));

        motor.sweep(0.1, &RejectAll);
        assert!(motor.is_overlapping(ColliderId(1)));
        assert!(motor.take_ended_overlaps().is_empty());

        motor.sweep(0.1, &RejectAll);
        motor.sweep(0.1, &RejectAll);
        assert!(!motor.is_overlapping(ColliderId(1)));
        assert_eq!(motor.take_ended_overlaps(), vec![ColliderId(1)]);
        assert!(motor.position().x > 2.5);
    }

    #[test]
    fn steep_floor_is_not_ground() {
        let world = WorldSpec {
            floor_slope: 50.0,
            ..WorldSpec::default()
        };
        let mut motor = PlaneMotor::new(&world).with_max_stable_slope(45.0);
        motor.place(Vec3::ZERO, Vec3::ZERO);
        assert!(!motor.is_grounded_this_update());
    }

    #[test]
    fn tilted_floor_height() {
        let world = WorldSpec {
            floor_height: 1.0,
            floor_slope: 45.0,
            ..WorldSpec::default()
        };
        let motor = PlaneMotor::new(&world);
        assert!((motor.floor_height_at(2.0) - 3.0).abs() < 1e-5);
    }
}
