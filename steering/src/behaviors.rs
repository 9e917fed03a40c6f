use std::f32::consts::FRAC_PI_2;

use common::math::{rng_f32, Vector2D};
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vehicle::Vehicle;
use crate::SteeringTarget;

/// Tuning for the steering behaviors. Kept apart from the kinematic state so
/// a whole group can share one parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Maximum magnitude of the accumulated steering force consumed each
    /// tick. Set lower than the vehicle's `max_speed` to get smooth
    /// acceleration. Defaults to `1.0`.
    pub max_force: f32,
    /// Distance at which `arrive` begins easing toward its target.
    /// Defaults to `100.0`.
    pub arrival_threshold: f32,
    /// How far ahead of the vehicle the wander circle sits.
    /// Defaults to `10.0`.
    pub wander_distance: f32,
    /// Radius of the wander circle. Defaults to `5.0`.
    pub wander_radius: f32,
    /// Width of the random drift applied to the wander angle per call.
    /// Defaults to `1.0`.
    pub wander_range: f32,
    /// Distance at which a path waypoint counts as reached.
    /// Defaults to `20.0`.
    pub path_threshold: f32,
    /// Length of the obstacle-avoidance feeler. Defaults to `300.0`.
    pub avoid_distance: f32,
    /// Extra clearance kept around obstacles. Defaults to `20.0`.
    pub avoid_buffer: f32,
    /// How far away a flock mate can be and still be noticed.
    /// Defaults to `200.0`.
    pub in_sight_dist: f32,
    /// Distance under which a flock mate triggers separation.
    /// Defaults to `60.0`.
    pub too_close_dist: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_force: 1.0,
            arrival_threshold: 100.0,
            wander_distance: 10.0,
            wander_radius: 5.0,
            wander_range: 1.0,
            path_threshold: 20.0,
            avoid_distance: 300.0,
            avoid_buffer: 20.0,
            in_sight_dist: 200.0,
            too_close_dist: 60.0,
        }
    }
}

/// A circular obstacle for the avoidance behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vector2D,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vector2D, radius: f32) -> Self {
        Self { position, radius }
    }
}

impl SteeringTarget for Obstacle {
    fn position(&self) -> Vector2D {
        self.position
    }
}

/// Kinematic snapshot of a vehicle, taken before any of the group has been
/// integrated so every member steers against the same frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlockMate {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl SteeringTarget for FlockMate {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn velocity(&self) -> Vector2D {
        self.velocity
    }
}

impl From<&Vehicle> for FlockMate {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            position: vehicle.position,
            velocity: vehicle.velocity,
        }
    }
}

impl From<&SteeredVehicle> for FlockMate {
    fn from(agent: &SteeredVehicle) -> Self {
        Self {
            position: agent.vehicle.position,
            velocity: agent.vehicle.velocity,
        }
    }
}

/// A `Vehicle` extended with a steering-force accumulator and the behavior
/// library built on it.
///
/// Behaviors only ever add to the accumulator and read kinematic state, so
/// any number of them can be composed within one tick; `update` is the
/// single point that consumes and clears the accumulated force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeredVehicle {
    pub vehicle: Vehicle,
    pub params: SteeringParams,
    /// Sum of this tick's behavior contributions. Cleared by `update`.
    pub steering_force: Vector2D,
    /// Persistent wander heading, drifted a small random step per call.
    pub wander_angle: f32,
    /// Index of the waypoint `follow_path` is currently heading for.
    pub path_index: usize,
    /// Whether the last `arrive` call was inside its threshold.
    pub has_arrived: bool,
}

impl Default for SteeredVehicle {
    fn default() -> Self {
        Self {
            vehicle: Vehicle::default(),
            params: SteeringParams::default(),
            steering_force: Vector2D::ZERO,
            wander_angle: 0.0,
            path_index: 0,
            has_arrived: false,
        }
    }
}

impl SteeredVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: SteeringParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Adds a raw force to this tick's accumulator.
    pub fn steer(&mut self, force: Vector2D) {
        self.steering_force += force;
    }

    /// Steers directly toward `target` at full speed.
    pub fn seek(&mut self, target: Vector2D) {
        let mut desired = target - self.vehicle.position;
        desired.normalize();
        let desired = desired * self.vehicle.max_speed;
        self.steer(desired - self.vehicle.velocity);
    }

    /// Steers directly away from `target`; the exact mirror of `seek`.
    pub fn flee(&mut self, target: Vector2D) {
        let mut desired = target - self.vehicle.position;
        desired.normalize();
        let desired = desired * self.vehicle.max_speed;
        self.steering_force -= desired - self.vehicle.velocity;
    }

    /// Steers toward `target`, easing off linearly once inside
    /// `arrival_threshold` so the vehicle comes to rest on the target.
    pub fn arrive(&mut self, target: Vector2D) {
        let mut desired = target - self.vehicle.position;
        desired.normalize();
        let dist = self.vehicle.position.dist(target);
        let desired = if dist > self.params.arrival_threshold {
            self.has_arrived = false;
            desired * self.vehicle.max_speed
        } else {
            self.has_arrived = true;
            desired * (self.vehicle.max_speed * dist / self.params.arrival_threshold)
        };
        self.steer(desired - self.vehicle.velocity);
    }

    /// Seeks the point the target is predicted to reach, looking ahead in
    /// proportion to the current distance over this vehicle's own top speed.
    pub fn pursue(&mut self, target: &impl SteeringTarget) {
        let look_ahead = self.vehicle.position.dist(target.position()) / self.vehicle.max_speed;
        self.seek(target.position() + target.velocity() * look_ahead);
    }

    /// Flees the point the target is predicted to reach; the same prediction
    /// as `pursue` with the force turned around.
    pub fn evade(&mut self, target: &impl SteeringTarget) {
        let look_ahead = self.vehicle.position.dist(target.position()) / self.vehicle.max_speed;
        self.flee(target.position() + target.velocity() * look_ahead);
    }

    /// Drifts the heading smoothly at random: `wander_angle` takes a small
    /// random step each call and the vehicle steers toward the matching
    /// point on a circle held out in front of it.
    pub fn wander<R: Rng>(&mut self, rng: &mut R) {
        let mut center = self.vehicle.velocity;
        center.normalize();
        let center = center * self.params.wander_distance;

        let mut offset = Vector2D::ZERO;
        offset.set_length(self.params.wander_radius);
        offset.set_angle(self.wander_angle);

        let half = self.params.wander_range * 0.5;
        self.wander_angle += rng_f32(rng, -half, half);

        self.steer(center + offset);
    }

    /// Casts a feeler along the heading and deflects sideways around every
    /// obstacle the feeler would clip, harder the nearer the obstacle.
    /// Braking also scales the current velocity down; this is the one
    /// behavior that touches velocity outside `update`.
    pub fn avoid(&mut self, obstacles: &[Obstacle]) {
        for obstacle in obstacles {
            let mut heading = self.vehicle.velocity;
            heading.normalize();

            let difference = obstacle.position - self.vehicle.position;
            let dot = difference.dot(heading);
            if dot <= 0.0 {
                continue;
            }

            let feeler = heading * self.params.avoid_distance;
            let projection = heading * dot;
            let dist = (projection - difference).length();

            if dist < obstacle.radius + self.params.avoid_buffer
                && projection.length() < feeler.length()
            {
                let mut force = heading * self.vehicle.max_speed;
                force.set_angle(force.angle() + difference.sign(self.vehicle.velocity) * FRAC_PI_2);
                let force = force * (1.0 - projection.length() / feeler.length());
                self.steer(force);
                self.vehicle.velocity =
                    self.vehicle.velocity * (projection.length() / feeler.length());
            }
        }
    }

    /// Follows `path` waypoint by waypoint, advancing once within
    /// `path_threshold` of the current one. With `looped` the index wraps
    /// back to the start; otherwise the final leg eases in with `arrive`.
    /// An empty path or an index past the end is a no-op.
    pub fn follow_path(&mut self, path: &[Vector2D], looped: bool) {
        let waypoint = match path.get(self.path_index) {
            Some(waypoint) => *waypoint,
            None => return,
        };
        if self.vehicle.position.dist(waypoint) < self.params.path_threshold {
            if self.path_index >= path.len() - 1 {
                if looped {
                    trace!("path complete, wrapping to the first waypoint");
                    self.path_index = 0;
                }
            } else {
                self.path_index += 1;
            }
        }
        if self.path_index >= path.len() - 1 && !looped {
            self.arrive(waypoint);
        } else {
            self.seek(waypoint);
        }
    }

    /// One-pass flocking: cohesion toward the group's average position,
    /// alignment with its average velocity and a flee-based separation from
    /// mates that crowd in. `mates` holds the *other* members' snapshots;
    /// the caller leaves the vehicle's own snapshot out (see `flock_step`).
    pub fn flock(&mut self, mates: &[FlockMate]) {
        let mut average_velocity = self.vehicle.velocity;
        let mut average_position = Vector2D::ZERO;
        let mut in_sight_count = 0u32;

        for mate in mates {
            if self.in_sight(mate) {
                average_velocity += mate.velocity;
                average_position += mate.position;
                if self.too_close(mate) {
                    self.flee(mate.position);
                }
                in_sight_count += 1;
            }
        }

        if in_sight_count > 0 {
            let average_velocity = average_velocity / in_sight_count as f32;
            let average_position = average_position / in_sight_count as f32;
            self.seek(average_position);
            self.steer(average_velocity - self.vehicle.velocity);
        }
    }

    /// Whether `target` is within `in_sight_dist` and in the forward
    /// half-plane of the current heading. A binary hemisphere test, not an
    /// angular cone.
    pub fn in_sight(&self, target: &impl SteeringTarget) -> bool {
        if self.vehicle.position.dist(target.position()) > self.params.in_sight_dist {
            return false;
        }
        let mut heading = self.vehicle.velocity;
        heading.normalize();
        let difference = target.position() - self.vehicle.position;
        difference.dot(heading) >= 0.0
    }

    /// Whether `target` is inside the separation distance.
    pub fn too_close(&self, target: &impl SteeringTarget) -> bool {
        self.vehicle.position.dist(target.position()) < self.params.too_close_dist
    }

    /// Consumes the accumulated steering force: clamps it to `max_force`,
    /// converts it to an acceleration through `mass`, applies it to the
    /// velocity and clears the accumulator before the base kinematic step.
    pub fn update(&mut self) {
        self.steering_force.truncate(self.params.max_force);
        let acceleration = self.steering_force / self.vehicle.mass;
        self.vehicle.velocity = self.vehicle.velocity + acceleration;
        self.steering_force = Vector2D::ZERO;
        self.vehicle.update();
    }
}

impl SteeringTarget for SteeredVehicle {
    fn position(&self) -> Vector2D {
        self.vehicle.position
    }

    fn velocity(&self) -> Vector2D {
        self.vehicle.velocity
    }
}

/// Runs one flocking tick over a whole group with the two-phase ordering the
/// behaviors assume: every vehicle first steers against a snapshot of the
/// pre-integration frame, then every vehicle integrates.
pub fn flock_step(vehicles: &mut [SteeredVehicle]) {
    let snapshots: Vec<FlockMate> = vehicles.iter().map(FlockMate::from).collect();
    let mut mates = Vec::with_capacity(snapshots.len().saturating_sub(1));
    for (i, vehicle) in vehicles.iter_mut().enumerate() {
        mates.clear();
        mates.extend(
            snapshots
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, mate)| *mate),
        );
        vehicle.flock(&mates);
    }
    for vehicle in vehicles.iter_mut() {
        vehicle.update();
    }
}
