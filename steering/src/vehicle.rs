use common::{math::Vector2D, Bounds};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::SteeringTarget;

/// What happens when a vehicle's position leaves its bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeBehavior {
    /// Teleport to the opposite edge.
    #[default]
    Wrap,
    /// Clamp to the edge and reflect the offending velocity component.
    Bounce,
}

/// A kinematic agent with position, velocity and a derived rotation.
///
/// Configurable via the public fields:
/// maximum speed (default 1.0), mass (default 1.0), bounds
/// (default {0, 0, 1000, 1000}) and edge behavior (default `Wrap`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Upper limit on speed, enforced on every `update`.
    pub max_speed: f32,
    /// Inertia divisor applied to steering forces. A zero mass is not
    /// guarded and propagates non-finite velocity, matching the rest of the
    /// unchecked arithmetic; the config loader is where values get vetted.
    pub mass: f32,
    /// Heading in degrees, derived from velocity after each `update`.
    pub rotation: f32,
    pub edge_behavior: EdgeBehavior,
    /// Movement region; `None` disables edge handling entirely.
    pub bounds: Option<Bounds>,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            position: Vector2D::ZERO,
            velocity: Vector2D::ZERO,
            max_speed: 1.0,
            mass: 1.0,
            rotation: 0.0,
            edge_behavior: EdgeBehavior::Wrap,
            bounds: Some(Bounds::default()),
        }
    }
}

impl Vehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the vehicle by one tick: clamps velocity to `max_speed`,
    /// integrates the position, applies the edge behavior and re-derives
    /// `rotation` from the possibly reflected velocity.
    pub fn update(&mut self) {
        self.velocity.truncate(self.max_speed);
        self.position = self.position + self.velocity;
        match self.edge_behavior {
            EdgeBehavior::Wrap => self.wrap(),
            EdgeBehavior::Bounce => self.bounce(),
        }
        self.rotation = self.velocity.angle().to_degrees();
    }

    /// Wraps the position to the opposite edge once it leaves the bounds.
    /// Wrapping only consults the maximum corner and zero; the minimum
    /// corner takes part in `bounce` alone.
    fn wrap(&mut self) {
        if let Some(bounds) = self.bounds {
            if self.position.x > bounds.width {
                self.position.x = 0.0;
            }
            if self.position.x < 0.0 {
                self.position.x = bounds.width;
            }
            if self.position.y > bounds.height {
                self.position.y = 0.0;
            }
            if self.position.y < 0.0 {
                self.position.y = bounds.height;
            }
        }
    }

    /// Reflects the vehicle off the edges. Axes are handled independently,
    /// so a corner hit inverts both velocity components.
    fn bounce(&mut self) {
        if let Some(bounds) = self.bounds {
            let mut reflected = false;
            if self.position.x > bounds.width {
                self.position.x = bounds.width;
                self.velocity.x *= -1.0;
                reflected = true;
            } else if self.position.x < bounds.x {
                self.position.x = bounds.x;
                self.velocity.x *= -1.0;
                reflected = true;
            }
            if self.position.y > bounds.height {
                self.position.y = bounds.height;
                self.velocity.y *= -1.0;
                reflected = true;
            } else if self.position.y < bounds.y {
                self.position.y = bounds.y;
                self.velocity.y *= -1.0;
                reflected = true;
            }
            if reflected {
                trace!("bounced at {}", self.position);
            }
        }
    }
}

impl SteeringTarget for Vehicle {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn velocity(&self) -> Vector2D {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_clamps_velocity_to_max_speed() {
        let mut vehicle = Vehicle {
            velocity: Vector2D::new(30.0, 40.0),
            max_speed: 5.0,
            ..Default::default()
        };
        vehicle.update();
        assert!(vehicle.velocity.length() <= 5.0 + 1e-5);
    }

    #[test]
    fn wrap_resets_past_the_max_edge_to_zero() {
        let mut vehicle = Vehicle {
            position: Vector2D::new(98.0, 50.0),
            velocity: Vector2D::new(5.0, 0.0),
            max_speed: 10.0,
            bounds: Some(Bounds::new(0.0, 0.0, 100.0, 100.0)),
            ..Default::default()
        };
        vehicle.update();
        assert_eq!(vehicle.position.x, 0.0);
    }

    #[test]
    fn wrap_resets_negative_positions_to_the_max_edge() {
        let mut vehicle = Vehicle {
            position: Vector2D::new(3.0, 50.0),
            velocity: Vector2D::new(-5.0, 0.0),
            max_speed: 10.0,
            bounds: Some(Bounds::new(0.0, 0.0, 100.0, 100.0)),
            ..Default::default()
        };
        vehicle.update();
        assert_eq!(vehicle.position.x, 100.0);
    }

    #[test]
    fn bounce_clamps_and_inverts_velocity() {
        let mut vehicle = Vehicle {
            position: Vector2D::new(100.0, 50.0),
            velocity: Vector2D::new(5.0, 0.0),
            max_speed: 10.0,
            edge_behavior: EdgeBehavior::Bounce,
            bounds: Some(Bounds::new(0.0, 0.0, 100.0, 100.0)),
            ..Default::default()
        };
        vehicle.update();
        assert_eq!(vehicle.position.x, 100.0);
        assert_eq!(vehicle.velocity.x, -5.0);
    }

    #[test]
    fn bounce_respects_the_minimum_corner() {
        let mut vehicle = Vehicle {
            position: Vector2D::new(12.0, 50.0),
            velocity: Vector2D::new(-5.0, 0.0),
            max_speed: 10.0,
            edge_behavior: EdgeBehavior::Bounce,
            bounds: Some(Bounds::new(10.0, 10.0, 100.0, 100.0)),
            ..Default::default()
        };
        vehicle.update();
        assert_eq!(vehicle.position.x, 10.0);
        assert_eq!(vehicle.velocity.x, 5.0);
    }

    #[test]
    fn missing_bounds_skip_edge_handling() {
        let mut vehicle = Vehicle {
            position: Vector2D::new(999.0, 0.0),
            velocity: Vector2D::new(5.0, 0.0),
            max_speed: 10.0,
            bounds: None,
            ..Default::default()
        };
        vehicle.update();
        assert_eq!(vehicle.position.x, 1004.0);
    }

    #[test]
    fn rotation_is_derived_in_degrees() {
        let mut vehicle = Vehicle {
            velocity: Vector2D::new(0.0, 5.0),
            max_speed: 10.0,
            bounds: None,
            ..Default::default()
        };
        vehicle.update();
        assert!((vehicle.rotation - 90.0).abs() < 1e-4);
    }
}
