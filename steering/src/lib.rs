use common::math::Vector2D;

pub mod behaviors;
pub mod config;
pub mod prelude;
pub mod vehicle;

/// Anything an agent can steer relative to: a fixed point, a waypoint or
/// another vehicle. Targets without a meaningful velocity report zero.
pub trait SteeringTarget {
    fn position(&self) -> Vector2D;
    fn velocity(&self) -> Vector2D {
        Vector2D::ZERO
    }
}

impl SteeringTarget for Vector2D {
    fn position(&self) -> Vector2D {
        *self
    }
}
