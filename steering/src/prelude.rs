pub use crate::behaviors::{flock_step, FlockMate, Obstacle, SteeredVehicle, SteeringParams};
pub use crate::config::{AgentConfig, ConfigError};
pub use crate::vehicle::{EdgeBehavior, Vehicle};
pub use crate::SteeringTarget;
pub use common::math::Vector2D;
pub use common::Bounds;
