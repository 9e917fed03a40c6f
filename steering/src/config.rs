use std::fs;
use std::path::Path;

use common::{math::Vector2D, Bounds};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behaviors::{SteeredVehicle, SteeringParams};
use crate::vehicle::{EdgeBehavior, Vehicle};

/// Construction parameters for a steered agent, loadable from JSON.
/// Any field left out of the JSON takes the library default, so a config
/// only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub max_speed: f32,
    pub mass: f32,
    pub edge_behavior: EdgeBehavior,
    pub bounds: Option<Bounds>,
    pub steering: SteeringParams,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let vehicle = Vehicle::default();
        Self {
            position: vehicle.position,
            velocity: vehicle.velocity,
            max_speed: vehicle.max_speed,
            mass: vehicle.mass,
            edge_behavior: vehicle.edge_behavior,
            bounds: vehicle.bounds,
            steering: SteeringParams::default(),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AgentConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a whole group from a JSON array, the shape spawn tables use.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ConfigError> {
        let configs: Vec<AgentConfig> = serde_json::from_str(json)?;
        for config in &configs {
            config.validate()?;
        }
        Ok(configs)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        debug!("loaded agent config from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// The one boundary where non-positive tuning is rejected; agents built
    /// in code keep the unchecked arithmetic of the core.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if self.mass <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.steering.max_force <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_force must be positive, got {}",
                self.steering.max_force
            )));
        }
        Ok(())
    }

    pub fn build(&self) -> SteeredVehicle {
        let mut agent = SteeredVehicle::with_params(self.steering);
        agent.vehicle.position = self.position;
        agent.vehicle.velocity = self.velocity;
        agent.vehicle.max_speed = self.max_speed;
        agent.vehicle.mass = self.mass;
        agent.vehicle.edge_behavior = self.edge_behavior;
        agent.vehicle.bounds = self.bounds;
        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = AgentConfig::from_json("{}").unwrap();
        assert_eq!(config.max_speed, 1.0);
        assert_eq!(config.mass, 1.0);
        assert_eq!(config.edge_behavior, EdgeBehavior::Wrap);
        assert_eq!(config.bounds, Some(Bounds::default()));
        assert_eq!(config.steering.arrival_threshold, 100.0);
    }

    #[test]
    fn partial_json_overrides_only_what_it_names() {
        let json = r#"{
            "max_speed": 4.5,
            "edge_behavior": "Bounce",
            "steering": { "max_force": 2.0, "wander_range": 0.25 }
        }"#;
        let config = AgentConfig::from_json(json).unwrap();
        assert_eq!(config.max_speed, 4.5);
        assert_eq!(config.edge_behavior, EdgeBehavior::Bounce);
        assert_eq!(config.steering.max_force, 2.0);
        assert_eq!(config.steering.wander_range, 0.25);
        assert_eq!(config.steering.arrival_threshold, 100.0);
    }

    #[test]
    fn non_positive_tuning_is_rejected() {
        let err = AgentConfig::from_json(r#"{ "max_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AgentConfig::from_json(r#"{ "mass": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AgentConfig::from_json(r#"{ "steering": { "max_force": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_surfaces_as_a_parse_error() {
        let err = AgentConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn list_configs_load_like_spawn_tables() {
        let json = r#"[
            { "position": { "x": 10.0, "y": 20.0 }, "max_speed": 3.0 },
            { "position": { "x": 30.0, "y": 40.0 } }
        ]"#;
        let configs = AgentConfig::list_from_json(json).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].max_speed, 3.0);
        assert_eq!(configs[1].position, Vector2D::new(30.0, 40.0));
    }

    #[test]
    fn build_transfers_every_field() {
        let json = r#"{
            "position": { "x": 5.0, "y": 6.0 },
            "velocity": { "x": 1.0, "y": 0.0 },
            "max_speed": 7.0,
            "mass": 2.0,
            "bounds": null,
            "steering": { "max_force": 3.0 }
        }"#;
        let agent = AgentConfig::from_json(json).unwrap().build();
        assert_eq!(agent.vehicle.position, Vector2D::new(5.0, 6.0));
        assert_eq!(agent.vehicle.velocity, Vector2D::new(1.0, 0.0));
        assert_eq!(agent.vehicle.max_speed, 7.0);
        assert_eq!(agent.vehicle.mass, 2.0);
        assert_eq!(agent.vehicle.bounds, None);
        assert_eq!(agent.params.max_force, 3.0);
    }
}
