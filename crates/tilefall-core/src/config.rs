use tilefall_domain_eval::FallGeometry;
use tilefall_ports::storage::GameSettings;
use tilefall_ports::types::Playfield;

pub const MAX_LANES: u8 = 16;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("lane count {0} outside 1..=16")]
    InvalidLanes(u8),
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("loss tolerance {0} outside 0..=1")]
    ToleranceOutOfRange(f64),
    #[error("hit zone height {hit_zone_height} exceeds playfield height {playfield_height}")]
    HitZoneTooTall {
        hit_zone_height: f64,
        playfield_height: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub geometry: FallGeometry,
    pub score_increment: u32,
}

impl GameConfig {
    pub fn from_settings(settings: &GameSettings, playfield: Playfield) -> Result<Self, ConfigError> {
        let geometry = FallGeometry {
            playfield,
            lanes: settings.lanes,
            tile_height: settings.tile_height,
            hit_zone_height: settings.hit_zone_height,
            fall_speed: settings.fall_speed,
            loss_tolerance: settings.loss_tolerance,
        };
        validate(&geometry)?;
        Ok(Self {
            geometry,
            score_increment: settings.score_increment,
        })
    }

    pub fn with_playfield(&self, playfield: Playfield) -> Result<Self, ConfigError> {
        let geometry = FallGeometry {
            playfield,
            ..self.geometry
        };
        validate(&geometry)?;
        Ok(Self {
            geometry,
            score_increment: self.score_increment,
        })
    }
}

fn validate(geometry: &FallGeometry) -> Result<(), ConfigError> {
    if geometry.lanes == 0 || geometry.lanes > MAX_LANES {
        return Err(ConfigError::InvalidLanes(geometry.lanes));
    }

    for (field, value) in [
        ("playfield width", geometry.playfield.width),
        ("playfield height", geometry.playfield.height),
        ("tile height", geometry.tile_height),
        ("hit zone height", geometry.hit_zone_height),
        ("fall speed", geometry.fall_speed),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::NonPositive { field, value });
        }
    }

    if !(0.0..=1.0).contains(&geometry.loss_tolerance) {
        return Err(ConfigError::ToleranceOutOfRange(geometry.loss_tolerance));
    }

    if geometry.hit_zone_height > geometry.playfield.height {
        return Err(ConfigError::HitZoneTooTall {
            hit_zone_height: geometry.hit_zone_height,
            playfield_height: geometry.playfield.height,
        });
    }

    Ok(())
}
