use crate::error::Error;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_PORT: &str = "/dev/ttyACM0";
const DEFAULT_BAUD: u32 = 9600;
const DEFAULT_FRAME_WIDTH: i32 = 640;
const DEFAULT_FRAME_HEIGHT: i32 = 480;
const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;
const DEFAULT_HITBOX_SIZE: f64 = 0.25;
const DEFAULT_COOLDOWN_MS: u64 = 1500;
const DEFAULT_MIN_AREA: f64 = 500.0;
const DEFAULT_MATCH_RADIUS: f64 = 60.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub port: String,
    pub baud: u32,
    /// Optional bound on the readiness wait, in milliseconds. Unset
    /// means the wait is unbounded and a dead link hangs the loop.
    pub ready_timeout_ms: Option<u64>,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            ready_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub width: i32,
    pub height: i32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub index: i32,
    pub flip: bool,
    /// (H, S, V)
    pub lower_bound: (u8, u8, u8),
    /// (H, S, V)
    pub upper_bound: (u8, u8, u8),
    pub min_area: f64,
    /// Max centroid travel (pixels) for a blob to keep its identifier.
    pub match_radius: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            flip: false,
            lower_bound: (0, 0, 0),
            upper_bound: (255, 255, 255),
            min_area: DEFAULT_MIN_AREA,
            match_radius: DEFAULT_MATCH_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectSettings {
    pub person_class_id: u32,
    pub min_confidence: f64,
    pub min_width: i32,
    pub min_height: i32,
}

impl Default for DetectSettings {
    fn default() -> Self {
        Self {
            person_class_id: 0,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_width: 0,
            min_height: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AimSettings {
    /// Hitbox center shift, as a fraction of the box half-extent per axis.
    pub hitbox_offset_x: f64,
    pub hitbox_offset_y: f64,
    /// Hitbox half-extent, as a fraction of the box half-extent.
    pub hitbox_size: f64,
    /// Servo mounting orientation. These flip the steering step sign per
    /// axis; they encode how the hardware is bolted on, nothing else.
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            hitbox_offset_x: 0.0,
            hitbox_offset_y: 0.0,
            hitbox_size: DEFAULT_HITBOX_SIZE,
            invert_x: false,
            invert_y: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub cooldown_ms: u64,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    pub serial: SerialSettings,
    pub video: VideoSettings,
    pub camera: CameraSettings,
    pub detect: DetectSettings,
    pub aim: AimSettings,
    pub trigger: TriggerSettings,
}

impl TurretConfig {
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
            }
            None => Self::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> crate::Result<()> {
        fn fraction(name: &str, value: f64) -> crate::Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
            Ok(())
        }

        fraction("aim.hitbox_offset_x", self.aim.hitbox_offset_x)?;
        fraction("aim.hitbox_offset_y", self.aim.hitbox_offset_y)?;
        fraction("aim.hitbox_size", self.aim.hitbox_size)?;
        fraction("detect.min_confidence", self.detect.min_confidence)?;
        if self.trigger.cooldown_ms == 0 {
            return Err(Error::Config("trigger.cooldown_ms must be positive".into()));
        }
        if self.video.width <= 0 || self.video.height <= 0 {
            return Err(Error::Config(format!(
                "video geometry must be positive, got {}x{}",
                self.video.width, self.video.height
            )));
        }
        if self.serial.ready_timeout_ms == Some(0) {
            return Err(Error::Config(
                "serial.ready_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }

    pub fn frame_center(&self) -> (i32, i32) {
        (self.video.width / 2, self.video.height / 2)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.trigger.cooldown_ms)
    }

    pub fn ready_timeout(&self) -> Option<Duration> {
        self.serial.ready_timeout_ms.map(Duration::from_millis)
    }
}
