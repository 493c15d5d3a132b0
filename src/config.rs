use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

use crate::effects::fire::SPARK_ROWS;
use crate::registry::FIRE_EFFECT;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub effect: String,
    pub panel: PanelConfig,
    pub output: OutputConfig,
    pub ledeffects: LedEffectsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub ola_addr: String,
    pub universe: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LedEffectsConfig {
    pub fire: FireConfig,
    #[serde(rename = "static")]
    pub static_color: StaticColorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Tick interval in milliseconds
    pub timeout: u32,
    pub dim_all: u8,
    pub cooling: u32,
    pub sparkling: u32,
    /// Simulation sub-steps per tick, values below 1 run once
    pub internal_loops: i32,
    pub measure_time: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaticColorConfig {
    pub timeout: u32,
    pub dim_all: u8,
    /// 0.0 - 1.0, scaled to 0 - 360 degrees
    pub hue: f32,
    pub saturation: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            effect: FIRE_EFFECT.to_string(),
            panel: PanelConfig::default(),
            output: OutputConfig::default(),
            ledeffects: LedEffectsConfig::default(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            width: 8,
            height: 16,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            ola_addr: "127.0.0.1:7770".to_string(),
            universe: 0,
        }
    }
}

impl Default for FireConfig {
    fn default() -> Self {
        FireConfig {
            timeout: 40,
            dim_all: 255,
            cooling: 55,
            sparkling: 120,
            internal_loops: 1,
            measure_time: false,
        }
    }
}

impl Default for StaticColorConfig {
    fn default() -> Self {
        StaticColorConfig {
            timeout: 500,
            dim_all: 255,
            hue: 0.08,
            saturation: 1.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, String> {
        if !path.exists() {
            log::warn!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let config = match Config::from_config_file(path) {
            Ok(config) => config,
            Err(err) => return Err(format!("Cannot read {}: {}", path.display(), err)),
        };
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks the panel against the effect that is going to run, so call it
    /// after any command line override of `effect`
    pub fn validate(&self) -> Result<(), String> {
        if self.panel.width == 0 || self.panel.height == 0 {
            return Err(format!(
                "Panel must not be empty, got {}x{}",
                self.panel.width, self.panel.height
            ));
        }

        let fire = &self.ledeffects.fire;
        if self.effect == FIRE_EFFECT && fire.sparkling > 0 && self.panel.height < SPARK_ROWS {
            return Err(format!(
                "Fire sparks need a panel at least {} rows high, got {}",
                SPARK_ROWS, self.panel.height
            ));
        }

        Ok(())
    }
}
