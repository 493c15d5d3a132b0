use std::time::{Duration, Instant};

use palette::Srgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, FireConfig};
use crate::effects::LightingEffect;
use crate::panel::LedPanel;
use crate::watchdog::Watchdog;

/// Sparks are only ever lit in the lowest rows
pub const SPARK_ROWS: usize = 8;

pub struct Fire {
    settings: FireConfig,
    /// One heat value per panel row, index 0 is the bottom row
    heat: Vec<u8>,
    rng: StdRng,
    timing: TickTiming,
}

/// Tick duration bookkeeping, only used for logging
#[derive(Default)]
struct TickTiming {
    enabled: bool,
    max: Duration,
}

impl Fire {
    pub fn new() -> Fire {
        Fire::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Fire {
        Fire::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Fire {
        Fire {
            settings: FireConfig::default(),
            heat: vec![],
            rng,
            timing: TickTiming::default(),
        }
    }

    #[cfg(test)]
    pub fn heat(&self) -> &[u8] {
        &self.heat
    }

    /// Advances the heat field by one frame: cool, drift, spark
    fn simulate(&mut self) {
        cool(&mut self.heat, self.settings.cooling, &mut self.rng);
        drift(&mut self.heat);
        spark(&mut self.heat, self.settings.sparkling, &mut self.rng);
    }

    fn render(&self, panel: &mut LedPanel) {
        let height = panel.height();
        for x in 0..panel.width() {
            for (y, &heat) in self.heat.iter().enumerate() {
                panel.plot_pixel(x, height - 1 - y, heat_color(heat), false);
            }
        }
    }
}

impl LightingEffect for Fire {
    fn init(&mut self, config: &Config, panel: &mut LedPanel) {
        self.settings = config.ledeffects.fire.clone();
        self.heat = vec![0; panel.height()];
        self.timing = TickTiming {
            enabled: self.settings.measure_time,
            max: Duration::ZERO,
        };

        panel.timeout = self.settings.timeout;
        panel.dim_all = self.settings.dim_all;
    }

    fn tick(&mut self, panel: &mut LedPanel, watchdog: &mut dyn Watchdog) {
        assert_eq!(
            self.heat.len(),
            panel.height(),
            "heat field does not match the panel height"
        );

        let started = Instant::now();
        let runs = self.settings.internal_loops.max(1);
        for _ in 0..runs {
            self.simulate();
            self.render(panel);
            panel.present();
            watchdog.feed();
        }

        if self.timing.enabled {
            let elapsed = started.elapsed();
            self.timing.max = self.timing.max.max(elapsed);
            log::trace!(
                "Fire loop duration: {} us, max: {} us",
                elapsed.as_micros(),
                self.timing.max.as_micros()
            );
        }
    }
}

/// Takes a random bite out of every row, short panels cool harder
fn cool(heat: &mut [u8], cooling: u32, rng: &mut impl Rng) {
    let max_cooldown = cooling.saturating_mul(10) / heat.len() as u32 + 2;
    for cell in heat.iter_mut() {
        let cooldown = rng.gen_range(0..=max_cooldown);
        if cooldown > *cell as u32 {
            *cell = 0;
        } else {
            *cell -= cooldown as u8;
        }
    }
}

/// Moves heat upwards, walking from the top row down so that each row
/// reads its two lower neighbours before they are overwritten
fn drift(heat: &mut [u8]) {
    for k in (2..heat.len()).rev() {
        let sum = heat[k - 1] as u16 + heat[k - 2] as u16 + heat[k - 2] as u16;
        heat[k] = (sum / 3) as u8;
    }
}

fn spark(heat: &mut [u8], sparkling: u32, rng: &mut impl Rng) {
    if rng.gen_range(0..=255u32) >= sparkling {
        return;
    }

    let y = rng.gen_range(0..SPARK_ROWS);
    assert!(y < heat.len(), "spark row {} outside a {} row panel", y, heat.len());

    let new_heat = heat[y] as u32 + rng.gen_range(160..=255u32);
    heat[y] = new_heat.min(255) as u8;
}

/// Black body ramp: black, red, yellow, white
pub fn heat_color(heat: u8) -> Srgb<u8> {
    // Scale down to 0..191
    let t192 = (heat as f64 / 255.0 * 191.0).round() as u8;

    // Ramp within the current third, 0..252
    let heatramp = (t192 & 0x3F) << 2;

    if t192 > 0x40 {
        Srgb::new(255, 255, heatramp)
    } else if t192 > 0x20 {
        Srgb::new(255, heatramp, 0)
    } else {
        Srgb::new(heatramp, 0, 0)
    }
}
