use palette::{FromColor, Hsv, Srgb};

use crate::config::Config;
use crate::effects::LightingEffect;
use crate::panel::{LedPanel, BLACK};
use crate::watchdog::Watchdog;

pub struct StaticColor {
    color: Srgb<u8>,
}

impl StaticColor {
    pub fn new() -> StaticColor {
        StaticColor { color: BLACK }
    }
}

impl LightingEffect for StaticColor {
    fn init(&mut self, config: &Config, panel: &mut LedPanel) {
        let settings = &config.ledeffects.static_color;
        self.color = hue_to_color(settings.hue, settings.saturation);
        panel.timeout = settings.timeout;
        panel.dim_all = settings.dim_all;
    }

    fn tick(&mut self, panel: &mut LedPanel, watchdog: &mut dyn Watchdog) {
        panel.fill(self.color);
        panel.present();
        watchdog.feed();
    }
}

fn hue_to_color(hue: f32, saturation: f32) -> Srgb<u8> {
    let hsv: Hsv = Hsv::new(hue.clamp(0.0, 1.0) * 360.0, saturation.clamp(0.0, 1.0), 1.0);
    Srgb::<f32>::from_color(hsv).into_format()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::panel::tests::recording_panel;
    use crate::watchdog::SoftWatchdog;

    #[test]
    fn fills_panel_with_configured_hue() {
        let mut config = Config::default();
        config.ledeffects.static_color.hue = 0.0;
        config.ledeffects.static_color.saturation = 1.0;
        config.ledeffects.static_color.timeout = 1000;
        let (mut panel, frames) = recording_panel(3, 2);
        let mut watchdog = SoftWatchdog::new(Duration::from_secs(5));

        let mut effect = StaticColor::new();
        effect.init(&config, &mut panel);
        effect.tick(&mut panel, &mut watchdog);

        assert_eq!(panel.timeout, 1000);
        assert_eq!(frames.lock().unwrap()[0], vec![255u8, 0, 0].repeat(6));
        assert_eq!(watchdog.feeds(), 1);
    }

    #[test]
    fn zero_saturation_is_white() {
        assert_eq!(hue_to_color(0.4, 0.0), Srgb::new(255, 255, 255));
    }
}
