pub(crate) mod fire;
pub(crate) mod staticcolor;

use crate::config::Config;
use crate::panel::LedPanel;
use crate::watchdog::Watchdog;

/// Lifecycle actions the player dispatches onto the active effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Init,
    Tick,
    Exit,
}

pub trait LightingEffect {
    /// Reads the effect's config section and publishes timeout and
    /// brightness to the panel. Also called to restart an effect.
    fn init(&mut self, config: &Config, panel: &mut LedPanel);

    fn tick(&mut self, panel: &mut LedPanel, watchdog: &mut dyn Watchdog);

    fn exit(&mut self) {}
}
