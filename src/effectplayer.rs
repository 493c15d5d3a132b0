use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::effects::{Action, LightingEffect};
use crate::effectstate::EffectState;
use crate::intervaltimer::IntervalTimer;
use crate::panel::LedPanel;
use crate::watchdog::SoftWatchdog;

/// How long a tick may go without feeding the watchdog.
const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives one effect on one panel: init, ticks at the effect's interval, exit.
pub struct EffectPlayer {
    config: Config,
    effect: Box<dyn LightingEffect>,
    state: EffectState,
    panel: LedPanel,
    watchdog: SoftWatchdog,
    timer: IntervalTimer,
}

fn tick_interval(timeout: u32) -> Duration {
    Duration::from_millis(timeout.max(1) as u64)
}

impl EffectPlayer {
    pub fn new(config: Config, effect: Box<dyn LightingEffect>, panel: LedPanel) -> EffectPlayer {
        EffectPlayer {
            config,
            effect,
            state: EffectState::Uninitialized,
            panel,
            watchdog: SoftWatchdog::new(WATCHDOG_TIMEOUT),
            timer: IntervalTimer::new("Player", tick_interval(40), true),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> EffectState {
        self.state
    }

    #[cfg(test)]
    pub fn panel(&self) -> &LedPanel {
        &self.panel
    }

    pub fn dispatch(&mut self, action: Action) {
        let next = match self.state.after(action) {
            Some(next) => next,
            None => {
                log::warn!("Ignoring {:?} while effect is {:?}", action, self.state);
                return;
            }
        };

        match action {
            Action::Init => {
                self.effect.init(&self.config, &mut self.panel);
                self.timer.set_interval(tick_interval(self.panel.timeout));
                log::info!(
                    "Effect {} started, tick every {} ms",
                    self.config.effect,
                    self.panel.timeout
                );
            }
            Action::Tick => {
                self.effect.tick(&mut self.panel, &mut self.watchdog);
                if self.watchdog.is_starved() {
                    log::error!("Effect {} did not feed the watchdog", self.config.effect);
                }
            }
            Action::Exit => {
                self.effect.exit();
                log::info!("Effect {} removed", self.config.effect);
            }
        }
        self.state = next;
    }

    /// Ticks until `running` is cleared or `max_frames` ticks have passed,
    /// then exits the effect and blanks the panel.
    pub fn run(&mut self, running: Arc<AtomicBool>, max_frames: Option<u64>) {
        self.dispatch(Action::Init);

        let mut frames = 0u64;

        while running.load(Ordering::SeqCst) {
            if let Some(max_frames) = max_frames {
                if frames >= max_frames {
                    break;
                }
            }

            self.dispatch(Action::Tick);
            frames += 1;
            self.timer.sleep_until_next_tick();
        }

        self.dispatch(Action::Exit);
        self.panel.clear();
        self.panel.present();
        log::info!(
            "Played {} ticks, {} frames presented, {} watchdog feeds",
            frames,
            self.panel.frames_presented(),
            self.watchdog.feeds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::fire::Fire;
    use crate::panel::tests::recording_panel;

    fn fire_player(internal_loops: i32) -> (EffectPlayer, Arc<std::sync::Mutex<Vec<Vec<u8>>>>) {
        let mut config = Config::default();
        config.ledeffects.fire.timeout = 1;
        config.ledeffects.fire.internal_loops = internal_loops;
        let (panel, frames) = recording_panel(config.panel.width, config.panel.height);
        let player = EffectPlayer::new(config, Box::new(Fire::with_seed(11)), panel);
        (player, frames)
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let (mut player, frames) = fire_player(1);
        player.dispatch(Action::Tick);

        assert_eq!(player.state(), EffectState::Uninitialized);
        assert!(frames.lock().unwrap().is_empty());
    }

    #[test]
    fn lifecycle_runs_through() {
        let (mut player, _) = fire_player(1);
        player.dispatch(Action::Init);
        assert_eq!(player.state(), EffectState::Active);

        player.dispatch(Action::Tick);
        assert_eq!(player.panel().frames_presented(), 1);

        player.dispatch(Action::Exit);
        assert_eq!(player.state(), EffectState::Removed);

        player.dispatch(Action::Tick);
        assert_eq!(player.panel().frames_presented(), 1);
    }

    #[test]
    fn reinit_picks_up_new_tick_interval() {
        let (mut player, _) = fire_player(1);
        player.dispatch(Action::Init);
        assert_eq!(player.timer.interval(), Duration::from_millis(1));

        player.config.ledeffects.fire.timeout = 25;
        player.dispatch(Action::Init);
        assert_eq!(player.panel().timeout, 25);
        assert_eq!(player.timer.interval(), Duration::from_millis(25));
    }

    #[test]
    fn run_stops_after_max_frames_and_blanks() {
        let (mut player, frames) = fire_player(2);
        player.run(Arc::new(AtomicBool::new(true)), Some(5));

        assert_eq!(player.state(), EffectState::Removed);
        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 5 * 2 + 1);
        assert!(frames.last().unwrap().iter().all(|&c| c == 0));
    }

    #[test]
    fn run_stops_when_shut_down() {
        let (mut player, frames) = fire_player(1);
        player.run(Arc::new(AtomicBool::new(false)), None);

        assert_eq!(player.state(), EffectState::Removed);
        assert_eq!(frames.lock().unwrap().len(), 1);
    }
}
