use std::thread;
use std::time::{Duration, Instant};

pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    name: String,
    measure_fps: bool,
    last_fps_print: Instant,
    frames: u32,
}

impl IntervalTimer {
    pub fn new(name: &str, interval: Duration, measure_fps: bool) -> IntervalTimer {
        IntervalTimer {
            interval,
            last_tick: Instant::now(),
            name: name.to_string(),
            measure_fps,
            last_fps_print: Instant::now(),
            frames: 0,
        }
    }

    /// Effects may change their tick interval on re-init
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[cfg(test)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sleep_until_next_tick(&mut self) {
        if self.measure_fps {
            self.update_fps();
        }

        let now = Instant::now();
        let next_tick = if self.last_tick + self.interval > now {
            self.last_tick + self.interval
        } else {
            log::warn!("{} skipped a frame", self.name);
            now + self.interval
        };

        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        self.last_tick = next_tick
    }

    fn update_fps(&mut self) {
        self.frames += 1;

        if self.last_fps_print.elapsed() > Duration::from_secs(1) {
            log::debug!("{} FPS: {}", self.name, self.frames);
            self.frames = 0;
            self.last_fps_print = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeps_about_one_interval() {
        let mut timer = IntervalTimer::new("test", Duration::from_millis(20), false);
        let started = Instant::now();
        timer.sleep_until_next_tick();
        timer.sleep_until_next_tick();
        assert!(started.elapsed() >= Duration::from_millis(35));
    }
}
