//! Splash-screen progress model.
//!
//! Progress grows by a random step on every tick until it reaches 100, then holds for a short
//! linger before reporting completion.

use std::time::Duration;

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadingOpts {
    pub tick: Duration,
    /// Upper bound of the random step added per tick, in percent.
    pub max_step: f64,
    /// Hold at 100% before completing.
    pub linger: Duration,
    /// Delay before the caption is shown.
    pub caption_delay: Duration,
}

impl Default for LoadingOpts {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            max_step: 15.0,
            linger: Duration::from_millis(500),
            caption_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadingProgress {
    opts: LoadingOpts,
    progress: f64,
    elapsed: Duration,
    since_tick: Duration,
    full_at: Option<Duration>,
}

impl LoadingProgress {
    pub fn new(opts: LoadingOpts) -> Self {
        Self {
            opts,
            progress: 0.0,
            elapsed: Duration::ZERO,
            since_tick: Duration::ZERO,
            full_at: None,
        }
    }

    /// Displayed percentage, clamped to `0..=100` and rounded.
    pub fn percent(&self) -> u8 {
        self.progress.clamp(0.0, 100.0).round() as u8
    }

    pub fn show_caption(&self) -> bool {
        self.elapsed >= self.opts.caption_delay
    }

    pub fn is_complete(&self) -> bool {
        self.full_at
            .is_some_and(|at| self.elapsed >= at + self.opts.linger)
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) {
        if self.opts.tick.is_zero() {
            return;
        }
        self.elapsed += dt;
        self.since_tick += dt;
        while self.since_tick >= self.opts.tick {
            self.since_tick -= self.opts.tick;
            if self.full_at.is_some() {
                continue;
            }
            if self.progress >= 100.0 {
                self.full_at = Some(self.elapsed - self.since_tick);
                continue;
            }
            self.progress += rng.gen_range(0.0..1.0) * self.opts.max_step;
        }
    }
}

impl Default for LoadingProgress {
    fn default() -> Self {
        Self::new(LoadingOpts::default())
    }
}
