//! Slide presenter state machine.
//!
//! Owns the current index, autoplay, transition latch, progress and theme.
//! It has no timer of its own: the host calls [`Presenter::tick`] once per
//! tick interval and [`Presenter::refresh_auto_theme`] at least once a
//! minute, and every operation runs to completion synchronously.

use std::time::Duration;

use crate::constants::timing::{DEFAULT_TICK_MS, DEFAULT_TRANSITION_MS};
use crate::error::{Error, Result};
use crate::render::{RenderStatus, SlideRenderer};
use crate::theme::{theme_for_time, SystemClock, Theme, WallClock};
use crate::types::{SlideId, Viewport};

/// Relative distance from a whole tick count treated as float noise.
const TICK_SNAP_TOLERANCE: f64 = 1e-12;

/// Slide timing for one presentation session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    slide_duration: f64,
    tick_interval: Duration,
    transition_window: Duration,
}

impl Timing {
    /// Timing with the given seconds per slide and default tick/transition periods.
    pub fn new(slide_duration_secs: f64) -> Result<Self> {
        if !slide_duration_secs.is_finite() || slide_duration_secs <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "slide duration must be a positive number of seconds, got {slide_duration_secs}"
            )));
        }
        Ok(Self {
            slide_duration: slide_duration_secs,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            transition_window: Duration::from_millis(DEFAULT_TRANSITION_MS),
        })
    }

    /// Override the period at which the host calls [`Presenter::tick`].
    pub fn with_tick_interval(mut self, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidConfiguration("tick interval must be non-zero".to_string()));
        }
        self.tick_interval = interval;
        Ok(self)
    }

    /// Override how long navigation is latched after a slide change.
    #[must_use]
    pub const fn with_transition_window(mut self, window: Duration) -> Self {
        self.transition_window = window;
        self
    }

    /// Seconds each slide is shown.
    pub const fn slide_duration(&self) -> f64 {
        self.slide_duration
    }

    /// Ticks that make up one slide (ten per second at the default interval).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn ticks_per_slide(&self) -> u32 {
        let ticks = self.slide_duration / self.tick_interval.as_secs_f64();
        // snap float noise such as 0.3 / 0.1 = 3.0000000000000004 to the whole tick
        let nearest = ticks.round();
        let ticks = if (ticks - nearest).abs() <= nearest * TICK_SNAP_TOLERANCE { nearest } else { ticks.ceil() };
        ticks.clamp(1.0, f64::from(u32::MAX)) as u32
    }

    /// Ticks the transition latch stays set.
    #[allow(clippy::cast_possible_truncation)]
    pub fn transition_ticks(&self) -> u32 {
        let window = self.transition_window.as_nanos();
        let tick = self.tick_interval.as_nanos().max(1);
        window.div_ceil(tick).min(u128::from(u32::MAX)) as u32
    }
}

/// What a call to [`Presenter::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Progress accrued on the current slide.
    Progressed,
    /// Progress completed; the presenter moved to the next slide.
    Advanced,
    /// The tick was consumed by the transition window.
    Transitioning,
    /// Autoplay is paused.
    Paused,
}

/// Presenter for one session over a fixed, non-empty slide list.
#[derive(Debug)]
pub struct Presenter<C: WallClock = SystemClock> {
    slides: Vec<SlideId>,
    timing: Timing,
    ticks_per_slide: u32,
    transition_ticks: u32,
    current_index: usize,
    paused: bool,
    theme: Theme,
    auto_theme: bool,
    elapsed_ticks: u32,
    transition_remaining: u32,
    clock: C,
}

impl<C: WallClock> Presenter<C> {
    /// Begin a presentation at the first slide, playing, light theme.
    ///
    /// An empty slide list is refused with [`Error::EmptySlideList`]; the host
    /// stays in its loading state instead of presenting nothing.
    pub fn start(slides: Vec<SlideId>, timing: Timing, clock: C) -> Result<Self> {
        if slides.is_empty() {
            return Err(Error::EmptySlideList);
        }
        tracing::info!(
            "Starting presentation of {} slides, {}s each",
            slides.len(),
            timing.slide_duration()
        );
        Ok(Self {
            ticks_per_slide: timing.ticks_per_slide(),
            transition_ticks: timing.transition_ticks(),
            slides,
            timing,
            current_index: 0,
            paused: false,
            theme: Theme::Light,
            auto_theme: false,
            elapsed_ticks: 0,
            transition_remaining: 0,
            clock,
        })
    }

    /// Move to the following slide, wrapping at the end.
    ///
    /// Dropped while a transition is in progress. Returns whether the index moved.
    pub fn next(&mut self) -> bool {
        let count = self.slides.len();
        self.go_to_offset(1 % count)
    }

    /// Move to the preceding slide, wrapping at the start.
    ///
    /// Dropped while a transition is in progress. Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        let count = self.slides.len();
        self.go_to_offset(count - 1)
    }

    fn go_to_offset(&mut self, offset: usize) -> bool {
        if self.is_transitioning() {
            tracing::debug!("Navigation dropped during transition");
            return false;
        }
        self.current_index = (self.current_index + offset) % self.slides.len();
        self.elapsed_ticks = 0;
        self.transition_remaining = self.transition_ticks;
        tracing::debug!("Showing slide {}", self.position_label());
        true
    }

    /// Flip between playing and paused.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        tracing::info!("Autoplay {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Flip between light and dark. Turns auto-theme off.
    pub fn toggle_theme(&mut self) {
        self.auto_theme = false;
        self.theme = self.theme.toggled();
    }

    /// Enable or disable the time-of-day theme; enabling applies it immediately.
    pub fn set_auto_theme(&mut self, enabled: bool) {
        self.auto_theme = enabled;
        if enabled {
            self.refresh_auto_theme();
        }
    }

    /// Re-evaluate the time-of-day theme. Returns whether the theme changed.
    pub fn refresh_auto_theme(&mut self) -> bool {
        if !self.auto_theme {
            return false;
        }
        let theme = theme_for_time(self.clock.time_of_day());
        let changed = theme != self.theme;
        if changed {
            tracing::info!("Auto-theme switched to {}", theme.name());
        }
        self.theme = theme;
        changed
    }

    /// Advance autoplay by one tick interval.
    ///
    /// The transition window counts down even while paused. Outside it, and
    /// when playing, progress accrues; the tick that completes the slide
    /// resets progress and moves to the next slide in the same step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.transition_remaining > 0 {
            self.transition_remaining -= 1;
            return TickOutcome::Transitioning;
        }
        if self.paused {
            return TickOutcome::Paused;
        }
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.ticks_per_slide {
            self.elapsed_ticks = 0;
            self.next();
            TickOutcome::Advanced
        } else {
            TickOutcome::Progressed
        }
    }

    /// Ask `renderer` to draw the current slide into `viewport`.
    pub fn render<'r, R: SlideRenderer>(&self, viewport: Viewport, renderer: &'r mut R) -> RenderStatus<'r> {
        renderer.render(self.current_slide(), viewport)
    }

    /// Index of the slide on screen, in `[0, slide_count)`.
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Slide on screen.
    pub fn current_slide(&self) -> &SlideId {
        &self.slides[self.current_index]
    }

    /// Slide that autoplay will show next.
    pub fn upcoming_slide(&self) -> &SlideId {
        &self.slides[(self.current_index + 1) % self.slides.len()]
    }

    /// All slides in presentation order.
    pub fn slides(&self) -> &[SlideId] {
        &self.slides
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Whether autoplay is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Active theme.
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the time-of-day theme is in control.
    pub const fn auto_theme(&self) -> bool {
        self.auto_theme
    }

    /// Whether navigation is currently latched.
    pub const fn is_transitioning(&self) -> bool {
        self.transition_remaining > 0
    }

    /// Share of the current slide's time already elapsed, in `[0, 1)`.
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.elapsed_ticks) / f64::from(self.ticks_per_slide)
    }

    /// Timing this session runs with.
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// One-based position such as `"3 / 12"`.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.slides.len())
    }
}
