//! Application state for one presentation session.
//!
//! `App` is the host around the presenter: it loads the slide list in the
//! background, owns the renderer and overlay flags, maps commands to
//! presenter operations and forwards the timer callbacks from the event loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use crate::error::Result;
use crate::input::{command_for_key, Command};
use crate::presenter::{Presenter, TickOutcome, Timing};
use crate::render::{ContentFetcher, SlideFetcher, SlideRenderer, TerminalRenderer};
use crate::source::{LoadState, SlideSource};
use crate::theme::{SystemClock, Theme, WallClock};
use crate::types::SlideId;
use chrono::NaiveTime;
use crossterm::event::KeyEvent;

/// Messages from background tasks.
#[derive(Debug)]
pub enum AppUpdate {
    /// The slide source answered the load with the given generation.
    SlidesLoaded {
        /// Load that produced the result.
        generation: u64,
        /// Slides or the reason there are none.
        result: Result<Vec<SlideId>>,
    },
}

/// Host state around the presenter.
pub struct App<C: WallClock + Clone = SystemClock> {
    /// Progress of loading the slide list.
    pub load_state: LoadState,
    /// Running presenter, present only once slides are loaded.
    pub presenter: Option<Presenter<C>>,
    /// Slide renderer and its cache, scoped to this session.
    pub renderer: TerminalRenderer,
    /// Whether the clock overlay is shown.
    pub show_clock: bool,
    /// Whether the help modal is shown.
    pub show_help: bool,
    /// Error overlay text.
    pub error_message: Option<String>,
    auto_theme: bool,
    manual_theme: Theme,
    load_generation: u64,
    should_quit: bool,
    timing: Timing,
    clock: C,
    source: Arc<dyn SlideSource>,
    async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
}

impl App<SystemClock> {
    /// Create the app from configuration. Fails on invalid timing.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(
            config,
            config.slide_source(),
            Arc::new(ContentFetcher::new()),
            SystemClock,
        )
    }
}

impl<C: WallClock + Clone> App<C> {
    /// Create the app with explicit collaborators.
    pub fn with_parts(
        config: &Config,
        source: Arc<dyn SlideSource>,
        fetcher: Arc<dyn SlideFetcher>,
        clock: C,
    ) -> Result<Self> {
        let timing = config.timing()?;
        let (async_task_tx, async_task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Ok(Self {
            load_state: LoadState::Loading,
            presenter: None,
            renderer: TerminalRenderer::new(fetcher, config.cache_capacity),
            show_clock: config.show_clock,
            show_help: false,
            error_message: None,
            auto_theme: config.auto_theme,
            manual_theme: Theme::Light,
            load_generation: 0,
            should_quit: false,
            timing,
            clock,
            source,
            async_task_tx,
            async_task_rx,
        })
    }

    /// Whether the session should end.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// End the session.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Theme to draw with. Before slides load this is the schedule or the last manual choice.
    pub fn theme(&self) -> Theme {
        self.presenter.as_ref().map_or_else(
            || if self.auto_theme { crate::theme::theme_for_time(self.clock.time_of_day()) } else { self.manual_theme },
            Presenter::theme,
        )
    }

    /// Local time of day from the app's clock.
    pub fn time_of_day(&self) -> NaiveTime {
        self.clock.time_of_day()
    }

    /// Description of the slide source for status lines.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Start (or restart) loading the slide list in the background.
    ///
    /// Results of earlier loads that are still running are ignored.
    pub fn load_slides(&mut self) {
        if let Some(p) = self.presenter.take() {
            self.manual_theme = p.theme();
            self.auto_theme = p.auto_theme();
        }
        self.load_generation += 1;
        self.load_state = LoadState::Loading;
        self.error_message = None;
        self.renderer.reset();

        let source = Arc::clone(&self.source);
        let tx = self.async_task_tx.clone();
        let generation = self.load_generation;
        tracing::info!("Loading slides from {}", source.describe());
        tokio::spawn(async move {
            let result = source.load().await;
            if tx.send(AppUpdate::SlidesLoaded { generation, result }).await.is_err() {
                tracing::debug!("App closed before slides loaded");
            }
        });
    }

    /// Apply results from background tasks.
    pub fn handle_updates(&mut self) {
        while let Ok(update) = self.async_task_rx.try_recv() {
            match update {
                AppUpdate::SlidesLoaded { generation, result } if generation == self.load_generation => {
                    self.on_slides_loaded(result);
                }
                AppUpdate::SlidesLoaded { generation, .. } => {
                    tracing::debug!("Ignoring slide list from superseded load {}", generation);
                }
            }
        }
        self.renderer.poll_completed();
    }

    fn on_slides_loaded(&mut self, result: Result<Vec<SlideId>>) {
        let slides = match LoadState::from_result(result) {
            LoadState::Ready(slides) => slides,
            LoadState::Failed(message) => {
                self.fail_loading(message);
                return;
            }
            LoadState::Loading => return,
        };

        match Presenter::start(slides, self.timing, self.clock.clone()) {
            Ok(mut presenter) => {
                if presenter.theme() != self.manual_theme {
                    presenter.toggle_theme();
                }
                presenter.set_auto_theme(self.auto_theme);
                self.load_state = LoadState::Ready(presenter.slides().to_vec());
                self.presenter = Some(presenter);
                self.prefetch_visible();
            }
            Err(e) => self.fail_loading(e.user_message()),
        }
    }

    fn fail_loading(&mut self, message: String) {
        tracing::warn!("Slide list unavailable: {}", message);
        self.load_state = LoadState::Failed(message.clone());
        self.error_message = Some(message);
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(command) = command_for_key(key) {
            self.handle_command(command);
        }
    }

    /// Apply a command. Navigation is inert until slides are loaded.
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Quit if self.show_help => self.show_help = false,
            Command::Quit => self.quit(),
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::ToggleClock => self.show_clock = !self.show_clock,
            Command::Reload => self.load_slides(),
            Command::EnableAutoTheme => {
                self.auto_theme = true;
                if let Some(p) = self.presenter.as_mut() {
                    p.set_auto_theme(true);
                }
            }
            Command::ToggleTheme => {
                self.manual_theme = self.theme().toggled();
                self.auto_theme = false;
                if let Some(p) = self.presenter.as_mut() {
                    p.toggle_theme();
                }
            }
            Command::TogglePause => {
                if let Some(p) = self.presenter.as_mut() {
                    p.toggle_pause();
                }
            }
            Command::Next | Command::Previous => {
                let Some(p) = self.presenter.as_mut() else {
                    return;
                };
                let moved = if command == Command::Next { p.next() } else { p.previous() };
                if moved {
                    self.prefetch_visible();
                }
            }
        }
    }

    /// Timer callback, once per tick interval.
    pub fn on_tick(&mut self) {
        let Some(p) = self.presenter.as_mut() else {
            return;
        };
        if p.tick() == TickOutcome::Advanced {
            tracing::debug!("Autoplay advanced to {}", p.position_label());
            self.prefetch_visible();
        }
    }

    /// Timer callback for the auto-theme clock check.
    pub fn on_clock_check(&mut self) {
        if let Some(p) = self.presenter.as_mut() {
            p.refresh_auto_theme();
        }
    }

    // Current slide (retrying a past failure) and the one after it
    fn prefetch_visible(&mut self) {
        if let Some(p) = &self.presenter {
            self.renderer.prefetch(p.current_slide());
            self.renderer.prefetch(p.upcoming_slide());
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::Error;
    use crate::source::StaticSource;
    use crate::theme::FixedClock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Clock the test can move forward.
    #[derive(Clone)]
    struct SettableClock(Arc<Mutex<NaiveTime>>);

    impl SettableClock {
        fn at(hour: u32, minute: u32) -> Self {
            Self(Arc::new(Mutex::new(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())))
        }

        fn set(&self, hour: u32, minute: u32) {
            *self.0.lock().unwrap() = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        }
    }

    impl WallClock for SettableClock {
        fn time_of_day(&self) -> NaiveTime {
            *self.0.lock().unwrap()
        }
    }

    /// First load is slow and returns the old deck; later loads are immediate.
    #[derive(Default)]
    struct ChangingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SlideSource for ChangingSource {
        async fn load(&self) -> Result<Vec<SlideId>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                return Ok(vec!["old-1.jpg".into(), "old-2.jpg".into()]);
            }
            Ok(vec!["new-1.jpg".into(), "new-2.jpg".into(), "new-3.jpg".into()])
        }

        fn describe(&self) -> String {
            "changing".to_string()
        }
    }

    struct NoContent;

    #[async_trait]
    impl SlideFetcher for NoContent {
        async fn fetch(&self, slide: &SlideId) -> Result<Vec<u8>> {
            Err(Error::slide(slide, "offline"))
        }
    }

    fn app_with(source: StaticSource, hour: u32) -> App<FixedClock> {
        let config = Config::from_lookup(|_| None).unwrap();
        let clock = FixedClock(NaiveTime::from_hms_opt(hour, 0, 0).unwrap());
        App::with_parts(&config, Arc::new(source), Arc::new(NoContent), clock).unwrap()
    }

    async fn wait_until_loaded<C: WallClock + Clone>(app: &mut App<C>) {
        for _ in 0..200 {
            app.handle_updates();
            if !app.load_state.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("slides never loaded");
    }

    #[tokio::test]
    async fn navigation_is_inert_while_loading() {
        let mut app = app_with(StaticSource::new(["a.jpg", "b.jpg"]), 12);
        app.handle_command(Command::Next);
        app.handle_command(Command::TogglePause);
        app.on_tick();
        assert!(app.presenter.is_none());
        assert!(app.load_state.is_loading());
    }

    #[tokio::test]
    async fn loaded_slides_start_presentation() {
        let mut app = app_with(StaticSource::new(["a.jpg", "b.jpg", "c.jpg"]), 12);
        app.load_slides();
        wait_until_loaded(&mut app).await;

        let p = app.presenter.as_ref().unwrap();
        assert_eq!(p.slide_count(), 3);
        assert_eq!(p.current_index(), 0);
        assert!(matches!(&app.load_state, LoadState::Ready(s) if s.len() == 3));

        app.handle_command(Command::Next);
        assert_eq!(app.presenter.as_ref().unwrap().current_index(), 1);
    }

    #[tokio::test]
    async fn empty_source_shows_error_and_stays_empty() {
        let mut app = app_with(StaticSource::new(Vec::<String>::new()), 12);
        app.load_slides();
        wait_until_loaded(&mut app).await;

        assert!(app.presenter.is_none());
        assert!(matches!(app.load_state, LoadState::Failed(_)));
        assert!(app.error_message.as_deref().unwrap().contains("No slides"));

        app.handle_command(Command::Next);
        app.handle_command(Command::Previous);
        assert!(app.presenter.is_none());
    }

    #[tokio::test]
    async fn ticks_drive_autoplay() {
        let mut app = app_with(StaticSource::new(["a.jpg", "b.jpg"]), 12);
        app.load_slides();
        wait_until_loaded(&mut app).await;

        for _ in 0..100 {
            app.on_tick();
        }
        assert_eq!(app.presenter.as_ref().unwrap().current_index(), 1);
    }

    #[tokio::test]
    async fn auto_theme_setting_applies_on_start() {
        let mut app = app_with(StaticSource::new(["a.jpg"]), 20);
        app.handle_command(Command::EnableAutoTheme);
        assert_eq!(app.theme(), Theme::Dark);
        app.load_slides();
        wait_until_loaded(&mut app).await;
        assert!(app.presenter.as_ref().unwrap().auto_theme());
        assert_eq!(app.theme(), Theme::Dark);

        app.handle_command(Command::ToggleTheme);
        assert_eq!(app.theme(), Theme::Light);
        app.on_clock_check();
        assert_eq!(app.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn escape_closes_help_before_quitting() {
        let mut app = app_with(StaticSource::new(["a.jpg"]), 12);
        app.handle_command(Command::ToggleHelp);
        app.handle_command(Command::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit());
        app.handle_command(Command::Quit);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn clock_overlay_toggles() {
        let mut app = app_with(StaticSource::new(["a.jpg"]), 12);
        assert!(app.show_clock);
        app.handle_command(Command::ToggleClock);
        assert!(!app.show_clock);
    }

    #[tokio::test]
    async fn superseded_load_does_not_replace_reloaded_deck() {
        let config = Config::from_lookup(|_| None).unwrap();
        let clock = FixedClock(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        let mut app = App::with_parts(&config, Arc::new(ChangingSource::default()), Arc::new(NoContent), clock).unwrap();

        app.load_slides();
        app.load_slides();
        wait_until_loaded(&mut app).await;
        app.handle_command(Command::Next);
        assert_eq!(app.presenter.as_ref().unwrap().slide_count(), 3);

        tokio::time::sleep(Duration::from_millis(200)).await;
        app.handle_updates();

        let p = app.presenter.as_ref().unwrap();
        assert_eq!(p.slide_count(), 3);
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.current_slide().as_str(), "new-2.jpg");
    }

    #[tokio::test]
    async fn clock_check_follows_schedule_across_boundaries() {
        let config = Config::from_lookup(|key| (key == "AUTO_THEME").then(|| "true".to_string())).unwrap();
        let clock = SettableClock::at(17, 59);
        let source = StaticSource::new(["a.jpg", "b.jpg"]);
        let mut app = App::with_parts(&config, Arc::new(source), Arc::new(NoContent), clock.clone()).unwrap();
        app.load_slides();
        wait_until_loaded(&mut app).await;
        assert_eq!(app.theme(), Theme::Light);

        clock.set(18, 0);
        app.on_clock_check();
        assert_eq!(app.theme(), Theme::Dark);

        clock.set(4, 59);
        app.on_clock_check();
        assert_eq!(app.theme(), Theme::Dark);

        clock.set(5, 0);
        app.on_clock_check();
        assert_eq!(app.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn manual_theme_survives_loading_and_reload() {
        let mut app = app_with(StaticSource::new(["a.jpg", "b.jpg"]), 12);
        app.handle_command(Command::ToggleTheme);
        assert_eq!(app.theme(), Theme::Dark);

        app.load_slides();
        wait_until_loaded(&mut app).await;
        assert_eq!(app.presenter.as_ref().unwrap().theme(), Theme::Dark);
        assert!(!app.presenter.as_ref().unwrap().auto_theme());

        app.handle_command(Command::Reload);
        assert_eq!(app.theme(), Theme::Dark);
        wait_until_loaded(&mut app).await;
        assert_eq!(app.theme(), Theme::Dark);
    }
}
