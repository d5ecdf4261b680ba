//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Presenter timing constants.
pub mod timing {
    /// Default period between autoplay ticks, in milliseconds.
    pub const DEFAULT_TICK_MS: u64 = 100;

    /// Default transition window after a slide change, in milliseconds.
    pub const DEFAULT_TRANSITION_MS: u64 = 500;

    /// Default seconds each slide stays on screen.
    pub const DEFAULT_SLIDE_DURATION_SECS: f64 = 10.0;

    /// Upper bound between two auto-theme clock checks, in seconds.
    pub const CLOCK_CHECK_SECS: u64 = 60;

    /// How long the event loop waits for input before checking timers.
    pub const INPUT_POLL_MS: u64 = 20;
}

/// Auto-theme schedule.
pub mod theme {
    /// First hour (inclusive) of the dark period.
    pub const DARK_FROM_HOUR: u32 = 18;

    /// First hour (inclusive) of the light period.
    pub const LIGHT_FROM_HOUR: u32 = 5;
}

/// Slide source defaults.
pub mod source {
    /// Default listing kind (`GET /api/<kind>`).
    pub const DEFAULT_KIND: &str = "images";

    /// Default local slide directory.
    pub const DEFAULT_DIRECTORY: &str = "./public/images";

    /// File extensions picked up in directory mode.
    pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "pdf"];

    /// Timeout for listing and slide requests, in seconds.
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// Decoded-slide cache constants.
pub mod cache {
    /// Default number of decoded slides kept in memory.
    pub const DEFAULT_CAPACITY: usize = 16;
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 64;
}

/// UI layout constants.
pub mod ui {
    /// Height of the status bar including its border.
    pub const STATUS_BAR_HEIGHT: u16 = 4;

    /// Vertical pixels represented by one terminal cell.
    pub const PIXELS_PER_ROW: u32 = 2;

    /// Progress dots are dropped above this slide count.
    pub const MAX_PROGRESS_DOTS: usize = 40;
}
