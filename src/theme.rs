//! Light/dark presentation themes.
//!
//! A theme is a two-variant tag; everything visual is derived from it by
//! [`styles_for`]. The auto-theme schedule lives here too so the presenter
//! and the tests share one definition of "night".

use chrono::{Local, NaiveTime, Timelike};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::constants::theme::{DARK_FROM_HOUR, LIGHT_FROM_HOUR};

/// Presentation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns the human-readable name of this theme.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Colors used to draw the presenter in one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRecord {
    /// Screen background.
    pub background: Color,
    /// Background behind the slide itself.
    pub slide_background: Color,
    /// Primary text.
    pub text: Color,
    /// Control glyph foreground.
    pub control_fg: Color,
    /// Control glyph background.
    pub control_bg: Color,
    /// Filled part of the progress bar and the current dot.
    pub progress: Color,
    /// Unfilled part of the progress bar.
    pub progress_track: Color,
    /// Dots for slides other than the current one.
    pub dot: Color,
    /// Status bar border.
    pub border: Color,
}

const SLATE_100: Color = Color::Rgb(0xf1, 0xf5, 0xf9);
const SLATE_200: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
const SLATE_300: Color = Color::Rgb(0xcb, 0xd5, 0xe1);
const SLATE_600: Color = Color::Rgb(0x47, 0x55, 0x69);
const SLATE_700: Color = Color::Rgb(0x33, 0x41, 0x55);
const SLATE_800: Color = Color::Rgb(0x1e, 0x29, 0x3b);
const SLATE_900: Color = Color::Rgb(0x0f, 0x17, 0x2a);
const BLUE_400: Color = Color::Rgb(0x60, 0xa5, 0xfa);
const BLUE_600: Color = Color::Rgb(0x25, 0x63, 0xeb);
const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

/// Style lookup for a theme.
#[must_use]
pub const fn styles_for(theme: Theme) -> StyleRecord {
    match theme {
        Theme::Light => StyleRecord {
            background: SLATE_100,
            slide_background: WHITE,
            text: SLATE_900,
            control_fg: SLATE_700,
            control_bg: WHITE,
            progress: BLUE_600,
            progress_track: SLATE_200,
            dot: SLATE_300,
            border: SLATE_200,
        },
        Theme::Dark => StyleRecord {
            background: SLATE_800,
            slide_background: SLATE_900,
            text: WHITE,
            control_fg: WHITE,
            control_bg: SLATE_700,
            progress: BLUE_400,
            progress_track: SLATE_700,
            dot: SLATE_600,
            border: SLATE_700,
        },
    }
}

/// Theme selected by the auto-theme schedule: dark in `[18:00, 05:00)`.
#[must_use]
pub fn theme_for_time(time: NaiveTime) -> Theme {
    let hour = time.hour();
    if hour >= DARK_FROM_HOUR || hour < LIGHT_FROM_HOUR {
        Theme::Dark
    } else {
        Theme::Light
    }
}

/// Source of local wall-clock time.
pub trait WallClock {
    /// Current local time of day.
    fn time_of_day(&self) -> NaiveTime;
}

/// Wall clock backed by the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn time_of_day(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Clock frozen at a given time of day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl WallClock for FixedClock {
    fn time_of_day(&self) -> NaiveTime {
        self.0
    }
}
