//! `slidekiosk` - a full-screen slideshow presenter for the terminal.
//!
//! Slides come from a listing server or a local directory and are shown one
//! at a time with timed autoplay, manual navigation, a pause toggle and a
//! light/dark theme that can follow the time of day.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod presenter;
pub mod render;
pub mod source;
pub mod theme;
pub mod types;
pub mod ui;
