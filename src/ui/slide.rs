//! Slide area widgets: the scaled image and the placeholder card.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::constants::ui::PIXELS_PER_ROW;
use crate::render::ScaledFrame;
use crate::theme::StyleRecord;
use crate::types::Viewport;

/// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: char = '▀';

/// Viewport in pixels for a terminal area.
pub fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(u32::from(area.width), u32::from(area.height) * PIXELS_PER_ROW)
}

/// A decoded slide drawn with half-block glyphs, centered in its area.
pub struct SlideImage<'a> {
    frame: &'a ScaledFrame,
    background: Color,
}

impl<'a> SlideImage<'a> {
    /// Draw `frame` over `background`.
    pub const fn new(frame: &'a ScaledFrame, background: Color) -> Self {
        Self { frame, background }
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        if self.frame.alpha(x, y) < 128 {
            return self.background;
        }
        self.frame.rgb(x, y).map_or(self.background, |[r, g, b]| Color::Rgb(r, g, b))
    }
}

impl Widget for SlideImage<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.frame.width().min(u32::from(area.width)) as u16;
        let rows = self.frame.height().div_ceil(PIXELS_PER_ROW).min(u32::from(area.height)) as u16;
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let px = u32::from(col);
                let py = u32::from(row) * PIXELS_PER_ROW;
                buf.get_mut(left + col, top + row)
                    .set_char(HALF_BLOCK)
                    .set_fg(self.pixel(px, py))
                    .set_bg(self.pixel(px, py + 1));
            }
        }
    }
}

/// Card shown while a slide loads or when it cannot be shown.
pub struct Placeholder<'a> {
    title: &'a str,
    message: &'a str,
    styles: StyleRecord,
    is_error: bool,
}

impl<'a> Placeholder<'a> {
    /// Card for a slide that is still loading.
    pub const fn loading(title: &'a str, styles: StyleRecord) -> Self {
        Self { title, message: "Loading…", styles, is_error: false }
    }

    /// Card for a slide that failed to load.
    pub const fn failed(title: &'a str, message: &'a str, styles: StyleRecord) -> Self {
        Self { title, message, styles, is_error: true }
    }
}

impl Widget for Placeholder<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 60.min(area.width.saturating_sub(4)).max(area.width.min(20));
        let height = 7.min(area.height);
        let card = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        let accent = if self.is_error { Color::Red } else { self.styles.progress };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(self.styles.slide_background));

        let text = vec![
            Line::from(Span::styled(
                self.title,
                Style::default().fg(self.styles.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(self.message, Style::default().fg(self.styles.control_fg))),
        ];

        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(card, buf);
    }
}
