//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the full-screen
//! presenter using ratatui.

mod slide;
mod status_bar;

pub use slide::{viewport_for, Placeholder, SlideImage};
pub use status_bar::{draw_status_bar, progress_dots};

use chrono::NaiveTime;
use unicode_width::UnicodeWidthStr;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::constants::ui::STATUS_BAR_HEIGHT;
use crate::input::KEY_HELP;
use crate::render::RenderStatus;
use crate::source::LoadState;
use crate::theme::{styles_for, StyleRecord, WallClock};

/// Render the full application UI to the terminal frame.
pub fn draw<C: WallClock + Clone>(f: &mut Frame, app: &mut App<C>) {
    let styles = styles_for(app.theme());
    let size = f.size();

    f.render_widget(Block::default().style(Style::default().bg(styles.background)), size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(size);

    draw_slide_area(f, app, chunks[0], styles);

    if let Some(presenter) = &app.presenter {
        draw_status_bar(f, presenter, chunks[1]);
    } else {
        draw_source_line(f, app, chunks[1], styles);
    }

    if app.show_clock {
        draw_clock(f, app.time_of_day(), styles);
    }

    match &app.load_state {
        LoadState::Loading => draw_loading_indicator(f),
        LoadState::Failed(reason) => {
            let message = app.error_message.as_deref().unwrap_or(reason);
            draw_error_message(f, message);
        }
        LoadState::Ready(_) => {}
    }

    if app.show_help {
        draw_help_modal(f);
    }
}

fn draw_slide_area<C: WallClock + Clone>(f: &mut Frame, app: &mut App<C>, area: Rect, styles: StyleRecord) {
    f.render_widget(Block::default().style(Style::default().bg(styles.slide_background)), area);

    let Some(presenter) = &app.presenter else {
        return;
    };

    // slide fades out for the transition window
    if presenter.is_transitioning() {
        return;
    }

    let title = presenter.current_slide().display_name().to_string();
    match presenter.render(viewport_for(area), &mut app.renderer) {
        RenderStatus::Ready(frame) => {
            f.render_widget(SlideImage::new(frame, styles.slide_background), area);
        }
        RenderStatus::Pending => f.render_widget(Placeholder::loading(&title, styles), area),
        RenderStatus::Failed(message) => f.render_widget(Placeholder::failed(&title, message, styles), area),
    }
}

// Source description while no presentation is running
fn draw_source_line<C: WallClock + Clone>(f: &mut Frame, app: &App<C>, area: Rect, styles: StyleRecord) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(styles.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(" Source: ", Style::default().fg(styles.control_fg)),
        Span::styled(app.source_description(), Style::default().fg(styles.text)),
        Span::styled("   r: reload   ?: help   Esc: quit", Style::default().fg(styles.control_fg)),
    ]);
    f.render_widget(Paragraph::new(line), inner);
}

#[allow(clippy::cast_possible_truncation)]
fn draw_clock(f: &mut Frame, time: NaiveTime, styles: StyleRecord) {
    let size = f.size();
    let text = time.format("%H:%M:%S").to_string();
    let width = text.width() as u16 + 4;
    let height = 3;
    if size.width < width || size.height < height {
        return;
    }

    let area = Rect {
        x: size.width.saturating_sub(width + 1),
        y: 0,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles.border))
        .style(Style::default().bg(styles.control_bg));
    let clock = Paragraph::new(text)
        .style(Style::default().fg(styles.text).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(Clear, area);
    f.render_widget(clock, area);
}

// Draw a loading indicator overlay
fn draw_loading_indicator(f: &mut Frame) {
    let size = f.size();

    let width = 22.min(size.width);
    let height = 3.min(size.height);

    let area = Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new("Loading slides...")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(Clear, area);
    f.render_widget(text, area);
}

// Draw an error message overlay
fn draw_error_message(f: &mut Frame, message: &str) {
    let size = f.size();

    let width = 60.min(size.width.saturating_sub(4));
    let height = 7.min(size.height);

    let area = Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press r to retry, Esc to quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

// Draw the help modal with keybindings
fn draw_help_modal(f: &mut Frame) {
    let size = f.size();

    let width = 50.min(size.width.saturating_sub(4));
    let height = 15.min(size.height.saturating_sub(2));

    let area = Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let mut lines: Vec<Line> = KEY_HELP
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(*desc, Style::default().fg(Color::White)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc, F1 or ? to close",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}
