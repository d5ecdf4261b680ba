//! Controls, position and progress along the bottom of the screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::constants::ui::MAX_PROGRESS_DOTS;
use crate::presenter::Presenter;
use crate::theme::{styles_for, Theme, WallClock};

/// Draw the status bar for a running presentation.
pub fn draw_status_bar<C: WallClock>(f: &mut Frame, presenter: &Presenter<C>, area: Rect) {
    let styles = styles_for(presenter.theme());

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(styles.border))
        .style(Style::default().bg(styles.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(1), Constraint::Length(22)])
        .split(rows[0]);

    let control = Style::default().fg(styles.control_fg).bg(styles.control_bg);
    let play_pause = if presenter.is_paused() { " ▶ " } else { " ⏸ " };
    let controls = Line::from(vec![
        Span::styled(" ◀ ", control),
        Span::raw(" "),
        Span::styled(play_pause, control),
        Span::raw(" "),
        Span::styled(" ▶▶", control),
    ]);
    f.render_widget(Paragraph::new(controls), columns[0]);

    f.render_widget(
        Paragraph::new(progress_dots(presenter.current_index(), presenter.slide_count(), presenter.theme()))
            .alignment(Alignment::Center),
        columns[1],
    );

    let theme_glyph = match presenter.theme() {
        Theme::Light => "☾",
        Theme::Dark => "☀",
    };
    let auto = if presenter.auto_theme() { " auto" } else { "" };
    let info = Line::from(vec![
        Span::styled(presenter.position_label(), Style::default().fg(styles.text)),
        Span::raw("  "),
        Span::styled(format!(" {theme_glyph}{auto} "), control),
    ]);
    f.render_widget(Paragraph::new(info).alignment(Alignment::Right), columns[2]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(styles.progress).bg(styles.progress_track))
        .ratio(presenter.progress_fraction().clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, rows[1]);
}

/// One dot per slide, the current one wider. Replaced by nothing for very long decks.
pub fn progress_dots(current: usize, count: usize, theme: Theme) -> Line<'static> {
    if count > MAX_PROGRESS_DOTS {
        return Line::default();
    }
    let styles = styles_for(theme);
    let spans: Vec<Span<'static>> = (0..count)
        .flat_map(|i| {
            let dot = if i == current {
                Span::styled("━━", Style::default().fg(styles.progress).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("•", Style::default().fg(styles.dot))
            };
            [dot, Span::raw(" ")]
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_dot_is_wide() {
        let line = progress_dots(1, 3, Theme::Light);
        let symbols: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).filter(|s| !s.trim().is_empty()).collect();
        assert_eq!(symbols, ["•", "━━", "•"]);
    }

    #[test]
    fn long_decks_have_no_dots() {
        assert!(progress_dots(0, MAX_PROGRESS_DOTS + 1, Theme::Dark).spans.is_empty());
    }
}
