use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use std::time::SystemTime;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState};
use crate::session::{GameStats, Mode, Phase, DRILL_WORD_COUNT};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Typing => render_typing(self, SystemTime::now(), area, buf),
            AppState::Results(stats) => render_results(stats, area, buf),
        }
    }
}

/// Draws the typing screen as of `now`.
pub fn render_typing(app: &App, now: SystemTime, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let view = session.render_view(now);
    let live = session.live_metrics(now);

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let guide_width = view.active_variant.width().max(view.display.width()) as u16;
    let body_height = 3;
    let gap = area.height.saturating_sub(body_height + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // hud
            Constraint::Length(1), // drill progress
            Constraint::Length(gap),
            Constraint::Length(1), // display
            Constraint::Length(1), // padding
            Constraint::Length(1), // guide
            Constraint::Min(0),
            Constraint::Length(1), // hint
        ])
        .split(area);

    let mut hud = vec![
        Span::styled(format!("{} wpm", live.wpm), bold_style),
        Span::raw("   "),
        Span::styled(format!("{}% acc", live.accuracy), bold_style),
    ];
    if let Some(remaining) = session.remaining_words() {
        hud.push(Span::raw("   "));
        hud.push(Span::styled(
            format!("{remaining} left"),
            Style::default().patch(bold_style).fg(Color::Cyan),
        ));
    } else {
        hud.push(Span::raw("   "));
        hud.push(Span::styled(
            format!("{} words", session.completed_count()),
            dim_bold_style,
        ));
    }
    Paragraph::new(Line::from(hud))
        .alignment(Alignment::Left)
        .render(chunks[0], buf);

    if session.mode() == Mode::Drill100 {
        let ratio = f64::from(session.completed_count()) / f64::from(DRILL_WORD_COUNT);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .label("")
            .ratio(ratio.clamp(0.0, 1.0))
            .render(chunks[1], buf);
    }

    Paragraph::new(Span::styled(view.display.to_string(), bold_style))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let (typed, current, untyped) = view.guide_parts();
    let guide = if view.is_error_flash {
        Line::from(Span::styled(view.active_variant.to_string(), red_bold_style))
    } else {
        let mut spans = vec![Span::styled(typed.to_string(), green_bold_style)];
        if let Some(c) = current {
            spans.push(Span::styled(c.to_string(), underlined_dim_bold_style));
        }
        spans.push(Span::styled(untyped.to_string(), dim_bold_style));
        Line::from(spans)
    };
    let fits = guide_width <= chunks[5].width;
    Paragraph::new(guide)
        .alignment(if fits {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[5], buf);

    let hint = match (session.phase(), session.mode()) {
        (Phase::Idle, Mode::Endless) => "start typing · endless · (esc) quit",
        (Phase::Idle, Mode::Drill100) => "start typing · finish 100 words · (esc) quit",
        _ => "(esc) quit",
    };
    Paragraph::new(Span::styled(hint, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}

pub fn render_results(stats: &GameStats, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // headline
            Constraint::Length(1), // keystrokes
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
            Constraint::Min(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {:.1}s   {} words",
            stats.wpm, stats.accuracy, stats.elapsed_time, stats.words_completed
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::raw(format!(
        "{} keystrokes · {} correct · {} missed",
        stats.total_keystrokes, stats.correct_keystrokes, stats.missed_keystrokes
    )))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled("(r)etry / (esc) quit", italic_style))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}
