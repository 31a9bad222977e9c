pub mod charting;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use pimem::{
    feedback::{detail_line, digit_trail, feedback_line, opening_line},
    game::Outcome,
    report::ProgressSummary,
    session::Mode,
};

use crate::{App, MENU_ITEMS};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const KEYPAD_ROWS: [&[char]; 4] = [&['1', '2', '3'], &['4', '5', '6'], &['7', '8', '9'], &['0']];

const INSTRUCTIONS: &str = "Welcome to the Pi Memory Game!

How it works:
1. Practice Mode: made to help you learn pi. Go as far as you can; a wrong guess shows you the next 5 digits to keep you going.
2. Real Game: test your memory. You get 3 incorrect guesses before the game ends.
3. Type the digits on your keyboard - the sequence always starts after '3.'.
4. Your score is how many digits you get right before the game ends.

Cool Pi Facts:
- The world record for reciting pi belongs to Rajveer Meena, who recited 70,000 digits in 2015 while blindfolded.
- Pi is irrational - its digits never end and never repeat.
- March 14 (3/14) is Pi Day - celebrate with a real pie.
- Pi is often calculated with the Chudnovsky algorithm, a formula built from factorials and square roots.";

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn legend_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// A rect of `width` columns centered horizontally inside `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn notice_line(app: &App) -> Paragraph<'static> {
    let text = app
        .notice
        .clone()
        .or_else(|| app.game.warning().map(str::to_string))
        .unwrap_or_default();
    Paragraph::new(Span::styled(text, Style::default().fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

pub fn render_menu(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),                       // title
            Constraint::Length(2),                       // high score
            Constraint::Length(MENU_ITEMS.len() as u16), // items
            Constraint::Length(2),                       // notice
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "Pi Memory Game",
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let high_score = Paragraph::new(format!(
        "All-Time High Score: {}",
        app.game.scores().all_time_best
    ))
    .alignment(Alignment::Center);
    f.render_widget(high_score, chunks[1]);

    let items: Vec<Line> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = format!("({}) {}", i + 1, item);
            if i == app.menu_index {
                Line::from(Span::styled(
                    format!("> {text} <"),
                    bold().fg(Color::Black).bg(Color::Rgb(245, 245, 220)),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();
    let widest = items.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    f.render_widget(
        Paragraph::new(items).alignment(Alignment::Center),
        centered(chunks[2], widest + 4),
    );

    f.render_widget(notice_line(app), chunks[3]);

    let legend = Paragraph::new(Span::styled(
        "(1-5) select / arrows + enter / (q)uit",
        legend_style(),
    ));
    f.render_widget(legend, chunks[5]);
}

pub fn render_instructions(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let text = Paragraph::new(INSTRUCTIONS)
        .block(Block::default().borders(Borders::ALL).title("How to Play"))
        .wrap(Wrap { trim: false });
    f.render_widget(text, chunks[0]);

    let legend = Paragraph::new(Span::styled("(b)ack / (esc)ape", legend_style()));
    f.render_widget(legend, chunks[1]);
}

pub fn render_game(app: &mut App, f: &mut Frame) {
    let Some(session) = app.game.session().copied() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // mode
            Constraint::Length(3), // digit trail
            Constraint::Length(2), // feedback
            Constraint::Length(2), // detail / warning
            Constraint::Length(KEYPAD_ROWS.len() as u16),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let mode_title = match session.mode {
        Mode::Practice => "Practice Game".to_string(),
        Mode::Timed => format!("Real Game - {} guesses left", session.remaining_guesses()),
    };
    f.render_widget(
        Paragraph::new(Span::styled(mode_title, bold())).alignment(Alignment::Center),
        chunks[0],
    );

    let trail = digit_trail(app.game.pi(), session.cursor, app.settings.trail_width);
    let trail_style = match app.game.last_outcome() {
        None => bold(),
        Some(Outcome::GameOver { .. }) => bold().fg(Color::Red),
        Some(_) => bold().fg(Color::Green),
    };
    let trail_width = trail.width() as u16 + 4;
    f.render_widget(
        Paragraph::new(Span::styled(trail, trail_style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        centered(chunks[1], trail_width),
    );

    let (feedback, detail) = match app.game.last_outcome() {
        Some(outcome) => (feedback_line(&session, outcome), detail_line(outcome)),
        None => (opening_line(session.mode), None),
    };
    let feedback_style = match app.game.last_outcome() {
        Some(Outcome::IncorrectWithHint { .. }) | Some(Outcome::IncorrectRetry { .. }) => {
            Style::default().fg(Color::Red)
        }
        Some(Outcome::GameOver { .. }) => bold().fg(Color::Red),
        Some(Outcome::SequenceComplete { .. }) => bold().fg(Color::Green),
        _ => Style::default(),
    };
    f.render_widget(
        Paragraph::new(Span::styled(feedback, feedback_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[2],
    );

    match detail {
        Some(text) => f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Magenta)))
                .alignment(Alignment::Center),
            chunks[3],
        ),
        None => f.render_widget(notice_line(app), chunks[3]),
    }

    let pressed = app.last_digit.map(|d| d.as_char());
    let keypad: Vec<Line> = KEYPAD_ROWS
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&c| {
                    let style = if Some(c) == pressed {
                        bold().fg(Color::Black).bg(Color::Rgb(245, 245, 220))
                    } else {
                        Style::default().add_modifier(Modifier::DIM)
                    };
                    Span::styled(format!(" [{c}] "), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    f.render_widget(
        Paragraph::new(keypad).alignment(Alignment::Center),
        chunks[4],
    );

    let legend = match session.mode {
        Mode::Practice => "type 0-9 / (r)estart / (b)ack to menu",
        Mode::Timed => "type 0-9 / (b)ack to menu",
    };
    f.render_widget(
        Paragraph::new(Span::styled(legend, legend_style())),
        chunks[6],
    );
}

pub fn render_progress(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(3),    // entries
            Constraint::Length(1), // stats
            Constraint::Length(2), // notice
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled("★ Your Pi Progress ★", bold())),
        Line::from(Span::styled(
            "Your best streak for each day you played",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let summary = match ProgressSummary::from_record(app.game.scores()) {
        Ok(summary) => summary,
        Err(_) => {
            f.render_widget(
                Paragraph::new("No scores yet! Play to start tracking~")
                    .alignment(Alignment::Center),
                chunks[1],
            );
            f.render_widget(notice_line(app), chunks[3]);
            f.render_widget(
                Paragraph::new(Span::styled("(b)ack / (esc)ape", legend_style())),
                chunks[4],
            );
            return;
        }
    };

    let visible = chunks[1].height.saturating_sub(2) as usize;
    let max_scroll = summary.entries.len().saturating_sub(visible);
    if app.progress_scroll > max_scroll {
        app.progress_scroll = max_scroll;
    }

    let rows: Vec<Line> = summary
        .entries
        .iter()
        .skip(app.progress_scroll)
        .take(visible)
        .map(|(date, score)| {
            Line::from(Span::styled(
                format!("★ {date} : {score} digits ★"),
                Style::default().fg(Color::LightMagenta),
            ))
        })
        .collect();

    let scroll_info = if summary.entries.len() > visible {
        format!(
            " ({}/{} days)",
            app.progress_scroll + rows.len(),
            summary.entries.len()
        )
    } else {
        String::new()
    };
    f.render_widget(
        Paragraph::new(rows).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Daily bests{scroll_info}")),
        ),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(summary.stats_line()).alignment(Alignment::Center),
        chunks[2],
    );
    f.render_widget(notice_line(app), chunks[3]);
    f.render_widget(
        Paragraph::new(Span::styled(
            "(e)xport csv / ↑/↓ scroll / (b)ack / (esc)ape",
            legend_style(),
        )),
        chunks[4],
    );
}
