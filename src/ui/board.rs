//! The game board: phonetic clue, guess grid, and round status.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::game::{GameSession, Outcome, MAX_ATTEMPTS};
use crate::ui::{status_color, GOLD};

/// Render the whole play area: clue tiles on top, then one row per attempt.
pub fn render_board(game: &GameSession, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = Vec::new();

    if game.word.is_none() {
        lines.push(Line::from(Span::styled(
            "No puzzle loaded",
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(Span::styled(
            "press R to retry",
            Style::default().fg(Color::Gray),
        )));
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .render(area, buf);
        return;
    }

    lines.push(clue_line(game));
    lines.push(Line::from(Span::styled(
        format!("sounds like a {}-letter word", game.word_length()),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::default());

    for row in guess_rows(game) {
        lines.push(row);
        lines.push(Line::default());
    }

    lines.push(status_line(game));

    Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .render(area, buf);
}

fn clue_line(game: &GameSession) -> Line<'static> {
    let mut spans = Vec::new();
    for segment in game.phonetic_segments() {
        spans.push(Span::styled(
            format!(" {} ", segment),
            Style::default()
                .fg(Color::Black)
                .bg(GOLD)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    if spans.is_empty() {
        spans.push(Span::raw(""));
    } else {
        spans.pop();
    }
    Line::from(spans)
}

fn guess_rows(game: &GameSession) -> Vec<Line<'static>> {
    let width = game.word_length().max(1);
    let mut rows = Vec::with_capacity(MAX_ATTEMPTS);

    for record in &game.guesses {
        let mut spans = Vec::new();
        for fb in &record.feedback {
            spans.push(Span::styled(
                format!(" {} ", fb.letter.to_ascii_uppercase()),
                Style::default()
                    .fg(Color::White)
                    .bg(status_color(fb.status))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        spans.pop();
        // Length marker, as the row's verdict carries it.
        let (mark, color) = if record.length_match {
            ("\u{2713}", Color::Green)
        } else {
            ("\u{2717}", Color::Red)
        };
        spans.push(Span::styled(
            format!("  {}", mark),
            Style::default().fg(color),
        ));
        rows.push(Line::from(spans));
    }

    // Active row: what the player has typed so far, padded out to the
    // target length. Letters past the target length still show, so an
    // over-long guess is visible before the server bounces it.
    if !game.outcome.is_over() && rows.len() < MAX_ATTEMPTS {
        let typed: Vec<char> = game.current_guess.chars().collect();
        let cells = width.max(typed.len());
        let mut spans = Vec::new();
        for i in 0..cells {
            let (text, style) = match typed.get(i) {
                Some(c) => (
                    format!(" {} ", c),
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Rgb(60, 60, 60))
                        .add_modifier(Modifier::BOLD),
                ),
                None => (
                    " _ ".to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }
        spans.pop();
        // Pad to the marker column so the centered rows line up.
        spans.push(Span::raw("   "));
        rows.push(Line::from(spans));
    }

    // Untouched rows.
    while rows.len() < MAX_ATTEMPTS {
        let mut spans = Vec::new();
        for _ in 0..width {
            spans.push(Span::styled(" . ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(" "));
        }
        spans.pop();
        spans.push(Span::raw("   "));
        rows.push(Line::from(spans));
    }

    rows
}

fn status_line(game: &GameSession) -> Line<'static> {
    if game.loading {
        return Line::from(Span::styled(
            "Checking your guess...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
    }
    match game.outcome {
        Outcome::Won => Line::from(Span::styled(
            format!(
                "Solved in {}/{} - press G for results",
                game.attempts_used(),
                MAX_ATTEMPTS
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Outcome::Lost => Line::from(Span::styled(
            "Out of attempts - press G for results",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Outcome::InProgress => Line::from(Span::styled(
            format!(
                "attempt {}/{}  -  type your guess, Enter to submit",
                game.attempts_used() + 1,
                MAX_ATTEMPTS
            ),
            Style::default().fg(Color::Gray),
        )),
    }
}
