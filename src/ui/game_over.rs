//! End-of-round popup: verdict, the revealed word, the phonetic breakdown,
//! and the shareable result grid.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::game::{GameSession, Outcome, MAX_ATTEMPTS};
use crate::ui::{centered_rect, clear_popup, popup_block, status_color, GOLD};

pub fn render_game_over(game: &GameSession, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = Vec::new();

    match game.outcome {
        Outcome::Won => {
            lines.push(Line::from(Span::styled(
                "Congratulations!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "You got it in {}/{}",
                game.attempts_used(),
                MAX_ATTEMPTS
            )));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "Game Over",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from("Better luck tomorrow!"));
        }
    }
    lines.push(Line::default());

    if let Some(word) = &game.word {
        lines.push(Line::from(vec![
            Span::raw("The word was: "),
            Span::styled(
                word.word.to_uppercase(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
        ]));
        if !word.phonetic_patterns.is_empty() {
            lines.push(Line::default());
            for pattern in &word.phonetic_patterns {
                lines.push(Line::from(format!(
                    "  {} \u{2192} {} (from {})",
                    pattern.letters.to_uppercase(),
                    pattern.sound,
                    pattern.reference
                )));
            }
        }
    }

    lines.push(Line::default());
    for record in &game.guesses {
        let mut spans = vec![Span::raw("  ")];
        for fb in &record.feedback {
            spans.push(Span::styled(
                "  ",
                Style::default().bg(status_color(fb.status)),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "C: copy results   Esc: close",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        "Come back tomorrow for a new word!",
        Style::default().fg(Color::Gray),
    )));

    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(50, height, area);
    clear_popup(rect, buf);

    let title = match game.outcome {
        Outcome::Won => " You won! ",
        _ => " Game over ",
    };
    Paragraph::new(lines).block(popup_block(title)).render(rect, buf);
}
