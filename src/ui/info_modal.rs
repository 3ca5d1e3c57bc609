//! "How to play" popup.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::game::MAX_ATTEMPTS;
use crate::ui::{centered_rect, clear_popup, popup_block, GOLD};

pub fn render_info(area: Rect, buf: &mut Buffer) {
    let rect = centered_rect(56, 18, area);
    clear_popup(rect, buf);

    let tile = |c: char, color: Color| {
        Span::styled(
            format!(" {} ", c),
            Style::default()
                .fg(Color::White)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };

    let lines = vec![
        Line::from(Span::styled(
            "Guess the word that matches the phonetic spelling!",
            Style::default().fg(Color::White),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("GHOTI", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::raw(" spells "),
            Span::styled("FISH", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(":"),
        ]),
        Line::from("  GH sounds like \"f\"  (as in enouGH)"),
        Line::from("  O  sounds like \"i\"  (as in wOmen)"),
        Line::from("  TI sounds like \"sh\" (as in naTIon)"),
        Line::default(),
        Line::from(format!(
            "You have {} attempts to guess the word.",
            MAX_ATTEMPTS
        )),
        Line::default(),
        Line::from(vec![
            tile('A', Color::Green),
            Span::raw(" right letter, right spot"),
        ]),
        Line::from(vec![
            tile('B', Color::Yellow),
            Span::raw(" in the word, wrong spot"),
        ]),
        Line::from(vec![
            tile('C', Color::DarkGray),
            Span::raw(" not in the word"),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines)
        .block(popup_block(" How to Play "))
        .render(rect, buf);
}
