//! On-screen keyboard reflecting the best-known status of every letter.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::game::GameSession;
use crate::ui::status_color;

const ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

pub fn render_keyboard(game: &GameSession, area: Rect, buf: &mut Buffer) {
    let statuses = game.keyboard_statuses();
    let plain = Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 40));
    let mut lines: Vec<Line> = Vec::with_capacity(ROWS.len() * 2);

    for (i, row) in ROWS.iter().enumerate() {
        let wide = i == ROWS.len() - 1;
        let mut spans = Vec::new();
        if wide {
            spans.push(Span::styled(" ENTER ", plain));
            spans.push(Span::raw(" "));
        }
        for letter in row.chars() {
            let style = match statuses.get(&letter.to_ascii_lowercase()) {
                Some(status) => Style::default()
                    .fg(Color::White)
                    .bg(status_color(*status))
                    .add_modifier(Modifier::BOLD),
                None => plain,
            };
            spans.push(Span::styled(format!(" {} ", letter), style));
            spans.push(Span::raw(" "));
        }
        if wide {
            spans.push(Span::styled(" \u{232B} ", plain));
        } else {
            spans.pop();
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .render(area, buf);
}
