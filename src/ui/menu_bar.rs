//! Top menu bar: title on the left, key hints and account state on the
//! right. The admin entry only appears for superusers.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::session::AuthSession;
use crate::ui::{CHROME, GOLD};

pub fn render_menu_bar(auth: &AuthSession, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![
        Span::styled(
            " GHOTIDLE ",
            Style::default()
                .fg(Color::Black)
                .bg(GOLD)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        hint("?", "how to play"),
        Span::raw("  "),
        hint("^L", "leaderboard"),
        Span::raw("  "),
    ];

    match auth.username() {
        Some(name) => {
            spans.push(hint("^U", "account"));
            spans.push(Span::raw("  "));
            if auth.is_admin() {
                spans.push(hint("^A", "admin"));
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("@{}", name),
                Style::default().fg(Color::Green),
            ));
        }
        None => {
            spans.push(hint("^U", "sign in"));
        }
    }

    spans.push(Span::raw("  "));
    spans.push(hint("^Q", "quit"));

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black))
        .render(area, buf);
}

fn hint(key: &str, label: &str) -> Span<'static> {
    Span::styled(
        format!("[{}] {}", key, label),
        Style::default().fg(CHROME),
    )
}
