//! Leaderboard popup: top five plus the player's own standing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::api::{Leaderboard, LeaderboardEntry};
use crate::session::win_rate;
use crate::ui::{centered_rect, clear_popup, popup_block, GOLD};

pub fn render_leaderboard(
    board: Option<&Leaderboard>,
    loading: bool,
    username: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut lines: Vec<Line> = Vec::new();

    match (loading, board) {
        (true, _) => {
            lines.push(Line::from(Span::styled(
                "Loading leaderboard...",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )));
        }
        (false, None) => {
            lines.push(Line::from(Span::styled(
                "Leaderboard unavailable",
                Style::default().fg(Color::Red),
            )));
        }
        (false, Some(board)) => {
            lines.push(header_line());
            if board.top_5.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  nobody has played yet",
                    Style::default().fg(Color::Gray),
                )));
            }
            for entry in &board.top_5 {
                let own = username == Some(entry.username.as_str());
                lines.push(entry_line(entry, own));
            }

            // A player outside the top five still sees their own row,
            // separated from the table.
            if let Some(own) = &board.current_user {
                let in_top = board.top_5.iter().any(|e| e.username == own.username);
                if !in_top {
                    lines.push(Line::from(Span::styled(
                        "  ...",
                        Style::default().fg(Color::DarkGray),
                    )));
                    lines.push(entry_line(own, true));
                }

                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Your stats",
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!(
                    "  {} correct, {} wrong, streak {}, win rate {}%",
                    own.correct,
                    own.wrong,
                    own.streak,
                    win_rate(own.correct, own.wrong)
                )));
            } else {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Sign in to track your stats",
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(52, height, area);
    clear_popup(rect, buf);
    Paragraph::new(lines)
        .block(popup_block(" Leaderboard "))
        .render(rect, buf);
}

fn header_line() -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "  {:<4} {:<16} {:>7} {:>6} {:>6}",
            "#", "player", "correct", "wrong", "streak"
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn entry_line(entry: &LeaderboardEntry, own: bool) -> Line<'static> {
    let style = if own {
        Style::default().fg(Color::Black).bg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(
        format!(
            "  {:<4} {:<16} {:>7} {:>6} {:>6}",
            entry.rank, entry.username, entry.correct, entry.wrong, entry.streak
        ),
        style,
    ))
}
