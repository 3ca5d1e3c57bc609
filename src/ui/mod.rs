mod account_modal;
mod admin_panel;
mod auth_modal;
mod board;
mod game_over;
mod info_modal;
mod keyboard;
mod leaderboard_modal;
mod menu_bar;
mod password_reset_modal;
mod toast;

pub use account_modal::{AccountModal, AccountModalResult};
pub use admin_panel::{AdminPanel, AdminPanelResult};
pub use auth_modal::{AuthModal, AuthModalResult};
pub use board::render_board;
pub use game_over::render_game_over;
pub use info_modal::render_info;
pub use keyboard::render_keyboard;
pub use leaderboard_modal::render_leaderboard;
pub use menu_bar::render_menu_bar;
pub use password_reset_modal::{PasswordResetModal, PasswordResetResult};
pub use toast::render_toast;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::api::LetterStatus;

/// Focus highlight, shared by every form and menu.
pub(crate) const GOLD: Color = Color::Rgb(255, 215, 0);
/// Default chrome (borders, labels).
pub(crate) const CHROME: Color = Color::Cyan;

pub(crate) fn status_color(status: LetterStatus) -> Color {
    match status {
        LetterStatus::Correct => Color::Green,
        LetterStatus::Present => Color::Yellow,
        LetterStatus::Absent => Color::DarkGray,
    }
}

/// Fixed-size rect centered inside `area`, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Clear a popup area and paint a solid background so nothing bleeds
/// through from the board underneath.
pub(crate) fn clear_popup(rect: Rect, buf: &mut Buffer) {
    Clear.render(rect, buf);
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(" ");
                cell.set_style(Style::default().bg(Color::Black));
            }
        }
    }
}

pub(crate) fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(CHROME))
        .style(Style::default().bg(Color::Black))
}

/// Write one row of text straight into the buffer, clipped to its bounds.
/// Form widgets use this for labels and footers where a Paragraph per line
/// would be overkill.
pub(crate) fn draw_text(buf: &mut Buffer, x: u16, y: u16, text: &str, color: Color) {
    let area = *buf.area();
    for (i, ch) in text.chars().enumerate() {
        let cx = x + i as u16;
        if cx >= area.x + area.width || y >= area.y + area.height {
            break;
        }
        if let Some(cell) = buf.cell_mut((cx, y)) {
            cell.set_char(ch);
            cell.set_style(Style::default().fg(color).bg(Color::Black));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, Rect::new(20, 7, 40, 10));

        let oversized = centered_rect(200, 50, area);
        assert_eq!(oversized, Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn status_colors_are_distinct() {
        assert_ne!(
            status_color(LetterStatus::Correct),
            status_color(LetterStatus::Present)
        );
        assert_ne!(
            status_color(LetterStatus::Present),
            status_color(LetterStatus::Absent)
        );
    }
}
