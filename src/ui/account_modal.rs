//! Signed-in account popup: profile summary, change-email and
//! change-password forms, sign-out.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{CurrentUser, LeaderboardEntry};
use crate::session;
use crate::ui::{centered_rect, clear_popup, draw_text, popup_block, CHROME, GOLD};

#[derive(Debug, Clone)]
pub enum AccountModalResult {
    ChangeEmail { new_email: String },
    ChangePassword { current: String, new_password: String },
    Logout,
    Cancel,
}

/// The statistics block, fed by the leaderboard fetch that starts when the
/// popup opens.
enum StatsState {
    Loading,
    Loaded(Option<LeaderboardEntry>),
    Failed,
}

pub struct AccountModal {
    new_email: TextArea<'static>,
    confirm_email: TextArea<'static>,
    current_password: TextArea<'static>,
    new_password: TextArea<'static>,
    confirm_password: TextArea<'static>,
    focused_field: usize,
    stats: StatsState,
    error: Option<String>,
    success: Option<String>,
    busy: bool,
}

const FIELD_COUNT: usize = 5;

impl AccountModal {
    pub fn new() -> Self {
        let mut new_email = TextArea::default();
        new_email.set_placeholder_text("new email");
        let mut confirm_email = TextArea::default();
        confirm_email.set_placeholder_text("repeat new email");
        let mut current_password = TextArea::default();
        current_password.set_mask_char('*');
        let mut new_password = TextArea::default();
        new_password.set_mask_char('*');
        let mut confirm_password = TextArea::default();
        confirm_password.set_mask_char('*');

        Self {
            new_email,
            confirm_email,
            current_password,
            new_password,
            confirm_password,
            focused_field: 0,
            stats: StatsState::Loading,
            error: None,
            success: None,
            busy: false,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.success = None;
        self.busy = false;
    }

    pub fn stats_loaded(&mut self, entry: Option<LeaderboardEntry>) {
        self.stats = StatsState::Loaded(entry);
    }

    pub fn stats_failed(&mut self) {
        self.stats = StatsState::Failed;
    }

    pub fn set_busy(&mut self) {
        self.busy = true;
        self.error = None;
        self.success = None;
    }

    /// Called when the backend accepted the email change.
    pub fn email_changed(&mut self) {
        self.success = Some("Email updated successfully!".to_string());
        self.error = None;
        self.busy = false;
        self.new_email = TextArea::default();
        self.new_email.set_placeholder_text("new email");
        self.confirm_email = TextArea::default();
        self.confirm_email.set_placeholder_text("repeat new email");
    }

    /// Called when the backend accepted the password change.
    pub fn password_changed(&mut self) {
        self.success = Some("Password changed successfully!".to_string());
        self.error = None;
        self.busy = false;
        for field in [
            &mut self.current_password,
            &mut self.new_password,
            &mut self.confirm_password,
        ] {
            *field = TextArea::default();
            field.set_mask_char('*');
        }
    }

    fn line(textarea: &TextArea<'_>) -> String {
        textarea.lines().first().cloned().unwrap_or_default()
    }

    fn try_submit(&mut self) -> Option<AccountModalResult> {
        if self.busy {
            return None;
        }
        if self.focused_field <= 1 {
            let new_email = Self::line(&self.new_email).trim().to_string();
            let confirm = Self::line(&self.confirm_email);
            if let Err(message) = session::validate_email_change(&new_email, &confirm) {
                self.error = Some(message);
                return None;
            }
            Some(AccountModalResult::ChangeEmail { new_email })
        } else {
            let current = Self::line(&self.current_password);
            let new_password = Self::line(&self.new_password);
            let confirm = Self::line(&self.confirm_password);
            if let Err(message) =
                session::validate_password_change(&current, &new_password, &confirm)
            {
                self.error = Some(message);
                return None;
            }
            Some(AccountModalResult::ChangePassword {
                current,
                new_password,
            })
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AccountModalResult> {
        match key.code {
            KeyCode::Esc => return Some(AccountModalResult::Cancel),
            KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % FIELD_COUNT;
            }
            KeyCode::BackTab => {
                self.focused_field = (self.focused_field + FIELD_COUNT - 1) % FIELD_COUNT;
            }
            KeyCode::Enter => return self.try_submit(),
            KeyCode::Char('d') | KeyCode::Char('D')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Some(AccountModalResult::Logout);
            }
            _ => {
                let input: tui_textarea::Input = key.into();
                match self.focused_field {
                    0 => {
                        self.new_email.input(input);
                    }
                    1 => {
                        self.confirm_email.input(input);
                    }
                    2 => {
                        self.current_password.input(input);
                    }
                    3 => {
                        self.new_password.input(input);
                    }
                    4 => {
                        self.confirm_password.input(input);
                    }
                    _ => {}
                }
            }
        }
        None
    }

    pub fn render(&mut self, user: &CurrentUser, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(50, 19, area);
        clear_popup(rect, buf);
        popup_block(" Your account ").render(rect, buf);

        let x = rect.x + 2;
        let mut y = rect.y + 1;
        let input_width = rect.width.saturating_sub(16);

        draw_text(buf, x, y, &format!("Signed in as {}", user.username), GOLD);
        y += 1;
        draw_text(buf, x, y, &user.email, Color::Gray);
        y += 2;

        draw_text(buf, x, y, "Change email", CHROME);
        y += 1;
        y = self.render_field(buf, x, y, input_width, 0, "New:", FieldSlot::NewEmail);
        y = self.render_field(buf, x, y, input_width, 1, "Confirm:", FieldSlot::ConfirmEmail);
        y += 1;

        draw_text(buf, x, y, "Change password", CHROME);
        y += 1;
        y = self.render_field(buf, x, y, input_width, 2, "Current:", FieldSlot::CurrentPassword);
        y = self.render_field(buf, x, y, input_width, 3, "New:", FieldSlot::NewPassword);
        y = self.render_field(buf, x, y, input_width, 4, "Confirm:", FieldSlot::ConfirmPassword);

        if let Some(error) = &self.error {
            draw_text(buf, x, y, error, Color::Red);
        } else if let Some(success) = &self.success {
            draw_text(buf, x, y, success, Color::Green);
        } else if self.busy {
            draw_text(buf, x, y, "Working...", Color::Gray);
        }
        y += 2;

        draw_text(buf, x, y, "Statistics", CHROME);
        y += 1;
        match &self.stats {
            StatsState::Loading => draw_text(buf, x, y, "Loading...", Color::Gray),
            StatsState::Failed => draw_text(buf, x, y, "Stats unavailable", Color::DarkGray),
            StatsState::Loaded(None) => {
                draw_text(buf, x, y, "No games on record yet", Color::DarkGray)
            }
            StatsState::Loaded(Some(entry)) => {
                let games = entry.correct + entry.wrong;
                let row = format!(
                    "{:<12}{:<12}{}",
                    format!("Games {}", games),
                    format!("Wins {}", entry.correct),
                    format!("Losses {}", entry.wrong)
                );
                draw_text(buf, x, y, &row, Color::White);
                let row = format!(
                    "{:<12}{}",
                    format!("Streak {}", entry.streak),
                    format!("Win rate {}%", session::win_rate(entry.correct, entry.wrong))
                );
                draw_text(buf, x, y + 1, &row, Color::White);
            }
        }

        draw_text(
            buf,
            x,
            rect.y + rect.height - 2,
            "Enter: submit section  Ctrl+D: sign out  Esc: close",
            Color::DarkGray,
        );
    }

    fn render_field(
        &mut self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        input_width: u16,
        field_id: usize,
        label: &str,
        slot: FieldSlot,
    ) -> u16 {
        let focused = self.focused_field == field_id;
        let label_color = if focused { GOLD } else { CHROME };
        draw_text(buf, x, y, label, label_color);

        let input_rect = Rect {
            x: x + 11,
            y,
            width: input_width,
            height: 1,
        };
        let bg = if focused {
            Color::Rgb(50, 50, 50)
        } else {
            Color::Rgb(25, 25, 25)
        };
        let textarea = match slot {
            FieldSlot::NewEmail => &mut self.new_email,
            FieldSlot::ConfirmEmail => &mut self.confirm_email,
            FieldSlot::CurrentPassword => &mut self.current_password,
            FieldSlot::NewPassword => &mut self.new_password,
            FieldSlot::ConfirmPassword => &mut self.confirm_password,
        };
        textarea.set_block(Block::default().style(Style::default().bg(bg)));
        textarea.set_style(Style::default().fg(Color::White).bg(bg));
        textarea.render(input_rect, buf);
        y + 1
    }
}

#[derive(Clone, Copy)]
enum FieldSlot {
    NewEmail,
    ConfirmEmail,
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}
