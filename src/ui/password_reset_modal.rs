//! Password reset, in two steps: request a reset email, then redeem the
//! token+uid pair from the emailed link. Since a terminal can't follow the
//! link, the player pastes it (or passes `--reset-link`) and we pull the
//! query parameters out.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clipboard;
use crate::session;
use crate::ui::{centered_rect, clear_popup, draw_text, popup_block, CHROME, GOLD};

#[derive(Debug, Clone)]
pub enum PasswordResetResult {
    Request { email: String },
    Confirm { token: String, uid: String, new_password: String },
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResetStep {
    Request,
    Confirm,
}

/// Pull `token` and `uid` query parameters out of a pasted reset link.
/// Accepts a full URL or a bare `token=...&uid=...` fragment.
pub fn parse_reset_link(text: &str) -> Option<(String, String)> {
    let query = text.trim();
    let query = query.split('?').next_back().unwrap_or(query);

    let mut token = None;
    let mut uid = None;
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("token"), Some(value)) if !value.is_empty() => {
                token = Some(value.to_string());
            }
            (Some("uid"), Some(value)) if !value.is_empty() => {
                uid = Some(value.to_string());
            }
            _ => {}
        }
    }
    match (token, uid) {
        (Some(token), Some(uid)) => Some((token, uid)),
        _ => None,
    }
}

pub struct PasswordResetModal {
    step: ResetStep,
    email: TextArea<'static>,
    token: TextArea<'static>,
    uid: TextArea<'static>,
    new_password: TextArea<'static>,
    confirm_password: TextArea<'static>,
    focused_field: usize,
    error: Option<String>,
    notice: Option<String>,
    busy: bool,
}

impl PasswordResetModal {
    pub fn new() -> Self {
        let mut email = TextArea::default();
        email.set_placeholder_text("account email");
        let mut token = TextArea::default();
        token.set_placeholder_text("token from the link");
        let mut uid = TextArea::default();
        uid.set_placeholder_text("uid from the link");
        let mut new_password = TextArea::default();
        new_password.set_mask_char('*');
        let mut confirm_password = TextArea::default();
        confirm_password.set_mask_char('*');

        Self {
            step: ResetStep::Request,
            email,
            token,
            uid,
            new_password,
            confirm_password,
            focused_field: 0,
            error: None,
            notice: None,
            busy: false,
        }
    }

    /// Start directly at the confirm step with token/uid prefilled (from
    /// `--reset-link` or a paste).
    pub fn with_link(link: &str) -> Self {
        let mut modal = Self::new();
        modal.apply_reset_link(link);
        modal
    }

    pub fn apply_reset_link(&mut self, text: &str) {
        if let Some((token, uid)) = parse_reset_link(text) {
            self.token = TextArea::from([token]);
            self.uid = TextArea::from([uid]);
            self.step = ResetStep::Confirm;
            self.focused_field = 2;
            self.error = None;
            self.notice = Some("Link details filled in".to_string());
        } else {
            self.error = Some("That doesn't look like a reset link".to_string());
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.notice = None;
        self.busy = false;
    }

    pub fn set_busy(&mut self) {
        self.busy = true;
        self.error = None;
        self.notice = None;
    }

    /// The request went out; tell the player what happens next.
    pub fn request_sent(&mut self) {
        self.busy = false;
        self.error = None;
        self.notice =
            Some("If the email exists, a reset link has been sent. Paste it here.".to_string());
        self.step = ResetStep::Confirm;
        self.focused_field = 0;
    }

    fn field_count(&self) -> usize {
        match self.step {
            ResetStep::Request => 1,
            ResetStep::Confirm => 4,
        }
    }

    fn line(textarea: &TextArea<'_>) -> String {
        textarea.lines().first().cloned().unwrap_or_default()
    }

    fn try_submit(&mut self) -> Option<PasswordResetResult> {
        if self.busy {
            return None;
        }
        match self.step {
            ResetStep::Request => {
                let email = Self::line(&self.email).trim().to_string();
                if let Err(message) = session::validate_reset_request(&email) {
                    self.error = Some(message);
                    return None;
                }
                Some(PasswordResetResult::Request { email })
            }
            ResetStep::Confirm => {
                let token = Self::line(&self.token).trim().to_string();
                let uid = Self::line(&self.uid).trim().to_string();
                if token.is_empty() || uid.is_empty() {
                    self.error =
                        Some("Paste the reset link or fill in token and uid".to_string());
                    return None;
                }
                let new_password = Self::line(&self.new_password);
                let confirm = Self::line(&self.confirm_password);
                if let Err(message) = session::validate_reset_confirm(&new_password, &confirm) {
                    self.error = Some(message);
                    return None;
                }
                Some(PasswordResetResult::Confirm {
                    token,
                    uid,
                    new_password,
                })
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PasswordResetResult> {
        match key.code {
            KeyCode::Esc => return Some(PasswordResetResult::Cancel),
            KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % self.field_count();
            }
            KeyCode::BackTab => {
                let count = self.field_count();
                self.focused_field = (self.focused_field + count - 1) % count;
            }
            KeyCode::Enter => return self.try_submit(),
            KeyCode::Char('t') | KeyCode::Char('T')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.step = match self.step {
                    ResetStep::Request => ResetStep::Confirm,
                    ResetStep::Confirm => ResetStep::Request,
                };
                self.focused_field = 0;
                self.error = None;
            }
            // Fallback for terminals that don't deliver bracketed paste.
            KeyCode::Char('v') | KeyCode::Char('V')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                match clipboard::paste() {
                    Ok(text) => self.apply_reset_link(text.trim()),
                    Err(e) => {
                        tracing::warn!("Clipboard paste failed: {}", e);
                        self.error = Some("Clipboard unavailable".to_string());
                    }
                }
            }
            _ => {
                let input: tui_textarea::Input = key.into();
                match (self.step, self.focused_field) {
                    (ResetStep::Request, 0) => {
                        self.email.input(input);
                    }
                    (ResetStep::Confirm, 0) => {
                        self.token.input(input);
                    }
                    (ResetStep::Confirm, 1) => {
                        self.uid.input(input);
                    }
                    (ResetStep::Confirm, 2) => {
                        self.new_password.input(input);
                    }
                    (ResetStep::Confirm, 3) => {
                        self.confirm_password.input(input);
                    }
                    _ => {}
                }
            }
        }
        None
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let height = match self.step {
            ResetStep::Request => 10,
            ResetStep::Confirm => 14,
        };
        let rect = centered_rect(56, height, area);
        clear_popup(rect, buf);
        popup_block(" Reset password ").render(rect, buf);

        let x = rect.x + 2;
        let mut y = rect.y + 2;
        let input_width = rect.width.saturating_sub(16);

        match self.step {
            ResetStep::Request => {
                y = self.render_field(buf, x, y, input_width, 0, "Email:", FieldSlot::Email);
            }
            ResetStep::Confirm => {
                y = self.render_field(buf, x, y, input_width, 0, "Token:", FieldSlot::Token);
                y = self.render_field(buf, x, y, input_width, 1, "Uid:", FieldSlot::Uid);
                y = self.render_field(buf, x, y, input_width, 2, "Password:", FieldSlot::NewPassword);
                y = self.render_field(buf, x, y, input_width, 3, "Confirm:", FieldSlot::ConfirmPassword);
            }
        }
        y += 1;

        if let Some(error) = &self.error {
            draw_text(buf, x, y, error, Color::Red);
        } else if let Some(notice) = &self.notice {
            draw_text(buf, x, y, notice, Color::Green);
        } else if self.busy {
            draw_text(buf, x, y, "Working...", Color::Gray);
        }

        let footer = match self.step {
            ResetStep::Request => "Enter: send link  Ctrl+T: I have a link  Esc: close",
            ResetStep::Confirm => "Enter: save  Ctrl+V: paste  Ctrl+T: back  Esc: close",
        };
        draw_text(buf, x, rect.y + rect.height - 2, footer, Color::DarkGray);
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
            FieldSlot::Email => &mut self.email,
            FieldSlot::Token => &mut self.token,
            FieldSlot::Uid => &mut self.uid,
            FieldSlot::NewPassword => &mut self.new_password,
            FieldSlot::ConfirmPassword => &mut self.confirm_password,
        };
        textarea.set_block(Block::default().style(Style::default().bg(bg)));
        textarea.set_style(Style::default().fg(Color::White).bg(bg));
        textarea.render(input_rect, buf);
        y + 2
    }
}

#[derive(Clone, Copy)]
enum FieldSlot {
    Email,
    Token,
    Uid,
    NewPassword,
    ConfirmPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_reset_url() {
        let link = "https://ghoti.example.com/reset-password?token=abc123&uid=NDI";
        assert_eq!(
            parse_reset_link(link),
            Some(("abc123".to_string(), "NDI".to_string()))
        );
    }

    #[test]
    fn parses_a_bare_query_fragment() {
        assert_eq!(
            parse_reset_link("uid=NDI&token=abc123"),
            Some(("abc123".to_string(), "NDI".to_string()))
        );
    }

    #[test]
    fn rejects_links_missing_either_parameter() {
        assert_eq!(parse_reset_link("https://x/reset?token=abc"), None);
        assert_eq!(parse_reset_link("https://x/reset?uid=NDI"), None);
        assert_eq!(parse_reset_link("not a link"), None);
        assert_eq!(parse_reset_link("token=&uid=NDI"), None);
    }
}
