//! Sign-in / registration form.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session;
use crate::ui::{centered_rect, clear_popup, draw_text, popup_block, CHROME, GOLD};

/// What the form handed back to the app, if anything.
#[derive(Debug, Clone)]
pub enum AuthModalResult {
    Login { username: String, password: String },
    Register { username: String, email: String, password: String },
    ForgotPassword,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

pub struct AuthModal {
    mode: AuthMode,
    username: TextArea<'static>,
    email: TextArea<'static>,
    password: TextArea<'static>,
    confirm: TextArea<'static>,
    focused_field: usize,
    error: Option<String>,
    busy: bool,
}

impl AuthModal {
    pub fn new() -> Self {
        let mut username = TextArea::default();
        username.set_placeholder_text("username");
        let mut email = TextArea::default();
        email.set_placeholder_text("you@example.com");
        let mut password = TextArea::default();
        password.set_mask_char('*');
        let mut confirm = TextArea::default();
        confirm.set_mask_char('*');

        Self {
            mode: AuthMode::Login,
            username,
            email,
            password,
            confirm,
            focused_field: 0,
            error: None,
            busy: false,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.busy = false;
    }

    pub fn set_busy(&mut self) {
        self.busy = true;
        self.error = None;
    }

    fn field_count(&self) -> usize {
        match self.mode {
            AuthMode::Login => 3,    // mode row, username, password
            AuthMode::Register => 5, // mode row, username, email, password, confirm
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.focused_field = 0;
        self.error = None;
    }

    fn line(textarea: &TextArea<'_>) -> String {
        textarea.lines().first().cloned().unwrap_or_default()
    }

    fn try_submit(&mut self) -> Option<AuthModalResult> {
        if self.busy {
            return None;
        }
        let username = Self::line(&self.username).trim().to_string();
        let password = Self::line(&self.password);

        match self.mode {
            AuthMode::Login => {
                if let Err(message) = session::validate_login(&username, &password) {
                    self.error = Some(message);
                    return None;
                }
                Some(AuthModalResult::Login { username, password })
            }
            AuthMode::Register => {
                let email = Self::line(&self.email).trim().to_string();
                let confirm = Self::line(&self.confirm);
                if let Err(message) =
                    session::validate_registration(&username, &email, &password, &confirm)
                {
                    self.error = Some(message);
                    return None;
                }
                Some(AuthModalResult::Register {
                    username,
                    email,
                    password,
                })
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AuthModalResult> {
        match key.code {
            KeyCode::Esc => return Some(AuthModalResult::Cancel),
            KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % self.field_count();
            }
            KeyCode::BackTab => {
                let count = self.field_count();
                self.focused_field = (self.focused_field + count - 1) % count;
            }
            KeyCode::Enter => return self.try_submit(),
            KeyCode::Char('p') | KeyCode::Char('P')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                if self.mode == AuthMode::Login {
                    return Some(AuthModalResult::ForgotPassword);
                }
            }
            KeyCode::Left | KeyCode::Right if self.focused_field == 0 => {
                self.toggle_mode();
            }
            KeyCode::Char(' ') if self.focused_field == 0 => {
                self.toggle_mode();
            }
            _ => {
                let input: tui_textarea::Input = key.into();
                match (self.mode, self.focused_field) {
                    (_, 1) => {
                        self.username.input(input);
                    }
                    (AuthMode::Login, 2) => {
                        self.password.input(input);
                    }
                    (AuthMode::Register, 2) => {
                        self.email.input(input);
                    }
                    (AuthMode::Register, 3) => {
                        self.password.input(input);
                    }
                    (AuthMode::Register, 4) => {
                        self.confirm.input(input);
                    }
                    _ => {}
                }
            }
        }
        None
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let height = match self.mode {
            AuthMode::Login => 12,
            AuthMode::Register => 16,
        };
        let rect = centered_rect(46, height, area);
        clear_popup(rect, buf);
        popup_block(" Account ").render(rect, buf);

        let x = rect.x + 2;
        let mut y = rect.y + 2;
        let input_width = rect.width.saturating_sub(16);

        // Mode selector row.
        let mode_focus = self.focused_field == 0;
        let selector = |selected: bool, text: &str| {
            format!("{} {}", if selected { "(o)" } else { "( )" }, text)
        };
        let login_text = selector(self.mode == AuthMode::Login, "Sign in");
        let register_text = selector(self.mode == AuthMode::Register, "Register");
        let mode_color = if mode_focus { GOLD } else { CHROME };
        draw_text(buf, x, y, &login_text, mode_color);
        draw_text(buf, x + 14, y, &register_text, mode_color);
        y += 2;

        y = self.render_field(buf, x, y, input_width, 1, "Username:", FieldSlot::Username);
        if self.mode == AuthMode::Register {
            y = self.render_field(buf, x, y, input_width, 2, "Email:", FieldSlot::Email);
            y = self.render_field(buf, x, y, input_width, 3, "Password:", FieldSlot::Password);
            y = self.render_field(buf, x, y, input_width, 4, "Confirm:", FieldSlot::Confirm);
        } else {
            y = self.render_field(buf, x, y, input_width, 2, "Password:", FieldSlot::Password);
        }

        if let Some(error) = &self.error {
            draw_text(buf, x, y, error, Color::Red);
        } else if self.busy {
            draw_text(buf, x, y, "Working...", Color::Gray);
        }

        let footer = match self.mode {
            AuthMode::Login => "Enter: sign in  Ctrl+P: forgot password  Esc: close",
            AuthMode::Register => "Enter: create account  Esc: close",
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
            FieldSlot::Username => &mut self.username,
            FieldSlot::Email => &mut self.email,
            FieldSlot::Password => &mut self.password,
            FieldSlot::Confirm => &mut self.confirm,
        };
        textarea.set_block(Block::default().style(Style::default().bg(bg)));
        textarea.set_style(Style::default().fg(Color::White).bg(bg));
        textarea.render(input_rect, buf);
        y + 2
    }
}

#[derive(Clone, Copy)]
enum FieldSlot {
    Username,
    Email,
    Password,
    Confirm,
}
