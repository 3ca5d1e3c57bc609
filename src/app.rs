//! Application state and the main event loop.
//!
//! `App` owns every piece of client state: the round in progress, the
//! signed-in identity, the toast banner, and whichever popup is open. All
//! backend traffic runs on spawned tasks that report back over one
//! unbounded channel; the loop drains that channel between frames.
//!
//! Responses are tagged with the session generation they were spawned
//! under. Signing in or out bumps the generation, so a verdict or word
//! fetch that raced a session change is dropped instead of corrupting the
//! new session's board.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::api::{
    ApiClient, ApiError, CurrentUser, DailyWord, GuessResponse, Leaderboard, NewPattern, NewWord,
    SoundSuggestion,
};
use crate::clipboard;
use crate::config::Config;
use crate::game::{GameSession, GuessOutcome};
use crate::session::AuthSession;
use crate::toast::ToastState;
use crate::ui::{
    render_board, render_game_over, render_info, render_keyboard, render_leaderboard,
    render_menu_bar, render_toast, AccountModal, AccountModalResult, AdminPanel, AdminPanelResult,
    AuthModal, AuthModalResult, PasswordResetModal, PasswordResetResult,
};

/// The popup currently on screen. At most one is ever open.
pub enum Modal {
    None,
    Info,
    GameOver,
    Leaderboard,
    Auth(AuthModal),
    Account(AccountModal),
    Admin(AdminPanel),
    PasswordReset(PasswordResetModal),
}

/// A completed backend call, posted back to the event loop.
pub struct NetEvent {
    pub generation: u64,
    pub response: NetResponse,
}

pub enum NetResponse {
    DailyWord(Result<DailyWord, ApiError>),
    Verdict {
        guess: String,
        result: Result<GuessResponse, ApiError>,
    },
    Identity {
        result: Result<Option<CurrentUser>, ApiError>,
        /// Success toast for an explicit sign-in/registration; `None` for
        /// the silent startup lookup.
        announce: Option<&'static str>,
    },
    SignedOut(Result<(), ApiError>),
    Leaderboard(Result<Leaderboard, ApiError>),
    Suggestions {
        sounds: Vec<String>,
        result: Result<Vec<SoundSuggestion>, ApiError>,
    },
    RandomWord(Result<String, ApiError>),
    WordSaved(Result<(), ApiError>),
    PatternSaved(Result<(), ApiError>),
    EmailChanged(Result<(), ApiError>),
    PasswordChanged(Result<(), ApiError>),
    ResetRequested(Result<(), ApiError>),
    ResetConfirmed(Result<(), ApiError>),
}

pub struct App {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub game: GameSession,
    pub auth: AuthSession,
    pub toasts: ToastState,
    pub modal: Modal,
    pub leaderboard: Option<Leaderboard>,
    pub leaderboard_loading: bool,
    pub running: bool,
    generation: u64,
    net_tx: UnboundedSender<NetEvent>,
    net_rx: UnboundedReceiver<NetEvent>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config.server.base_url)?);
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            api,
            game: GameSession::new(),
            auth: AuthSession::new(),
            toasts: ToastState::new(),
            modal: Modal::None,
            leaderboard: None,
            leaderboard_loading: false,
            running: true,
            generation: 0,
            net_tx,
            net_rx,
        })
    }

    /// Main loop: drain finished backend calls, draw, wait for input.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
        reset_link: Option<String>,
    ) -> Result<()> {
        info!("Connecting to {}", self.api.base_url());
        self.spawn_fetch_word();
        self.spawn_fetch_identity(None);
        if let Some(link) = reset_link {
            self.modal = Modal::PasswordReset(PasswordResetModal::with_link(&link));
        }

        let poll_timeout = Duration::from_millis(self.config.ui.poll_timeout_ms);
        while self.running {
            let now = Instant::now();
            self.toasts.tick(now);
            self.drain_net_events(now);

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(poll_timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key, Instant::now());
                    }
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(6),
            ])
            .split(area);

        let buf = frame.buffer_mut();
        render_menu_bar(&self.auth, chunks[0], buf);
        render_board(&self.game, chunks[1], buf);
        render_keyboard(&self.game, chunks[2], buf);

        match &mut self.modal {
            Modal::None => {}
            Modal::Info => render_info(area, buf),
            Modal::GameOver => render_game_over(&self.game, area, buf),
            Modal::Leaderboard => render_leaderboard(
                self.leaderboard.as_ref(),
                self.leaderboard_loading,
                self.auth.username(),
                area,
                buf,
            ),
            Modal::Auth(form) => form.render(area, buf),
            Modal::Account(form) => {
                if let Some(user) = &self.auth.user {
                    form.render(user, area, buf);
                }
            }
            Modal::Admin(panel) => panel.render(area, buf),
            Modal::PasswordReset(form) => form.render(area, buf),
        }

        render_toast(&self.toasts, area, buf);
    }

    // -- input routing ------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.running = false;
            return;
        }

        let mut auth_result = None;
        let mut account_result = None;
        let mut admin_result = None;
        let mut reset_result = None;

        match &mut self.modal {
            Modal::None => {
                self.handle_game_key(key, now);
                return;
            }
            Modal::Info => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
                    self.modal = Modal::None;
                }
                return;
            }
            Modal::Leaderboard => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.modal = Modal::None;
                }
                return;
            }
            Modal::GameOver => {
                match key.code {
                    KeyCode::Char('c') | KeyCode::Char('C') => self.copy_results(now),
                    KeyCode::Esc | KeyCode::Enter => self.modal = Modal::None,
                    _ => {}
                }
                return;
            }
            Modal::Auth(form) => auth_result = form.handle_key(key),
            Modal::Account(form) => account_result = form.handle_key(key),
            Modal::Admin(panel) => admin_result = panel.handle_key(key),
            Modal::PasswordReset(form) => reset_result = form.handle_key(key),
        }

        if let Some(result) = auth_result {
            self.on_auth_result(result);
        }
        if let Some(result) = account_result {
            self.on_account_result(result);
        }
        if let Some(result) = admin_result {
            self.on_admin_result(result);
        }
        if let Some(result) = reset_result {
            self.on_reset_result(result);
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('l') | KeyCode::Char('L') if ctrl => self.open_leaderboard(),
            KeyCode::Char('u') | KeyCode::Char('U') if ctrl => {
                if self.auth.is_signed_in() {
                    self.modal = Modal::Account(AccountModal::new());
                    // The stats block reuses the leaderboard payload.
                    self.spawn_fetch_leaderboard();
                } else {
                    self.modal = Modal::Auth(AuthModal::new());
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') if ctrl => {
                if self.auth.is_admin() {
                    self.modal = Modal::Admin(AdminPanel::new());
                }
            }
            KeyCode::Char('?') => self.modal = Modal::Info,
            KeyCode::Esc => self.toasts.dismiss(now),
            KeyCode::Enter => self.submit_guess(),
            KeyCode::Backspace => self.game.pop_char(),
            KeyCode::Char(c) if !ctrl => {
                if self.game.outcome.is_over() {
                    // Letters stop being guess input once the round ends.
                    if matches!(c, 'g' | 'G') {
                        self.modal = Modal::GameOver;
                    }
                } else if self.game.word.is_none() {
                    if matches!(c, 'r' | 'R') {
                        self.spawn_fetch_word();
                    }
                } else {
                    self.game.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if let Modal::PasswordReset(form) = &mut self.modal {
            form.apply_reset_link(text.trim());
        } else {
            debug!("Ignoring paste outside the reset form");
        }
    }

    fn submit_guess(&mut self) {
        if !self.game.can_submit() {
            return;
        }
        let guess = self.game.current_guess.clone();
        self.game.loading = true;
        self.spawn_validate(guess);
    }

    fn copy_results(&mut self, now: Instant) {
        match clipboard::copy(&self.game.share_text()) {
            Ok(()) => self.toasts.success("Results copied to clipboard!", now),
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                self.toasts.error("Clipboard unavailable", now);
            }
        }
    }

    fn open_leaderboard(&mut self) {
        self.modal = Modal::Leaderboard;
        self.leaderboard_loading = true;
        self.spawn_fetch_leaderboard();
    }

    // -- widget results -----------------------------------------------------

    fn on_auth_result(&mut self, result: AuthModalResult) {
        match result {
            AuthModalResult::Login { username, password } => {
                if let Modal::Auth(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_sign_in(username, password);
            }
            AuthModalResult::Register {
                username,
                email,
                password,
            } => {
                if let Modal::Auth(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_register(username, email, password);
            }
            AuthModalResult::ForgotPassword => {
                self.modal = Modal::PasswordReset(PasswordResetModal::new());
            }
            AuthModalResult::Cancel => self.modal = Modal::None,
        }
    }

    fn on_account_result(&mut self, result: AccountModalResult) {
        match result {
            AccountModalResult::ChangeEmail { new_email } => {
                if let Modal::Account(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_change_email(new_email);
            }
            AccountModalResult::ChangePassword {
                current,
                new_password,
            } => {
                if let Modal::Account(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_change_password(current, new_password);
            }
            AccountModalResult::Logout => {
                if let Modal::Account(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_sign_out();
            }
            AccountModalResult::Cancel => self.modal = Modal::None,
        }
    }

    fn on_admin_result(&mut self, result: AdminPanelResult) {
        match result {
            AdminPanelResult::FetchRandomWord => {
                if let Modal::Admin(panel) = &mut self.modal {
                    panel.set_busy();
                }
                self.spawn_random_word();
            }
            AdminPanelResult::FetchSuggestions { sounds } => {
                self.spawn_suggestions(sounds);
            }
            AdminPanelResult::SubmitWord(word) => {
                if let Modal::Admin(panel) = &mut self.modal {
                    panel.set_busy();
                }
                self.spawn_create_word(word);
            }
            AdminPanelResult::SubmitPattern(pattern) => {
                if let Modal::Admin(panel) = &mut self.modal {
                    panel.set_busy();
                }
                self.spawn_create_pattern(pattern);
            }
            AdminPanelResult::Cancel => self.modal = Modal::None,
        }
    }

    fn on_reset_result(&mut self, result: PasswordResetResult) {
        match result {
            PasswordResetResult::Request { email } => {
                if let Modal::PasswordReset(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_reset_request(email);
            }
            PasswordResetResult::Confirm {
                token,
                uid,
                new_password,
            } => {
                if let Modal::PasswordReset(form) = &mut self.modal {
                    form.set_busy();
                }
                self.spawn_reset_confirm(token, uid, new_password);
            }
            PasswordResetResult::Cancel => self.modal = Modal::None,
        }
    }

    // -- network ------------------------------------------------------------

    fn drain_net_events(&mut self, now: Instant) {
        while let Ok(event) = self.net_rx.try_recv() {
            if event.generation != self.generation {
                debug!(
                    "Dropping stale response from session generation {}",
                    event.generation
                );
                continue;
            }
            self.apply_net_response(event.response, now);
        }
    }

    fn apply_net_response(&mut self, response: NetResponse, now: Instant) {
        match response {
            NetResponse::DailyWord(Ok(word)) => {
                info!("Loaded daily word ({} letters)", word.length);
                self.game.reset(Some(word));
            }
            NetResponse::DailyWord(Err(e)) => {
                warn!("Daily word fetch failed: {}", e);
                self.toasts.error(e.user_message(), now);
            }
            NetResponse::Verdict { guess, result } => match result {
                Ok(response) => match self.game.apply_verdict(guess, response) {
                    GuessOutcome::Won | GuessOutcome::Lost => self.modal = Modal::GameOver,
                    GuessOutcome::Recorded => {}
                },
                Err(e) => {
                    self.game.submission_failed();
                    self.toasts.error(e.user_message(), now);
                }
            },
            NetResponse::Identity { result, announce } => {
                self.apply_identity(result, announce, now);
            }
            NetResponse::SignedOut(Ok(())) => {
                info!("Signed out");
                self.auth.clear();
                self.modal = Modal::None;
                self.toasts.info("Logged out", now);
                self.start_new_session();
            }
            NetResponse::SignedOut(Err(e)) => {
                if let Modal::Account(form) = &mut self.modal {
                    form.set_error(e.user_message());
                } else {
                    self.toasts.error(e.user_message(), now);
                }
            }
            NetResponse::Leaderboard(result) => {
                self.leaderboard_loading = false;
                match result {
                    Ok(board) => {
                        // The account popup shows the caller's slice of the
                        // same payload.
                        if let Modal::Account(form) = &mut self.modal {
                            form.stats_loaded(board.current_user.clone());
                        }
                        self.leaderboard = Some(board);
                    }
                    Err(e) => {
                        if let Modal::Account(form) = &mut self.modal {
                            form.stats_failed();
                        } else {
                            self.toasts.error(e.user_message(), now);
                        }
                    }
                }
            }
            NetResponse::Suggestions { sounds, result } => {
                if let Modal::Admin(panel) = &mut self.modal {
                    match result {
                        Ok(suggestions) => panel.suggestions_loaded(suggestions, sounds),
                        Err(e) => panel.suggestions_failed(&sounds, e.user_message()),
                    }
                }
            }
            NetResponse::RandomWord(result) => {
                if let Modal::Admin(panel) = &mut self.modal {
                    match result {
                        Ok(word) => panel.random_word_loaded(&word),
                        Err(e) => panel.set_error(e.user_message()),
                    }
                }
            }
            NetResponse::WordSaved(result) => {
                if let Modal::Admin(panel) = &mut self.modal {
                    match result {
                        Ok(()) => panel.word_saved(),
                        Err(e) => panel.set_error(e.user_message()),
                    }
                }
            }
            NetResponse::PatternSaved(result) => {
                if let Modal::Admin(panel) = &mut self.modal {
                    match result {
                        Ok(()) => panel.pattern_saved(),
                        Err(e) => panel.set_error(e.user_message()),
                    }
                }
            }
            NetResponse::EmailChanged(result) => match result {
                Ok(()) => {
                    if let Modal::Account(form) = &mut self.modal {
                        form.email_changed();
                    }
                    // Refresh the profile so the new address shows.
                    self.spawn_fetch_identity(None);
                }
                Err(e) => {
                    if let Modal::Account(form) = &mut self.modal {
                        form.set_error(e.user_message());
                    }
                }
            },
            NetResponse::PasswordChanged(result) => match result {
                Ok(()) => {
                    if let Modal::Account(form) = &mut self.modal {
                        form.password_changed();
                    }
                }
                Err(e) => {
                    if let Modal::Account(form) = &mut self.modal {
                        form.set_error(e.user_message());
                    }
                }
            },
            NetResponse::ResetRequested(result) => match result {
                Ok(()) => {
                    if let Modal::PasswordReset(form) = &mut self.modal {
                        form.request_sent();
                    }
                }
                Err(e) => {
                    if let Modal::PasswordReset(form) = &mut self.modal {
                        form.set_error(e.user_message());
                    }
                }
            },
            NetResponse::ResetConfirmed(result) => match result {
                Ok(()) => {
                    self.modal = Modal::Auth(AuthModal::new());
                    self.toasts
                        .success("Password has been reset. You can now sign in.", now);
                }
                Err(e) => {
                    if let Modal::PasswordReset(form) = &mut self.modal {
                        form.set_error(e.user_message());
                    }
                }
            },
        }
    }

    fn apply_identity(
        &mut self,
        result: Result<Option<CurrentUser>, ApiError>,
        announce: Option<&'static str>,
        now: Instant,
    ) {
        match result {
            Ok(user) => {
                let explicit = announce.is_some();
                if let Some(message) = announce {
                    self.toasts.success(message, now);
                    self.modal = Modal::None;
                }
                if let Some(user) = &user {
                    info!("Signed in as {}", user.username);
                }
                self.auth.set_user(user);
                if explicit {
                    // Progress belongs to the account that played it; a new
                    // identity starts a fresh round against a fresh fetch.
                    self.start_new_session();
                }
            }
            Err(e) => {
                if announce.is_some() {
                    if let Modal::Auth(form) = &mut self.modal {
                        form.set_error(e.user_message());
                    } else {
                        self.toasts.error(e.user_message(), now);
                    }
                } else {
                    // Startup lookup; the word fetch surfaces connectivity.
                    warn!("Identity lookup failed: {}", e);
                }
            }
        }
    }

    /// Invalidate everything in flight and refetch the puzzle.
    fn start_new_session(&mut self) {
        self.generation += 1;
        self.game.reset(None);
        self.leaderboard = None;
        self.spawn_fetch_word();
    }

    fn spawn_fetch_word(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.daily_word().await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::DailyWord(result),
            });
        });
    }

    fn spawn_validate(&self, guess: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.validate_guess(&guess).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Verdict { guess, result },
            });
        });
    }

    fn spawn_fetch_identity(&self, announce: Option<&'static str>) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.me().await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Identity { result, announce },
            });
        });
    }

    fn spawn_sign_in(&self, username: String, password: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = match api.login(&username, &password).await {
                Ok(()) => api.me().await,
                Err(e) => Err(e),
            };
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Identity {
                    result,
                    announce: Some("Logged in!"),
                },
            });
        });
    }

    fn spawn_register(&self, username: String, email: String, password: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = match api.register(&username, &email, &password).await {
                Ok(()) => api.me().await,
                Err(e) => Err(e),
            };
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Identity {
                    result,
                    announce: Some("Account created!"),
                },
            });
        });
    }

    fn spawn_sign_out(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.logout().await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::SignedOut(result),
            });
        });
    }

    fn spawn_fetch_leaderboard(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.leaderboard().await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Leaderboard(result),
            });
        });
    }

    fn spawn_change_email(&self, new_email: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.change_email(&new_email).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::EmailChanged(result),
            });
        });
    }

    fn spawn_change_password(&self, current: String, new_password: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.change_password(&current, &new_password).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::PasswordChanged(result),
            });
        });
    }

    fn spawn_reset_request(&self, email: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.request_password_reset(&email).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::ResetRequested(result),
            });
        });
    }

    fn spawn_reset_confirm(&self, token: String, uid: String, new_password: String) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.confirm_password_reset(&token, &uid, &new_password).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::ResetConfirmed(result),
            });
        });
    }

    fn spawn_suggestions(&self, sounds: Vec<String>) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.suggest_patterns(&sounds).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::Suggestions { sounds, result },
            });
        });
    }

    fn spawn_random_word(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.random_word().await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::RandomWord(result),
            });
        });
    }

    fn spawn_create_word(&self, word: NewWord) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.create_word(&word).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::WordSaved(result),
            });
        });
    }

    fn spawn_create_pattern(&self, pattern: NewPattern) {
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = api.create_pattern(&pattern).await;
            let _ = tx.send(NetEvent {
                generation,
                response: NetResponse::PatternSaved(result),
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LetterFeedback, LetterStatus};
    use crate::game::Outcome;

    fn test_app() -> App {
        App::new(Config::default()).unwrap()
    }

    fn daily_word() -> DailyWord {
        DailyWord {
            phonetic_spelling: "gh,o,ti".to_string(),
            word: "fish".to_string(),
            length: 4,
            phonetic_patterns: Vec::new(),
        }
    }

    fn correct_verdict() -> GuessResponse {
        GuessResponse {
            is_correct: true,
            length_match: true,
            feedback: vec![LetterFeedback {
                letter: 'f',
                status: LetterStatus::Correct,
                position: 0,
            }],
        }
    }

    #[tokio::test]
    async fn stale_generation_events_are_dropped() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));

        // A verdict from a previous session must not touch the board.
        app.net_tx
            .send(NetEvent {
                generation: 99,
                response: NetResponse::Verdict {
                    guess: "FISH".to_string(),
                    result: Ok(correct_verdict()),
                },
            })
            .unwrap();
        app.drain_net_events(Instant::now());

        assert_eq!(app.game.outcome, Outcome::InProgress);
        assert!(app.game.guesses.is_empty());
    }

    #[tokio::test]
    async fn winning_verdict_opens_the_results_popup() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));

        app.apply_net_response(
            NetResponse::Verdict {
                guess: "FISH".to_string(),
                result: Ok(correct_verdict()),
            },
            Instant::now(),
        );

        assert_eq!(app.game.outcome, Outcome::Won);
        assert!(matches!(app.modal, Modal::GameOver));
    }

    #[tokio::test]
    async fn rejected_guess_keeps_the_board_and_toasts() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));
        for c in "fish".chars() {
            app.game.push_char(c);
        }
        app.game.loading = true;

        let now = Instant::now();
        app.apply_net_response(
            NetResponse::Verdict {
                guess: "FISH".to_string(),
                result: Err(ApiError::Server {
                    status: 400,
                    message: "Invalid guess".to_string(),
                }),
            },
            now,
        );

        assert_eq!(app.game.current_guess, "FISH");
        assert!(app.game.guesses.is_empty());
        assert!(!app.game.loading);
        assert_eq!(app.toasts.active().unwrap().message, "Invalid guess");
    }

    #[tokio::test]
    async fn wrong_length_verdict_burns_an_attempt_without_noise() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));
        for c in "fi".chars() {
            app.game.push_char(c);
        }
        app.game.loading = true;

        app.apply_net_response(
            NetResponse::Verdict {
                guess: "FI".to_string(),
                result: Ok(GuessResponse {
                    is_correct: false,
                    length_match: false,
                    feedback: vec![
                        LetterFeedback {
                            letter: 'f',
                            status: LetterStatus::Correct,
                            position: 0,
                        },
                        LetterFeedback {
                            letter: 'i',
                            status: LetterStatus::Correct,
                            position: 1,
                        },
                    ],
                }),
            },
            Instant::now(),
        );

        // The board's row marker tells the story; no toast, no popup.
        assert!(app.game.current_guess.is_empty());
        assert_eq!(app.game.guesses.len(), 1);
        assert!(!app.game.guesses[0].length_match);
        assert!(app.toasts.active().is_none());
        assert!(matches!(app.modal, Modal::None));
    }

    #[tokio::test]
    async fn sign_in_starts_a_fresh_session() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));
        app.game.push_char('f');
        app.modal = Modal::Auth(AuthModal::new());
        let old_generation = app.generation;

        app.apply_net_response(
            NetResponse::Identity {
                result: Ok(Some(CurrentUser {
                    username: "ada".to_string(),
                    email: "ada@example.com".to_string(),
                    is_superuser: false,
                })),
                announce: Some("Logged in!"),
            },
            Instant::now(),
        );

        assert!(app.auth.is_signed_in());
        assert!(matches!(app.modal, Modal::None));
        assert_eq!(app.generation, old_generation + 1);
        assert!(app.game.current_guess.is_empty());
        assert!(app.game.word.is_none());
        assert_eq!(app.toasts.active().unwrap().message, "Logged in!");
    }

    #[tokio::test]
    async fn in_flight_verdict_from_before_sign_in_is_discarded() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));
        let pre_login_generation = app.generation;

        // Guess goes out, then the player signs in before it returns.
        app.net_tx
            .send(NetEvent {
                generation: pre_login_generation,
                response: NetResponse::Verdict {
                    guess: "FISH".to_string(),
                    result: Ok(correct_verdict()),
                },
            })
            .unwrap();
        app.apply_net_response(
            NetResponse::Identity {
                result: Ok(Some(CurrentUser {
                    username: "ada".to_string(),
                    email: "ada@example.com".to_string(),
                    is_superuser: false,
                })),
                announce: Some("Logged in!"),
            },
            Instant::now(),
        );
        app.drain_net_events(Instant::now());

        assert_eq!(app.game.outcome, Outcome::InProgress);
        assert!(app.game.guesses.is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_identity_and_board() {
        let mut app = test_app();
        app.auth.set_user(Some(CurrentUser {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            is_superuser: true,
        }));
        app.game.reset(Some(daily_word()));
        app.modal = Modal::Account(AccountModal::new());

        app.apply_net_response(NetResponse::SignedOut(Ok(())), Instant::now());

        assert!(!app.auth.is_signed_in());
        assert!(matches!(app.modal, Modal::None));
        assert!(app.game.word.is_none());
        assert!(app.leaderboard.is_none());
    }

    #[tokio::test]
    async fn typed_letters_go_to_the_board_only_while_live() {
        let mut app = test_app();
        app.game.reset(Some(daily_word()));

        let key = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE);
        app.handle_key(key, Instant::now());
        assert_eq!(app.game.current_guess, "F");

        app.apply_net_response(
            NetResponse::Verdict {
                guess: "F".to_string(),
                result: Ok(correct_verdict()),
            },
            Instant::now(),
        );
        app.modal = Modal::None;

        let key = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        app.handle_key(key, Instant::now());
        assert!(matches!(app.modal, Modal::GameOver));
    }

    #[tokio::test]
    async fn account_stats_errors_stay_inside_the_popup() {
        let mut app = test_app();
        app.auth.set_user(Some(CurrentUser {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            is_superuser: false,
        }));
        app.modal = Modal::Account(AccountModal::new());

        app.apply_net_response(
            NetResponse::Leaderboard(Err(ApiError::Network("refused".to_string()))),
            Instant::now(),
        );

        // The popup shows its own "unavailable" line instead of a toast.
        assert!(app.toasts.active().is_none());
        assert!(matches!(app.modal, Modal::Account(_)));
    }

    #[tokio::test]
    async fn daily_word_failure_toasts_but_leaves_retry_available() {
        let mut app = test_app();
        app.apply_net_response(
            NetResponse::DailyWord(Err(ApiError::Network("refused".to_string()))),
            Instant::now(),
        );
        assert!(app.game.word.is_none());
        assert_eq!(
            app.toasts.active().unwrap().message,
            "Cannot connect to the server"
        );

        // R refetches when no puzzle is loaded.
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        app.handle_key(key, Instant::now());
    }
}
