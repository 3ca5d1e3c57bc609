//! Admin panel: create curated words (with per-sound pattern selection)
//! and standalone phonetic patterns.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tui_textarea::TextArea;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::admin::{
    self, SuggestionBoard, PATTERN_LETTERS_MAX, PATTERN_REFERENCE_MAX, PATTERN_SOUND_MAX,
    PHONETIC_MAX, SECRET_MAX, SOUNDS_MAX,
};
use crate::api::{NewPattern, NewWord, SoundSuggestion};
use crate::ui::{centered_rect, clear_popup, draw_text, popup_block, CHROME, GOLD};

#[derive(Debug, Clone)]
pub enum AdminPanelResult {
    FetchRandomWord,
    FetchSuggestions { sounds: Vec<String> },
    SubmitWord(NewWord),
    SubmitPattern(NewPattern),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Word,
    Pattern,
}

/// One selectable row in the flattened suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListRow {
    NoChange { sound_idx: usize },
    Pattern { sound_idx: usize, pattern_id: i64 },
}

pub struct AdminPanel {
    tab: AdminTab,
    // Word tab fields.
    secret: TextArea<'static>,
    phonetic: TextArea<'static>,
    sounds: TextArea<'static>,
    board: Option<SuggestionBoard>,
    /// The sound sequence the current board was fetched for; a submit with
    /// different sounds forces a re-fetch.
    suggested_for: Vec<String>,
    list_cursor: usize,
    suggestions_loading: bool,
    // Pattern tab fields.
    letters: TextArea<'static>,
    sound: TextArea<'static>,
    reference: TextArea<'static>,
    focused_field: usize,
    error: Option<String>,
    success: Option<String>,
    busy: bool,
}

impl AdminPanel {
    pub fn new() -> Self {
        let mut secret = TextArea::default();
        secret.set_placeholder_text("target word, e.g. fish");
        let mut phonetic = TextArea::default();
        phonetic.set_placeholder_text("respelling, e.g. ghoti");
        let mut sounds = TextArea::default();
        sounds.set_placeholder_text("sounds, hyphen-separated, e.g. f-i-sh");
        let mut letters = TextArea::default();
        letters.set_placeholder_text("letters, e.g. ti");
        let mut sound = TextArea::default();
        sound.set_placeholder_text("sound, e.g. sh");
        let mut reference = TextArea::default();
        reference.set_placeholder_text("reference word, e.g. nation");

        Self {
            tab: AdminTab::Word,
            secret,
            phonetic,
            sounds,
            board: None,
            suggested_for: Vec::new(),
            list_cursor: 0,
            suggestions_loading: false,
            letters,
            sound,
            reference,
            focused_field: 0,
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

    pub fn set_busy(&mut self) {
        self.busy = true;
        self.error = None;
        self.success = None;
    }

    fn current_sounds(&self) -> Vec<String> {
        admin::split_sounds(&Self::line(&self.sounds))
    }

    /// Suggestions came back. Responses fetched for sounds the curator has
    /// since edited are stale and dropped; a newer fetch is already on the
    /// way for whatever the field says now.
    pub fn suggestions_loaded(&mut self, suggestions: Vec<SoundSuggestion>, sounds: Vec<String>) {
        if self.current_sounds() != sounds {
            return;
        }
        self.suggestions_loading = false;
        self.board = Some(SuggestionBoard::new(suggestions));
        self.suggested_for = sounds;
        self.list_cursor = 0;
    }

    /// A suggestion fetch failed. Stale failures are dropped the same way
    /// stale successes are.
    pub fn suggestions_failed(&mut self, sounds: &[String], message: impl Into<String>) {
        if self.current_sounds() != sounds {
            return;
        }
        self.suggestions_loading = false;
        self.error = Some(message.into());
        self.success = None;
    }

    pub fn random_word_loaded(&mut self, word: &str) {
        self.busy = false;
        self.secret = TextArea::from([word.to_string()]);
    }

    pub fn word_saved(&mut self) {
        self.busy = false;
        self.success = Some("Word created!".to_string());
        self.error = None;
        self.secret = TextArea::default();
        self.secret.set_placeholder_text("target word, e.g. fish");
        self.phonetic = TextArea::default();
        self.phonetic.set_placeholder_text("respelling, e.g. ghoti");
        self.sounds = TextArea::default();
        self.sounds.set_placeholder_text("sounds, hyphen-separated, e.g. f-i-sh");
        self.board = None;
        self.suggested_for.clear();
        self.focused_field = 1;
    }

    pub fn pattern_saved(&mut self) {
        self.busy = false;
        self.success = Some("Pattern created!".to_string());
        self.error = None;
        self.letters = TextArea::default();
        self.letters.set_placeholder_text("letters, e.g. ti");
        self.sound = TextArea::default();
        self.sound.set_placeholder_text("sound, e.g. sh");
        self.reference = TextArea::default();
        self.reference.set_placeholder_text("reference word, e.g. nation");
        self.focused_field = 1;
    }

    fn line(textarea: &TextArea<'_>) -> String {
        textarea.lines().first().cloned().unwrap_or_default()
    }

    fn field_count(&self) -> usize {
        match self.tab {
            // tab row, secret, phonetic, sounds, and the list once present
            AdminTab::Word => {
                if self.board.is_some() {
                    5
                } else {
                    4
                }
            }
            // tab row, letters, sound, reference
            AdminTab::Pattern => 4,
        }
    }

    fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            AdminTab::Word => AdminTab::Pattern,
            AdminTab::Pattern => AdminTab::Word,
        };
        self.focused_field = 0;
        self.error = None;
        self.success = None;
    }

    /// The suggestion list flattened into toggleable rows, in render order.
    fn list_rows(&self) -> Vec<ListRow> {
        let mut rows = Vec::new();
        if let Some(board) = &self.board {
            for (sound_idx, suggestion) in board.suggestions.iter().enumerate() {
                rows.push(ListRow::NoChange { sound_idx });
                for pattern in &suggestion.patterns {
                    rows.push(ListRow::Pattern {
                        sound_idx,
                        pattern_id: pattern.id,
                    });
                }
            }
        }
        rows
    }

    fn toggle_list_row(&mut self) {
        let rows = self.list_rows();
        let Some(row) = rows.get(self.list_cursor).copied() else {
            return;
        };
        let Some(board) = self.board.as_mut() else {
            return;
        };
        match row {
            ListRow::NoChange { sound_idx } => board.toggle_no_change(sound_idx),
            ListRow::Pattern {
                sound_idx,
                pattern_id,
            } => board.toggle_pattern(sound_idx, pattern_id),
        }
    }

    /// Every edit of the sounds field invalidates the current suggestions
    /// and asks for fresh ones.
    fn sounds_edited(&mut self) -> Option<AdminPanelResult> {
        self.board = None;
        self.suggested_for.clear();
        let sounds = self.current_sounds();
        if sounds.is_empty() {
            self.suggestions_loading = false;
            return None;
        }
        self.suggestions_loading = true;
        self.error = None;
        self.success = None;
        Some(AdminPanelResult::FetchSuggestions { sounds })
    }

    fn try_submit_word(&mut self) -> Option<AdminPanelResult> {
        let secret = Self::line(&self.secret);
        let phonetic = Self::line(&self.phonetic);
        let sounds_raw = Self::line(&self.sounds);
        let sounds = match admin::validate_word_form(&secret, &phonetic, &sounds_raw) {
            Ok(sounds) => sounds,
            Err(message) => {
                self.error = Some(message);
                return None;
            }
        };

        if self.suggestions_loading {
            self.error = Some("Still finding patterns for those sounds".to_string());
            return None;
        }
        let Some(board) = &self.board else {
            self.error = Some("No pattern suggestions loaded - edit the sounds to retry".to_string());
            return None;
        };
        if sounds != self.suggested_for {
            self.error = Some("Suggestions are out of date - edit the sounds to refresh".to_string());
            return None;
        }
        if !board.is_complete() {
            self.error =
                Some("Please select a pattern or mark No change for each sound".to_string());
            return None;
        }
        Some(AdminPanelResult::SubmitWord(board.build_word(
            &secret,
            &phonetic,
            &sounds_raw,
        )))
    }

    fn try_submit_pattern(&mut self) -> Option<AdminPanelResult> {
        let letters = Self::line(&self.letters);
        let sound = Self::line(&self.sound);
        let reference = Self::line(&self.reference);
        if let Err(message) = admin::validate_pattern_form(&letters, &sound, &reference) {
            self.error = Some(message);
            return None;
        }
        Some(AdminPanelResult::SubmitPattern(admin::build_pattern(
            &letters, &sound, &reference,
        )))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AdminPanelResult> {
        match key.code {
            KeyCode::Esc => return Some(AdminPanelResult::Cancel),
            KeyCode::Tab => {
                self.focused_field = (self.focused_field + 1) % self.field_count();
            }
            KeyCode::BackTab => {
                let count = self.field_count();
                self.focused_field = (self.focused_field + count - 1) % count;
            }
            KeyCode::Enter => {
                if self.busy {
                    return None;
                }
                return match self.tab {
                    AdminTab::Word => self.try_submit_word(),
                    AdminTab::Pattern => self.try_submit_pattern(),
                };
            }
            KeyCode::Char('r') | KeyCode::Char('R')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                if self.tab == AdminTab::Word {
                    return Some(AdminPanelResult::FetchRandomWord);
                }
            }
            KeyCode::Left | KeyCode::Right if self.focused_field == 0 => {
                self.toggle_tab();
            }
            KeyCode::Char(' ') if self.focused_field == 0 => {
                self.toggle_tab();
            }
            KeyCode::Up if self.tab == AdminTab::Word && self.focused_field == 4 => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
            }
            KeyCode::Down if self.tab == AdminTab::Word && self.focused_field == 4 => {
                let last = self.list_rows().len().saturating_sub(1);
                self.list_cursor = (self.list_cursor + 1).min(last);
            }
            KeyCode::Char(' ') if self.tab == AdminTab::Word && self.focused_field == 4 => {
                self.toggle_list_row();
            }
            _ => {
                let input: tui_textarea::Input = key.into();
                match (self.tab, self.focused_field) {
                    (AdminTab::Word, 1) => input_capped(&mut self.secret, input, SECRET_MAX),
                    (AdminTab::Word, 2) => input_capped(&mut self.phonetic, input, PHONETIC_MAX),
                    (AdminTab::Word, 3) => {
                        let before = Self::line(&self.sounds);
                        input_capped(&mut self.sounds, input, SOUNDS_MAX);
                        if Self::line(&self.sounds) != before {
                            return self.sounds_edited();
                        }
                    }
                    (AdminTab::Pattern, 1) => {
                        input_capped(&mut self.letters, input, PATTERN_LETTERS_MAX)
                    }
                    (AdminTab::Pattern, 2) => {
                        input_capped(&mut self.sound, input, PATTERN_SOUND_MAX)
                    }
                    (AdminTab::Pattern, 3) => {
                        input_capped(&mut self.reference, input, PATTERN_REFERENCE_MAX)
                    }
                    _ => {}
                }
            }
        }
        None
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(62, area.height.saturating_sub(4).clamp(16, 26), area);
        clear_popup(rect, buf);
        popup_block(" Admin ").render(rect, buf);

        let x = rect.x + 2;
        let mut y = rect.y + 1;
        let input_width = rect.width.saturating_sub(16);

        // Tab row.
        let tab_color = if self.focused_field == 0 { GOLD } else { CHROME };
        let word_tab = if self.tab == AdminTab::Word {
            "[ Word ]"
        } else {
            "  Word  "
        };
        let pattern_tab = if self.tab == AdminTab::Pattern {
            "[ Pattern ]"
        } else {
            "  Pattern  "
        };
        draw_text(buf, x, y, word_tab, tab_color);
        draw_text(buf, x + 10, y, pattern_tab, tab_color);
        y += 2;

        match self.tab {
            AdminTab::Word => {
                y = self.render_field(buf, x, y, input_width, 1, "Secret:", WordSlot::Secret);
                y = self.render_field(buf, x, y, input_width, 2, "Phonetic:", WordSlot::Phonetic);
                y = self.render_field(buf, x, y, input_width, 3, "Sounds:", WordSlot::Sounds);
                y += 1;
                y = self.render_suggestions(buf, x, y, rect);
            }
            AdminTab::Pattern => {
                y = self.render_field(buf, x, y, input_width, 1, "Letters:", WordSlot::Letters);
                y = self.render_field(buf, x, y, input_width, 2, "Sound:", WordSlot::Sound);
                y = self.render_field(buf, x, y, input_width, 3, "Reference:", WordSlot::Reference);
                y += 1;
            }
        }

        if let Some(error) = &self.error {
            draw_text(buf, x, y, error, Color::Red);
        } else if let Some(success) = &self.success {
            draw_text(buf, x, y, success, Color::Green);
        } else if self.busy {
            draw_text(buf, x, y, "Working...", Color::Gray);
        }

        let footer = match self.tab {
            AdminTab::Word => "Ctrl+R: random word  Enter: create  Esc: close",
            AdminTab::Pattern => "Enter: create pattern  Esc: close",
        };
        draw_text(buf, x, rect.y + rect.height - 2, footer, Color::DarkGray);
    }

    fn render_suggestions(&mut self, buf: &mut Buffer, x: u16, mut y: u16, rect: Rect) -> u16 {
        if self.suggestions_loading {
            draw_text(buf, x, y, "Finding matching patterns...", Color::Gray);
            return y + 2;
        }
        let Some(board) = &self.board else {
            draw_text(
                buf,
                x,
                y,
                "Pattern suggestions appear as you type the sounds",
                Color::DarkGray,
            );
            return y + 2;
        };

        let list_focused = self.focused_field == 4;
        let header_color = if list_focused { GOLD } else { CHROME };
        draw_text(buf, x, y, "Patterns (Space toggles):", header_color);
        y += 1;

        // Visible window of the flattened list, scrolled to keep the
        // cursor in view. Three rows are reserved below for status+footer.
        let rows = self.list_rows();
        let bottom = rect.y + rect.height.saturating_sub(3);
        let visible = bottom.saturating_sub(y) as usize;
        if visible == 0 {
            return y;
        }
        let offset = self.list_cursor.saturating_sub(visible.saturating_sub(1));

        for (i, row) in rows.iter().enumerate().skip(offset).take(visible) {
            let under_cursor = list_focused && i == self.list_cursor;
            let text = match *row {
                ListRow::NoChange { sound_idx } => {
                    let mark = if board.is_no_change(sound_idx) { "x" } else { " " };
                    format!("{}: [{}] Keep as-is", board.suggestions[sound_idx].sound, mark)
                }
                ListRow::Pattern {
                    sound_idx,
                    pattern_id,
                } => {
                    let pattern = board.suggestions[sound_idx]
                        .patterns
                        .iter()
                        .find(|p| p.id == pattern_id);
                    match pattern {
                        Some(p) => {
                            let mark = if board.is_selected(sound_idx, pattern_id) {
                                "x"
                            } else {
                                " "
                            };
                            format!(
                                "{}: [{}] {} (from {})",
                                board.suggestions[sound_idx].sound,
                                mark,
                                p.letters.to_uppercase(),
                                p.reference
                            )
                        }
                        None => continue,
                    }
                }
            };
            let color = if under_cursor { GOLD } else { Color::White };
            let prefix = if under_cursor { "> " } else { "  " };
            draw_text(buf, x, y, &format!("{}{}", prefix, text), color);
            y += 1;
        }
        y
    }

    fn render_field(
        &mut self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        input_width: u16,
        field_id: usize,
        label: &str,
        slot: WordSlot,
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
            WordSlot::Secret => &mut self.secret,
            WordSlot::Phonetic => &mut self.phonetic,
            WordSlot::Sounds => &mut self.sounds,
            WordSlot::Letters => &mut self.letters,
            WordSlot::Sound => &mut self.sound,
            WordSlot::Reference => &mut self.reference,
        };
        textarea.set_block(Block::default().style(Style::default().bg(bg)));
        textarea.set_style(Style::default().fg(Color::White).bg(bg));
        textarea.render(input_rect, buf);
        y + 2
    }
}

#[derive(Clone, Copy)]
enum WordSlot {
    Secret,
    Phonetic,
    Sounds,
    Letters,
    Sound,
    Reference,
}

/// Feed a key to a single-line field, refusing new characters past `cap`.
fn input_capped(textarea: &mut TextArea<'static>, input: tui_textarea::Input, cap: usize) {
    if matches!(input.key, tui_textarea::Key::Char(_)) {
        let len = textarea.lines().first().map(|l| l.chars().count()).unwrap_or(0);
        if len >= cap {
            return;
        }
    }
    textarea.input(input);
}
