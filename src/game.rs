//! Client-side state for one round of the daily puzzle.
//!
//! The backend is the only judge of guesses; this module just tracks what
//! the player has typed and the verdicts that came back. Everything here is
//! synchronous and side-effect free so it can be tested without a server.

use std::collections::HashMap;

use crate::api::{DailyWord, GuessResponse, LetterFeedback, LetterStatus};

pub const MAX_GUESS_LEN: usize = 7;
pub const MAX_ATTEMPTS: usize = 5;

/// Where the round stands. A round that is `Won` can never also be `Lost`;
/// the two are folded into one value on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::InProgress
    }
}

/// One submitted guess and the verdict the backend returned for it.
///
/// The backend judges guesses of any length, so a record may be shorter or
/// longer than the target; `length_match` is what the board's per-row marker
/// shows.
#[derive(Debug, Clone)]
pub struct GuessRecord {
    pub word: String,
    pub feedback: Vec<LetterFeedback>,
    pub is_correct: bool,
    pub length_match: bool,
}

/// What a submission did to the round, so the caller knows whether to keep
/// the board interactive or open the game-over view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Recorded,
    Won,
    Lost,
}

#[derive(Debug, Default)]
pub struct GameSession {
    pub word: Option<DailyWord>,
    pub guesses: Vec<GuessRecord>,
    pub current_guess: String,
    pub outcome: Outcome,
    /// True while a guess is out for validation; input is frozen until the
    /// verdict (or an error) comes back.
    pub loading: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over against a (possibly new) daily word. Used at startup and
    /// whenever the signed-in account changes, since progress belongs to the
    /// account that made the guesses.
    pub fn reset(&mut self, word: Option<DailyWord>) {
        self.word = word;
        self.guesses.clear();
        self.current_guess.clear();
        self.outcome = Outcome::InProgress;
        self.loading = false;
    }

    pub fn word_length(&self) -> usize {
        self.word.as_ref().map(|w| w.length).unwrap_or(0)
    }

    /// Phonetic clue split into its comma-separated components, uppercased
    /// for the tile row ("gh,o,ti" becomes GH, O, TI).
    pub fn phonetic_segments(&self) -> Vec<String> {
        match &self.word {
            Some(word) => word
                .phonetic_spelling
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    fn accepts_input(&self) -> bool {
        self.word.is_some() && !self.outcome.is_over() && !self.loading
    }

    /// Append one letter to the working guess. Non-alphabetic input and
    /// anything past the cap is dropped; letters are stored uppercase.
    pub fn push_char(&mut self, c: char) {
        if !self.accepts_input() {
            return;
        }
        if !c.is_ascii_alphabetic() {
            return;
        }
        if self.current_guess.len() >= MAX_GUESS_LEN {
            return;
        }
        self.current_guess.push(c.to_ascii_uppercase());
    }

    pub fn pop_char(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.current_guess.pop();
    }

    pub fn can_submit(&self) -> bool {
        self.accepts_input() && !self.current_guess.is_empty()
    }

    /// Fold the backend's verdict into the round.
    ///
    /// Every judged guess is an attempt, wrong length included; the row keeps
    /// its `length_match` flag so the board can mark it. The working guess is
    /// always cleared once a verdict lands.
    pub fn apply_verdict(&mut self, guess: String, response: GuessResponse) -> GuessOutcome {
        self.loading = false;
        if self.outcome.is_over() {
            return GuessOutcome::Recorded;
        }

        let mut feedback = response.feedback;
        feedback.sort_by_key(|f| f.position);
        self.guesses.push(GuessRecord {
            word: guess,
            feedback,
            is_correct: response.is_correct,
            length_match: response.length_match,
        });
        self.current_guess.clear();

        if response.is_correct {
            self.outcome = Outcome::Won;
            GuessOutcome::Won
        } else if self.guesses.len() >= MAX_ATTEMPTS {
            self.outcome = Outcome::Lost;
            GuessOutcome::Lost
        } else {
            GuessOutcome::Recorded
        }
    }

    /// A submission that never produced a verdict (network failure, server
    /// rejection). The working guess is left untouched so nothing typed is
    /// lost.
    pub fn submission_failed(&mut self) {
        self.loading = false;
    }

    /// Best-known status per letter, rebuilt from every verdict so far and
    /// keyed on the lowercase letter. Correct wins over present wins over
    /// absent, and a letter never downgrades no matter what order the
    /// guesses arrived in.
    pub fn keyboard_statuses(&self) -> HashMap<char, LetterStatus> {
        let mut statuses: HashMap<char, LetterStatus> = HashMap::new();
        for record in &self.guesses {
            for fb in &record.feedback {
                let letter = fb.letter.to_ascii_lowercase();
                match statuses.get(&letter) {
                    Some(existing) if existing.rank() >= fb.status.rank() => {}
                    _ => {
                        statuses.insert(letter, fb.status);
                    }
                }
            }
        }
        statuses
    }

    pub fn attempts_used(&self) -> usize {
        self.guesses.len()
    }

    /// Emoji summary for sharing, with the score line on top. The grid leaks
    /// nothing about the word itself.
    pub fn share_text(&self) -> String {
        let score = match self.outcome {
            Outcome::Won => format!("{}/{}", self.guesses.len(), MAX_ATTEMPTS),
            _ => format!("X/{}", MAX_ATTEMPTS),
        };
        let mut out = format!("Ghotidle {}\n", score);
        for record in &self.guesses {
            out.push('\n');
            for fb in &record.feedback {
                out.push_str(match fb.status {
                    LetterStatus::Correct => "\u{1F7E9}",
                    LetterStatus::Present => "\u{1F7E8}",
                    LetterStatus::Absent => "\u{2B1B}",
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(length: usize) -> DailyWord {
        DailyWord {
            phonetic_spelling: "gh,o,ti".to_string(),
            word: "fish".to_string(),
            length,
            phonetic_patterns: Vec::new(),
        }
    }

    fn fb(letter: char, status: LetterStatus, position: usize) -> LetterFeedback {
        LetterFeedback {
            letter,
            status,
            position,
        }
    }

    fn verdict(is_correct: bool, feedback: Vec<LetterFeedback>) -> GuessResponse {
        GuessResponse {
            is_correct,
            length_match: true,
            feedback,
        }
    }

    fn session() -> GameSession {
        let mut s = GameSession::new();
        s.reset(Some(word(4)));
        s
    }

    #[test]
    fn typing_is_uppercased_and_capped() {
        let mut s = session();
        for c in "fishesxx".chars() {
            s.push_char(c);
        }
        assert_eq!(s.current_guess, "FISHESX");
        assert_eq!(s.current_guess.len(), MAX_GUESS_LEN);
    }

    #[test]
    fn non_letters_are_dropped() {
        let mut s = session();
        s.push_char('f');
        s.push_char('1');
        s.push_char(' ');
        s.push_char('-');
        assert_eq!(s.current_guess, "F");
    }

    #[test]
    fn input_frozen_without_a_word() {
        let mut s = GameSession::new();
        s.push_char('a');
        assert!(s.current_guess.is_empty());
        assert!(!s.can_submit());
    }

    #[test]
    fn input_frozen_while_loading() {
        let mut s = session();
        s.push_char('f');
        s.loading = true;
        s.push_char('i');
        s.pop_char();
        assert_eq!(s.current_guess, "F");
        assert!(!s.can_submit());
    }

    #[test]
    fn pop_on_empty_guess_is_a_no_op() {
        let mut s = session();
        s.pop_char();
        assert_eq!(s.current_guess, "");
    }

    #[test]
    fn correct_guess_wins() {
        let mut s = session();
        for c in "fish".chars() {
            s.push_char(c);
        }
        let outcome = s.apply_verdict(
            "FISH".to_string(),
            verdict(
                true,
                vec![
                    fb('f', LetterStatus::Correct, 0),
                    fb('i', LetterStatus::Correct, 1),
                    fb('s', LetterStatus::Correct, 2),
                    fb('h', LetterStatus::Correct, 3),
                ],
            ),
        );
        assert_eq!(outcome, GuessOutcome::Won);
        assert_eq!(s.outcome, Outcome::Won);
        assert!(s.current_guess.is_empty());
        assert_eq!(s.attempts_used(), 1);
    }

    #[test]
    fn fifth_wrong_guess_loses() {
        let mut s = session();
        for n in 0..MAX_ATTEMPTS {
            let outcome = s.apply_verdict(
                "WORD".to_string(),
                verdict(false, vec![fb('w', LetterStatus::Absent, 0)]),
            );
            if n < MAX_ATTEMPTS - 1 {
                assert_eq!(outcome, GuessOutcome::Recorded);
                assert_eq!(s.outcome, Outcome::InProgress);
            } else {
                assert_eq!(outcome, GuessOutcome::Lost);
                assert_eq!(s.outcome, Outcome::Lost);
            }
        }
    }

    #[test]
    fn winning_on_the_last_attempt_is_a_win() {
        let mut s = session();
        for _ in 0..MAX_ATTEMPTS - 1 {
            s.apply_verdict(
                "WORD".to_string(),
                verdict(false, vec![fb('w', LetterStatus::Absent, 0)]),
            );
        }
        let outcome = s.apply_verdict(
            "FISH".to_string(),
            verdict(true, vec![fb('f', LetterStatus::Correct, 0)]),
        );
        assert_eq!(outcome, GuessOutcome::Won);
        assert_eq!(s.outcome, Outcome::Won);
    }

    #[test]
    fn wrong_length_guess_still_burns_an_attempt() {
        let mut s = session();
        for c in "fi".chars() {
            s.push_char(c);
        }
        let outcome = s.apply_verdict(
            "FI".to_string(),
            GuessResponse {
                is_correct: false,
                length_match: false,
                feedback: vec![
                    fb('f', LetterStatus::Correct, 0),
                    fb('i', LetterStatus::Correct, 1),
                ],
            },
        );
        assert_eq!(outcome, GuessOutcome::Recorded);
        assert!(s.current_guess.is_empty());
        assert_eq!(s.attempts_used(), 1);
        assert!(!s.guesses[0].length_match);
        assert_eq!(s.outcome, Outcome::InProgress);
    }

    #[test]
    fn mixed_feedback_on_the_first_attempt_keeps_the_round_live() {
        let mut s = session();
        for c in "fish".chars() {
            s.push_char(c);
        }
        let outcome = s.apply_verdict(
            "FISH".to_string(),
            verdict(
                false,
                vec![
                    fb('f', LetterStatus::Correct, 0),
                    fb('i', LetterStatus::Absent, 1),
                    fb('s', LetterStatus::Present, 2),
                    fb('h', LetterStatus::Correct, 3),
                ],
            ),
        );
        assert_eq!(outcome, GuessOutcome::Recorded);
        assert_eq!(s.outcome, Outcome::InProgress);
        assert_eq!(s.attempts_used(), 1);
    }

    #[test]
    fn failed_submission_preserves_the_guess() {
        let mut s = session();
        for c in "fish".chars() {
            s.push_char(c);
        }
        s.loading = true;
        s.submission_failed();
        assert!(!s.loading);
        assert_eq!(s.current_guess, "FISH");
        assert!(s.can_submit());
    }

    #[test]
    fn no_input_after_the_round_ends() {
        let mut s = session();
        s.apply_verdict(
            "FISH".to_string(),
            verdict(true, vec![fb('f', LetterStatus::Correct, 0)]),
        );
        s.push_char('x');
        assert!(s.current_guess.is_empty());
        assert!(!s.can_submit());
    }

    #[test]
    fn keyboard_prefers_correct_over_present_over_absent() {
        let mut s = session();
        s.apply_verdict(
            "SOAP".to_string(),
            verdict(
                false,
                vec![
                    fb('s', LetterStatus::Present, 0),
                    fb('o', LetterStatus::Absent, 1),
                ],
            ),
        );
        s.apply_verdict(
            "MAST".to_string(),
            verdict(
                false,
                vec![
                    fb('s', LetterStatus::Correct, 2),
                    fb('o', LetterStatus::Present, 1),
                ],
            ),
        );

        let statuses = s.keyboard_statuses();
        assert_eq!(statuses.get(&'s'), Some(&LetterStatus::Correct));
        assert_eq!(statuses.get(&'o'), Some(&LetterStatus::Present));
        assert_eq!(statuses.get(&'m'), None);
    }

    #[test]
    fn keyboard_never_downgrades_a_letter() {
        let mut s = session();
        s.apply_verdict(
            "FISH".to_string(),
            verdict(false, vec![fb('f', LetterStatus::Correct, 0)]),
        );
        // Same letter judged absent in a different position later.
        s.apply_verdict(
            "OFFS".to_string(),
            verdict(false, vec![fb('f', LetterStatus::Absent, 1)]),
        );
        assert_eq!(
            s.keyboard_statuses().get(&'f'),
            Some(&LetterStatus::Correct)
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = session();
        s.push_char('f');
        s.apply_verdict(
            "FISH".to_string(),
            verdict(true, vec![fb('f', LetterStatus::Correct, 0)]),
        );
        s.reset(Some(word(5)));
        assert!(s.guesses.is_empty());
        assert!(s.current_guess.is_empty());
        assert_eq!(s.outcome, Outcome::InProgress);
        assert_eq!(s.word_length(), 5);
    }

    #[test]
    fn phonetic_segments_split_and_uppercase() {
        let s = session();
        assert_eq!(s.phonetic_segments(), vec!["GH", "O", "TI"]);
    }

    #[test]
    fn share_text_reports_score_and_grid() {
        let mut s = session();
        s.apply_verdict(
            "SOAP".to_string(),
            verdict(
                false,
                vec![
                    fb('s', LetterStatus::Present, 0),
                    fb('o', LetterStatus::Absent, 1),
                ],
            ),
        );
        s.apply_verdict(
            "FISH".to_string(),
            verdict(
                true,
                vec![
                    fb('f', LetterStatus::Correct, 0),
                    fb('i', LetterStatus::Correct, 1),
                ],
            ),
        );
        let text = s.share_text();
        assert!(text.starts_with("Ghotidle 2/5\n"));
        assert!(text.contains("\u{1F7E8}\u{2B1B}"));
        assert!(text.ends_with("\u{1F7E9}\u{1F7E9}"));
    }

    #[test]
    fn share_text_shows_x_for_a_loss() {
        let mut s = session();
        for _ in 0..MAX_ATTEMPTS {
            s.apply_verdict(
                "WORD".to_string(),
                verdict(false, vec![fb('w', LetterStatus::Absent, 0)]),
            );
        }
        assert!(s.share_text().starts_with("Ghotidle X/5"));
    }
}
