//! Curation logic for the admin surfaces: new word submission with
//! per-sound pattern selection, and standalone pattern creation.
//!
//! The selection rules live here, away from the widgets, because they carry
//! the one real invariant of the flow: for each sound, checked patterns and
//! "keep as-is" are mutually exclusive, and a word cannot be submitted until
//! every sound has one or the other.

use crate::api::{NewPattern, NewWord, SoundSuggestion};

pub const SECRET_MAX: usize = 50;
pub const PHONETIC_MAX: usize = 50;
pub const SOUNDS_MAX: usize = 100;
pub const PATTERN_LETTERS_MAX: usize = 10;
pub const PATTERN_SOUND_MAX: usize = 10;
pub const PATTERN_REFERENCE_MAX: usize = 50;

/// Split the hyphen-separated sound sequence ("f-i-sh") into its parts,
/// ignoring stray hyphens and whitespace.
pub fn split_sounds(input: &str) -> Vec<String> {
    input
        .split('-')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn validate_word_form(secret: &str, phonetic: &str, sounds: &str) -> Result<Vec<String>, String> {
    if secret.trim().is_empty() || phonetic.trim().is_empty() || sounds.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    let parsed = split_sounds(sounds);
    if parsed.is_empty() {
        return Err("Enter sounds separated by hyphens".to_string());
    }
    Ok(parsed)
}

pub fn validate_pattern_form(letters: &str, sound: &str, reference: &str) -> Result<(), String> {
    if letters.trim().is_empty() || sound.trim().is_empty() || reference.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    Ok(())
}

/// Suggested patterns for one sound sequence, plus what the curator has
/// checked for each sound so far. A sound may carry several patterns at
/// once; "keep as-is" is the only exclusive choice.
#[derive(Debug, Default)]
pub struct SuggestionBoard {
    pub suggestions: Vec<SoundSuggestion>,
    selected: Vec<Vec<i64>>,
    no_change: Vec<bool>,
}

impl SuggestionBoard {
    pub fn new(suggestions: Vec<SoundSuggestion>) -> Self {
        let n = suggestions.len();
        Self {
            suggestions,
            selected: vec![Vec::new(); n],
            no_change: vec![false; n],
        }
    }

    /// Check or uncheck a pattern for one sound. Checking clears that
    /// sound's keep-as-is mark; unchecking leaves the mark alone.
    pub fn toggle_pattern(&mut self, sound_idx: usize, pattern_id: i64) {
        let Some(picks) = self.selected.get_mut(sound_idx) else {
            return;
        };
        if let Some(pos) = picks.iter().position(|&id| id == pattern_id) {
            picks.remove(pos);
        } else {
            picks.push(pattern_id);
            self.no_change[sound_idx] = false;
        }
    }

    /// Toggle "keep as-is" for one sound; marking it clears every selected
    /// pattern for that sound.
    pub fn toggle_no_change(&mut self, sound_idx: usize) {
        if sound_idx >= self.no_change.len() {
            return;
        }
        self.no_change[sound_idx] = !self.no_change[sound_idx];
        if self.no_change[sound_idx] {
            self.selected[sound_idx].clear();
        }
    }

    pub fn is_selected(&self, sound_idx: usize, pattern_id: i64) -> bool {
        self.selected
            .get(sound_idx)
            .is_some_and(|picks| picks.contains(&pattern_id))
    }

    pub fn is_no_change(&self, sound_idx: usize) -> bool {
        self.no_change.get(sound_idx).copied().unwrap_or(false)
    }

    /// Every sound needs at least one checked pattern or the keep-as-is
    /// mark before the word can go out.
    pub fn is_complete(&self) -> bool {
        (0..self.suggestions.len()).all(|i| self.no_change[i] || !self.selected[i].is_empty())
    }

    /// All checked pattern ids in sound order, deduplicated in case the
    /// same pattern shows up under more than one sound.
    pub fn pattern_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for picks in &self.selected {
            for &id in picks {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub fn no_change_indexes(&self) -> Vec<usize> {
        self.no_change
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }

    pub fn build_word(&self, secret: &str, phonetic: &str, sounds: &str) -> NewWord {
        NewWord {
            secret: secret.trim().to_string(),
            phonetic: phonetic.trim().to_string(),
            sounds: sounds.trim().to_string(),
            pattern_ids: self.pattern_ids(),
            no_change_sounds: self.no_change_indexes(),
        }
    }
}

pub fn build_pattern(letters: &str, sound: &str, reference: &str) -> NewPattern {
    NewPattern {
        letters: letters.trim().to_string(),
        sound: sound.trim().to_string(),
        reference: reference.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PatternChoice;

    fn choice(id: i64, letters: &str) -> PatternChoice {
        PatternChoice {
            id,
            letters: letters.to_string(),
            sound: "f".to_string(),
            reference: "enough".to_string(),
        }
    }

    fn board() -> SuggestionBoard {
        SuggestionBoard::new(vec![
            SoundSuggestion {
                sound: "f".to_string(),
                patterns: vec![choice(1, "gh"), choice(2, "ph")],
            },
            SoundSuggestion {
                sound: "i".to_string(),
                patterns: vec![choice(3, "o")],
            },
            SoundSuggestion {
                sound: "sh".to_string(),
                patterns: Vec::new(),
            },
        ])
    }

    #[test]
    fn split_sounds_trims_and_drops_empties() {
        assert_eq!(split_sounds("f-i-sh"), vec!["f", "i", "sh"]);
        assert_eq!(split_sounds(" f - i "), vec!["f", "i"]);
        assert_eq!(split_sounds("f--i"), vec!["f", "i"]);
        assert!(split_sounds("---").is_empty());
    }

    #[test]
    fn word_form_requires_every_field() {
        assert_eq!(
            validate_word_form("", "ghoti", "f-i-sh").unwrap_err(),
            "Please fill in all fields"
        );
        assert_eq!(
            validate_word_form("fish", "ghoti", "---").unwrap_err(),
            "Enter sounds separated by hyphens"
        );
        assert_eq!(
            validate_word_form("fish", "ghoti", "f-i-sh").unwrap(),
            vec!["f", "i", "sh"]
        );
    }

    #[test]
    fn pattern_form_requires_every_field() {
        assert!(validate_pattern_form("ti", "sh", "nation").is_ok());
        assert!(validate_pattern_form("ti", "", "nation").is_err());
    }

    #[test]
    fn checking_a_pattern_clears_keep_as_is() {
        let mut b = board();
        b.toggle_no_change(0);
        assert!(b.is_no_change(0));
        b.toggle_pattern(0, 1);
        assert!(!b.is_no_change(0));
        assert!(b.is_selected(0, 1));
    }

    #[test]
    fn keep_as_is_clears_every_checked_pattern() {
        let mut b = board();
        b.toggle_pattern(0, 1);
        b.toggle_pattern(0, 2);
        b.toggle_no_change(0);
        assert!(b.is_no_change(0));
        assert!(!b.is_selected(0, 1));
        assert!(!b.is_selected(0, 2));
        assert!(b.pattern_ids().is_empty());
    }

    #[test]
    fn a_sound_can_carry_several_patterns() {
        let mut b = board();
        b.toggle_pattern(0, 1);
        b.toggle_pattern(0, 2);
        assert!(b.is_selected(0, 1));
        assert!(b.is_selected(0, 2));
        assert_eq!(b.pattern_ids(), vec![1, 2]);
    }

    #[test]
    fn unchecking_leaves_keep_as_is_alone() {
        let mut b = board();
        b.toggle_pattern(0, 1);
        b.toggle_pattern(0, 1);
        assert!(!b.is_selected(0, 1));
        assert!(!b.is_no_change(0));
    }

    #[test]
    fn completeness_requires_every_sound_covered() {
        let mut b = board();
        assert!(!b.is_complete());
        b.toggle_pattern(0, 1);
        b.toggle_pattern(1, 3);
        assert!(!b.is_complete());
        // The third sound has no suggestions, so only keep-as-is covers it.
        b.toggle_no_change(2);
        assert!(b.is_complete());
    }

    #[test]
    fn payload_carries_selections_and_keep_as_is_indexes() {
        let mut b = board();
        b.toggle_pattern(0, 2);
        b.toggle_no_change(1);
        b.toggle_no_change(2);
        let word = b.build_word(" fish ", "ghoti", "f-i-sh");
        assert_eq!(word.secret, "fish");
        assert_eq!(word.pattern_ids, vec![2]);
        assert_eq!(word.no_change_sounds, vec![1, 2]);
        assert_eq!(word.sounds, "f-i-sh");
    }
}
