//! HTTP client for the Ghotidle backend.
//!
//! The backend owns all game logic (word selection, guess feedback,
//! accounts, leaderboard); this module is the typed surface the client
//! calls. Session identity rides on a cookie, so the underlying reqwest
//! client is built with its cookie store enabled and shared for the whole
//! run.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Text suitable for a toast. Backend-provided messages are shown
    /// verbatim; transport failures collapse to one generic line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Cannot connect to the server".to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::InvalidResponse(_) => "Unexpected response from the server".to_string(),
        }
    }
}

/// Per-letter verdict for one position of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Correct,
    Present,
    Absent,
}

impl LetterStatus {
    /// Merge priority for the keyboard map: correct beats present beats
    /// absent, and a letter never downgrades.
    pub fn rank(self) -> u8 {
        match self {
            LetterStatus::Correct => 2,
            LetterStatus::Present => 1,
            LetterStatus::Absent => 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LetterFeedback {
    pub letter: char,
    pub status: LetterStatus,
    pub position: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuessResponse {
    pub is_correct: bool,
    pub length_match: bool,
    pub feedback: Vec<LetterFeedback>,
}

/// The day's puzzle. `word` and the pattern breakdown are only revealed to
/// the player after the game ends.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyWord {
    /// Comma-separated phonetic components, e.g. "gh,o,ti".
    pub phonetic_spelling: String,
    pub word: String,
    pub length: usize,
    #[serde(default)]
    pub phonetic_patterns: Vec<PhoneticPattern>,
}

/// Letter-combination-to-sound mapping shown in the game-over breakdown.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneticPattern {
    pub letters: String,
    pub sound: String,
    pub reference: String,
}

/// A selectable pattern suggestion (admin flow); carries the backend id.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternChoice {
    pub id: i64,
    pub letters: String,
    pub sound: String,
    pub reference: String,
}

/// All candidate patterns the backend found for one sound of the sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundSuggestion {
    pub sound: String,
    #[serde(default)]
    pub patterns: Vec<PatternChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub correct: u32,
    pub wrong: u32,
    pub streak: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub top_5: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub current_user: Option<LeaderboardEntry>,
}

/// Payload for creating a curated word (admin).
#[derive(Debug, Clone, Serialize)]
pub struct NewWord {
    pub secret: String,
    pub phonetic: String,
    pub sounds: String,
    pub pattern_ids: Vec<i64>,
    /// Indexes into the hyphen-split sound sequence marked "keep as-is".
    pub no_change_sounds: Vec<usize>,
}

/// Payload for creating a reusable phonetic pattern (admin).
#[derive(Debug, Clone, Serialize)]
pub struct NewPattern {
    pub letters: String,
    pub sound: String,
    pub reference: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<SoundSuggestion>,
}

#[derive(Debug, Deserialize)]
struct RandomWordResponse {
    word: String,
}

/// Pull the display message out of a failed response body.
///
/// The backend sends `{"error": "..."}` on rejections; anything else falls
/// back to a status line so the toast is never empty.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.is_empty() {
            return parsed.error;
        }
    }
    format!("Request failed ({})", status)
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Like `handle` but for endpoints whose success body we don't need.
    async fn handle_empty(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    async fn post_expect_ok<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle_empty(response).await
    }

    // -- game ---------------------------------------------------------------

    pub async fn daily_word(&self) -> Result<DailyWord, ApiError> {
        self.get_json("/api/word/").await
    }

    pub async fn validate_guess(&self, guess: &str) -> Result<GuessResponse, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            guess: &'a str,
        }
        self.post_json("/api/validate/", &Body { guess }).await
    }

    // -- auth ---------------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            password: &'a str,
        }
        self.post_expect_ok("/api/auth/login/", &Body { username, password })
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            email: &'a str,
            password: &'a str,
        }
        self.post_expect_ok(
            "/api/auth/register/",
            &Body {
                username,
                email,
                password,
            },
        )
        .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_expect_ok("/api/auth/logout/", &serde_json::json!({}))
            .await
    }

    /// Fetch the signed-in user, if any. An auth rejection means "nobody is
    /// signed in" rather than a failure, so it maps to `Ok(None)`.
    pub async fn me(&self) -> Result<Option<CurrentUser>, ApiError> {
        debug!("GET /api/auth/me/");
        let response = self
            .client
            .get(self.url("/api/auth/me/"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        let user = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(Some(user))
    }

    pub async fn change_email(&self, new_email: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            new_email: &'a str,
        }
        self.post_expect_ok("/api/auth/change-email/", &Body { new_email })
            .await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            current_password: &'a str,
            new_password: &'a str,
        }
        self.post_expect_ok(
            "/api/auth/change-password/",
            &Body {
                current_password,
                new_password,
            },
        )
        .await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }
        self.post_expect_ok("/api/auth/password-reset/request/", &Body { email })
            .await
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        uid: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
            uid: &'a str,
            new_password: &'a str,
        }
        self.post_expect_ok(
            "/api/auth/password-reset/confirm/",
            &Body {
                token,
                uid,
                new_password,
            },
        )
        .await
    }

    // -- leaderboard --------------------------------------------------------

    pub async fn leaderboard(&self) -> Result<Leaderboard, ApiError> {
        self.get_json("/api/leaderboard/").await
    }

    // -- admin --------------------------------------------------------------

    pub async fn create_word(&self, word: &NewWord) -> Result<(), ApiError> {
        self.post_expect_ok("/api/words/", word).await
    }

    pub async fn create_pattern(&self, pattern: &NewPattern) -> Result<(), ApiError> {
        self.post_expect_ok("/api/phonetic-patterns/", pattern).await
    }

    pub async fn suggest_patterns(
        &self,
        sounds: &[String],
    ) -> Result<Vec<SoundSuggestion>, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            sounds: &'a [String],
        }
        let response: SuggestResponse = self
            .post_json("/api/phonetic-patterns/suggest/", &Body { sounds })
            .await?;
        Ok(response.suggestions)
    }

    pub async fn random_word(&self) -> Result<String, ApiError> {
        let response: RandomWordResponse = self.get_json("/api/words/random/").await?;
        Ok(response.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_deserializes_from_backend_shape() {
        let json = r#"{
            "is_correct": false,
            "length_match": true,
            "feedback": [
                {"letter": "f", "status": "correct", "position": 0},
                {"letter": "o", "status": "absent", "position": 1},
                {"letter": "s", "status": "present", "position": 2}
            ]
        }"#;

        let response: GuessResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_correct);
        assert!(response.length_match);
        assert_eq!(response.feedback.len(), 3);
        assert_eq!(response.feedback[0].letter, 'f');
        assert_eq!(response.feedback[0].status, LetterStatus::Correct);
        assert_eq!(response.feedback[2].status, LetterStatus::Present);
        assert_eq!(response.feedback[2].position, 2);
    }

    #[test]
    fn daily_word_tolerates_missing_patterns() {
        let json = r#"{"phonetic_spelling": "gh,o,ti", "word": "fish", "length": 4}"#;
        let word: DailyWord = serde_json::from_str(json).unwrap();
        assert_eq!(word.phonetic_spelling, "gh,o,ti");
        assert_eq!(word.length, 4);
        assert!(word.phonetic_patterns.is_empty());
    }

    #[test]
    fn error_message_prefers_backend_text() {
        assert_eq!(
            error_message(400, r#"{"error": "Invalid guess"}"#),
            "Invalid guess"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "Request failed (502)");
        assert_eq!(error_message(400, r#"{"error": ""}"#), "Request failed (400)");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.url("/api/word/"), "http://localhost:8000/api/word/");
    }

    #[test]
    fn status_rank_orders_correct_over_present_over_absent() {
        assert!(LetterStatus::Correct.rank() > LetterStatus::Present.rank());
        assert!(LetterStatus::Present.rank() > LetterStatus::Absent.rank());
    }

    #[test]
    fn leaderboard_handles_anonymous_user() {
        let json = r#"{"top_5": [{"rank": 1, "username": "ada", "correct": 9, "wrong": 1, "streak": 4}], "current_user": null}"#;
        let board: Leaderboard = serde_json::from_str(json).unwrap();
        assert_eq!(board.top_5.len(), 1);
        assert!(board.current_user.is_none());
        assert_eq!(board.top_5[0].streak, 4);
    }
}
