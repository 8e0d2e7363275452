//! Core entity types for bacprep.
//!
//! These are the fundamental records the whole system works with: users,
//! curriculum content, progress tracking, practice tests, gamification, and
//! the AI chat transcript. All wire-facing types serialize with camelCase
//! field names to match the JSON API surface.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty rating used by topics, tests, and question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A registered account.
///
/// Passwords are stored and compared in plain text; this is an explicit
/// non-secure placeholder, never expose a `User` directly — serialize a
/// [`UserProfile`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The client-facing view of a user: everything except the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Payload for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
}

/// An exam subject (e.g. Romanian, Mathematics).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub total_topics: u32,
    pub icon: String,
}

/// A lesson topic within a subject, ordered by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: u32,
    pub subject_id: u32,
    pub name: String,
    pub description: String,
    /// Rich-text lesson body (HTML fragment).
    pub content: String,
    pub order: u32,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Per-user, per-subject completion record. At most one row exists per
/// (user, subject) pair; writes go through an upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub id: u32,
    pub user_id: u32,
    pub subject_id: u32,
    pub topics_completed: u32,
    pub percent_complete: u32,
    pub last_studied: DateTime<Utc>,
}

/// Upsert payload for [`UserProgress`]. Fields left `None` keep their
/// previous value on update (except `last_studied`, which defaults to now).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(default)]
    pub user_id: u32,
    pub subject_id: u32,
    #[serde(default)]
    pub topics_completed: Option<u32>,
    #[serde(default)]
    pub percent_complete: Option<u32>,
    #[serde(default)]
    pub last_studied: Option<DateTime<Utc>>,
}

/// One multiple-choice question inside a practice test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    pub question: String,
    /// Exactly four answer options.
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: u8,
    pub explanation: String,
}

/// A practice test belonging to a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: u32,
    pub name: String,
    pub subject_id: u32,
    pub description: String,
    pub questions: Vec<TestQuestion>,
    /// Time limit in minutes.
    pub time_limit: u32,
    pub difficulty: Difficulty,
}

/// How a student answered one question of a test attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_index: u32,
    pub selected_option: u8,
    pub correct: bool,
}

/// A completed test attempt. Immutable once saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTestResult {
    pub id: u32,
    pub user_id: u32,
    pub test_id: u32,
    pub score: u32,
    /// 0-100.
    pub percent_correct: u32,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<AnswerRecord>,
}

/// Payload for recording a test attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestResult {
    #[serde(default)]
    pub user_id: u32,
    pub test_id: u32,
    pub score: u32,
    pub percent_correct: u32,
    pub answers: Vec<AnswerRecord>,
}

/// A test result joined with the names of its test and subject at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultView {
    #[serde(flatten)]
    pub result: UserTestResult,
    pub test_name: String,
    pub subject_name: String,
}

/// An achievement definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Opaque key understood by whatever awards the badge.
    pub criteria: String,
}

/// A badge earned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBadge {
    pub id: u32,
    pub user_id: u32,
    pub badge_id: u32,
    pub earned_at: DateTime<Utc>,
}

/// A user's badge joined with its definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeAward {
    #[serde(flatten)]
    pub user_badge: UserBadge,
    pub badge: Badge,
}

/// One recorded study session. Multiple sessions on the same calendar day
/// each get their own entry; nothing is merged on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStreak {
    pub id: u32,
    pub user_id: u32,
    pub date: DateTime<Utc>,
    pub minutes_studied: u32,
}

/// Payload for recording a study session. The session date is always now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStreak {
    #[serde(default)]
    pub user_id: u32,
    #[serde(default)]
    pub minutes_studied: u32,
}

/// One entry of a user's daily study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanTask {
    pub id: u32,
    pub user_id: u32,
    pub title: String,
    pub description: String,
    /// Estimated duration in minutes.
    pub duration: u32,
    pub priority: bool,
    pub recommended: bool,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
}

/// Payload for adding a study-plan task. `completed` always starts false.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub user_id: u32,
    pub title: String,
    pub description: String,
    pub duration: u32,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// A single chat message, from either the student or the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub content: String,
    pub is_user: bool,
}

/// The full AI chat transcript for one user. At most one row per user; the
/// message list is replaced wholesale on every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub id: u32,
    pub user_id: u32,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for saving a chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatHistory {
    #[serde(default)]
    pub user_id: u32,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn user_profile_drops_password() {
        let user = User {
            id: 7,
            username: "maria".into(),
            password: "pw123".into(),
            display_name: "Maria Pop".into(),
            email: "maria@x.com".into(),
            created_at: Utc::now(),
        };
        let profile = UserProfile::from(user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"displayName\":\"Maria Pop\""));
    }

    #[test]
    fn result_view_flattens_fields() {
        let view = TestResultView {
            result: UserTestResult {
                id: 1,
                user_id: 1,
                test_id: 2,
                score: 17,
                percent_correct: 85,
                completed_at: Utc::now(),
                answers: vec![AnswerRecord {
                    question_index: 0,
                    selected_option: 0,
                    correct: true,
                }],
            },
            test_name: "Romanian Literature Quiz".into(),
            subject_name: "Romanian".into(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["percentCorrect"], 85);
        assert_eq!(value["testName"], "Romanian Literature Quiz");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn progress_update_defaults_optional_fields() {
        let update: ProgressUpdate =
            serde_json::from_str(r#"{"subjectId": 2, "topicsCompleted": 5}"#).unwrap();
        assert_eq!(update.subject_id, 2);
        assert_eq!(update.topics_completed, Some(5));
        assert_eq!(update.percent_complete, None);
        assert!(update.last_studied.is_none());
    }
}
