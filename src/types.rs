use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ID types for readability
pub type QuizId = String;
pub type TeamId = String;
pub type QuizNumber = u32;

/// Number of stations in the hunt
pub const TOTAL_QUIZZES: usize = 9;

/// Length of a generated team ID (`[A-Z0-9]{8}`)
pub const TEAM_ID_LENGTH: usize = 8;

/// Length of a team leader's mobile number (`[0-9]{10}`)
pub const MOBILE_LENGTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub id: QuizId,
    pub quiz_number: QuizNumber,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub puzzle_image_url: String,
    pub hint: String,
    pub next_qr_location: String,
    /// Empty for the first quiz, which never needs a passphrase
    pub unlock_password: String,
}

impl Quiz {
    /// Case-insensitive passphrase check. An empty configured passphrase
    /// accepts anything.
    pub fn passphrase_matches(&self, input: &str) -> bool {
        self.unlock_password.is_empty()
            || input.to_uppercase() == self.unlock_password.to_uppercase()
    }

    pub fn requires_passphrase(&self) -> bool {
        !self.unlock_password.is_empty()
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer
    }

    pub fn link(&self) -> String {
        format!("/quiz/{}", self.id)
    }
}

/// Sharable link to a quiz, printed as a QR code at a physical location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizLink {
    pub quiz_number: QuizNumber,
    pub id: QuizId,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub team_id: TeamId,
    pub team_leader_mobile: String,
    pub completed_quizzes: Vec<QuizNumber>,
    pub unlocked_quizzes: Vec<QuizNumber>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(team_id: TeamId, team_leader_mobile: String) -> Self {
        Self {
            team_id,
            team_leader_mobile,
            completed_quizzes: Vec::new(),
            unlocked_quizzes: vec![1],
            created_at: Utc::now(),
        }
    }

    pub fn has_completed(&self, quiz_number: QuizNumber) -> bool {
        self.completed_quizzes.contains(&quiz_number)
    }

    /// Quiz 1 reads as unlocked for every team, whether or not it was ever
    /// recorded through the unlock path.
    pub fn has_unlocked(&self, quiz_number: QuizNumber) -> bool {
        quiz_number == 1 || self.unlocked_quizzes.contains(&quiz_number)
    }

    pub fn last_completed(&self) -> QuizNumber {
        self.completed_quizzes.iter().copied().max().unwrap_or(0)
    }
}

/// Result of identifying a team by mobile number or team ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamValidation {
    pub valid: bool,
    pub team_id: TeamId,
}

impl TeamValidation {
    pub fn valid(team_id: TeamId) -> Self {
        Self {
            valid: true,
            team_id,
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            team_id: String::new(),
        }
    }
}

/// Per-team state of a single quiz: LOCKED -> UNLOCKED -> COMPLETED.
///
/// `AwaitingPassphrase` is a locked quiz that is next in sequence, i.e. the
/// one a team can unlock right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    Locked,
    AwaitingPassphrase,
    Unlocked,
    Completed,
}

/// Summary shown on the quiz start page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamProgress {
    pub team_id: TeamId,
    pub completed_count: usize,
    pub total_quizzes: usize,
    pub all_complete: bool,
    /// None once every quiz is completed
    pub next_quiz: Option<NextQuiz>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NextQuiz {
    pub quiz_number: QuizNumber,
    pub id: QuizId,
    pub link: String,
    pub status: QuizStatus,
    pub requires_passphrase: bool,
}

/// Reward handed out for a correct answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PuzzlePiece {
    pub quiz_number: QuizNumber,
    pub puzzle_image_url: String,
    pub hint: String,
    pub next_qr_location: String,
    /// False after the final quiz
    pub has_next_quiz: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerOutcome {
    pub quiz_number: QuizNumber,
    pub correct: bool,
    pub correct_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_piece: Option<PuzzlePiece>,
}

/// One row of the admin team table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSummary {
    pub team_id: TeamId,
    pub team_leader_mobile: String,
    pub completed_count: usize,
    pub completed_quizzes: Vec<QuizNumber>,
    pub created_at: DateTime<Utc>,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.team_id.clone(),
            team_leader_mobile: team.team_leader_mobile.clone(),
            completed_count: team.completed_quizzes.len(),
            completed_quizzes: team.completed_quizzes.clone(),
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminQuizLink {
    pub quiz_number: QuizNumber,
    pub id: QuizId,
    pub link: String,
    pub absolute_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminOverview {
    pub total_quizzes: usize,
    pub quiz_links: Vec<AdminQuizLink>,
    pub total_teams: usize,
    pub teams: Vec<TeamSummary>,
}

/// Check the team-ID format: exactly 8 characters of `[A-Z0-9]`
pub fn is_team_id_format(input: &str) -> bool {
    input.len() == TEAM_ID_LENGTH
        && input
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Check the mobile format: exactly 10 characters of `[0-9]`
pub fn is_mobile_format(input: &str) -> bool {
    input.len() == MOBILE_LENGTH && input.bytes().all(|b| b.is_ascii_digit())
}
