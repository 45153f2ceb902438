//! Unlock and answer flows
//!
//! These sit on top of the raw store operations and enforce the per-team quiz
//! sequence: a passphrase only unlocks the next quiz in line, and a quiz must be
//! unlocked before its answer counts. Each flow holds the write lock for its
//! whole check-then-record step.

use super::team::{is_partially_locked, next_quiz_number, quiz_status};
use super::AppState;
use crate::types::*;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProgressError {
    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Unknown quiz: {0}")]
    UnknownQuiz(String),

    #[error("Quiz {0} is not the next quiz in sequence")]
    NotNextQuiz(QuizNumber),

    #[error("Incorrect passphrase. Try again!")]
    IncorrectPassphrase,

    #[error("Quiz {0} is still locked")]
    QuizLocked(QuizNumber),

    #[error("Quiz {0} is already completed")]
    AlreadyCompleted(QuizNumber),

    #[error("Answer {index} is not one of the {options} options")]
    InvalidAnswer { index: usize, options: usize },
}

impl ProgressError {
    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            ProgressError::UnknownTeam(_) => "UNKNOWN_TEAM",
            ProgressError::UnknownQuiz(_) => "UNKNOWN_QUIZ",
            ProgressError::NotNextQuiz(_) => "NOT_NEXT_QUIZ",
            ProgressError::IncorrectPassphrase => "INCORRECT_PASSPHRASE",
            ProgressError::QuizLocked(_) => "QUIZ_LOCKED",
            ProgressError::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            ProgressError::InvalidAnswer { .. } => "INVALID_ANSWER",
        }
    }
}

impl AppState {
    /// Try to unlock `quiz_number` for a team with a passphrase.
    ///
    /// Already-unlocked quizzes succeed without checking the passphrase. A wrong
    /// passphrase records nothing.
    pub async fn attempt_unlock(
        &self,
        team_id: &str,
        quiz_number: QuizNumber,
        passphrase: &str,
    ) -> Result<QuizStatus, ProgressError> {
        let quiz = self
            .catalog
            .get_quiz_by_number(quiz_number)
            .ok_or_else(|| ProgressError::UnknownQuiz(quiz_number.to_string()))?;

        let mut teams = self.teams.write().await;
        let team = teams
            .get_mut(team_id)
            .ok_or_else(|| ProgressError::UnknownTeam(team_id.to_string()))?;

        if team.has_unlocked(quiz_number) || team.has_completed(quiz_number) {
            return Ok(quiz_status(team, quiz_number));
        }

        if !is_partially_locked(team, quiz_number) {
            return Err(ProgressError::NotNextQuiz(quiz_number));
        }

        if !quiz.passphrase_matches(passphrase) {
            tracing::warn!(
                "Team {} entered an incorrect passphrase for quiz {}",
                team_id,
                quiz_number
            );
            return Err(ProgressError::IncorrectPassphrase);
        }

        team.unlocked_quizzes.push(quiz_number);
        tracing::info!("Team {} unlocked quiz {}", team_id, quiz_number);
        Ok(quiz_status(team, quiz_number))
    }

    /// Check a team's answer to the quiz behind `quiz_id`.
    ///
    /// A wrong answer is a normal outcome (`correct == false`) and reveals the
    /// right option; a correct one completes the quiz and hands out its
    /// puzzle piece.
    pub async fn submit_answer(
        &self,
        team_id: &str,
        quiz_id: &str,
        answer_index: usize,
    ) -> Result<AnswerOutcome, ProgressError> {
        let quiz = self
            .catalog
            .get_quiz_by_id(quiz_id)
            .ok_or_else(|| ProgressError::UnknownQuiz(quiz_id.to_string()))?;

        let mut teams = self.teams.write().await;
        let team = teams
            .get_mut(team_id)
            .ok_or_else(|| ProgressError::UnknownTeam(team_id.to_string()))?;

        if team.has_completed(quiz.quiz_number) {
            return Err(ProgressError::AlreadyCompleted(quiz.quiz_number));
        }
        if !team.has_unlocked(quiz.quiz_number) {
            return Err(ProgressError::QuizLocked(quiz.quiz_number));
        }
        if answer_index >= quiz.options.len() {
            return Err(ProgressError::InvalidAnswer {
                index: answer_index,
                options: quiz.options.len(),
            });
        }

        let correct = quiz.is_correct(answer_index);
        let puzzle_piece = if correct {
            team.completed_quizzes.push(quiz.quiz_number);
            tracing::info!(
                "Team {} completed quiz {} ({}/{})",
                team_id,
                quiz.quiz_number,
                team.completed_quizzes.len(),
                self.catalog.len()
            );
            Some(PuzzlePiece {
                quiz_number: quiz.quiz_number,
                puzzle_image_url: quiz.puzzle_image_url.clone(),
                hint: quiz.hint.clone(),
                next_qr_location: quiz.next_qr_location.clone(),
                has_next_quiz: (quiz.quiz_number as usize) < self.catalog.len(),
            })
        } else {
            tracing::debug!(
                "Team {} answered quiz {} incorrectly",
                team_id,
                quiz.quiz_number
            );
            None
        };

        Ok(AnswerOutcome {
            quiz_number: quiz.quiz_number,
            correct,
            correct_option: quiz.options[quiz.correct_answer].clone(),
            puzzle_piece,
        })
    }

    /// Dashboard summary for a team: how far along it is and what to do next
    pub async fn team_progress(&self, team_id: &str) -> Result<TeamProgress, ProgressError> {
        let teams = self.teams.read().await;
        let team = teams
            .get(team_id)
            .ok_or_else(|| ProgressError::UnknownTeam(team_id.to_string()))?;

        let total_quizzes = self.catalog.len();
        let completed_count = team.completed_quizzes.len();
        let next_quiz = self
            .catalog
            .get_quiz_by_number(next_quiz_number(&team.completed_quizzes))
            .map(|quiz| NextQuiz {
                quiz_number: quiz.quiz_number,
                id: quiz.id.clone(),
                link: quiz.link(),
                status: quiz_status(team, quiz.quiz_number),
                requires_passphrase: quiz.requires_passphrase(),
            });

        Ok(TeamProgress {
            team_id: team.team_id.clone(),
            completed_count,
            total_quizzes,
            all_complete: completed_count >= total_quizzes,
            next_quiz,
        })
    }

    /// Everything the admin page shows: printable quiz links and team progress
    pub async fn admin_overview(&self) -> AdminOverview {
        let quiz_links: Vec<AdminQuizLink> = self
            .catalog
            .get_all_quiz_links()
            .into_iter()
            .map(|link| AdminQuizLink {
                absolute_link: format!("{}{}", self.public_url, link.link),
                quiz_number: link.quiz_number,
                id: link.id,
                link: link.link,
            })
            .collect();

        let teams: Vec<TeamSummary> = self
            .teams
            .read()
            .await
            .values()
            .map(TeamSummary::from)
            .collect();

        AdminOverview {
            total_quizzes: self.catalog.len(),
            quiz_links,
            total_teams: teams.len(),
            teams,
        }
    }
}
