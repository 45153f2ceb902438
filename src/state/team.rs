use super::AppState;
use crate::types::*;

/// Candidate IDs tried before giving up on creating a team
pub const MAX_TEAM_ID_ATTEMPTS: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("No unused team ID after {0} attempts")]
    TeamIdExhausted(usize),
}

/// The quiz a team should attempt next: one past the highest completed
/// quiz, or 1 when nothing is completed yet.
pub fn next_quiz_number(completed: &[QuizNumber]) -> QuizNumber {
    completed
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

impl AppState {
    /// Identify a team by team ID or by the leader's mobile number.
    ///
    /// An unknown but well-formed mobile number creates a new team. Anything
    /// that is neither format is reported as invalid without touching the store.
    pub async fn validate_team(&self, input: &str) -> Result<TeamValidation, StoreError> {
        if is_team_id_format(input) {
            let teams = self.teams.read().await;
            return Ok(if teams.contains_key(input) {
                TeamValidation::valid(input.to_string())
            } else {
                TeamValidation::invalid()
            });
        }

        if is_mobile_format(input) {
            let mut teams = self.teams.write().await;

            if let Some(team) = teams.values().find(|t| t.team_leader_mobile == input) {
                return Ok(TeamValidation::valid(team.team_id.clone()));
            }

            // Generate a unique team ID (re-roll on collision)
            let mut attempts = 0;
            let team_id = loop {
                if attempts == MAX_TEAM_ID_ATTEMPTS {
                    tracing::error!("Gave up generating a team ID after {} attempts", attempts);
                    return Err(StoreError::TeamIdExhausted(attempts));
                }
                attempts += 1;

                let candidate = self.id_generator.next_id();
                if !is_team_id_format(&candidate) {
                    tracing::warn!("Discarding malformed generated team ID {:?}", candidate);
                    continue;
                }
                if !teams.contains_key(&candidate) {
                    break candidate;
                }
            };

            let team = Team::new(team_id.clone(), input.to_string());
            teams.insert(team_id.clone(), team);
            tracing::info!("Created team {} ({} teams total)", team_id, teams.len());

            return Ok(TeamValidation::valid(team_id));
        }

        Ok(TeamValidation::invalid())
    }

    pub async fn get_team_data(&self, team_id: &str) -> Option<Team> {
        self.teams.read().await.get(team_id).cloned()
    }

    /// Record a correct answer. Idempotent; unknown teams are ignored.
    pub async fn mark_quiz_complete(&self, team_id: &str, quiz_number: QuizNumber) {
        let mut teams = self.teams.write().await;
        if let Some(team) = teams.get_mut(team_id) {
            if !team.completed_quizzes.contains(&quiz_number) {
                team.completed_quizzes.push(quiz_number);
                tracing::info!("Team {} completed quiz {}", team_id, quiz_number);
            }
        }
    }

    /// Record a successful passphrase. Idempotent; unknown teams are ignored.
    pub async fn unlock_quiz(&self, team_id: &str, quiz_number: QuizNumber) {
        let mut teams = self.teams.write().await;
        if let Some(team) = teams.get_mut(team_id) {
            if !team.unlocked_quizzes.contains(&quiz_number) {
                team.unlocked_quizzes.push(quiz_number);
                tracing::info!("Team {} unlocked quiz {}", team_id, quiz_number);
            }
        }
    }

    pub async fn is_quiz_unlocked(&self, team_id: &str, quiz_number: QuizNumber) -> bool {
        self.teams
            .read()
            .await
            .get(team_id)
            .is_some_and(|t| t.has_unlocked(quiz_number))
    }

    pub async fn is_quiz_completed(&self, team_id: &str, quiz_number: QuizNumber) -> bool {
        self.teams
            .read()
            .await
            .get(team_id)
            .is_some_and(|t| t.has_completed(quiz_number))
    }

    /// Snapshot of every team in creation order (admin view)
    pub async fn get_all_teams(&self) -> Vec<Team> {
        self.teams.read().await.values().cloned().collect()
    }

    /// True when `quiz_number` is exactly the next quiz in sequence and not yet
    /// completed, i.e. the one waiting for a passphrase.
    pub async fn is_partially_locked(&self, team_id: &str, quiz_number: QuizNumber) -> bool {
        self.teams
            .read()
            .await
            .get(team_id)
            .is_some_and(|t| is_partially_locked(t, quiz_number))
    }

    pub async fn quiz_status(&self, team_id: &str, quiz_number: QuizNumber) -> Option<QuizStatus> {
        self.teams
            .read()
            .await
            .get(team_id)
            .map(|t| quiz_status(t, quiz_number))
    }
}

pub(super) fn is_partially_locked(team: &Team, quiz_number: QuizNumber) -> bool {
    quiz_number == next_quiz_number(&team.completed_quizzes) && !team.has_completed(quiz_number)
}

pub(super) fn quiz_status(team: &Team, quiz_number: QuizNumber) -> QuizStatus {
    if team.has_completed(quiz_number) {
        QuizStatus::Completed
    } else if team.has_unlocked(quiz_number) {
        QuizStatus::Unlocked
    } else if is_partially_locked(team, quiz_number) {
        QuizStatus::AwaitingPassphrase
    } else {
        QuizStatus::Locked
    }
}
