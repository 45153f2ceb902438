mod progress;
mod team;

pub use progress::ProgressError;
pub use team::{next_quiz_number, StoreError, MAX_TEAM_ID_ATTEMPTS};

use crate::catalog::Catalog;
use crate::id::{RandomTeamIdGenerator, TeamIdGenerator};
use crate::types::*;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Public origin used when no base URL is configured
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Shared application state.
///
/// Built once at startup and handed to the router; tests build their own.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Teams keyed by team ID, in creation order
    pub teams: Arc<RwLock<IndexMap<TeamId, Team>>>,
    id_generator: Arc<dyn TeamIdGenerator>,
    /// Origin prepended to quiz links on the admin page
    pub public_url: String,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_generator(catalog, Arc::new(RandomTeamIdGenerator))
    }

    pub fn with_generator(catalog: Catalog, id_generator: Arc<dyn TeamIdGenerator>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            teams: Arc::new(RwLock::new(IndexMap::new())),
            id_generator,
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }

    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ScriptedTeamIdGenerator;

    fn state_with_ids(ids: &[&str]) -> AppState {
        AppState::with_generator(
            Catalog::orientation().unwrap(),
            Arc::new(ScriptedTeamIdGenerator::new(ids.iter().copied())),
        )
    }

    #[tokio::test]
    async fn test_validate_creates_team_for_new_mobile() {
        let state = state_with_ids(&["TEAM0001"]);
        let result = state.validate_team("1234567890").await.unwrap();

        assert_eq!(result, TeamValidation::valid("TEAM0001".to_string()));
        let team = state.get_team_data("TEAM0001").await.unwrap();
        assert_eq!(team.team_leader_mobile, "1234567890");
        assert_eq!(team.unlocked_quizzes, vec![1]);
        assert!(team.completed_quizzes.is_empty());
    }

    #[tokio::test]
    async fn test_validate_same_mobile_is_idempotent() {
        let state = state_with_ids(&["TEAM0001", "TEAM0002"]);
        let first = state.validate_team("1234567890").await.unwrap();
        let second = state.validate_team("1234567890").await.unwrap();

        assert!(second.valid);
        assert_eq!(first.team_id, second.team_id);
        assert_eq!(state.get_all_teams().await.len(), 1);
    }

    #[tokio::test]
    async fn test_validate_by_team_id() {
        let state = state_with_ids(&["TEAM0001"]);
        state.validate_team("1234567890").await.unwrap();

        let result = state.validate_team("TEAM0001").await.unwrap();
        assert_eq!(result, TeamValidation::valid("TEAM0001".to_string()));
    }

    #[tokio::test]
    async fn test_validate_unknown_team_id_is_invalid() {
        let state = state_with_ids(&[]);
        let result = state.validate_team("ABCDEFGH").await.unwrap();
        assert_eq!(result, TeamValidation::invalid());
        assert!(state.get_all_teams().await.is_empty());
    }

    #[tokio::test]
    async fn test_validate_malformed_input_is_invalid() {
        let state = state_with_ids(&[]);
        for input in [
            "12345678AB",
            "",
            "abcdefgh",
            "123456789",
            "12345678901",
            " 1234567890",
        ] {
            let result = state.validate_team(input).await.unwrap();
            assert!(!result.valid, "{:?} should be invalid", input);
            assert!(result.team_id.is_empty());
        }
        assert!(state.get_all_teams().await.is_empty());
    }

    #[tokio::test]
    async fn test_generated_id_collision_rerolls() {
        let state = state_with_ids(&["TEAM0001", "TEAM0001", "TEAM0002"]);
        let first = state.validate_team("1111111111").await.unwrap();
        let second = state.validate_team("2222222222").await.unwrap();

        assert_eq!(first.team_id, "TEAM0001");
        assert_eq!(second.team_id, "TEAM0002");
        // The first team was not overwritten
        let team = state.get_team_data("TEAM0001").await.unwrap();
        assert_eq!(team.team_leader_mobile, "1111111111");
    }

    #[tokio::test]
    async fn test_malformed_generated_id_rerolls() {
        let state = state_with_ids(&["lower123", "SHORT", "TEAM0003"]);
        let result = state.validate_team("1111111111").await.unwrap();
        assert_eq!(result.team_id, "TEAM0003");
    }

    struct StuckGenerator;

    impl TeamIdGenerator for StuckGenerator {
        fn next_id(&self) -> String {
            "STUCK000".to_string()
        }
    }

    #[tokio::test]
    async fn test_generator_exhaustion_is_an_error() {
        let state =
            AppState::with_generator(Catalog::orientation().unwrap(), Arc::new(StuckGenerator));
        state.validate_team("1111111111").await.unwrap();

        let result = state.validate_team("2222222222").await;
        assert_eq!(result, Err(StoreError::TeamIdExhausted(MAX_TEAM_ID_ATTEMPTS)));
        assert_eq!(state.get_all_teams().await.len(), 1);
    }

    #[tokio::test]
    async fn test_first_quiz_unlocked_for_new_team() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        assert!(state.is_quiz_unlocked(&team_id, 1).await);
        assert!(!state.is_quiz_unlocked(&team_id, 2).await);
    }

    #[tokio::test]
    async fn test_mark_quiz_complete_is_idempotent() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        state.mark_quiz_complete(&team_id, 1).await;
        state.mark_quiz_complete(&team_id, 1).await;

        let team = state.get_team_data(&team_id).await.unwrap();
        assert_eq!(team.completed_quizzes, vec![1]);
        assert!(state.is_quiz_completed(&team_id, 1).await);
        assert!(!state.is_quiz_completed(&team_id, 2).await);
    }

    #[tokio::test]
    async fn test_unlock_quiz_is_idempotent() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        state.unlock_quiz(&team_id, 2).await;
        state.unlock_quiz(&team_id, 2).await;

        assert!(state.is_quiz_unlocked(&team_id, 2).await);
        let team = state.get_team_data(&team_id).await.unwrap();
        assert_eq!(team.unlocked_quizzes, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_team_is_noop() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;
        let before = state.get_all_teams().await;

        state.mark_quiz_complete("NOSUCHID", 1).await;
        state.unlock_quiz("NOSUCHID", 2).await;

        assert_eq!(state.get_all_teams().await, before);
        assert!(state.get_team_data("NOSUCHID").await.is_none());
        assert!(!state.is_quiz_unlocked("NOSUCHID", 1).await);
        assert!(!state.is_quiz_completed("NOSUCHID", 1).await);
        assert!(!state.is_partially_locked("NOSUCHID", 1).await);
        assert!(state.quiz_status("NOSUCHID", 1).await.is_none());
        assert!(state.get_team_data(&team_id).await.is_some());
    }

    #[tokio::test]
    async fn test_completion_does_not_require_unlock_record() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        state.mark_quiz_complete(&team_id, 3).await;
        assert!(state.is_quiz_completed(&team_id, 3).await);
        assert!(!state.is_quiz_unlocked(&team_id, 3).await);
    }

    #[tokio::test]
    async fn test_get_all_teams_in_insertion_order() {
        let state = state_with_ids(&["ZZZZZZZZ", "AAAAAAAA", "MMMMMMMM"]);
        state.validate_team("3333333333").await.unwrap();
        state.validate_team("1111111111").await.unwrap();
        state.validate_team("2222222222").await.unwrap();

        let ids: Vec<_> = state
            .get_all_teams()
            .await
            .into_iter()
            .map(|t| t.team_id)
            .collect();
        assert_eq!(ids, vec!["ZZZZZZZZ", "AAAAAAAA", "MMMMMMMM"]);
    }

    #[tokio::test]
    async fn test_partially_locked_is_next_quiz_only() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        // Nothing completed: quiz 1 is next
        assert!(state.is_partially_locked(&team_id, 1).await);
        assert!(!state.is_partially_locked(&team_id, 2).await);

        state.mark_quiz_complete(&team_id, 1).await;
        assert!(!state.is_partially_locked(&team_id, 1).await);
        assert!(state.is_partially_locked(&team_id, 2).await);
        assert!(!state.is_partially_locked(&team_id, 3).await);
    }

    #[tokio::test]
    async fn test_quiz_status_transitions() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        assert_eq!(state.quiz_status(&team_id, 1).await, Some(QuizStatus::Unlocked));
        assert_eq!(state.quiz_status(&team_id, 2).await, Some(QuizStatus::Locked));

        state.mark_quiz_complete(&team_id, 1).await;
        assert_eq!(state.quiz_status(&team_id, 1).await, Some(QuizStatus::Completed));
        assert_eq!(
            state.quiz_status(&team_id, 2).await,
            Some(QuizStatus::AwaitingPassphrase)
        );

        state.unlock_quiz(&team_id, 2).await;
        assert_eq!(state.quiz_status(&team_id, 2).await, Some(QuizStatus::Unlocked));
        assert_eq!(state.quiz_status(&team_id, 3).await, Some(QuizStatus::Locked));
    }

    #[test]
    fn test_next_quiz_number() {
        assert_eq!(next_quiz_number(&[]), 1);
        assert_eq!(next_quiz_number(&[1]), 2);
        assert_eq!(next_quiz_number(&[1, 2, 3]), 4);
        // Uses the highest completed number, not the count
        assert_eq!(next_quiz_number(&[1, 5]), 6);
        assert_eq!(next_quiz_number(&[3, 1]), 4);
        assert_eq!(next_quiz_number(&[QuizNumber::MAX]), QuizNumber::MAX);
    }

    #[tokio::test]
    async fn test_out_of_range_completion_does_not_overflow() {
        let state = state_with_ids(&["TEAM0001"]);
        let team_id = state.validate_team("9998887770").await.unwrap().team_id;

        state.mark_quiz_complete(&team_id, QuizNumber::MAX).await;

        assert!(!state.is_partially_locked(&team_id, 2).await);
        assert!(!state.is_partially_locked(&team_id, QuizNumber::MAX).await);
        assert_eq!(state.quiz_status(&team_id, 2).await, Some(QuizStatus::Locked));
        let progress = state.team_progress(&team_id).await.unwrap();
        assert!(progress.next_quiz.is_none());
    }

    #[test]
    fn test_public_url_trailing_slash_trimmed() {
        let state = AppState::new(Catalog::orientation().unwrap())
            .with_public_url("https://hunt.example.org/");
        assert_eq!(state.public_url, "https://hunt.example.org");
    }
}
