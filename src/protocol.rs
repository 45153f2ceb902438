//! JSON request and response bodies for the HTTP API

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Message shown when the identifier is neither a team ID nor a mobile number
pub const INVALID_INPUT_MESSAGE: &str = "Invalid Team ID or Mobile Number. Please enter a valid 10-digit mobile number or 8-character team ID.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTeamRequest {
    /// Team leader mobile number or team ID
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRequest {
    pub passphrase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockResponse {
    pub quiz_number: QuizNumber,
    pub status: QuizStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer_index: usize,
}

/// A quiz as shown to teams: no answer, no passphrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizView {
    pub id: QuizId,
    pub quiz_number: QuizNumber,
    pub total_quizzes: usize,
    pub question: String,
    pub options: Vec<String>,
}

impl QuizView {
    pub fn new(quiz: &Quiz, total_quizzes: usize) -> Self {
        Self {
            id: quiz.id.clone(),
            quiz_number: quiz.quiz_number,
            total_quizzes,
            question: quiz.question.clone(),
            options: quiz.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}
