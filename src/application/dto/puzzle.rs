use serde::{Deserialize, Serialize};

use crate::domain::entities::{PuzzleChallenge, PuzzleVerdict};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartChallengeRequest {
    /// Catalog id; a random puzzle is drawn when absent
    #[serde(default)]
    pub puzzle_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponseDto {
    #[serde(flatten)]
    pub verdict: PuzzleVerdict,
    pub challenge: PuzzleChallenge,
    /// What the answer field should show afterwards; always cleared, a miss
    /// starts the player over and a solve closes the challenge
    pub input: String,
}
