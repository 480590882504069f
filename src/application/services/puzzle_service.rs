//! Puzzle Service - presents catalog puzzles and checks answers

use std::collections::HashMap;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::entities::{
    find_puzzle, PuzzleChallenge, PuzzleDefinition, PuzzleVerdict, PUZZLES,
};
use crate::domain::value_objects::PuzzleChallengeId;

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("Unknown puzzle: {0}")]
    UnknownPuzzle(String),
    #[error("Challenge not found: {0}")]
    ChallengeNotFound(PuzzleChallengeId),
}

/// Check an answer against a catalog puzzle without tracking any state
pub fn check(puzzle_id: &str, answer: &str) -> Result<PuzzleVerdict, PuzzleError> {
    let puzzle = find_puzzle(puzzle_id)
        .ok_or_else(|| PuzzleError::UnknownPuzzle(puzzle_id.to_string()))?;
    Ok(if puzzle.accepts(answer) {
        PuzzleVerdict::Solved {
            reward: puzzle.reward,
        }
    } else {
        PuzzleVerdict::Rejected
    })
}

#[derive(Default)]
pub struct PuzzleService {
    challenges: RwLock<HashMap<PuzzleChallengeId, PuzzleChallenge>>,
}

impl PuzzleService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &'static [PuzzleDefinition] {
        &PUZZLES
    }

    /// Open a challenge for the given puzzle, or a random one
    pub async fn start_challenge(
        &self,
        puzzle_id: Option<&str>,
    ) -> Result<PuzzleChallenge, PuzzleError> {
        let puzzle = match puzzle_id {
            Some(id) => find_puzzle(id).ok_or_else(|| PuzzleError::UnknownPuzzle(id.to_string()))?,
            None => PUZZLES
                .choose(&mut rand::thread_rng())
                .ok_or_else(|| PuzzleError::UnknownPuzzle("<empty catalog>".to_string()))?,
        };

        let challenge = PuzzleChallenge::new(puzzle);
        self.challenges
            .write()
            .await
            .insert(challenge.id, challenge.clone());
        debug!(challenge_id = %challenge.id, puzzle_id = puzzle.id, "Challenge opened");
        Ok(challenge)
    }

    pub async fn submit(
        &self,
        id: PuzzleChallengeId,
        answer: &str,
    ) -> Result<(PuzzleVerdict, PuzzleChallenge), PuzzleError> {
        let mut challenges = self.challenges.write().await;
        let challenge = challenges
            .get_mut(&id)
            .ok_or(PuzzleError::ChallengeNotFound(id))?;

        let verdict = challenge.submit(answer);
        if let PuzzleVerdict::Solved { reward } = &verdict {
            info!(challenge_id = %id, reward, "Puzzle solved");
        }
        Ok((verdict, challenge.clone()))
    }

    /// Forget a challenge once the player leaves it
    pub async fn end_challenge(&self, id: PuzzleChallengeId) -> Result<(), PuzzleError> {
        self.challenges
            .write()
            .await
            .remove(&id)
            .map(|_| debug!(challenge_id = %id, "Challenge ended"))
            .ok_or(PuzzleError::ChallengeNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ChallengeState;

    #[test]
    fn test_check_normalizes_answer() {
        for answer in [" Agulha ", "agulha", "AGULHA"] {
            assert_eq!(
                check("enigma-agulha", answer).unwrap(),
                PuzzleVerdict::Solved {
                    reward: "Amuleto da Perspicácia"
                }
            );
        }
        assert_eq!(check("enigma-agulha", "linha").unwrap(), PuzzleVerdict::Rejected);
    }

    #[test]
    fn test_check_unknown_puzzle() {
        assert!(matches!(check("nao-existe", "x"), Err(PuzzleError::UnknownPuzzle(_))));
    }

    #[tokio::test]
    async fn test_random_challenge_comes_from_catalog() {
        let service = PuzzleService::new();

        let challenge = service.start_challenge(None).await.unwrap();

        assert!(PUZZLES.iter().any(|p| p.id == challenge.puzzle.id));
        assert_eq!(challenge.state, ChallengeState::Open);
    }

    #[tokio::test]
    async fn test_submit_until_solved() {
        let service = PuzzleService::new();
        let challenge = service.start_challenge(Some("logica-quinta-filha")).await.unwrap();

        let (verdict, _) = service.submit(challenge.id, "Lulu").await.unwrap();
        assert_eq!(verdict, PuzzleVerdict::Rejected);

        let (verdict, state) = service.submit(challenge.id, "  maria").await.unwrap();
        assert!(matches!(verdict, PuzzleVerdict::Solved { .. }));
        assert_eq!(state.state, ChallengeState::Solved);
        assert_eq!(state.attempts, 2);

        let (verdict, _) = service.submit(challenge.id, "Maria").await.unwrap();
        assert_eq!(verdict, PuzzleVerdict::AlreadySolved);
    }

    #[tokio::test]
    async fn test_end_challenge_removes_it() {
        let service = PuzzleService::new();
        let challenge = service.start_challenge(Some("enigma-buraco")).await.unwrap();

        service.end_challenge(challenge.id).await.unwrap();

        assert!(service.challenges.read().await.is_empty());
        assert!(matches!(
            service.submit(challenge.id, "x").await,
            Err(PuzzleError::ChallengeNotFound(_))
        ));
        assert!(matches!(
            service.end_challenge(challenge.id).await,
            Err(PuzzleError::ChallengeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_challenge() {
        let service = PuzzleService::new();
        let result = service.submit(PuzzleChallengeId::new(), "x").await;
        assert!(matches!(result, Err(PuzzleError::ChallengeNotFound(_))));
    }
}
