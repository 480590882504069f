//! Puzzle challenges - a fixed catalog and the open/solved state machine

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PuzzleChallengeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleCategory {
    Logic,
    Math,
    Riddle,
}

/// A puzzle from the static catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleDefinition {
    pub id: &'static str,
    pub category: PuzzleCategory,
    pub question: &'static str,
    #[serde(skip_serializing)]
    pub expected_answer: &'static str,
    pub reward: &'static str,
}

impl PuzzleDefinition {
    /// Trimmed, case-insensitive equality; no partial credit
    pub fn accepts(&self, answer: &str) -> bool {
        normalize(answer) == normalize(self.expected_answer)
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub static PUZZLES: [PuzzleDefinition; 6] = [
    PuzzleDefinition {
        id: "enigma-agulha",
        category: PuzzleCategory::Riddle,
        question: "O que é que tem olho, mas não vê?",
        expected_answer: "Agulha",
        reward: "Amuleto da Perspicácia",
    },
    PuzzleDefinition {
        id: "enigma-buraco",
        category: PuzzleCategory::Riddle,
        question: "Quanto mais se tira, maior fica. O que é?",
        expected_answer: "Buraco",
        reward: "Pá do Coveiro Ancestral",
    },
    PuzzleDefinition {
        id: "logica-quinta-filha",
        category: PuzzleCategory::Logic,
        question: "O pai de Maria tem cinco filhas: Lalá, Lelé, Lili e Loló. Qual é o nome da quinta filha?",
        expected_answer: "Maria",
        reward: "Anel do Observador",
    },
    PuzzleDefinition {
        id: "logica-galo",
        category: PuzzleCategory::Logic,
        question: "Um galo bota um ovo no alto de um telhado. Para que lado o ovo cai?",
        expected_answer: "Nenhum",
        reward: "Pena do Galo Dourado",
    },
    PuzzleDefinition {
        id: "matematica-sequencia",
        category: PuzzleCategory::Math,
        question: "Qual é o próximo número da sequência 2, 4, 8, 16?",
        expected_answer: "32",
        reward: "Ábaco Rúnico",
    },
    PuzzleDefinition {
        id: "matematica-galinhas",
        category: PuzzleCategory::Math,
        question: "Se três galinhas põem três ovos em três dias, quantos ovos uma galinha põe em três dias?",
        expected_answer: "1",
        reward: "Cesta de Ovos Encantados",
    },
];

pub fn find_puzzle(id: &str) -> Option<&'static PuzzleDefinition> {
    PUZZLES.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    Open,
    Solved,
}

/// Result of submitting an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum PuzzleVerdict {
    Solved { reward: &'static str },
    /// Wrong answer; the input is cleared and the challenge stays open
    Rejected,
    /// Submission ignored because the challenge is already solved
    AlreadySolved,
}

/// A puzzle being presented to the player
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleChallenge {
    pub id: PuzzleChallengeId,
    pub puzzle: &'static PuzzleDefinition,
    pub state: ChallengeState,
    pub attempts: u32,
}

impl PuzzleChallenge {
    pub fn new(puzzle: &'static PuzzleDefinition) -> Self {
        Self {
            id: PuzzleChallengeId::new(),
            puzzle,
            state: ChallengeState::Open,
            attempts: 0,
        }
    }

    pub fn submit(&mut self, answer: &str) -> PuzzleVerdict {
        if self.state == ChallengeState::Solved {
            return PuzzleVerdict::AlreadySolved;
        }
        self.attempts += 1;
        if self.puzzle.accepts(answer) {
            self.state = ChallengeState::Solved;
            PuzzleVerdict::Solved {
                reward: self.puzzle.reward,
            }
        } else {
            PuzzleVerdict::Rejected
        }
    }
}
