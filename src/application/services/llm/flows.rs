//! The engine's flow definitions

use super::flow::{Flow, OutputSchema, SchemaField};
use crate::domain::value_objects::ContentType;

const CONTENT_INPUTS: &[SchemaField] = &[
    SchemaField::string("content_type", "Content type to generate"),
    SchemaField::string("prompt", "Admin's description of the content"),
    SchemaField::string("examples", "Example JSON shape per content type"),
];

pub const CONTENT_GENERATION_FLOW: Flow = Flow {
    name: "generate_content",
    system_prompt: "You are a content designer for Mundo Mítico, a fantasy RPG. \
        You write game data as JSON, in Brazilian Portuguese.",
    input_schema: CONTENT_INPUTS,
    output: OutputSchema::Text,
    template: r#"Generate game content of type "{{content_type}}" based on this request:

{{prompt}}

Use the example structure matching the requested type:
{{examples}}

Rules:
- For "Season", return a JSON array where every element is {"collection": "<collection name>", "data": {...}}.
- For every other type, return a single JSON object.
- Respond with ONLY the JSON string. No markdown code fences, no commentary."#,
    temperature: 0.7,
};

const REPAIR_INPUTS: &[SchemaField] = &[SchemaField::string(
    "malformed",
    "Text that failed to parse as JSON",
)];

pub const CONTENT_REPAIR_FLOW: Flow = Flow {
    name: "repair_json",
    system_prompt: "You fix malformed JSON. You never add commentary.",
    input_schema: REPAIR_INPUTS,
    output: OutputSchema::Text,
    template: r#"The following text was supposed to be valid JSON but does not parse:

{{malformed}}

Return the corrected JSON string only, keeping every field and value that can be kept. No markdown code fences, no commentary."#,
    temperature: 0.0,
};

const COMBAT_INPUTS: &[SchemaField] = &[
    SchemaField::string("player", "Player name, HP and attributes"),
    SchemaField::string("enemy", "Enemy name, HP, attack and defense"),
    SchemaField::string("action", "The player's declared action"),
];

pub const COMBAT_OUTPUT: &[SchemaField] = &[
    SchemaField::string("enemyActionNarrative", "What the enemy does this turn"),
    SchemaField::integer("playerDamage", "Damage the player takes, 0 or more"),
    SchemaField::integer("enemyDamage", "Damage the enemy takes, 0 or more"),
    SchemaField::string("turnNarrative", "Narration of the whole turn"),
];

pub const COMBAT_TURN_FLOW: Flow = Flow {
    name: "resolve_combat_turn",
    system_prompt: "You are the combat master of Mundo Mítico, a fantasy RPG. \
        You narrate in Brazilian Portuguese.",
    input_schema: COMBAT_INPUTS,
    output: OutputSchema::Json(COMBAT_OUTPUT),
    template: r#"PLAYER: {{player}}
ENEMY: {{enemy}}
PLAYER ACTION: {{action}}

Resolve this combat turn. Decide how the player's action lands and how the enemy responds.
Damage guideline: roughly (Attack - Defense) plus some randomness. Damage is never negative.

Respond with ONLY a JSON object:
{"enemyActionNarrative": "...", "playerDamage": 0, "enemyDamage": 0, "turnNarrative": "..."}"#,
    temperature: 0.8,
};

const NARRATION_INPUTS: &[SchemaField] = &[
    SchemaField::string("character", "Player character summary"),
    SchemaField::string("message", "What the player says or does"),
];

pub const GAME_MASTER_FLOW: Flow = Flow {
    name: "game_master_chat",
    system_prompt: "You are the game master of Mundo Mítico, a fantasy RPG. \
        Narrate vividly in Brazilian Portuguese, in second person, in a few short paragraphs. \
        Never decide the player's actions for them.",
    input_schema: NARRATION_INPUTS,
    output: OutputSchema::Text,
    template: "PLAYER CHARACTER: {{character}}\n\nPLAYER: {{message}}",
    temperature: 0.9,
};

/// The per-type example catalog inserted into the generation prompt
pub fn content_examples() -> String {
    ContentType::ALL
        .iter()
        .map(|ct| format!("{} ({}):\n{}", ct.name(), ct.label(), ct.example_json()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
