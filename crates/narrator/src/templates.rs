//! Argument templates.
//!
//! Templates are plain strings with `{placeholder}` slots. Every table is keyed
//! by a lowercase name so the whole catalogue round-trips through TOML.
//!
//! Supported placeholders:
//! - `{speaker}`, `{piece}`, `{move}`, `{from}`, `{to}`, `{score}`
//! - `{memory}` (memory lines only)
//! - `{interaction}`, `{turn}` (moment lines only)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Template catalogue used by [`TemplateNarrator`](crate::TemplateNarrator).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgumentTemplates {
    /// Opening lines keyed by "piece.mood" (e.g. "knight.confident"), falling
    /// back to the bare mood ("confident", "steady", "shaken")
    #[serde(default)]
    pub openers: HashMap<String, Vec<String>>,

    /// Lines for tactical flags keyed by flag name ("capture", "fork", ...)
    #[serde(default)]
    pub tactics: HashMap<String, Vec<String>>,

    /// Lines keyed by evaluation outlook ("winning", "balanced", "losing")
    #[serde(default)]
    pub outlook: HashMap<String, Vec<String>>,

    /// Lines used when a remembered moment resurfaces
    #[serde(default)]
    pub memory: Vec<String>,

    /// One-line moment narratives keyed by interaction type, plus "default"
    #[serde(default)]
    pub moments: HashMap<String, Vec<String>>,
}

impl ArgumentTemplates {
    /// Loads templates from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses templates from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(content)?)
    }

    /// Opening lines for a piece in a mood, falling back to the mood alone.
    pub fn openers_for(&self, piece: &str, mood: &str) -> Option<&Vec<String>> {
        self.openers
            .get(&format!("{}.{}", piece, mood))
            .filter(|v| !v.is_empty())
            .or_else(|| self.openers.get(mood).filter(|v| !v.is_empty()))
    }

    /// Lines for a tactical flag.
    pub fn tactic_lines(&self, flag: &str) -> Option<&Vec<String>> {
        self.tactics.get(flag).filter(|v| !v.is_empty())
    }

    /// Lines for an evaluation outlook.
    pub fn outlook_lines(&self, outlook: &str) -> Option<&Vec<String>> {
        self.outlook.get(outlook).filter(|v| !v.is_empty())
    }

    /// Moment lines for an interaction type name, falling back to "default".
    pub fn moment_lines(&self, key: &str) -> Option<&Vec<String>> {
        self.moments
            .get(key)
            .filter(|v| !v.is_empty())
            .or_else(|| self.moments.get("default").filter(|v| !v.is_empty()))
    }
}

/// Errors that can occur while loading templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// IO error reading the template file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML templates
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Returns the built-in template catalogue.
pub fn default_templates() -> ArgumentTemplates {
    let mut openers = HashMap::new();
    openers.insert(
        "confident".to_string(),
        lines(&[
            "{speaker} steps forward: {move} is the move, and I will see it through.",
            "Hear me! {speaker} proposes {move}.",
        ]),
    );
    openers.insert(
        "steady".to_string(),
        lines(&[
            "{speaker} suggests {move}.",
            "I propose we play {move}, heading to {to}.",
        ]),
    );
    openers.insert(
        "shaken".to_string(),
        lines(&[
            "{speaker} hesitates... perhaps {move}?",
            "I... I think {move} might work, if nobody objects.",
        ]),
    );
    openers.insert(
        "knight.confident".to_string(),
        lines(&[
            "A noble quest awaits on {to}! {speaker} rides with {move}.",
            "Adventure calls from {to}, and {speaker} answers with {move}!",
        ]),
    );
    openers.insert(
        "knight.steady".to_string(),
        lines(&["{speaker} sees a worthy challenge in {move}."]),
    );
    openers.insert(
        "queen.confident".to_string(),
        lines(&["All eyes on me! {speaker} commands {move}."]),
    );
    openers.insert(
        "king.shaken".to_string(),
        lines(&["According to theory, {move} is... entirely sound. Probably."]),
    );
    openers.insert(
        "pawn.confident".to_string(),
        lines(&["Comrades! {move} advances the cause."]),
    );
    openers.insert(
        "rook.shaken".to_string(),
        lines(&["Must I leave my corner? Fine... {move}."]),
    );
    openers.insert(
        "bishop.steady".to_string(),
        lines(&["The long diagonal beckons: {speaker} counsels {move}."]),
    );

    let mut tactics = HashMap::new();
    tactics.insert("capture".to_string(), lines(&["It wins material on {to}."]));
    tactics.insert("check".to_string(), lines(&["Their king will feel this check."]));
    tactics.insert(
        "promotion".to_string(),
        lines(&["At last, promotion is within reach!"]),
    );
    tactics.insert(
        "sacrifice".to_string(),
        lines(&["I may not survive this, but the team will be stronger for it."]),
    );
    tactics.insert(
        "support".to_string(),
        lines(&["From {to} I can protect a friend in danger."]),
    );

    let mut outlook = HashMap::new();
    outlook.insert(
        "winning".to_string(),
        lines(&["This position is clearly going our way."]),
    );
    outlook.insert(
        "balanced".to_string(),
        lines(&["The balance holds, and this keeps our chances alive."]),
    );
    outlook.insert(
        "losing".to_string(),
        lines(&["We are in a tough spot, but this gives us fighting chances."]),
    );

    let memory = lines(&["I remember this position: {memory}"]);

    let mut moments = HashMap::new();
    moments.insert(
        "default".to_string(),
        lines(&["Turn {turn}: {speaker} played {move}."]),
    );
    moments.insert(
        "cooperation".to_string(),
        lines(&["Turn {turn}: {speaker} played {move} with the team united behind it."]),
    );
    moments.insert(
        "competition".to_string(),
        lines(&["Turn {turn}: {speaker} won the argument for {move}, over some grumbling."]),
    );
    moments.insert(
        "sacrifice".to_string(),
        lines(&["Turn {turn}: {speaker} gave everything with {move}."]),
    );
    moments.insert(
        "support".to_string(),
        lines(&["Turn {turn}: {speaker} stood guard with {move}."]),
    );
    moments.insert(
        "trauma".to_string(),
        lines(&["Turn {turn}: {speaker} reeled as the enemy struck with {move}."]),
    );
    moments.insert(
        "threat".to_string(),
        lines(&["Turn {turn}: {speaker} felt the threat of {move}."]),
    );

    ArgumentTemplates {
        openers,
        tactics,
        outlook,
        memory,
        moments,
    }
}

/// Returns a small default catalogue as a TOML string.
pub fn default_templates_toml() -> String {
    r#"# Argument Templates

memory = ["I remember this position: {memory}"]

[openers]
confident = ["Hear me! {speaker} proposes {move}."]
steady = ["{speaker} suggests {move}."]
shaken = ["{speaker} hesitates... perhaps {move}?"]
"knight.confident" = ["A noble quest awaits on {to}! {speaker} rides with {move}."]

[tactics]
capture = ["It wins material on {to}."]
check = ["Their king will feel this check."]

[outlook]
winning = ["This position is clearly going our way."]
balanced = ["The balance holds, and this keeps our chances alive."]
losing = ["We are in a tough spot, but this gives us fighting chances."]

[moments]
default = ["Turn {turn}: {speaker} played {move}."]
"#
    .to_string()
}
