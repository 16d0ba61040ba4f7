//! Template-based argument generation.
//!
//! Turns the structured context handed over by the debate engine into a few
//! sentences of in-character prose. Template selection is a pure function of
//! the context, so the same proposal always reads the same way.

use std::path::Path;

use debate_events::{ArgumentContext, ArgumentGenerator, MomentContext};

use crate::templates::{default_templates, ArgumentTemplates, TemplateError};

/// Composite evaluation above which a position counts as "winning".
const WINNING_EVAL: f32 = 2.0;
/// Composite evaluation below which a position counts as "losing".
const LOSING_EVAL: f32 = -2.0;

/// Fills argument and moment templates.
#[derive(Debug, Clone)]
pub struct TemplateNarrator {
    templates: ArgumentTemplates,
}

impl TemplateNarrator {
    /// Creates a narrator over the given templates.
    pub fn new(templates: ArgumentTemplates) -> Self {
        Self { templates }
    }

    /// Creates a narrator with the built-in templates.
    pub fn with_defaults() -> Self {
        Self::new(default_templates())
    }

    /// Creates a narrator from a TOML template file.
    pub fn from_template_file(path: &Path) -> Result<Self, TemplateError> {
        let templates = ArgumentTemplates::from_file(path)?;
        tracing::debug!("Loaded argument templates from {}", path.display());
        Ok(Self::new(templates))
    }

    pub fn templates(&self) -> &ArgumentTemplates {
        &self.templates
    }

    fn fill(&self, template: &str, ctx: &ArgumentContext<'_>) -> String {
        let (from, to) = split_uci(ctx.move_uci);
        template
            .replace("{speaker}", ctx.speaker)
            .replace("{piece}", ctx.piece.name())
            .replace("{move}", ctx.move_uci)
            .replace("{from}", from)
            .replace("{to}", to)
            .replace("{score}", &format!("{:.2}", ctx.score))
    }
}

impl Default for TemplateNarrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ArgumentGenerator for TemplateNarrator {
    fn argument(&self, ctx: &ArgumentContext<'_>) -> String {
        let seed = stable_hash(&[ctx.speaker, ctx.move_uci]);
        let piece = ctx.piece.name().to_lowercase();
        let mood = mood_tier(ctx.emotions.confidence);

        let mut parts = Vec::new();
        match self.templates.openers_for(&piece, mood) {
            Some(lines) => parts.push(self.fill(pick(lines, seed), ctx)),
            None => parts.push(format!("{} proposes {}.", ctx.speaker, ctx.move_uci)),
        }

        if !ctx.voice.is_empty() {
            parts.push(ctx.voice.to_string());
        }

        for flag in ctx.tactics {
            if let Some(lines) = self.templates.tactic_lines(flag) {
                parts.push(self.fill(pick(lines, seed), ctx));
            }
        }

        if let Some(best) = ctx.opportunities.first() {
            parts.push(format!("I see a {}.", best));
        }

        if let Some(lines) = self.templates.outlook_lines(outlook(ctx.composite_eval)) {
            parts.push(self.fill(pick(lines, seed), ctx));
        }

        if let Some(memory) = ctx.memory_hint {
            if !self.templates.memory.is_empty() {
                let line = pick(&self.templates.memory, seed).replace("{memory}", memory);
                parts.push(self.fill(&line, ctx));
            }
        }

        parts.join(" ")
    }

    fn moment_line(&self, ctx: &MomentContext<'_>) -> String {
        let key = ctx
            .interaction_type
            .map(|t| t.as_str())
            .unwrap_or("default");
        let seed = stable_hash(&[ctx.speaker, ctx.move_uci, key]);
        let interaction = ctx
            .interaction_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "moment".to_string());

        let template = match self.templates.moment_lines(key) {
            Some(lines) => pick(lines, seed).to_string(),
            None => "Turn {turn}: {speaker} played {move}.".to_string(),
        };

        template
            .replace("{speaker}", ctx.speaker)
            .replace("{move}", ctx.move_uci)
            .replace("{turn}", &ctx.turn.to_string())
            .replace("{interaction}", &interaction)
    }
}

fn mood_tier(confidence: f32) -> &'static str {
    if confidence > 0.7 {
        "confident"
    } else if confidence < 0.3 {
        "shaken"
    } else {
        "steady"
    }
}

fn outlook(composite: f32) -> &'static str {
    if composite > WINNING_EVAL {
        "winning"
    } else if composite < LOSING_EVAL {
        "losing"
    } else {
        "balanced"
    }
}

fn split_uci(uci: &str) -> (&str, &str) {
    match (uci.get(0..2), uci.get(2..4)) {
        (Some(from), Some(to)) => (from, to),
        _ => (uci, uci),
    }
}

fn pick(lines: &[String], seed: u64) -> &str {
    &lines[(seed % lines.len() as u64) as usize]
}

/// FNV-1a over the parts, separated by a zero byte.
fn stable_hash(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_events::fixtures::calm_emotions;
    use debate_events::{EmotionSnapshot, InteractionType, PieceKind};

    fn context<'a>(
        tactics: &'a [String],
        emotions: EmotionSnapshot,
        memory_hint: Option<&'a str>,
    ) -> ArgumentContext<'a> {
        ArgumentContext {
            speaker: "Sir Galahop",
            piece: PieceKind::Knight,
            move_uci: "g1f3",
            score: 1.25,
            composite_eval: 0.4,
            emotions,
            tactics,
            opportunities: &[],
            voice: "",
            memory_hint,
        }
    }

    #[test]
    fn test_argument_is_deterministic() {
        let narrator = TemplateNarrator::with_defaults();
        let ctx = context(&[], calm_emotions(), None);
        assert_eq!(narrator.argument(&ctx), narrator.argument(&ctx));
    }

    #[test]
    fn test_argument_mentions_move() {
        let narrator = TemplateNarrator::with_defaults();
        let ctx = context(&[], calm_emotions(), None);
        let text = narrator.argument(&ctx);
        assert!(
            text.contains("g1f3") || text.contains("f3"),
            "argument should reference the move: {}",
            text
        );
    }

    #[test]
    fn test_confident_knight_uses_piece_opener() {
        let narrator = TemplateNarrator::with_defaults();
        let emotions = EmotionSnapshot {
            confidence: 0.9,
            ..calm_emotions()
        };
        let tactics: Vec<String> = Vec::new();
        let text = narrator.argument(&context(&tactics, emotions, None));
        assert!(
            text.contains("quest") || text.contains("Adventure"),
            "unexpected opener: {}",
            text
        );
    }

    #[test]
    fn test_tactics_and_memory_are_woven_in() {
        let narrator = TemplateNarrator::with_defaults();
        let tactics = vec!["capture".to_string()];
        let text = narrator.argument(&context(&tactics, calm_emotions(), Some("the fork on f7")));
        assert!(text.contains("wins material on f3"), "{}", text);
        assert!(text.contains("the fork on f7"), "{}", text);
    }

    #[test]
    fn test_empty_templates_fall_back() {
        let narrator = TemplateNarrator::new(ArgumentTemplates::default());
        let text = narrator.argument(&context(&[], calm_emotions(), None));
        assert_eq!(text, "Sir Galahop proposes g1f3.");

        let line = narrator.moment_line(&MomentContext {
            speaker: "Sir Galahop",
            move_uci: "g1f3",
            turn: 3,
            interaction_type: None,
            significance: 0.1,
        });
        assert_eq!(line, "Turn 3: Sir Galahop played g1f3.");
    }

    #[test]
    fn test_moment_line_by_interaction() {
        let narrator = TemplateNarrator::with_defaults();
        let line = narrator.moment_line(&MomentContext {
            speaker: "Pawn Pioneer",
            move_uci: "e2e4",
            turn: 1,
            interaction_type: Some(InteractionType::Cooperation),
            significance: 0.2,
        });
        assert!(line.contains("united"), "{}", line);
        assert!(line.starts_with("Turn 1"));
    }

    #[test]
    fn test_mood_and_outlook_tiers() {
        assert_eq!(mood_tier(0.8), "confident");
        assert_eq!(mood_tier(0.5), "steady");
        assert_eq!(mood_tier(0.1), "shaken");
        assert_eq!(outlook(3.0), "winning");
        assert_eq!(outlook(0.0), "balanced");
        assert_eq!(outlook(-2.5), "losing");
    }

    #[test]
    fn test_split_uci() {
        assert_eq!(split_uci("e7e8q"), ("e7", "e8"));
        assert_eq!(split_uci("e2"), ("e2", "e2"));
    }
}
