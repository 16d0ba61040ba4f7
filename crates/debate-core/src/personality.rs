//! Personalities
//!
//! Static per-agent configuration: scoring weights, risk tolerance, engine
//! options and the character sketch. Profiles are built from named templates
//! by [`PersonalityFactory`], optionally specialised by a [`Theme`].

use debate_events::PieceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::ConfigError;

/// Engine option for quiescence search effort.
pub const OPT_QS: &str = "QS";
/// Engine option for how rough (and risky) evaluation may be.
pub const OPT_EVAL_ROUGHNESS: &str = "EVAL_ROUGHNESS";

const MAX_ROUGHNESS: i32 = 30;
const MAX_QS: i32 = 300;
const MIN_DEFENSIVE_RISK: f32 = 0.1;

/// A named template personalities are stamped from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTemplate {
    pub name: String,
    /// Honorific, e.g. "Sir" or "Queen"
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub options: BTreeMap<String, i32>,
    pub tactical_weight: f32,
    pub positional_weight: f32,
    pub risk_tolerance: f32,
}

impl PersonalityTemplate {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        title: &str,
        description: &str,
        qs: i32,
        roughness: i32,
        tactical_weight: f32,
        positional_weight: f32,
        risk_tolerance: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            options: BTreeMap::from([
                (OPT_QS.to_string(), qs),
                (OPT_EVAL_ROUGHNESS.to_string(), roughness),
            ]),
            tactical_weight,
            positional_weight,
            risk_tolerance,
        }
    }

    /// The built-in cast.
    pub fn default_for(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Knight => Self::new(
                "Galahop",
                "Sir",
                "A modern Don Quixote who sees grand adventures in tactical opportunities",
                100,
                20,
                1.2,
                0.8,
                0.7,
            ),
            PieceKind::Bishop => Self::new(
                "Longview",
                "Bishop",
                "A zealous bishop who sees the board as a field for conversion",
                200,
                10,
                0.9,
                1.3,
                0.4,
            ),
            PieceKind::Rook => Self::new(
                "Steadfast",
                "Rook",
                "An agoraphobic rook who finds comfort in their fortress",
                150,
                15,
                1.0,
                1.1,
                0.3,
            ),
            PieceKind::Queen => Self::new(
                "Dynamica",
                "Queen",
                "A drama queen who turns every move into a performance",
                80,
                25,
                1.3,
                0.7,
                0.8,
            ),
            PieceKind::King => Self::new(
                "Prudence",
                "King",
                "A neurotic theorist masking fear with pompous proclamations",
                250,
                5,
                0.8,
                1.2,
                0.2,
            ),
            PieceKind::Pawn => Self::new(
                "Pioneer",
                "Pawn",
                "A revolutionary dreaming of overturning the chess hierarchy",
                120,
                18,
                1.1,
                1.0,
                0.6,
            ),
        }
    }
}

/// An agent's personality. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    name: String,
    title: String,
    description: String,
    engine_options: BTreeMap<String, i32>,
    tactical_weight: f32,
    positional_weight: f32,
    risk_tolerance: f32,
}

impl PersonalityProfile {
    /// Display name such as "Sir Galahop" or, for `index > 0`, "Pawn Pioneer 3".
    fn from_template(template: &PersonalityTemplate, index: usize) -> Self {
        let suffix = if index > 0 {
            format!(" {}", index + 1)
        } else {
            String::new()
        };
        Self {
            name: format!("{} {}{}", template.title, template.name, suffix),
            title: template.title.clone(),
            description: template.description.clone(),
            engine_options: template.options.clone(),
            tactical_weight: template.tactical_weight.max(0.0),
            positional_weight: template.positional_weight.max(0.0),
            risk_tolerance: template.risk_tolerance.clamp(0.0, 1.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn engine_options(&self) -> &BTreeMap<String, i32> {
        &self.engine_options
    }

    pub fn engine_option(&self, key: &str) -> Option<i32> {
        self.engine_options.get(key).copied()
    }

    pub fn tactical_weight(&self) -> f32 {
        self.tactical_weight
    }

    pub fn positional_weight(&self) -> f32 {
        self.positional_weight
    }

    pub fn risk_tolerance(&self) -> f32 {
        self.risk_tolerance
    }

    /// A themed copy of this profile.
    pub fn themed(&self, theme: Theme) -> Self {
        let mut next = self.clone();
        match theme {
            Theme::Aggressive => {
                next.tactical_weight *= 1.2;
                next.risk_tolerance = (next.risk_tolerance * 1.3).min(1.0);
                next.scale_option(OPT_EVAL_ROUGHNESS, 1.5, MAX_ROUGHNESS);
            }
            Theme::Defensive => {
                next.positional_weight *= 1.2;
                next.risk_tolerance = (next.risk_tolerance * 0.7).max(MIN_DEFENSIVE_RISK);
                next.scale_option(OPT_QS, 1.5, MAX_QS);
            }
            Theme::Creative => {
                next.tactical_weight *= 1.1;
                next.positional_weight *= 1.1;
                next.scale_option(OPT_EVAL_ROUGHNESS, 1.3, MAX_ROUGHNESS);
            }
        }
        next.description = format!("{} {}", theme.article_phrase(), self.description);
        next
    }

    fn scale_option(&mut self, key: &str, factor: f32, cap: i32) {
        if let Some(v) = self.engine_options.get_mut(key) {
            *v = ((*v as f32 * factor).round() as i32).min(cap);
        }
    }
}

/// Variations applied on top of a base personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Aggressive,
    Defensive,
    Creative,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Aggressive => "aggressive",
            Theme::Defensive => "defensive",
            Theme::Creative => "creative",
        }
    }

    fn article_phrase(&self) -> &'static str {
        match self {
            Theme::Aggressive => "An aggressive variant of",
            Theme::Defensive => "A defensive variant of",
            Theme::Creative => "A creative variant of",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggressive" => Ok(Theme::Aggressive),
            "defensive" => Ok(Theme::Defensive),
            "creative" => Ok(Theme::Creative),
            _ => Err(PersonalityError::UnknownTheme(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersonalityError {
    #[error("no personality template for piece type: {0}")]
    MissingTemplate(PieceKind),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("could not load templates: {0}")]
    Config(#[from] ConfigError),
}

/// How a piece kind relates to its teammates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionProfile {
    pub traits: Vec<String>,
    pub cooperation_style: String,
    pub conflict_style: String,
    pub leadership_style: String,
}

impl InteractionProfile {
    pub fn for_kind(kind: PieceKind) -> Self {
        let (traits, cooperation, conflict, leadership): (&[&str], &str, &str, &str) = match kind {
            PieceKind::Knight => (
                &["adventurous", "dramatic"],
                "Sees cooperation as noble quests",
                "Reframes conflicts as heroic challenges",
                "Inspires through grand adventures",
            ),
            PieceKind::Bishop => (
                &["zealous", "analytical"],
                "Seeks to convert and guide",
                "Engages in philosophical debates",
                "Leads through spiritual guidance",
            ),
            PieceKind::Rook => (
                &["protective", "neurotic"],
                "Builds defensive alliances",
                "Retreats to safety when stressed",
                "Provides stable support",
            ),
            PieceKind::Queen => (
                &["dramatic", "theatrical"],
                "Forms dramatic alliances",
                "Creates emotional scenes",
                "Leads through dramatic flair",
            ),
            PieceKind::King => (
                &["neurotic", "analytical"],
                "Micromanages with 'theoretical' backing",
                "Masks fear with pompous proclamations",
                "Anxious theoretical authority",
            ),
            PieceKind::Pawn => (
                &["revolutionary", "dramatic"],
                "Forms revolutionary coalitions",
                "Questions authority and tradition",
                "Inspires through shared struggle",
            ),
        };
        Self {
            traits: traits.iter().map(|t| t.to_string()).collect(),
            cooperation_style: cooperation.to_string(),
            conflict_style: conflict.to_string(),
            leadership_style: leadership.to_string(),
        }
    }
}

/// Builds personality profiles from templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityFactory {
    templates: BTreeMap<PieceKind, PersonalityTemplate>,
}

impl PersonalityFactory {
    /// A factory over the built-in cast.
    pub fn new() -> Self {
        let templates = PieceKind::all()
            .iter()
            .map(|k| (*k, PersonalityTemplate::default_for(*k)))
            .collect();
        Self { templates }
    }

    /// A factory over custom templates. Kinds without a template cannot be
    /// created.
    pub fn with_templates(templates: BTreeMap<PieceKind, PersonalityTemplate>) -> Self {
        Self { templates }
    }

    /// Loads templates from TOML, keyed by piece name (`[knight]`, `[queen]`, ...).
    /// Kinds absent from the file keep their built-in template.
    pub fn from_file(path: &Path) -> Result<Self, PersonalityError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, PersonalityError> {
        let overrides: BTreeMap<PieceKind, PersonalityTemplate> =
            toml::from_str(content).map_err(ConfigError::from)?;
        let mut factory = Self::new();
        factory.templates.extend(overrides);
        Ok(factory)
    }

    pub fn template(&self, kind: PieceKind) -> Option<&PersonalityTemplate> {
        self.templates.get(&kind)
    }

    /// Personality for the `index`-th piece of a kind (0-based).
    pub fn create(&self, kind: PieceKind, index: usize) -> Result<PersonalityProfile, PersonalityError> {
        let template = self
            .templates
            .get(&kind)
            .ok_or(PersonalityError::MissingTemplate(kind))?;
        Ok(PersonalityProfile::from_template(template, index))
    }

    /// One personality per templated kind.
    pub fn create_all(&self) -> BTreeMap<PieceKind, PersonalityProfile> {
        self.templates
            .iter()
            .map(|(kind, t)| (*kind, PersonalityProfile::from_template(t, 0)))
            .collect()
    }

    pub fn create_themed(&self, kind: PieceKind, theme: Theme) -> Result<PersonalityProfile, PersonalityError> {
        Ok(self.create(kind, 0)?.themed(theme))
    }
}

impl Default for PersonalityFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_personality_names() {
        let factory = PersonalityFactory::new();
        let knight = factory.create(PieceKind::Knight, 0).unwrap();
        assert_eq!(knight.name(), "Sir Galahop");
        assert_eq!(knight.engine_option(OPT_QS), Some(100));
        let pawn = factory.create(PieceKind::Pawn, 2).unwrap();
        assert_eq!(pawn.name(), "Pawn Pioneer 3");
    }

    #[test]
    fn test_create_all() {
        let all = PersonalityFactory::new().create_all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[&PieceKind::Queen].name(), "Queen Dynamica");
        assert_eq!(all[&PieceKind::King].risk_tolerance(), 0.2);
    }

    #[test]
    fn test_aggressive_theme() {
        let factory = PersonalityFactory::new();
        let queen = factory.create_themed(PieceKind::Queen, Theme::Aggressive).unwrap();
        assert!((queen.tactical_weight() - 1.56).abs() < 1e-5);
        assert_eq!(queen.risk_tolerance(), 1.0, "0.8 * 1.3 caps at 1");
        assert_eq!(queen.engine_option(OPT_EVAL_ROUGHNESS), Some(30), "25 * 1.5 caps at 30");
        assert!(queen.description().starts_with("An aggressive variant of"));
    }

    #[test]
    fn test_defensive_theme() {
        let factory = PersonalityFactory::new();
        let king = factory.create_themed(PieceKind::King, Theme::Defensive).unwrap();
        assert!((king.positional_weight() - 1.44).abs() < 1e-5);
        assert!((king.risk_tolerance() - 0.14).abs() < 1e-5);
        assert_eq!(king.engine_option(OPT_QS), Some(300), "250 * 1.5 caps at 300");

        let rook = factory.create_themed(PieceKind::Rook, Theme::Defensive).unwrap();
        assert_eq!(rook.engine_option(OPT_QS), Some(225));
    }

    #[test]
    fn test_creative_theme() {
        let factory = PersonalityFactory::new();
        let bishop = factory.create_themed(PieceKind::Bishop, Theme::Creative).unwrap();
        assert!((bishop.tactical_weight() - 0.99).abs() < 1e-5);
        assert!((bishop.positional_weight() - 1.43).abs() < 1e-5);
        assert_eq!(bishop.engine_option(OPT_EVAL_ROUGHNESS), Some(13));
    }

    #[test]
    fn test_unknown_theme() {
        assert!(matches!(
            "reckless".parse::<Theme>(),
            Err(PersonalityError::UnknownTheme(_))
        ));
        assert_eq!("Creative".parse::<Theme>().unwrap(), Theme::Creative);
    }

    #[test]
    fn test_missing_template() {
        let factory = PersonalityFactory::with_templates(BTreeMap::from([(
            PieceKind::Knight,
            PersonalityTemplate::default_for(PieceKind::Knight),
        )]));
        assert!(matches!(
            factory.create(PieceKind::Queen, 0),
            Err(PersonalityError::MissingTemplate(PieceKind::Queen))
        ));
    }

    #[test]
    fn test_templates_from_toml_override() {
        let toml = r#"
            [knight]
            name = "Lancelot"
            title = "Sir"
            description = "A knight of the round table"
            tactical_weight = 1.5
            positional_weight = 0.5
            risk_tolerance = 0.9
        "#;
        let factory = PersonalityFactory::from_toml(toml).unwrap();
        assert_eq!(factory.create(PieceKind::Knight, 0).unwrap().name(), "Sir Lancelot");
        assert_eq!(factory.create(PieceKind::Rook, 0).unwrap().name(), "Rook Steadfast");
    }

    #[test]
    fn test_interaction_profiles() {
        let knight = InteractionProfile::for_kind(PieceKind::Knight);
        assert_eq!(knight.cooperation_style, "Sees cooperation as noble quests");
        assert_eq!(knight.traits, vec!["adventurous", "dramatic"]);
    }
}
