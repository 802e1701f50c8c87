//! Quest template catalog
//!
//! Templates are declarative data grouped by category. New categories are
//! added by appending entries (in code or from TOML); the matcher never
//! branches on category names.

use crate::core::error::{EngineError, Result};
use crate::core::types::SkillId;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A parameterized quest description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: String,
    /// Title with `{placeholder}` tokens
    #[serde(rename = "title")]
    pub title_pattern: String,
    #[serde(rename = "description")]
    pub description_pattern: String,
    pub category: String,
    /// 1-5
    pub difficulty: u8,
    #[serde(rename = "minutes")]
    pub time_estimate_minutes: u32,
    /// 0-1
    #[serde(rename = "energy")]
    pub energy_level: f64,
    /// 1-5
    #[serde(rename = "focus")]
    pub focus_required: u8,
    #[serde(default)]
    pub skills: BTreeSet<SkillId>,
    /// Placeholder -> default value
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl QuestTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_template("<unnamed>", "id must not be empty"));
        }
        if self.title_pattern.trim().is_empty() {
            return Err(EngineError::invalid_template(&self.id, "title must not be empty"));
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(EngineError::invalid_template(
                &self.id,
                format!("difficulty must be 1-5, got {}", self.difficulty),
            ));
        }
        if !(1..=5).contains(&self.focus_required) {
            return Err(EngineError::invalid_template(
                &self.id,
                format!("focus must be 1-5, got {}", self.focus_required),
            ));
        }
        if !self.energy_level.is_finite() || !(0.0..=1.0).contains(&self.energy_level) {
            return Err(EngineError::invalid_template(
                &self.id,
                format!("energy must be within 0-1, got {}", self.energy_level),
            ));
        }
        Ok(())
    }
}

/// Ordered collection of templates; insertion order breaks score ties
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<QuestTemplate>,
}

/// Shorthand used by the built-in table
#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    category: &str,
    title: &str,
    description: &str,
    difficulty: u8,
    minutes: u32,
    energy: f64,
    focus: u8,
    skills: &[&str],
    variables: &[(&str, &str)],
) -> QuestTemplate {
    QuestTemplate {
        id: id.into(),
        title_pattern: title.into(),
        description_pattern: description.into(),
        category: category.into(),
        difficulty,
        time_estimate_minutes: minutes,
        energy_level: energy,
        focus_required: focus,
        skills: skills.iter().map(|s| SkillId::from(*s)).collect(),
        variables: variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in catalog covering the six standard categories
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        // Mindfulness
        catalog.add(template(
            "mindful_breathing",
            "mindfulness",
            "Mindful Breathing",
            "Take {duration} minutes for {technique}. Count {cycles} slow cycles before you start.",
            1, 15, 0.2, 2,
            &["meditation", "breathing"],
            &[("technique", "box breathing"), ("cycles", "4")],
        ));
        catalog.add(template(
            "deep_meditation",
            "mindfulness",
            "Deep {practice} Session",
            "Settle in for a {duration} minute {practice} session without checking your phone.",
            3, 30, 0.3, 4,
            &["meditation"],
            &[("practice", "meditation")],
        ));
        catalog.add(template(
            "evening_reflection",
            "mindfulness",
            "Evening Reflection",
            "Write down {count} things that went well today and why. Take about {duration} minutes.",
            2, 15, 0.2, 3,
            &["journaling", "meditation"],
            &[("count", "three")],
        ));

        // Productivity
        catalog.add(template(
            "deep_work_block",
            "productivity",
            "Deep Work Block",
            "Block {duration} minutes for {task} with notifications off.",
            3, 45, 0.6, 4,
            &["deep_work", "planning"],
            &[("task", "your most important task")],
        ));
        catalog.add(template(
            "plan_tomorrow",
            "productivity",
            "Plan Tomorrow",
            "Spend {duration} minutes choosing the {count} tasks that matter most tomorrow.",
            1, 15, 0.3, 2,
            &["planning", "organization"],
            &[("count", "three")],
        ));

        // Fitness
        catalog.add(template(
            "interval_run",
            "fitness",
            "{style} Run",
            "Run for {duration} minutes, alternating {interval} of effort with easy recovery.",
            4, 30, 0.9, 3,
            &["running"],
            &[("style", "Interval"), ("interval", "one minute")],
        ));
        catalog.add(template(
            "strength_circuit",
            "fitness",
            "Strength Circuit",
            "Complete {rounds} rounds of {exercises} in about {duration} minutes.",
            3, 30, 0.8, 3,
            &["strength"],
            &[("rounds", "3"), ("exercises", "squats, push-ups and planks")],
        ));
        catalog.add(template(
            "gentle_stretch",
            "fitness",
            "Gentle Stretch",
            "Stretch for {duration} minutes, holding each position for {hold}.",
            1, 15, 0.4, 2,
            &["stretching", "yoga"],
            &[("hold", "30 seconds")],
        ));

        // Learning
        catalog.add(template(
            "focused_reading",
            "learning",
            "Focused Reading",
            "Read {material} for {duration} minutes and summarize it in {sentences} sentences.",
            2, 30, 0.4, 4,
            &["reading"],
            &[("material", "a chapter"), ("sentences", "two")],
        ));
        catalog.add(template(
            "vocabulary_sprint",
            "learning",
            "Vocabulary Sprint",
            "Learn {count} new {language} words in {duration} minutes, then quiz yourself.",
            3, 20, 0.5, 4,
            &["language"],
            &[("count", "10"), ("language", "target-language")],
        ));

        // Creativity
        catalog.add(template(
            "free_writing",
            "creativity",
            "Free Writing",
            "Write without stopping for {duration} minutes about {prompt}.",
            2, 20, 0.4, 3,
            &["writing", "journaling"],
            &[("prompt", "a place you miss")],
        ));
        catalog.add(template(
            "quick_sketch",
            "creativity",
            "Quick Sketch",
            "Sketch {subject} in {duration} minutes. Finished beats perfect.",
            2, 20, 0.3, 3,
            &["drawing"],
            &[("subject", "something on your desk")],
        ));
        catalog.add(template(
            "practice_piece",
            "creativity",
            "Practice Piece",
            "Play through {piece} slowly for {duration} minutes, then once at tempo.",
            3, 30, 0.5, 4,
            &["music", "piano"],
            &[("piece", "your current piece")],
        ));

        // Social
        catalog.add(template(
            "cook_together",
            "social",
            "Cook Together",
            "Cook {dish} with someone close to you. Set aside {duration} minutes.",
            2, 45, 0.5, 2,
            &["cooking"],
            &[("dish", "a new recipe")],
        ));
        catalog.add(template(
            "reach_out",
            "social",
            "Reach Out",
            "Call {person} you have not spoken to in a while. Give it {duration} minutes.",
            1, 15, 0.3, 2,
            &["conversation"],
            &[("person", "a friend")],
        ));

        catalog
    }

    /// Append a template; later entries lose score ties to earlier ones
    pub fn add(&mut self, template: QuestTemplate) {
        self.templates.push(template);
    }

    pub fn get(&self, id: &str) -> Option<&QuestTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn for_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a QuestTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Category names in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.templates
            .iter()
            .map(|t| t.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn all(&self) -> &[QuestTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Append every template from `other`, all or nothing
    ///
    /// Fails without touching `self` if any template is invalid or its id is
    /// already taken (here or earlier in `other`).
    pub fn extend(&mut self, other: TemplateCatalog) -> Result<()> {
        let mut incoming = AHashSet::new();
        for t in &other.templates {
            t.validate()?;
            if self.get(&t.id).is_some() || !incoming.insert(t.id.as_str()) {
                return Err(EngineError::invalid_template(&t.id, "duplicate template id"));
            }
        }
        self.templates.extend(other.templates);
        Ok(())
    }

    /// Load templates from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse templates from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlTemplates =
            toml::from_str(content).map_err(|e| EngineError::CatalogParse(e.to_string()))?;

        let mut catalog = Self::new();
        for t in data.templates {
            t.validate()?;
            if catalog.get(&t.id).is_some() {
                return Err(EngineError::invalid_template(&t.id, "duplicate template id"));
            }
            catalog.add(t);
        }
        Ok(catalog)
    }
}

/// TOML representation of a templates file
#[derive(Debug, Deserialize)]
struct TomlTemplates {
    templates: Vec<QuestTemplate>,
}
