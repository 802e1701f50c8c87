//! Template matching against synthesized parameters
//!
//! Only templates inside every tolerance band (and sharing at least one
//! skill) are scored. Five closeness terms are weighted equally.

use crate::core::config::EngineConfig;
use crate::core::types::{random_suffix, SkillId};
use crate::synthesis::QuestParameters;
use crate::templates::catalog::{QuestTemplate, TemplateCatalog};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const TERM_WEIGHT: f64 = 0.2;

/// Category used when a fallback has no aligned skill to name it after
pub const GENERAL_CATEGORY: &str = "general";

/// Result of a matching pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMatch {
    pub template: QuestTemplate,
    /// Weighted score of the chosen template; None for a synthesized fallback
    pub score: Option<f64>,
}

impl TemplateMatch {
    pub fn is_fallback(&self) -> bool {
        self.score.is_none()
    }
}

fn skill_overlap(template: &QuestTemplate, alignment: &BTreeSet<&SkillId>) -> usize {
    template
        .skills
        .iter()
        .filter(|s| alignment.contains(s))
        .count()
}

/// Whether `template` lies within every tolerance band of `params`
pub fn is_compatible(
    template: &QuestTemplate,
    params: &QuestParameters,
    config: &EngineConfig,
) -> bool {
    let alignment: BTreeSet<&SkillId> = params.skill_alignment.iter().collect();

    template.difficulty.abs_diff(params.difficulty) <= config.difficulty_tolerance
        && template
            .time_estimate_minutes
            .abs_diff(params.time_required_minutes)
            <= config.time_tolerance_minutes
        && (template.energy_level - params.energy_required).abs() <= config.energy_tolerance + 1e-9
        && template.focus_required.abs_diff(params.focus_level) <= config.focus_tolerance
        && skill_overlap(template, &alignment) > 0
}

/// Equal-weight closeness score in [0, 1]
pub fn score_template(template: &QuestTemplate, params: &QuestParameters) -> f64 {
    let alignment: BTreeSet<&SkillId> = params.skill_alignment.iter().collect();

    let difficulty = 1.0 - template.difficulty.abs_diff(params.difficulty) as f64 / 5.0;
    let time = 1.0
        - template
            .time_estimate_minutes
            .abs_diff(params.time_required_minutes) as f64 / 60.0;
    let energy = 1.0 - (template.energy_level - params.energy_required).abs();
    let focus = 1.0 - template.focus_required.abs_diff(params.focus_level) as f64 / 5.0;

    let denominator = template.skills.len().max(alignment.len());
    let skills = if denominator == 0 {
        0.0
    } else {
        skill_overlap(template, &alignment) as f64 / denominator as f64
    };

    TERM_WEIGHT * (difficulty + time + energy + focus + skills)
}

/// Pick the best compatible template, or synthesize one from `params`
///
/// Ties go to the template listed first in the catalog. `rng` is only
/// drawn from when a fallback id is needed.
pub fn match_template<R: Rng + ?Sized>(
    params: &QuestParameters,
    catalog: &TemplateCatalog,
    config: &EngineConfig,
    rng: &mut R,
) -> TemplateMatch {
    let mut best: Option<(&QuestTemplate, f64)> = None;
    for template in catalog.all() {
        if !is_compatible(template, params, config) {
            continue;
        }
        let score = score_template(template, params);
        tracing::trace!(template = %template.id, score, "compatible template");
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((template, score)),
        }
    }

    match best {
        Some((template, score)) => {
            tracing::debug!(template = %template.id, score, "matched template");
            TemplateMatch {
                template: template.clone(),
                score: Some(score),
            }
        }
        None => {
            let template = fallback_template(params, rng);
            tracing::debug!(template = %template.id, "no compatible template, synthesized fallback");
            TemplateMatch {
                template,
                score: None,
            }
        }
    }
}

/// Build a generic template straight from the parameters
pub fn fallback_template<R: Rng + ?Sized>(params: &QuestParameters, rng: &mut R) -> QuestTemplate {
    let category = params
        .primary_skill()
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| GENERAL_CATEGORY.to_string());

    let mut variables = BTreeMap::new();
    variables.insert("skill".to_string(), display_name(&category));

    QuestTemplate {
        id: format!("dynamic-{}", random_suffix(rng)),
        title_pattern: "Focused {skill} Session".into(),
        description_pattern:
            "Spend {duration} minutes practicing {skill}. Note one thing that went better than last time."
                .into(),
        category,
        difficulty: params.difficulty.clamp(1, 5),
        time_estimate_minutes: params.time_required_minutes,
        energy_level: params.energy_required.clamp(0.0, 1.0),
        focus_required: params.focus_level.clamp(1, 5),
        skills: params.skill_alignment.iter().cloned().collect(),
        variables,
    }
}

/// "deep_work" -> "deep work"
pub fn display_name(id: &str) -> String {
    id.replace(['_', '-'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(skills: &[&str]) -> QuestParameters {
        QuestParameters {
            difficulty: 2,
            time_required_minutes: 30,
            energy_required: 0.4,
            focus_level: 4,
            skill_alignment: skills.iter().map(|s| SkillId::from(*s)).collect(),
            growth_potential: 0.5,
            optimal_hour: None,
        }
    }

    #[test]
    fn test_perfect_match_scores_one() {
        let catalog = TemplateCatalog::with_defaults();
        let reading = catalog.get("focused_reading").unwrap();
        let score = score_template(reading, &params(&["reading"]));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_skill_overlap_required() {
        let catalog = TemplateCatalog::with_defaults();
        let reading = catalog.get("focused_reading").unwrap();
        let config = EngineConfig::default();
        assert!(is_compatible(reading, &params(&["reading"]), &config));
        assert!(!is_compatible(reading, &params(&["running"]), &config));
    }

    #[test]
    fn test_tolerance_bands() {
        let catalog = TemplateCatalog::with_defaults();
        let reading = catalog.get("focused_reading").unwrap();
        let config = EngineConfig::default();

        let mut p = params(&["reading"]);
        p.time_required_minutes = 45;
        assert!(is_compatible(reading, &p, &config));
        p.time_required_minutes = 46;
        assert!(!is_compatible(reading, &p, &config));

        let mut p = params(&["reading"]);
        p.energy_required = 0.7;
        assert!(is_compatible(reading, &p, &config));
        p.energy_required = 0.75;
        assert!(!is_compatible(reading, &p, &config));

        let mut p = params(&["reading"]);
        p.difficulty = 4;
        assert!(!is_compatible(reading, &p, &config));
    }

    #[test]
    fn test_best_template_selected() {
        let catalog = TemplateCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = match_template(&params(&["reading"]), &catalog, &EngineConfig::default(), &mut rng);
        assert_eq!(result.template.id, "focused_reading");
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_ties_go_to_catalog_order() {
        let mut catalog = TemplateCatalog::new();
        let base = TemplateCatalog::with_defaults().get("focused_reading").unwrap().clone();
        let mut twin = base.clone();
        twin.id = "twin".into();
        catalog.add(base);
        catalog.add(twin);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = match_template(&params(&["reading"]), &catalog, &EngineConfig::default(), &mut rng);
        assert_eq!(result.template.id, "focused_reading");
    }

    #[test]
    fn test_fallback_when_nothing_compatible() {
        let catalog = TemplateCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p = params(&["woodworking", "reading"]);
        let mut far = p.clone();
        far.time_required_minutes = 120;

        let result = match_template(&far, &catalog, &EngineConfig::default(), &mut rng);
        assert!(result.is_fallback());
        assert_eq!(result.template.category, "woodworking");
        assert!(result.template.id.starts_with("dynamic-"));
        assert_eq!(result.template.variables["skill"], "woodworking");
        assert_eq!(result.template.skills.len(), 2);
    }

    #[test]
    fn test_fallback_without_alignment_is_general() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let template = fallback_template(&QuestParameters::default(), &mut rng);
        assert_eq!(template.category, GENERAL_CATEGORY);
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_fallback_id_reproducible() {
        let p = params(&["x"]);
        let a = fallback_template(&p, &mut ChaCha8Rng::seed_from_u64(9));
        let b = fallback_template(&p, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.id, b.id);
    }
}
