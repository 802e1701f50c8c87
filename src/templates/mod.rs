//! Quest templates: catalog, matching and text interpolation

pub mod catalog;
pub mod interpolate;
pub mod matcher;

pub use catalog::{QuestTemplate, TemplateCatalog};
pub use interpolate::{interpolate, interpolate_with, placeholders, round_to_five, QuestText};
pub use matcher::{
    fallback_template, is_compatible, match_template, score_template, TemplateMatch,
    GENERAL_CATEGORY,
};
