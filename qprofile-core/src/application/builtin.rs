// qprofile-core/src/application/builtin.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::builtin::BuiltInProfileRegistry;
use crate::error::QProfileError;
use crate::infrastructure::adapters::CachingRuleFinder;
use crate::infrastructure::config::{
    ProjectConfig, RuleSet, load_contributions, load_project_config, load_rule_catalogs,
};

/// Everything the startup sequence produces for a project directory.
#[derive(Debug)]
pub struct BuiltInProfiles {
    pub config: ProjectConfig,
    pub rule_set: RuleSet,
    pub registry: BuiltInProfileRegistry,
}

/// Loads the configuration, the rule catalogs and the contributed
/// definitions, then initializes the built-in profile registry.
#[instrument(skip(project_dir))]
pub fn load_builtin_profiles(project_dir: &Path) -> Result<BuiltInProfiles, QProfileError> {
    // 1. Configuration
    let config = load_project_config(project_dir)?;

    // 2. Catalogue des règles
    let rule_set = load_rule_catalogs(project_dir, &config.rule_paths)?;
    let finder = CachingRuleFinder::new(rule_set.rules.iter().cloned());

    // 3. Contributions
    let contributions = load_contributions(project_dir, &config.profile_paths)?;

    // 4. Fusion
    let registry = BuiltInProfileRegistry::new();
    registry.initialize(&contributions, &config.languages, &finder)?;

    info!(
        project = %config.name,
        languages = config.languages.len(),
        "Built-in profiles ready"
    );

    Ok(BuiltInProfiles {
        config,
        rule_set,
        registry,
    })
}
