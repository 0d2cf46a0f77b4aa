// qprofile/src/commands/show.rs

use std::path::PathBuf;

use anyhow::bail;
use qprofile_core::application::load_builtin_profiles;

pub fn execute(project_dir: PathBuf, language: &str, name: &str) -> anyhow::Result<()> {
    let loaded = load_builtin_profiles(&project_dir)?;

    let Some(profile) = loaded.registry.find(language, name)? else {
        bail!("No built-in profile '{}' for language {}", name, language);
    };

    let marker = if profile.is_default { " (default)" } else { "" };
    println!("🔍 {} [{}]{}", profile.name, profile.language, marker);

    for rule in &profile.active_rules {
        let severity = rule
            .severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("   {:<40} {}", rule.rule_key.to_string(), severity);
        for (key, value) in &rule.params {
            println!("      {} = {}", key, value);
        }
    }

    Ok(())
}
