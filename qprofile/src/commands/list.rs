// qprofile/src/commands/list.rs
//
// USE CASE: List built-in profiles, grouped by language.

use std::path::PathBuf;

use qprofile_core::application::load_builtin_profiles;

use crate::cli::OutputFormat;

pub fn execute(project_dir: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let loaded = load_builtin_profiles(&project_dir)?;
    let profiles = loaded.registry.get()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(profiles)?);
        }
        OutputFormat::Text => {
            println!("📋 Built-in profiles of '{}'", loaded.config.name);
            let mut current_language: Option<&str> = None;
            for profile in profiles {
                if current_language != Some(profile.language.as_str()) {
                    println!("\n{}", profile.language);
                    current_language = Some(profile.language.as_str());
                }
                let marker = if profile.is_default { " (default)" } else { "" };
                println!(
                    "   {}{} - {} rule(s)",
                    profile.name,
                    marker,
                    profile.active_rules.len()
                );
            }
        }
    }

    Ok(())
}
