// qprofile/src/commands/check.rs
//
// USE CASE: Pre-flight validation of rule catalogs and contributed profiles.

use std::collections::BTreeSet;
use std::path::PathBuf;

use qprofile_core::application::load_builtin_profiles;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("✅ Checking built-in profiles...");

    let loaded = match load_builtin_profiles(&project_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("{:?}", miette::Report::new(e));
            eprintln!("\n💥 Built-in profiles are invalid.");
            std::process::exit(1);
        }
    };

    let profiles = loaded.registry.get()?;
    let languages: BTreeSet<&str> = profiles.iter().map(|p| p.language.as_str()).collect();

    println!(
        "   {} rule(s), {} built-in profile(s) for {} language(s)",
        loaded.rule_set.rules.len(),
        profiles.len(),
        languages.len()
    );
    for profile in profiles.iter().filter(|p| p.is_default) {
        println!("   {} -> {}", profile.language, profile.name);
    }
    println!("✨ All built-in profiles are valid.");

    Ok(())
}
