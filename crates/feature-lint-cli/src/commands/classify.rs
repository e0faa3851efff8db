//! Classify command: shows what the classifier makes of a path or URI.

use anyhow::Result;
use feature_lint_core::classify::barrel_target;
use feature_lint_core::PathProfile;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Classification<'a> {
    input: &'a str,
    role: String,
    #[serde(flatten)]
    profile: PathProfile,
    barrel_uri: Option<String>,
}

impl<'a> Classification<'a> {
    fn of(input: &'a str) -> Self {
        let profile = PathProfile::of(input);
        Self {
            input,
            role: profile.role().to_string(),
            barrel_uri: barrel_target(input).map(|t| t.barrel_uri()),
            profile,
        }
    }
}

/// Runs the classify command.
pub fn run(paths: &[String], json: bool) -> Result<()> {
    let results: Vec<_> = paths.iter().map(|p| Classification::of(p)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for c in &results {
        println!("{}", c.input);
        println!("  role:    {}", c.role);
        match &c.profile.feature {
            Some(f) => println!("  feature: {} ({}, {} style)", f.feature_dir, f.feature_name, f.style),
            None => println!("  feature: -"),
        }
        if let Some(uri) = &c.barrel_uri {
            println!("  barrel:  {uri}");
        }
        println!("  core: {}  test: {}", c.profile.is_core, c.profile.is_test);
    }

    Ok(())
}
