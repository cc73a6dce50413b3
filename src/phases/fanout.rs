//! Steps 4 and 6: Fan-out and Static Asset Copy
//!
//! Both steps run [`AssetCopyRule`]s: the rule's pattern is expanded against
//! its source directory, every destination entry is expanded to existing
//! directories, and each matched file is copied into each directory under its
//! base name.
//!
//! Fan-out rules are derived from the project list: each project's build
//! output is copied into the asset directory of every *other* project, so a
//! project never receives its own files. A rule matching nothing is a valid
//! zero-copy outcome.

use log::{debug, info};

use crate::config::{AssetCopyRule, Config};
use crate::error::Result;
use crate::filesystem;
use crate::path::{expand_dirs, expand_files, rooted_pattern};

/// One rule per project: its build output into every sibling's asset dir.
pub fn sibling_rules(config: &Config) -> Vec<AssetCopyRule> {
    let fanout = &config.fanout;
    config
        .projects
        .iter()
        .map(|source| AssetCopyRule {
            from: source.root.join(&fanout.source),
            pattern: fanout.pattern.clone(),
            to: config
                .projects
                .iter()
                .filter(|dest| dest.name != source.name)
                .map(|dest| rooted_pattern(&dest.root, &fanout.destination))
                .collect(),
        })
        .collect()
}

/// Run one rule. Returns the number of files copied.
pub fn copy_rule(rule: &AssetCopyRule) -> Result<usize> {
    let files = expand_files(&rule.from, &rule.pattern)?;
    if files.is_empty() {
        debug!(
            "No files match {} in {}",
            rule.pattern,
            rule.from.display()
        );
        return Ok(0);
    }

    let mut dirs = Vec::new();
    for dest in &rule.to {
        dirs.extend(expand_dirs(dest)?);
    }

    let mut copied = 0;
    for file in &files {
        for dir in &dirs {
            if file.parent() == Some(dir.as_path()) {
                continue;
            }
            filesystem::copy_into(file, dir)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Run several rules. Returns the total number of files copied.
pub fn copy_rules(rules: &[AssetCopyRule]) -> Result<usize> {
    let mut total = 0;
    for rule in rules {
        total += copy_rule(rule)?;
    }
    Ok(total)
}

/// Distribute every project's minified build to its siblings.
pub fn execute(config: &Config) -> Result<usize> {
    let copied = copy_rules(&sibling_rules(config))?;
    info!("Fan-out: {} file(s) copied", copied);
    Ok(copied)
}

/// Run the configured static asset copy rules.
pub fn copy_static_assets(config: &Config) -> Result<usize> {
    let copied = copy_rules(&config.assets)?;
    info!("Static assets: {} file(s) copied", copied);
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const NAMES: [&str; 4] = ["core", "grid", "charts", "maps"];

    fn setup(root: &Path) -> Config {
        let mut yaml = String::from("projects:\n");
        for name in NAMES {
            let dir = root.join(name);
            fs::create_dir_all(dir.join("build/output")).unwrap();
            fs::create_dir_all(dir.join("demo/assets")).unwrap();
            fs::write(dir.join(format!("build/output/{}.min.js", name)), name).unwrap();
            fs::write(dir.join(format!("build/output/{}.js", name)), name).unwrap();
            yaml.push_str(&format!("  - {{ name: {0}, root: {0} }}\n", name));
        }
        crate::config::parse(&yaml, root).unwrap()
    }

    fn assets(root: &Path, name: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root.join(name).join("demo/assets"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_sibling_rules_exclude_self() {
        let temp = TempDir::new().unwrap();
        let config = setup(temp.path());
        let rules = sibling_rules(&config);

        assert_eq!(rules.len(), 4);
        for (rule, name) in rules.iter().zip(NAMES) {
            assert_eq!(rule.to.len(), 3);
            assert!(rule.to.iter().all(|d| !d.contains(&format!("/{}/", name))));
        }
    }

    #[test]
    fn test_fan_out_symmetry() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let config = setup(root);

        let copied = execute(&config).unwrap();
        assert_eq!(copied, 12);

        for name in NAMES {
            let got = assets(root, name);
            assert_eq!(got.len(), 3, "{} got {:?}", name, got);
            assert!(!got.contains(&format!("{}.min.js", name)));
            assert!(got.iter().all(|f| f.ends_with(".min.js")));
        }
    }

    #[test]
    fn test_globbed_destinations() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("out")).unwrap();
        fs::write(root.join("out/theme.css"), "css").unwrap();
        fs::create_dir_all(root.join("site/one/css")).unwrap();
        fs::create_dir_all(root.join("site/two/css")).unwrap();

        let rule = AssetCopyRule {
            from: root.join("out"),
            pattern: "*.css".to_string(),
            to: vec![rooted_pattern(root, "site/*/css")],
        };
        assert_eq!(copy_rule(&rule).unwrap(), 2);
        assert!(root.join("site/one/css/theme.css").is_file());
        assert!(root.join("site/two/css/theme.css").is_file());
    }

    #[test]
    fn test_no_matches_is_zero() {
        let temp = TempDir::new().unwrap();
        let rule = AssetCopyRule {
            from: temp.path().join("nothing-here"),
            pattern: "*.js".to_string(),
            to: vec![rooted_pattern(temp.path(), "*")],
        };
        assert_eq!(copy_rule(&rule).unwrap(), 0);
    }

    #[test]
    fn test_static_assets_from_config() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        fs::write(root.join("static/logo.svg"), "<svg/>").unwrap();
        fs::create_dir_all(root.join("core/demo/img")).unwrap();

        let yaml = r#"
projects:
  - { name: core, root: core }
assets:
  - from: static
    pattern: "*.svg"
    to: ["core/demo/img"]
"#;
        let config = crate::config::parse(yaml, root).unwrap();
        assert_eq!(copy_static_assets(&config).unwrap(), 1);
        assert!(root.join("core/demo/img/logo.svg").is_file());
    }
}
