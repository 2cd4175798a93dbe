//! Init command implementation.

use anyhow::{bail, Context, Result};
use docsite_core::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"site:
  title: "My Docs"
  description: "Project documentation"

paths:
  source: src
  output: dist
  static: static

header:
  github_link: null
  github_contribution_link: null
  internals: []
  externals: []
  dropdowns: []
  # internals:
  #   - header: "Guide"
  #     link: "/introduction/getting-started/"
  # dropdowns:
  #   - title: "Resources"
  #     items:
  #       - title: "API"
  #         link: "/api/"
"#;

const SAMPLE_PAGE: &str = r#"+++
title: Getting Started
+++

# Getting Started

Welcome to your new documentation site. Sections are folders under `src/`
and pages are markdown files inside them; numeric prefixes such as `01-`
set the order and are dropped from titles and URLs.

:::tip
Run `docsite build` and open `dist/index.html` to see the result.
:::

## Next steps

- Add more pages to `src/01-Introduction/`
- Create another section, for example `src/02-Guides/`
- Put images, stylesheets and a `logo.*` or `favicon.*` in `static/`
"#;

/// Initialize a new docsite project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_source(root)?;

    println!("✓ docsite initialized in {:?}", root);
    println!("  - Edit {} to customize site metadata", CONFIG_FILE_NAME);
    println!("  - Write pages in src/<NN-Section>/<NN-page>.md");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{:?} already exists; not overwriting it", config_path);
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_source(root: &Path) -> Result<()> {
    let section = root.join("src").join("01-Introduction");
    let static_dir = root.join("static");

    for dir in [&section, &static_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let sample = section.join("01-getting-started.md");
    if !sample.exists() {
        fs::write(&sample, SAMPLE_PAGE)
            .with_context(|| format!("Failed to write {:?}", sample))?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsite_core::Config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_yaml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.site.title, "My Docs");
        assert!(config.header.github_link.is_none());
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "site:\n  title: Mine\n").unwrap();

        assert!(init_project(Some(dir.path())).is_err());
        let kept = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(kept, "site:\n  title: Mine\n");
    }
}
