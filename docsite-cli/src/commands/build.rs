//! Build command implementation.

use anyhow::{bail, Context, Result};
use docsite_core::search::to_json;
use docsite_core::{BuiltSite, Config, RedirectLocation, SiteBuilder};
use docsite_render::{render_page, render_redirect, HeaderView, SiteAssets};
use include_dir::{include_dir, Dir};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const SEARCH_INDEX_FILE: &str = "search_index.json";

// Default stylesheet and client script, embedded so installs need no data files
static BUNDLED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static");

/// Build the static site and write it to the output directory
pub fn build_site(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    tracing::info!("Building site: {}", config.site.title);

    let site = SiteBuilder::new(config.clone())
        .build()
        .context("Failed to build site")?;

    let output_dir = config.output_dir();
    prepare_output_dir(&config)?;
    extract_bundled_assets(&output_dir)?;

    let static_dir = config.static_dir();
    let assets = if static_dir.is_dir() {
        copy_dir(&static_dir, &output_dir)?;
        tracing::info!("Copied static files from {:?}", static_dir);
        find_site_assets(&static_dir)
    } else {
        tracing::debug!("No static directory at {:?}", static_dir);
        SiteAssets::default()
    };

    write_site(&config, &site, &assets, &output_dir)?;

    tracing::info!("✓ Built {} pages", site.pages.len());
    tracing::info!("✓ Output written to {:?}", output_dir);
    Ok(())
}

/// Load the config file, or fall back to defaults next to where it would be
pub fn load_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        tracing::info!("Loading config from {:?}", config_path);
        Config::from_file(config_path).context("Failed to load configuration")
    } else {
        tracing::info!("No config at {:?}; using defaults", config_path);
        Ok(Config::default_at(config_path))
    }
}

/// Remove and recreate the output directory.
///
/// Refuses an output directory that is, or contains, the source, static or
/// config directory, and one nested inside the static directory.
fn prepare_output_dir(config: &Config) -> Result<()> {
    let output_dir = normalize_path(&config.output_dir())?;
    let static_dir = normalize_path(&config.static_dir())?;

    let protected = [
        ("source", normalize_path(&config.source_dir())?),
        ("static", static_dir.clone()),
        ("config", normalize_path(&config.base_dir())?),
    ];
    for (label, dir) in &protected {
        if dir.starts_with(&output_dir) {
            bail!(
                "Output directory {:?} contains the {} directory {:?}",
                output_dir,
                label,
                dir
            );
        }
    }
    if output_dir.starts_with(&static_dir) {
        bail!(
            "Output directory {:?} is inside the static directory {:?}",
            output_dir,
            static_dir
        );
    }

    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)
            .with_context(|| format!("Failed to clean {:?}", output_dir))?;
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
    Ok(())
}

/// Absolute form of `path` with `.`, `..` and symlinks resolved. The path
/// itself need not exist; its nearest existing ancestor is canonicalized.
fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the working directory")?
            .join(path)
    };

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
            break;
        };
        missing.push(name);
        existing = parent;
    }

    let mut resolved = existing
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", existing))?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

fn write_site(config: &Config, site: &BuiltSite, assets: &SiteAssets, output_dir: &Path) -> Result<()> {
    let header = HeaderView::new(&config.header, assets);

    for page in &site.pages {
        let html = render_page(page, &site.sidebar, config, &header)?;
        write_file(&output_dir.join(page.output_rel_path()), &html)?;
        tracing::debug!("Wrote {}", page.url);
    }

    for redirect in &site.redirects {
        let target = output_dir.join(redirect.output_rel_path());
        if redirect.location == RedirectLocation::Root && target.exists() {
            tracing::info!("Keeping static {:?}; skipping root redirect", target);
            continue;
        }
        write_file(&target, &render_redirect(redirect)?)?;
        tracing::debug!(
            "Redirect {:?} -> {}",
            redirect.output_rel_path(),
            redirect.target_url
        );
    }

    let index = to_json(&site.search_index).context("Failed to serialize search index")?;
    write_file(&output_dir.join(SEARCH_INDEX_FILE), &index)?;

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

/// Write the embedded assets; files from the project's static directory are
/// copied afterwards and replace them.
fn extract_bundled_assets(dest: &Path) -> Result<()> {
    for entry in BUNDLED_ASSETS.entries() {
        extract_entry(entry, dest)?;
    }
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            let target = dest.join(file.path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.contents())
                .with_context(|| format!("Failed to write bundled asset {:?}", target))?;
        }
    }
    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
    }
    Ok(())
}

/// Locate `logo.*` and `favicon.*` anywhere under the static directory.
/// The first match in file-name order wins.
fn find_site_assets(static_dir: &Path) -> SiteAssets {
    let mut assets = SiteAssets::default();

    for entry in WalkDir::new(static_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let slot = match stem {
            "logo" => &mut assets.logo,
            "favicon" => &mut assets.favicon,
            _ => continue,
        };
        if slot.is_none() {
            let relative = entry.path().strip_prefix(static_dir).unwrap_or(entry.path());
            let url_path: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            *slot = Some(format!("/{}", url_path.join("/")));
        }
    }

    assets
}
