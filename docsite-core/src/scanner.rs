//! Source tree discovery: sections, pages and the sidebar.
//!
//! Layout is `<root>/<NN-Section>/<MM-page>.md`. Numeric prefixes only
//! order things; they are stripped from titles and slugs.

use crate::models::{PageSource, Section, SidebarPage, SidebarSection};
use crate::slug::{clean_display_name, clean_folder_name, slugify};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result of scanning a source root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedSite {
    /// Every page in global order (sections, then folder, then file name)
    pub pages: Vec<PageSource>,
    pub sidebar: Vec<SidebarSection>,
}

impl ScannedSite {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A page plus the original names it is ordered by
struct ScannedPage {
    folder_name: String,
    file_name: String,
    source: PageSource,
}

/// Scan `root` for sections and pages.
///
/// A missing root is not an error; it produces an empty site.
pub fn scan(root: &Path) -> Result<ScannedSite, ScanError> {
    if !root.is_dir() {
        tracing::warn!("Source directory {:?} does not exist; nothing to build", root);
        return Ok(ScannedSite::default());
    }

    let mut sections: Vec<Section> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();
    let mut scanned: Vec<Vec<ScannedPage>> = Vec::new();

    for folder in list_children(root)?.into_iter().filter(is_visible_dir) {
        let folder_name = folder.file_name().to_string_lossy().to_string();
        let title = clean_folder_name(&folder_name);
        let slug = slugify(&title);
        if slug.is_empty() {
            tracing::warn!("Skipping folder {:?}: name yields an empty slug", folder.path());
            continue;
        }

        let idx = *by_title.entry(title.clone()).or_insert_with(|| {
            sections.push(Section {
                title: title.clone(),
                sort_key: folder_name.clone(),
                slug: slug.clone(),
                pages: Vec::new(),
            });
            scanned.push(Vec::new());
            sections.len() - 1
        });
        if sections[idx].sort_key != folder_name {
            tracing::debug!(
                "Merging folder {:?} into section '{}'",
                folder_name,
                sections[idx].title
            );
        }

        for file in list_children(folder.path())?
            .into_iter()
            .filter(is_markdown_file)
        {
            let file_name = file.file_name().to_string_lossy().to_string();
            let display_title = clean_display_name(&file_name);
            let page_slug = slugify(&display_title);
            if page_slug.is_empty() {
                tracing::warn!("Skipping {:?}: name yields an empty slug", file.path());
                continue;
            }

            scanned[idx].push(ScannedPage {
                folder_name: folder_name.clone(),
                file_name,
                source: PageSource {
                    source_path: file.path().to_path_buf(),
                    section_title: title.clone(),
                    section_slug: sections[idx].slug.clone(),
                    display_title,
                    slug: page_slug,
                },
            });
        }
    }

    for (section, mut pages) in sections.iter_mut().zip(scanned) {
        pages.sort_by(|a, b| {
            (a.folder_name.as_str(), a.file_name.as_str())
                .cmp(&(b.folder_name.as_str(), b.file_name.as_str()))
        });
        section.pages = pages.into_iter().map(|p| p.source).collect();
    }

    sections.retain(|section| {
        if section.pages.is_empty() {
            tracing::debug!("Omitting section '{}': no markdown files", section.title);
        }
        !section.pages.is_empty()
    });
    sections.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

    let sidebar = sections.iter().map(sidebar_section).collect();
    let pages = sections.into_iter().flat_map(|s| s.pages).collect();

    Ok(ScannedSite { pages, sidebar })
}

/// Sidebar entry for a section, in page order
pub fn sidebar_section(section: &Section) -> SidebarSection {
    SidebarSection {
        title: section.title.clone(),
        slug: section.slug.clone(),
        pages: section
            .pages
            .iter()
            .map(|page| SidebarPage {
                title: page.display_title.clone(),
                slug: page.slug.clone(),
                url: page.url(),
            })
            .collect(),
    }
}

fn list_children(dir: &Path) -> Result<Vec<DirEntry>, ScanError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ScanError::List {
            path: dir.to_path_buf(),
            source,
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_visible_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && !is_hidden(entry)
}

fn is_markdown_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && !is_hidden(entry)
        && entry.path().extension().is_some_and(|ext| ext == "md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# page\n").unwrap();
    }

    fn order(site: &ScannedSite) -> Vec<String> {
        site.pages
            .iter()
            .map(|p| format!("{}/{}", p.section_slug, p.slug))
            .collect()
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let dir = TempDir::new().unwrap();
        // Created out of order on purpose
        touch(dir.path(), "02-Guides/b.md");
        touch(dir.path(), "01-Intro/b.md");
        touch(dir.path(), "02-Guides/a.md");
        touch(dir.path(), "01-Intro/a.md");

        let site = scan(dir.path()).unwrap();
        assert_eq!(
            order(&site),
            vec!["intro/a", "intro/b", "guides/a", "guides/b"]
        );
        assert_eq!(site.sidebar.len(), 2);
        assert_eq!(site.sidebar[0].title, "Intro");
        assert_eq!(site.sidebar[1].slug, "guides");
    }

    #[test]
    fn test_titles_and_slugs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01-Getting Started/02-First Steps.md");

        let site = scan(dir.path()).unwrap();
        let page = &site.pages[0];
        assert_eq!(page.section_title, "Getting Started");
        assert_eq!(page.section_slug, "getting-started");
        assert_eq!(page.display_title, "First Steps");
        assert_eq!(page.slug, "first-steps");
        assert_eq!(page.url(), "/getting-started/first-steps/");
        assert_eq!(site.sidebar[0].pages[0].url, "/getting-started/first-steps/");
    }

    #[test]
    fn test_folders_with_same_title_merge() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01-API/z.md");
        touch(dir.path(), "02-Guides/a.md");
        touch(dir.path(), "03-API/a.md");

        let site = scan(dir.path()).unwrap();
        assert_eq!(order(&site), vec!["api/z", "api/a", "guides/a"]);
        assert_eq!(site.sidebar.len(), 2);
        assert_eq!(site.sidebar[0].pages.len(), 2);
    }

    #[test]
    fn test_empty_sections_and_other_files_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("01-Empty")).unwrap();
        fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        touch(dir.path(), ".hidden/a.md");
        touch(dir.path(), "02-Docs/notes.txt");
        touch(dir.path(), "02-Docs/page.md");
        touch(dir.path(), "loose.md");

        let site = scan(dir.path()).unwrap();
        assert_eq!(order(&site), vec!["docs/page"]);
        assert_eq!(site.sidebar.len(), 1);
    }

    #[test]
    fn test_empty_slugs_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01-!!!/a.md");
        touch(dir.path(), "02-Docs/01-???.md");
        touch(dir.path(), "02-Docs/02-ok.md");

        let site = scan(dir.path()).unwrap();
        assert_eq!(order(&site), vec!["docs/ok"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let site = scan(&dir.path().join("nope")).unwrap();
        assert!(site.is_empty());
        assert!(site.sidebar.is_empty());
    }
}
