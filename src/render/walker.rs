use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::VariableSet;
use crate::error::{Result, SiteError};
use crate::render::context::build_context;
use crate::render::environment::{CompiledTemplate, TemplateEnvironment};
use crate::render::file::{copy_asset, render_template, write_rendered};

/// What a content file turns into.
#[derive(Debug)]
pub enum PlannedContent {
    /// Decoded as UTF-8 and compiled.
    Template(CompiledTemplate),
    /// Not valid UTF-8; copied verbatim from this path.
    Asset(PathBuf),
}

/// One content file and what to do with it.
#[derive(Debug)]
pub struct PlanEntry {
    /// Path relative to both the content root and the destination root.
    pub relative_path: PathBuf,
    pub content: PlannedContent,
}

impl PlanEntry {
    #[cfg(test)]
    pub(crate) fn is_asset(&self) -> bool {
        matches!(self.content, PlannedContent::Asset(_))
    }
}

#[derive(Debug)]
pub struct CompiledSite {
    pub dest_root: PathBuf,
    pub files_rendered: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
}

/// Walk the content root and classify every file.
///
/// A file whose bytes decode as UTF-8 is compiled as a template, anything else becomes an
/// asset. The extension plays no part. Directories produce no entries.
pub fn scan_content(content_root: &Path, env: &TemplateEnvironment) -> Result<Vec<PlanEntry>> {
    if !content_root.exists() {
        warn!(path = %content_root.display(), "content directory not found, nothing to compile");
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(content_root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| SiteError::Walk { source: e })?;
        let src_path = entry.path();

        if entry.file_type().is_dir() {
            continue;
        }
        // Follows symlinks to files; symlinked directories are not descended into.
        if !src_path.is_file() {
            debug!(path = %src_path.display(), "skipping non-file entry");
            continue;
        }

        let relative_path = src_path
            .strip_prefix(content_root)
            .expect("entry must be under content root")
            .to_path_buf();

        let bytes = std::fs::read(src_path).map_err(|e| SiteError::Io {
            context: format!("reading {}", src_path.display()),
            source: e,
        })?;

        let content = match String::from_utf8(bytes) {
            Ok(source) => {
                debug!(file = %relative_path.display(), "template");
                PlannedContent::Template(env.compile(&relative_path, &source)?)
            }
            Err(_) => {
                debug!(file = %relative_path.display(), "asset");
                PlannedContent::Asset(src_path.to_path_buf())
            }
        };

        entries.push(PlanEntry {
            relative_path,
            content,
        });
    }

    Ok(entries)
}

/// Render and write each entry in turn. The first failure aborts; files already written stay.
pub fn execute_plan(
    entries: &[PlanEntry],
    variables: &VariableSet,
    dest_root: &Path,
) -> Result<CompiledSite> {
    let context = build_context(variables);
    let mut files_rendered = Vec::new();
    let mut files_copied = Vec::new();

    for entry in entries {
        let dest_path = dest_root.join(&entry.relative_path);
        match &entry.content {
            PlannedContent::Template(template) => {
                let rendered = render_template(template, &context)?;
                write_rendered(&dest_path, &rendered)?;
                files_rendered.push(entry.relative_path.clone());
            }
            PlannedContent::Asset(source_path) => {
                copy_asset(source_path, &dest_path)?;
                files_copied.push(entry.relative_path.clone());
            }
        }
        debug!(path = %dest_path.display(), "wrote");
    }

    info!(
        rendered = files_rendered.len(),
        copied = files_copied.len(),
        "wrote output files"
    );

    Ok(CompiledSite {
        dest_root: dest_root.to_path_buf(),
        files_rendered,
        files_copied,
    })
}
