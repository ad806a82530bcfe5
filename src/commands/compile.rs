use std::path::{Path, PathBuf};

use console::style;
use miette::Result;

use sscomp::error::SiteError;
use sscomp::CompileOptions;

pub fn run(source_dir: PathBuf, dest_dir: PathBuf) -> Result<()> {
    let source_dir = resolve_source_dir(&source_dir)?;
    let dest_dir = resolve_dest_dir(&dest_dir)?;

    let options = CompileOptions::new(&source_dir, &dest_dir);
    let site = sscomp::compile_site(&options)?;

    println!(
        "{} Site compiled into {}",
        style("✓").green().bold(),
        style(site.dest_root.display()).cyan()
    );
    println!(
        "  {} files rendered, {} files copied",
        site.files_rendered.len(),
        site.files_copied.len()
    );

    Ok(())
}

fn resolve_source_dir(path: &Path) -> std::result::Result<PathBuf, SiteError> {
    let resolved = resolve_existing_dir("SOURCE_DIR", path)?;
    if std::fs::read_dir(&resolved).is_err() {
        return Err(usage("SOURCE_DIR", path, "is not readable"));
    }
    Ok(resolved)
}

fn resolve_dest_dir(path: &Path) -> std::result::Result<PathBuf, SiteError> {
    let resolved = resolve_existing_dir("DEST_DIR", path)?;
    // Write check with a throwaway file; it is removed on drop.
    let scratch = tempfile::Builder::new()
        .prefix(".sscomp-write-check")
        .tempfile_in(&resolved);
    if scratch.is_err() {
        return Err(usage("DEST_DIR", path, "is not writable"));
    }
    Ok(resolved)
}

fn resolve_existing_dir(arg: &str, path: &Path) -> std::result::Result<PathBuf, SiteError> {
    let resolved =
        std::fs::canonicalize(path).map_err(|_| usage(arg, path, "does not exist"))?;
    if !resolved.is_dir() {
        return Err(usage(arg, path, "is a file"));
    }
    Ok(resolved)
}

fn usage(arg: &str, path: &Path, problem: &str) -> SiteError {
    SiteError::Usage {
        message: format!(
            "Invalid value for '{arg}': Directory '{}' {problem}.",
            path.display()
        ),
    }
}
