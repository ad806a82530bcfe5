use std::path::{Path, PathBuf};

/// Variable file names, in lookup order. The first one that exists wins.
pub const VARS_FILE_NAMES: [&str; 2] = ["vars.yml", "vars.yaml"];

/// Shared layouts and fragments. Never copied to the output.
pub const TEMPLATES_DIR: &str = "templates";

/// The tree mirrored into the destination.
pub const CONTENT_DIR: &str = "content";

/// Fixed locations inside a source root.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub source_root: PathBuf,
    pub templates_root: PathBuf,
    pub content_root: PathBuf,
}

impl SiteLayout {
    pub fn new(source_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            templates_root: source_root.join(TEMPLATES_DIR),
            content_root: source_root.join(CONTENT_DIR),
        }
    }

    /// The variables file to load, if any.
    pub fn vars_file(&self) -> Option<PathBuf> {
        VARS_FILE_NAMES
            .iter()
            .map(|name| self.source_root.join(name))
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_vars_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SiteLayout::new(dir.path()).vars_file().is_none());
    }

    #[test]
    fn test_vars_file_prefers_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vars.yaml"), "a: 1").unwrap();
        fs::write(dir.path().join("vars.yml"), "a: 2").unwrap();

        let layout = SiteLayout::new(dir.path());
        assert_eq!(layout.vars_file(), Some(dir.path().join("vars.yml")));
    }

    #[test]
    fn test_vars_file_falls_back_to_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vars.yaml"), "a: 1").unwrap();

        let layout = SiteLayout::new(dir.path());
        assert_eq!(layout.vars_file(), Some(dir.path().join("vars.yaml")));
    }

    #[test]
    fn test_layout_roots() {
        let layout = SiteLayout::new(Path::new("/site"));
        assert_eq!(layout.templates_root, PathBuf::from("/site/templates"));
        assert_eq!(layout.content_root, PathBuf::from("/site/content"));
    }
}
