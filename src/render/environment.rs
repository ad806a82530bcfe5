use std::path::Path;

use tera::Tera;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SiteError};

/// Prefix for content templates inside their private engine instance, so a content file never
/// shadows a shared template with the same relative name.
const CONTENT_TEMPLATE_PREFIX: &str = "@content/";

/// Which templates get HTML autoescaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Autoescape {
    /// Every template, whatever its name.
    #[default]
    All,
    /// Tera's default: `.html`, `.htm` and `.xml` only.
    HtmlSuffixes,
    Off,
}

impl Autoescape {
    fn suffixes(self) -> Vec<&'static str> {
        match self {
            Autoescape::All => vec![""],
            Autoescape::HtmlSuffixes => vec![".html", ".htm", ".xml"],
            Autoescape::Off => Vec::new(),
        }
    }
}

/// Engine configuration for one pipeline run: the autoescape mode and the shared templates
/// loaded from the templates root.
#[derive(Debug, Clone)]
pub struct TemplateEnvironment {
    library: Tera,
}

/// A content file compiled against the shared templates.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    /// Relative path under the content root, `/`-separated.
    pub(crate) file: String,
    pub(crate) name: String,
    pub(crate) tera: Tera,
}

impl CompiledTemplate {
    #[cfg(test)]
    pub(crate) fn file(&self) -> &str {
        &self.file
    }
}

impl TemplateEnvironment {
    /// An environment with no shared templates.
    pub fn empty(autoescape: Autoescape) -> Self {
        let mut library = Tera::default();
        library.autoescape_on(autoescape.suffixes());
        library.set_escape_fn(escape_html);
        Self { library }
    }

    /// Load every text file under `templates_root` as a shared template, named by its path
    /// relative to that root. A missing templates root leaves the library empty.
    pub fn load(templates_root: &Path, autoescape: Autoescape) -> Result<Self> {
        let mut env = Self::empty(autoescape);

        if !templates_root.is_dir() {
            debug!(path = %templates_root.display(), "no templates directory");
            return Ok(env);
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(templates_root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| SiteError::Walk { source: e })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let bytes = std::fs::read(path).map_err(|e| SiteError::Io {
                context: format!("reading {}", path.display()),
                source: e,
            })?;
            let name = template_name(
                path.strip_prefix(templates_root)
                    .expect("entry must be under templates root"),
            );

            match String::from_utf8(bytes) {
                Ok(source) => sources.push((name, source)),
                Err(_) => {
                    warn!(template = %name, "skipping shared template that is not valid UTF-8")
                }
            }
        }

        debug!(count = sources.len(), "loading shared templates");
        env.library
            .add_raw_templates(sources)
            .map_err(|e| SiteError::TemplateCompile {
                file: templates_root.display().to_string(),
                source: e,
            })?;

        Ok(env)
    }

    /// Names of the loaded shared templates, sorted.
    #[cfg(test)]
    pub(crate) fn shared_templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.library.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Compile a content file. Syntax errors and missing `extends` parents fail here; missing
    /// includes and undefined variables only surface when rendering.
    pub fn compile(&self, relative_path: &Path, source: &str) -> Result<CompiledTemplate> {
        let file = template_name(relative_path);
        let name = format!("{CONTENT_TEMPLATE_PREFIX}{file}");

        let mut tera = self.library.clone();
        tera.add_raw_template(&name, source)
            .map_err(|e| SiteError::TemplateCompile {
                file: file.clone(),
                source: e,
            })?;

        Ok(CompiledTemplate { file, name, tera })
    }
}

/// Escape `& < > " '` only, so URLs and paths in variables keep their slashes.
fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&#34;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

/// Template names always use `/`, whatever the platform separator.
fn template_name(relative_path: &Path) -> String {
    relative_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
