pub mod config;
pub mod error;
pub mod layout;
pub mod render;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{load_variables, VariableSet};
use crate::error::Result;
use crate::layout::SiteLayout;
use crate::render::{
    execute_plan, scan_content, Autoescape, CompiledSite, PlanEntry, TemplateEnvironment,
};

pub struct CompileOptions {
    /// Absolute path of the source root holding `vars.yml`, `templates/` and `content/`.
    pub source_dir: PathBuf,
    /// Absolute path of the destination root.
    pub dest_dir: PathBuf,
    pub autoescape: Autoescape,
}

impl CompileOptions {
    pub fn new(source_dir: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            dest_dir: dest_dir.as_ref().to_path_buf(),
            autoescape: Autoescape::default(),
        }
    }
}

/// Everything needed to write a site that has been scanned and compiled but not yet rendered.
pub struct CompilePlan {
    pub entries: Vec<PlanEntry>,
    pub variables: VariableSet,
    pub dest_root: PathBuf,
}

/// Load variables, load shared templates and classify the content tree. Writes nothing.
pub fn plan_compile(options: &CompileOptions) -> Result<CompilePlan> {
    let layout = SiteLayout::new(&options.source_dir);

    let variables = load_variables(&layout)?;
    let env = TemplateEnvironment::load(&layout.templates_root, options.autoescape)?;
    let entries = scan_content(&layout.content_root, &env)?;

    info!(
        source = %layout.source_root.display(),
        variables = variables.len(),
        entries = entries.len(),
        "planned compile"
    );

    Ok(CompilePlan {
        entries,
        variables,
        dest_root: options.dest_dir.clone(),
    })
}

/// Render templates and copy assets into the destination root.
pub fn execute_compile(plan: &CompilePlan) -> Result<CompiledSite> {
    execute_plan(&plan.entries, &plan.variables, &plan.dest_root)
}

/// Compile a source tree into the destination root.
pub fn compile_site(options: &CompileOptions) -> Result<CompiledSite> {
    let plan = plan_compile(options)?;
    execute_compile(&plan)
}
