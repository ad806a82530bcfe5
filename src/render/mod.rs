pub mod context;
pub mod environment;
pub mod file;
pub mod walker;

pub use context::build_context;
pub use environment::{Autoescape, CompiledTemplate, TemplateEnvironment};
pub use walker::{execute_plan, scan_content, CompiledSite, PlanEntry, PlannedContent};
