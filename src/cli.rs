use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sscomp",
    about = "Compile a tree of templates into a static site",
    version
)]
pub struct Cli {
    /// Source directory containing content/, templates/ and an optional vars.yml
    pub source_dir: PathBuf,

    /// Destination directory for the compiled site
    pub dest_dir: PathBuf,
}
