#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SiteError {
    #[error("{message}")]
    #[diagnostic(help("Usage: sscomp <SOURCE_DIR> <DEST_DIR>"))]
    Usage { message: String },

    #[error("Failed to parse variables file {path}")]
    #[diagnostic(help("Check the YAML syntax in your vars file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid variables file {path}: {reason}")]
    #[diagnostic(help("The top level of the vars file must be a mapping of names to values"))]
    ConfigShape { path: PathBuf, reason: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk content directory")]
    Walk {
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to compile template: {file}")]
    #[diagnostic(help("Check your Tera template syntax and extends/include targets"))]
    TemplateCompile {
        file: String,
        #[source]
        source: tera::Error,
    },

    #[error("Template rendering failed: {file}")]
    #[diagnostic(help(
        "Check attribute lookups on undefined variables and the targets of include tags"
    ))]
    TemplateRender {
        file: String,
        #[source]
        source: tera::Error,
    },
}

pub type Result<T> = std::result::Result<T, SiteError>;
