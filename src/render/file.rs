use std::path::Path;

use tera::Context;
use tracing::debug;

use crate::error::{Result, SiteError};
use crate::render::context::fill_undefined;
use crate::render::environment::CompiledTemplate;

/// Evaluate a compiled content template.
///
/// An undefined variable renders as an empty string, as does a missing key of a defined
/// mapping. Attribute access on an undefined variable and missing includes are errors.
pub fn render_template(template: &CompiledTemplate, context: &Context) -> Result<String> {
    let mut lenient: Option<Context> = None;

    loop {
        let current = lenient.as_ref().unwrap_or(context);
        let err = match template.tera.render(&template.name, current) {
            Ok(rendered) => return Ok(rendered),
            Err(e) => e,
        };

        let filled = undefined_variable(&err).is_some_and(|path| {
            let ctx = lenient.get_or_insert_with(|| context.clone());
            let filled = fill_undefined(ctx, &path);
            if filled {
                debug!(file = %template.file, variable = %path, "undefined, rendering as empty");
            }
            filled
        });

        if !filled {
            return Err(SiteError::TemplateRender {
                file: template.file.clone(),
                source: err,
            });
        }
    }
}

/// The variable path named by Tera's "Variable `x` not found in context" error, if any.
fn undefined_variable(err: &tera::Error) -> Option<String> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        let message = e.to_string();
        if let Some((path, tail)) = message
            .strip_prefix("Variable `")
            .and_then(|rest| rest.split_once('`'))
        {
            if tail.starts_with(" not found in context") {
                return Some(path.to_string());
            }
        }
        current = e.source();
    }
    None
}

/// Write rendered text to `dest_path`, creating parent directories and replacing any existing
/// file.
pub fn write_rendered(dest_path: &Path, rendered: &str) -> Result<()> {
    create_parent_dirs(dest_path)?;
    std::fs::write(dest_path, rendered).map_err(|e| SiteError::Io {
        context: format!("writing {}", dest_path.display()),
        source: e,
    })
}

/// Copy an asset byte for byte, creating parent directories and replacing any existing file.
pub fn copy_asset(source_path: &Path, dest_path: &Path) -> Result<()> {
    create_parent_dirs(dest_path)?;
    std::fs::copy(source_path, dest_path).map_err(|e| SiteError::Io {
        context: format!(
            "copying {} to {}",
            source_path.display(),
            dest_path.display()
        ),
        source: e,
    })?;
    Ok(())
}

fn create_parent_dirs(dest_path: &Path) -> Result<()> {
    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SiteError::Io {
            context: format!("creating directory {}", parent.display()),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::environment::{Autoescape, TemplateEnvironment};
    use rstest::rstest;
    use std::fs;

    fn compile(source: &str, autoescape: Autoescape) -> CompiledTemplate {
        TemplateEnvironment::empty(autoescape)
            .compile(Path::new("page.txt"), source)
            .unwrap()
    }

    #[test]
    fn test_render_substitutes_variables() {
        let mut context = Context::new();
        context.insert("name", "World");

        let template = compile("Hello, {{ name }}!", Autoescape::All);
        assert_eq!(render_template(&template, &context).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_render_undefined_variable_is_empty() {
        let template = compile("Hello, {{ name }}!{% if flag %} on{% endif %}", Autoescape::All);
        let rendered = render_template(&template, &Context::new()).unwrap();
        assert_eq!(rendered, "Hello, !");
    }

    #[test]
    fn test_render_missing_key_of_defined_mapping_is_empty() {
        let mut context = Context::new();
        context.insert("site", &serde_json::json!({ "title": "Home" }));

        let template = compile("{{ site.title }}|{{ site.subtitle }}|{{ other }}", Autoescape::All);
        assert_eq!(render_template(&template, &context).unwrap(), "Home||");
    }

    #[test]
    fn test_render_attribute_of_undefined_variable_error() {
        let template = compile("Hello, {{ page.title }}!", Autoescape::All);
        let err = render_template(&template, &Context::new()).unwrap_err();
        match err {
            SiteError::TemplateRender { file, .. } => assert_eq!(file, "page.txt"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_missing_include_error() {
        let template = compile(r#"{% include "nope.html" %}"#, Autoescape::All);
        let err = render_template(&template, &Context::new()).unwrap_err();
        assert!(matches!(err, SiteError::TemplateRender { .. }));
    }

    #[test]
    fn test_render_default_filter_for_missing_variable() {
        let template = compile(
            r#"Hello, {{ name | default(value="stranger") }}!"#,
            Autoescape::All,
        );
        let rendered = render_template(&template, &Context::new()).unwrap();
        assert_eq!(rendered, "Hello, stranger!");
    }

    #[rstest]
    #[case(Autoescape::All, "&lt;b&gt;")]
    #[case(Autoescape::HtmlSuffixes, "<b>")]
    #[case(Autoescape::Off, "<b>")]
    fn test_render_autoescape_modes(#[case] mode: Autoescape, #[case] expected: &str) {
        let mut context = Context::new();
        context.insert("tag", "<b>");

        let template = compile("{{ tag }}", mode);
        assert_eq!(render_template(&template, &context).unwrap(), expected);
    }

    #[test]
    fn test_write_rendered_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a/b/c.html");

        write_rendered(&dest, "first").unwrap();
        write_rendered(&dest, "second").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "second");
    }

    #[test]
    fn test_copy_asset_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("logo.bin");
        let bytes: Vec<u8> = (0..=255).collect();
        fs::write(&source, &bytes).unwrap();

        let dest = dir.path().join("out/img/logo.bin");
        copy_asset(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_copy_asset_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_asset(&dir.path().join("nope"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }
}
