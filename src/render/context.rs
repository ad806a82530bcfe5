use tera::{Context, Value};

use crate::config::VariableSet;

/// Expose every variable at the top level of the template context.
pub fn build_context(variables: &VariableSet) -> Context {
    let mut context = Context::new();
    for (key, value) in variables {
        context.insert(key, value);
    }
    context
}

/// Bind an undefined `name` or `a.b.c` path to an empty string.
///
/// A dotted path is only filled when everything above its last segment is a defined mapping;
/// looking up an attribute of something undefined stays an error. Returns `false` when nothing
/// was bound, so callers never retry the same path twice.
pub fn fill_undefined(context: &mut Context, path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    if !segments.iter().all(|s| is_identifier(s)) {
        return false;
    }

    let Some((root, rest)) = segments.split_first() else {
        return false;
    };
    let Some((leaf, parents)) = rest.split_last() else {
        if context.contains_key(root) {
            return false;
        }
        context.insert(*root, "");
        return true;
    };

    let Some(mut value) = context.get(root).cloned() else {
        return false;
    };
    let mut target = &mut value;
    for segment in parents {
        target = match target.get_mut(*segment) {
            Some(next) => next,
            None => return false,
        };
    }
    let Some(object) = target.as_object_mut() else {
        return false;
    };
    if object.contains_key(*leaf) {
        return false;
    }
    object.insert(leaf.to_string(), Value::String(String::new()));

    context.insert(*root, &value);
    true
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
