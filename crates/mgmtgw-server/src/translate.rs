//! Structured path to backend resource URI translation.

use mgmtgw_proto::Path;

/// Render `prefix ++ path` as the flat URI the backend addresses resources by.
///
/// Each element becomes `/name`, followed by `[key=value]` for each key in
/// insertion order. `\` and `]` inside key values are escaped with a
/// backslash; everything else is emitted verbatim. The empty path is `/`.
pub fn translate(prefix: Option<&Path>, path: &Path) -> String {
    let elems = prefix
        .into_iter()
        .flat_map(|p| p.elem.iter())
        .chain(path.elem.iter());

    let mut uri = String::new();
    for elem in elems {
        uri.push('/');
        uri.push_str(&elem.name);
        for (key, value) in &elem.key {
            uri.push('[');
            uri.push_str(key);
            uri.push('=');
            push_escaped(&mut uri, value);
            uri.push(']');
        }
    }

    if uri.is_empty() {
        uri.push('/');
    }
    uri
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        if matches!(c, '\\' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
}
