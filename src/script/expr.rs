//! Argument quoting for injected script expressions.
//!
//! Callers can pass either a literal string (a class name, a selector, an
//! HTML fragment) or inline script (an anonymous function, a `jQuery(..)`
//! expression, a `document.*` reference) through the same parameter. A
//! literal gets wrapped in apostrophes before being spliced into the script;
//! inline script passes through verbatim.

/// Whether a parameter is a literal that must be wrapped in apostrophes.
///
/// A parameter is treated as inline script when, before the first `(`, it
/// contains `function`, `$`, or `jQuery`, or when, before the first `.`, it
/// contains `document`. Everything else is a literal.
pub fn requires_apostrophe(parameter: &str) -> bool {
    let before_paren = parameter.split('(').next().unwrap_or(parameter);
    let before_dot = parameter.split('.').next().unwrap_or(parameter);

    !(before_paren.contains("function")
        || before_paren.contains('$')
        || before_paren.contains("jQuery")
        || before_dot.contains("document"))
}

/// Wrap a literal argument in apostrophes; pass inline script through
pub fn quote_arg(arg: &str) -> String {
    if requires_apostrophe(arg) {
        format!("'{}'", arg)
    } else {
        arg.to_string()
    }
}

/// Comma-join a list of arguments, quoting each one independently.
/// Used by the variadic content insertions (`after`, `append`, `before`).
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote_arg(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
