//! Printf directive translation.
//!
//! `fmt.Printf` calls carry C-style directives in their format string. The
//! emitter targets Rust's `print!` macro, so the directives the language
//! actually supports (`%s`, `%d`, `%f`, `%v`) are rewritten to `{}` and brace
//! characters are escaped. Everything else in the string, including escape
//! sequences, passes through with its source spelling intact.

/// Strip one layer of surrounding double quotes, if present.
///
/// Literal text reaches the backend with its quotes because the scanner keeps
/// the exact source spelling. Unpaired quotes are left alone.
pub fn unquote(text: &str) -> &str {
    let trimmed = text.strip_prefix('"').and_then(|t| t.strip_suffix('"'));
    match trimmed {
        Some(inner) if text.len() >= 2 => inner,
        _ => text,
    }
}

/// Translate a printf format string (without quotes) into a Rust format
/// string (without quotes).
///
/// `%%` collapses to a literal percent sign. An unrecognized directive is
/// kept verbatim so the mistake stays visible in the generated code.
pub fn to_rust_format(spec: &str) -> String {
    let mut out = String::with_capacity(spec.len());
    let mut chars = spec.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '%' => match chars.peek() {
                Some('s' | 'd' | 'f' | 'v') => {
                    chars.next();
                    out.push_str("{}");
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            },
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(ch),
        }
    }

    out
}
