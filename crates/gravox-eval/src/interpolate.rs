//! `{{name}}` substitution for `show` output.

/// Replace every `{{ identifier }}` placeholder in `text`.
///
/// Whitespace is allowed inside the braces. `lookup` returns the rendered
/// value of a name, or `None` to leave the placeholder text untouched.
pub fn interpolate(text: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match placeholder(candidate) {
            Some((name, len)) => {
                match lookup(name) {
                    Some(rendered) => out.push_str(&rendered),
                    None => out.push_str(&candidate[..len]),
                }
                rest = &candidate[len..];
            }
            None => {
                // retry one brace further on
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Match `{{ ident }}` at the start of `s`, returning the identifier and the
/// placeholder's byte length.
fn placeholder(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("{{")?.trim_start();
    let ident_len = inner
        .char_indices()
        .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
        .map_or(inner.len(), |(i, _)| i);
    if ident_len == 0 {
        return None;
    }
    let tail = inner[ident_len..].trim_start().strip_prefix("}}")?;
    Some((&inner[..ident_len], s.len() - tail.len()))
}
