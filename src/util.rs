/// Convert a camel case name to its snake case column form.
///
/// `openId` becomes `open_id`, `UserInfo` becomes `user_info`. A leading
/// capital does not produce a leading underscore.
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.char_indices() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Write `values` through `f` interleaving `separator`, skipping entries that
/// produce no output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut wrote = false;
    for v in values {
        let base = out.len();
        if wrote {
            out.push_str(separator);
        }
        let start = out.len();
        f(out, v);
        if out.len() == start {
            // Entry produced nothing, take back the separator too.
            out.truncate(base);
        } else {
            wrote = true;
        }
    }
}

/// Quote an identifier, doubling inner quotes.
pub fn write_identifier(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
