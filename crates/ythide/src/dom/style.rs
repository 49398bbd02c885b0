// ABOUTME: Inline `style` attribute helpers for reading and rewriting single CSS declarations.
// ABOUTME: Used to capture, hide, and restore an element's display value and to read progress widths.

/// Splits an inline style into `(property, value)` pairs, skipping malformed parts.
fn declarations(css: &str) -> impl Iterator<Item = (&str, &str)> {
    css.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some((name, value.trim()))
        }
    })
}

/// Returns the value of `property` in an inline style string, or an empty string.
///
/// When a property is declared more than once the last declaration wins,
/// matching how browsers resolve inline styles.
pub fn get_property(css: &str, property: &str) -> String {
    declarations(css)
        .filter(|(name, _)| name.eq_ignore_ascii_case(property))
        .last()
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// Returns `css` with `property` set to `value`.
///
/// Existing declarations of the property are replaced in place; otherwise the
/// declaration is appended. An empty `value` removes the property.
pub fn set_property(css: &str, property: &str, value: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut written = false;

    for (name, current) in declarations(css) {
        if name.eq_ignore_ascii_case(property) {
            if !written && !value.is_empty() {
                out.push(format!("{}: {}", property, value));
                written = true;
            }
            continue;
        }
        out.push(format!("{}: {}", name, current));
    }

    if !written && !value.is_empty() {
        out.push(format!("{}: {}", property, value));
    }

    if out.is_empty() {
        String::new()
    } else {
        format!("{};", out.join("; "))
    }
}

/// Parses a CSS percentage such as `"42%"` into its leading integer.
///
/// Mirrors integer parsing of the numeral: leading whitespace and a sign are
/// accepted, a fractional part is truncated, a numeral too large for `i64`
/// saturates, and anything without leading digits yields `None`.
pub fn parse_percent(width: &str) -> Option<i64> {
    let numeral = width.trim().trim_end_matches('%').trim_start();
    let (negative, digits) = match numeral.as_bytes().first() {
        Some(b'-') => (true, &numeral[1..]),
        Some(b'+') => (false, &numeral[1..]),
        _ => (false, numeral),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let numeral = &digits[..end];
    if numeral.is_empty() {
        return None;
    }
    // Only overflow can fail here; the slice is all ASCII digits.
    let value = numeral.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
