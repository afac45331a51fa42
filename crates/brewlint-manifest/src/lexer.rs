//! Just enough Ruby lexing for formula stanzas.
//!
//! Everything here works on a single logical line. String literals may contain
//! `#{...}` interpolations, which are kept verbatim and never escaped.

/// Calls `f` for every character outside string literals, with its byte
/// offset. Stops early when `f` returns `false`.
fn scan_code(s: &str, mut f: impl FnMut(usize, char) -> bool) -> Result<(), String> {
    let mut chars = s.char_indices().peekable();
    let mut quote: Option<char> = None;
    let mut interp = 0usize;

    while let Some((i, c)) = chars.next() {
        let Some(q) = quote else {
            if c == '"' || c == '\'' {
                quote = Some(c);
            } else if !f(i, c) {
                return Ok(());
            }
            continue;
        };

        if interp > 0 {
            match c {
                '{' => interp += 1,
                '}' => interp -= 1,
                _ => {}
            }
            continue;
        }

        match c {
            '\\' => {
                chars.next();
            }
            '#' if q == '"' && chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                interp = 1;
            }
            c if c == q => quote = None,
            _ => {}
        }
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    Ok(())
}

/// Removes a trailing `# comment`, ignoring `#` inside strings.
pub fn strip_comment(line: &str) -> Result<&str, String> {
    let mut cut = line.len();
    scan_code(line, |i, c| {
        if c == '#' {
            cut = i;
            false
        } else {
            true
        }
    })?;
    Ok(&line[..cut])
}

/// Splits an argument list on top-level commas.
///
/// Commas inside strings or brackets do not split. Each argument is trimmed.
pub fn split_args(s: &str) -> Result<Vec<&str>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    scan_code(s, |i, c| {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        depth >= 0
    })?;
    if depth != 0 {
        return Err("unbalanced brackets".to_string());
    }
    parts.push(s[start..].trim());

    if parts.iter().any(|p| p.is_empty()) {
        return Err("empty argument".to_string());
    }
    Ok(parts)
}

/// Parses a token that must be exactly one quoted string literal.
pub fn parse_string_literal(token: &str) -> Result<String, String> {
    let mut chars = token.chars().peekable();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(format!("expected a quoted string, found `{}`", token)),
    };

    let mut out = String::new();
    let mut interp = 0usize;
    let mut closed = false;

    while let Some(c) = chars.next() {
        if closed {
            return Err(format!("unexpected text after string in `{}`", token));
        }
        if interp > 0 {
            out.push(c);
            match c {
                '{' => interp += 1,
                '}' => interp -= 1,
                _ => {}
            }
            continue;
        }
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    return Err("dangling escape".to_string());
                };
                match (quote, next) {
                    ('"', 'n') => out.push('\n'),
                    ('"', 't') => out.push('\t'),
                    ('"', '"' | '\\' | '#') => out.push(next),
                    ('\'', '\'' | '\\') => out.push(next),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            '#' if quote == '"' && chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("#{");
                interp = 1;
            }
            c if c == quote => closed = true,
            c => out.push(c),
        }
    }

    if !closed {
        return Err("unterminated string literal".to_string());
    }
    Ok(out)
}

/// Renders `s` as a double-quoted Ruby string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    let mut interp = 0usize;
    while let Some(c) = chars.next() {
        if interp > 0 {
            out.push(c);
            match c {
                '{' => interp += 1,
                '}' => interp -= 1,
                _ => {}
            }
            continue;
        }
        match c {
            '#' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("#{");
                interp = 1;
            }
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
