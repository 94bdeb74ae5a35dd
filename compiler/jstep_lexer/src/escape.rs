//! Escape sequence processing for string and template literals.
//!
//! Recognized escapes: `\n`, `\r`, `\t`, `\b`, `\f`, `\v`, `\0`, `\\`, `\"`,
//! `\'`, `` \` ``, `\$`, `\xHH`, `\uHHHH` and `\u{H...}`. Unknown escapes drop
//! the backslash, as JavaScript does (`\q` is `q`).

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '0' => Some('\0'),
        _ => None,
    }
}

/// Process escape sequences in a literal body (quotes already stripped).
pub(crate) fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            result.push('\\');
            break;
        };
        if let Some(resolved) = resolve_escape(esc) {
            result.push(resolved);
            continue;
        }
        match esc {
            // Line continuation
            '\n' => {}
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                push_code_point(&mut result, &hex, 'x');
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut hex = String::new();
                for h in chars.by_ref() {
                    if h == '}' {
                        break;
                    }
                    hex.push(h);
                }
                push_code_point(&mut result, &hex, 'u');
            }
            'u' => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                push_code_point(&mut result, &hex, 'u');
            }
            other => result.push(other),
        }
    }

    result
}

fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push(marker);
            out.push_str(hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::unescape;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(unescape(r"\u0041"), "A");
        assert_eq!(unescape(r"\u{1F600}"), "\u{1F600}");
        assert_eq!(unescape(r"\x41"), "A");
    }

    #[test]
    fn unknown_escape_drops_backslash() {
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}
