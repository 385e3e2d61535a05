//! Shell-style wildcard matching for USB string descriptors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Matched,
    Failed,
    /// The text ran out; no later starting point can match either.
    Abort,
}

/// Matches `text` against a shell-style `pattern`.
///
/// `*` matches any run of characters, `?` any single character, `[...]` a character class
/// with `a-z` ranges and a leading `^` for negation, and `\` makes the next character literal.
/// A `]` or `-` right after the opening bracket is taken literally. An absent pattern matches
/// everything.
pub fn shell_match(text: &str, pattern: Option<&str>) -> bool {
    match pattern {
        None => true,
        Some(pattern) => match_from(text.as_bytes(), pattern.as_bytes()) == Outcome::Matched,
    }
}

fn match_from(text: &[u8], pat: &[u8]) -> Outcome {
    let mut t = 0;
    let mut p = 0;
    while p < pat.len() {
        let c = match text.get(t) {
            Some(&c) => c,
            None if pat[p] == b'*' => 0,
            None => return Outcome::Abort,
        };
        match pat[p] {
            b'?' => {}
            b'*' => {
                while pat.get(p) == Some(&b'*') {
                    p += 1;
                }
                if p == pat.len() {
                    return Outcome::Matched;
                }
                while t < text.len() {
                    match match_from(&text[t..], &pat[p..]) {
                        Outcome::Failed => t += 1,
                        other => return other,
                    }
                }
                return Outcome::Abort;
            }
            b'[' => {
                let mut q = p;
                let negate = pat.get(q + 1) == Some(&b'^');
                if negate {
                    q += 1;
                }
                let mut matched = false;
                if matches!(pat.get(q + 1), Some(b']' | b'-')) {
                    q += 1;
                    matched = pat[q] == c;
                }
                let mut last = pat[q];
                q += 1;
                while let Some(&pc) = pat.get(q) {
                    if pc == b']' {
                        break;
                    }
                    if pc == b'-' && pat.get(q + 1).is_some_and(|&n| n != b']') {
                        q += 1;
                        if last <= c && c <= pat[q] {
                            matched = true;
                        }
                    } else if pc == c {
                        matched = true;
                    }
                    last = pat[q];
                    q += 1;
                }
                if matched == negate {
                    return Outcome::Failed;
                }
                p = q;
            }
            b'\\' => {
                p += 1;
                if pat.get(p) != Some(&c) {
                    return Outcome::Failed;
                }
            }
            lit => {
                if lit != c {
                    return Outcome::Failed;
                }
            }
        }
        t += 1;
        p += 1;
    }
    if t == text.len() {
        Outcome::Matched
    } else {
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(text: &str, pattern: &str) -> bool {
        shell_match(text, Some(pattern))
    }

    #[test]
    fn absent_pattern_matches_all() {
        assert!(shell_match("", None));
        assert!(shell_match("little-wire.com", None));
    }

    #[test]
    fn literals_and_wildcards() {
        assert!(m("LittleWire", "LittleWire"));
        assert!(!m("LittleWire", "Littlewire"));
        assert!(!m("LittleWire", "Little"));
        assert!(!m("Little", "LittleWire"));
        assert!(m("LittleWire", "Little*"));
        assert!(m("LittleWire", "*Wire"));
        assert!(m("LittleWire", "L*W*e"));
        assert!(m("LittleWire", "L?ttleW?re"));
        assert!(!m("LittleWire", "L?ttle?"));
        assert!(m("", "*"));
        assert!(m("", "**"));
        assert!(m("", ""));
        assert!(!m("a", ""));
        assert!(!m("", "?"));
        assert!(m("abc", "a**c"));
    }

    #[test]
    fn serial_style_patterns() {
        assert!(m("512", "5*"));
        assert!(m("512", "5??"));
        assert!(!m("512", "4*"));
        assert!(m("512", "[0-9][0-9][0-9]"));
        assert!(!m("51a", "[0-9][0-9][0-9]"));
    }

    #[test]
    fn character_classes() {
        assert!(m("b", "[abc]"));
        assert!(!m("d", "[abc]"));
        assert!(m("d", "[^abc]"));
        assert!(!m("a", "[^abc]"));
        assert!(m("m", "[a-z]"));
        assert!(!m("M", "[a-z]"));
        assert!(m("-", "[-a]"));
        assert!(m("]", "[]a]"));
        assert!(m("-", "[a-]"));
        assert!(m("x", "[^]a]"));
        assert!(!m("]", "[^]a]"));
    }

    #[test]
    fn escapes() {
        assert!(m("*", "\\*"));
        assert!(!m("a", "\\*"));
        assert!(m("a?b", "a\\?b"));
        assert!(!m("axb", "a\\?b"));
        assert!(!m("a", "a\\"));
    }
}
