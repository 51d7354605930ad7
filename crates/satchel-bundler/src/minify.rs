//! Comment and whitespace stripping for bundled source.
//!
//! Works in four passes over the text:
//!
//! 1. string and template literals are lifted into a side table and replaced
//!    with placeholder tokens, so later passes never see a slash or quote that
//!    belongs to a literal
//! 2. a `normal / line comment / block comment` scan drops comments and
//!    collapses whitespace, keeping a single space only where two word
//!    characters would otherwise fuse into one token
//! 3. whitespace touching operators and punctuation is removed
//! 4. placeholders are swapped back for the literal text
//!
//! This is not a parser. Regular expression literals containing quotes or
//! `//` are not recognised.

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

const PUNCTUATION: &[char] = &[
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', '^', '~', '?', ':', ',', ';', '{', '}',
    '[', ']', '(', ')',
];

/// Minify `source`. Total and idempotent.
pub fn minify(source: &str) -> String {
    if source.trim().is_empty() {
        return String::new();
    }

    let (masked, literals) = extract_literals(source);
    let collapsed = strip_comments_and_whitespace(&masked);
    let tightened = tighten_punctuation(&collapsed);
    restore_literals(&tightened, &literals)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == PLACEHOLDER_OPEN || c == PLACEHOLDER_CLOSE
}

fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Whether removing the space between `left` and `right` changes the tokens.
///
/// A slash followed by `/` or `*` would open a comment.
fn needs_space(left: char, right: char) -> bool {
    (is_word(left) && is_word(right))
        || (left == '+' && right == '+')
        || (left == '-' && right == '-')
        || (left == '/' && (right == '/' || right == '*'))
}

/// Replace every string and template literal with a placeholder.
///
/// Comments are copied through untouched so that an apostrophe inside a
/// comment does not open a literal.
fn extract_literals(source: &str) -> (String, Vec<String>) {
    let mut masked = String::with_capacity(source.len());
    let mut literals = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                let mut literal = String::from(c);
                while let Some(next) = chars.next() {
                    literal.push(next);
                    if next == '\\' {
                        if let Some(escaped) = chars.next() {
                            literal.push(escaped);
                        }
                    } else if next == c {
                        break;
                    }
                }
                masked.push(PLACEHOLDER_OPEN);
                masked.push_str(&literals.len().to_string());
                masked.push(PLACEHOLDER_CLOSE);
                literals.push(literal);
            }
            '/' if chars.peek() == Some(&'/') => {
                masked.push(c);
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    masked.push(next);
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                masked.push(c);
                if let Some(star) = chars.next() {
                    masked.push(star);
                }
                let mut prev = '\0';
                for next in chars.by_ref() {
                    masked.push(next);
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => masked.push(c),
        }
    }

    (masked, literals)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    LineComment,
    BlockComment,
}

/// Drop comments and collapse whitespace runs.
///
/// A removed comment counts as whitespace, so `a/* */b` stays two tokens.
fn strip_comments_and_whitespace(masked: &str) -> String {
    let mut out = String::with_capacity(masked.len());
    let mut state = ScanState::Normal;
    let mut pending_space = false;
    let mut chars = masked.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            ScanState::Normal => {
                if c == '/' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::LineComment;
                    pending_space = true;
                } else if c == '/' && chars.peek() == Some(&'*') {
                    chars.next();
                    state = ScanState::BlockComment;
                    pending_space = true;
                } else if c.is_whitespace() {
                    pending_space = true;
                } else {
                    if pending_space && out.chars().next_back().is_some_and(|last| needs_space(last, c)) {
                        out.push(' ');
                    }
                    pending_space = false;
                    out.push(c);
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::Normal;
                }
            }
        }
    }

    out
}

/// Remove spaces next to operators and punctuation, unless that would fuse
/// `+ +` or `- -`.
fn tighten_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
            let next = chars.get(i + 1).copied();
            if let (Some(prev), Some(next)) = (prev, next) {
                let touches_punctuation = is_punctuation(prev) || is_punctuation(next);
                if touches_punctuation && !needs_space(prev, next) {
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

fn restore_literals(text: &str, literals: &[String]) -> String {
    let mut out = String::with_capacity(text.len() + literals.iter().map(String::len).sum::<usize>());
    let mut rest = text;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + PLACEHOLDER_OPEN.len_utf8()..];

        let restored = after_open.find(PLACEHOLDER_CLOSE).and_then(|end| {
            let literal = after_open[..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| literals.get(index))?;
            Some((literal, end))
        });

        match restored {
            Some((literal, end)) => {
                out.push_str(literal);
                rest = &after_open[end + PLACEHOLDER_CLOSE.len_utf8()..];
            }
            None => {
                out.push(PLACEHOLDER_OPEN);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(minify(""), "");
        assert_eq!(minify("   "), "");
        assert_eq!(minify("\n\t  \r\n"), "");
    }

    #[test]
    fn test_function_signature_is_untouched() {
        assert_eq!(
            minify("function add(x,y){return x+y}"),
            "function add(x,y){return x+y}"
        );
        assert_eq!(
            minify("function add ( x, y ) {\n  return x + y;\n}"),
            "function add(x,y){return x+y;}"
        );
    }

    #[test]
    fn test_line_and_block_comments_are_dropped() {
        let source = "// header\nconst a = 1; // trailing\n/* block\n comment */const b = 2;";
        assert_eq!(minify(source), "const a=1;const b=2;");
    }

    #[test]
    fn test_comment_between_words_keeps_separation() {
        assert_eq!(minify("return/* note */value"), "return value");
        assert_eq!(minify("let x // note\nlet y"), "let x let y");
    }

    #[test]
    fn test_words_keep_single_space() {
        assert_eq!(minify("var   answer\n\n=\t42"), "var answer=42");
        assert_eq!(minify("typeof   x === 'undefined'"), "typeof x==='undefined'");
    }

    #[test]
    fn test_string_contents_are_preserved() {
        assert_eq!(minify(r#"const s = "a // not a comment";"#), r#"const s="a // not a comment";"#);
        assert_eq!(minify("const s = '/* keep */  spaced';"), "const s='/* keep */  spaced';");
        assert_eq!(minify(r#"x = "a\"b";"#), r#"x="a\"b";"#);
        assert_eq!(minify(r"y = 'it\'s';"), r"y='it\'s';");
    }

    #[test]
    fn test_template_literal_is_preserved() {
        let source = "const t = `line one\n   line  two ${ a + b }`;";
        assert_eq!(minify(source), "const t=`line one\n   line  two ${ a + b }`;");
    }

    #[test]
    fn test_apostrophe_in_comment_does_not_open_literal() {
        let source = "// don't panic\nconst a = 'x';\n/* it's fine */ const b = 2;";
        assert_eq!(minify(source), "const a='x';const b=2;");
    }

    #[test]
    fn test_keyword_before_literal_keeps_space() {
        assert_eq!(minify("return   \"x\";"), "return \"x\";");
    }

    #[test]
    fn test_increment_operators_do_not_fuse() {
        assert_eq!(minify("a + +b"), "a+ +b");
        assert_eq!(minify("a - -b"), "a- -b");
        assert_eq!(minify("a + -b"), "a+-b");
    }

    #[test]
    fn test_slashes_do_not_fuse_into_comment() {
        assert_eq!(minify("a / /**/ / b"), "a/ /b");
        assert_eq!(minify("x = a / /re/.source.length;"), "x=a/ /re/.source.length;");
        assert_eq!(minify("y = b / *p;"), "y=b/ *p;");
        assert_eq!(minify("a / /**/ / b // tail\nnext()"), "a/ /b next()");
    }

    #[test]
    fn test_unterminated_block_comment_drops_rest() {
        assert_eq!(minify("a = 1; /* never closed"), "a=1;");
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "function add(x,y){return x+y}",
            "// c\nconst a = 'x' + \"y\" + `z`; /* d */ let b = a ? 1 : 2;",
            "if (a) {\n  b();\n} else if (c) {\n  d();\n}",
            "a + +b - -c",
            "a / /**/ / b",
            "n = total / /x/.lastIndex; // ratio",
        ];
        for sample in samples {
            let once = minify(sample);
            assert_eq!(minify(&once), once, "not idempotent for {sample:?}");
        }
    }
}
