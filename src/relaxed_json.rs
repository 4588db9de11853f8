//! Relaxed JSON reader.
//!
//! Windows Terminal writes `settings.json` as JSON with comments, and users
//! routinely leave trailing commas behind when editing it by hand. This module
//! rewrites such text into strict JSON without touching string literals.
//!
//! Comments are replaced by whitespace rather than removed outright, and line
//! breaks inside block comments are kept, so error positions reported by the
//! strict parser still point at the original line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String,
    StringEscape,
    LineComment,
    BlockComment,
    BlockCommentStar,
}

/// Strip `//` and `/* */` comments and trailing commas from `text`.
///
/// Unterminated block comments swallow the rest of the input; an unterminated
/// string is copied through unchanged. Either way the strict parser gets to
/// report the problem.
pub fn strip(text: &str) -> String {
    let without_comments = strip_comments(text);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        state = match state {
            State::Code => match c {
                '"' => {
                    out.push(c);
                    State::String
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push(' ');
                    State::LineComment
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push(' ');
                    State::BlockComment
                }
                _ => {
                    out.push(c);
                    State::Code
                }
            },
            State::String => {
                out.push(c);
                match c {
                    '\\' => State::StringEscape,
                    '"' => State::Code,
                    _ => State::String,
                }
            }
            State::StringEscape => {
                out.push(c);
                State::String
            }
            State::LineComment => match c {
                '\n' | '\r' => {
                    out.push(c);
                    State::Code
                }
                _ => State::LineComment,
            },
            State::BlockComment | State::BlockCommentStar => match c {
                '/' if state == State::BlockCommentStar => State::Code,
                '*' => State::BlockCommentStar,
                '\n' | '\r' => {
                    out.push(c);
                    State::BlockComment
                }
                _ => State::BlockComment,
            },
        };
    }

    out
}

/// Drop commas that are followed (after whitespace) by `}` or `]`.
///
/// Runs on comment-free text, so only strings need tracking.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
                continue;
            }
            '}' | ']' => {
                if let Some(pos) = pending_comma {
                    out.replace_range(pos..pos + 1, " ");
                }
            }
            '"' => in_string = true,
            _ if c.is_whitespace() => {
                out.push(c);
                continue;
            }
            _ => {}
        }
        pending_comma = None;
        out.push(c);
    }

    out
}
