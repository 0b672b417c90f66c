//! Greedy word wrapping for compact node labels
//!
//! Whitespace runs collapse to a single space, hyphenated words may break
//! after the hyphen, and words longer than the width are split across lines.
//! Interior runs of spaces are never preserved, even when a line has room.

/// Split `text` into lines of at most `width` characters.
///
/// A `width` of zero disables wrapping.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
        return if joined.is_empty() { Vec::new() } else { vec![joined] };
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        for (i, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let sep = if i == 0 && line_len > 0 { 1 } else { 0 };
            let piece_len = piece.chars().count();

            if line_len + sep + piece_len <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(piece);
                line_len += sep + piece_len;
                continue;
            }

            if piece_len <= width {
                flush(&mut lines, &mut line, &mut line_len);
                line.push_str(piece);
                line_len = piece_len;
                continue;
            }

            // Long piece: fill what is left of the current line, then chunk.
            let mut chars = piece.chars().peekable();
            if line_len > 0 {
                let room = width.saturating_sub(line_len + sep);
                if room > 0 {
                    if sep == 1 {
                        line.push(' ');
                    }
                    line.extend(chars.by_ref().take(room));
                }
                flush(&mut lines, &mut line, &mut line_len);
            }
            while chars.peek().is_some() {
                let chunk: String = chars.by_ref().take(width).collect();
                line_len = chunk.chars().count();
                line = chunk;
                if line_len == width && chars.peek().is_some() {
                    flush(&mut lines, &mut line, &mut line_len);
                }
            }
        }
    }

    flush(&mut lines, &mut line, &mut line_len);
    lines
}

/// Wrap `text` and join the lines with `\n`.
pub fn wrap_label(text: &str, width: usize) -> String {
    wrap(text, width).join("\n")
}

fn flush(lines: &mut Vec<String>, line: &mut String, line_len: &mut usize) {
    if *line_len > 0 {
        lines.push(std::mem::take(line).trim_end().to_string());
    }
    line.clear();
    *line_len = 0;
}

/// Break a word after every hyphen that sits between two letters.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    for w in chars.windows(3) {
        let (prev, hyphen, next) = (w[0].1, w[1], w[2].1);
        if hyphen.1 == '-' && prev.is_alphabetic() && next.is_alphabetic() {
            let end = hyphen.0 + 1;
            pieces.push(&word[start..end]);
            start = end;
        }
    }
    pieces.push(&word[start..]);
    pieces
}
