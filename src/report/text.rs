//! Text cleanup and wrapping for the built-in PDF font

/// Map text onto printable ASCII. Typographic punctuation gets a close
/// substitute, anything else unsupported becomes `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' '..='~' => out.push(ch),
            '\t' | '\n' | '\r' => out.push(' '),
            '\u{2022}' | '\u{00b7}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => out.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{00a0}' | '\u{2009}' | '\u{202f}' => out.push(' '),
            '\u{00b0}' => out.push_str(" deg"),
            c if c.is_control() => {}
            _ => out.push('?'),
        }
    }
    out
}

/// Helvetica advance widths for ' '..='~', in 1/1000 em
const HELVETICA_WIDTHS: [i64; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

fn char_width(ch: char) -> i64 {
    match ch {
        ' '..='~' => HELVETICA_WIDTHS[ch as usize - 32],
        // sanitised text is ASCII; '?' stands in for anything else
        _ => HELVETICA_WIDTHS['?' as usize - 32],
    }
}

/// Rendered width of `text` at `size` points, in 1/1000 pt
pub fn text_width(text: &str, size: i64) -> i64 {
    text.chars().map(char_width).sum::<i64>() * size
}

/// Greedy word wrap so each line fits `max_width` points at `size`.
/// Words wider than a line are split.
pub fn wrap(text: &str, size: i64, max_width: i64) -> Vec<String> {
    let limit = max_width.max(1) * 1000;
    let space = text_width(" ", size);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        for piece in split_to_fit(word, size, limit) {
            let width = text_width(&piece, size);
            if line.is_empty() {
                line = piece;
                line_width = width;
            } else if line_width + space + width <= limit {
                line.push(' ');
                line.push_str(&piece);
                line_width += space + width;
            } else {
                lines.push(std::mem::replace(&mut line, piece));
                line_width = width;
            }
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_to_fit(word: &str, size: i64, limit: i64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;
    for ch in word.chars() {
        let w = char_width(ch) * size;
        if !piece.is_empty() && width + w > limit {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(ch);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
