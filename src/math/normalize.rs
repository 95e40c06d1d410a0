//! Display glyph normalization.
//!
//! The calculator display shows typographic glyphs (`×`, `÷`, `−`, `π`, ...).
//! Everything downstream only understands the ASCII operator set, the
//! lowercase function and constant names, and the exponent entry marker.

/// Marker the `×10^` (EE) key normalizes to. The lexer turns it into
/// [`Token::Exp10`](crate::types::Token::Exp10).
pub const EXP10_MARKER: char = 'ᴇ';

/// Multi-glyph sequences, matched before single glyphs.
const SEQUENCES: &[(&str, &str)] = &[("×10^", "ᴇ"), ("log₁₀", "log10")];

fn canonical(c: char) -> Option<&'static str> {
    Some(match c {
        '×' | '∗' | '·' | '⋅' => "*",
        '÷' | '∕' | '／' => "/",
        '−' | '–' | '—' | '‐' | '‑' | '﹣' | '－' => "-",
        '＋' => "+",
        '（' => "(",
        '）' => ")",
        'π' => "pi",
        '𝑒' => "e",
        '√' => "sqrt",
        '∛' => "cbrt",
        _ => return None,
    })
}

/// Rewrites every display glyph to its canonical form. Unknown characters
/// are kept as they are.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    'outer: while let Some(c) = rest.chars().next() {
        for (glyphs, replacement) in SEQUENCES {
            if let Some(tail) = rest.strip_prefix(glyphs) {
                out.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }

        match canonical(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}
