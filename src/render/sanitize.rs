/// Normalize text so that every remaining codepoint renders as a real glyph.
///
/// Smart punctuation maps to ASCII, typographic spaces become plain spaces, and control,
/// zero-width, bidi, private-use, Braille, block-element, variation-selector and tag codepoints
/// are removed. Whatever survives is restricted to printable ASCII, Latin-1 and Latin Extended-A.
/// Runs of whitespace collapse to one space and the ends are trimmed.
///
/// Idempotent: `sanitize_text(&sanitize_text(s)) == sanitize_text(s)`.
pub fn sanitize_text(input: &str) -> String {
    let mut mapped = String::with_capacity(input.len());
    for ch in input.chars() {
        match normalize_char(ch) {
            Normalized::Keep(c) => mapped.push(c),
            Normalized::Expand(s) => mapped.push_str(s),
            Normalized::Drop => {}
        }
    }
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

enum Normalized {
    Keep(char),
    Expand(&'static str),
    Drop,
}

fn normalize_char(ch: char) -> Normalized {
    match ch {
        '\t' | '\n' | '\r' => Normalized::Keep(' '),
        '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => {
            Normalized::Keep(' ')
        }
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => Normalized::Keep('\''),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => Normalized::Keep('"'),
        '\u{2010}'..='\u{2015}' | '\u{2212}' => Normalized::Keep('-'),
        '\u{2022}' | '\u{2027}' => Normalized::Keep('-'),
        '\u{2026}' => Normalized::Expand("..."),
        c if is_stripped(c) => Normalized::Drop,
        c if is_renderable(c) => Normalized::Keep(c),
        _ => Normalized::Drop,
    }
}

fn is_stripped(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{001F}'
        | '\u{007F}'..='\u{009F}'
        | '\u{00AD}'
        | '\u{200B}'..='\u{200F}'
        | '\u{2028}'..='\u{202E}'
        | '\u{2060}'..='\u{206F}'
        | '\u{2580}'..='\u{259F}'
        | '\u{2800}'..='\u{28FF}'
        | '\u{E000}'..='\u{F8FF}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{FEFF}'
        | '\u{FFF0}'..='\u{FFFF}'
        | '\u{E0000}'..='\u{E007F}'
        | '\u{F0000}'..='\u{10FFFF}'
    )
}

fn is_renderable(c: char) -> bool {
    matches!(c, '\u{0020}'..='\u{007E}' | '\u{00A1}'..='\u{00FF}' | '\u{0100}'..='\u{017F}')
}
