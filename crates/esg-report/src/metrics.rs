//! Helvetica advance widths and line wrapping.
//!
//! Widths are the standard AFM values in 1/1000 em for the printable ASCII
//! range (0x20..=0x7E). Characters outside it are measured as a digit.

const MM_PER_PT: f64 = 25.4 / 72.0;
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn char_units(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match c as u32 {
        cp @ 0x20..=0x7e => table[(cp - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size_pt: f64, bold: bool) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_units(c, bold))).sum();
    f64::from(units) / 1000.0 * size_pt * MM_PER_PT
}

/// Split `text` into lines no wider than `max_width` millimetres.
///
/// Embedded newlines always break, and blank lines are kept. Words wider
/// than a whole line are broken between characters.
pub fn wrap(text: &str, max_width: f64, size_pt: f64, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width(s, size_pt, bold) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut current = String::new();
        let mut started = false;

        for word in paragraph.split(' ') {
            if started {
                let candidate = format!("{current} {word}");
                if fits(&candidate) {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            started = true;

            if fits(word) {
                current.push_str(word);
                continue;
            }
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, c.to_string()));
                }
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_size() {
        let at_10 = text_width("Total Emissions", 10.0, false);
        let at_20 = text_width("Total Emissions", 20.0, false);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-9);
        assert!(text_width("Total", 10.0, true) > text_width("Total", 10.0, false));
    }

    #[test]
    fn digit_width_matches_afm() {
        // 556/1000 em at 72pt is 556/1000 inch.
        let w = text_width("0", 72.0, false);
        assert!((w - 0.556 * 25.4).abs() < 1e-9);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("Company: Acme", 170.0, 11.0, false), vec!["Company: Acme"]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "word ".repeat(200);
        let lines = wrap(text.trim_end(), 170.0, 10.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 170.0, "too wide: {line}");
            assert!(!line.starts_with(' '));
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn newlines_and_blank_lines_are_kept() {
        let lines = wrap("## Heading\n\n- item one\r\n- item two", 170.0, 10.0, false);
        assert_eq!(lines, vec!["## Heading", "", "- item one", "- item two"]);
    }

    #[test]
    fn leading_indent_is_kept() {
        let lines = wrap("   - Conduct audit", 170.0, 10.0, false);
        assert_eq!(lines, vec!["   - Conduct audit"]);
    }

    #[test]
    fn overlong_word_is_split() {
        let word = "x".repeat(400);
        let lines = wrap(&word, 50.0, 10.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 50.0);
        }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 170.0, 10.0, false), vec![String::new()]);
    }
}
