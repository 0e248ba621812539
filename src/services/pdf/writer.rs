//! Minimal PDF 1.4 writer for plain text.
//!
//! Produces US Letter pages using the standard Helvetica fonts, so the output
//! needs no embedded font data.

/// Lays out text lines on as many pages as needed.
#[derive(Debug, Clone)]
pub struct TextPdfWriter {
    /// Characters per line before word wrapping
    pub wrap_width: usize,
    pub font_size: u32,
    pub heading_size: u32,
    pub lines_per_page: usize,
}

impl Default for TextPdfWriter {
    fn default() -> Self {
        Self {
            wrap_width: 90,
            font_size: 11,
            heading_size: 20,
            lines_per_page: 48,
        }
    }
}

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 56;

impl TextPdfWriter {
    /// Writes a complete document. The first line is set as a bold heading.
    ///
    /// # Arguments
    /// * `lines` - Text lines; long lines are wrapped on word boundaries
    ///
    /// # Returns
    /// The PDF file contents
    pub fn write(&self, lines: &[&str]) -> Vec<u8> {
        let (heading, body) = match lines.split_first() {
            Some((first, rest)) => (Some(*first), rest),
            None => (None, lines),
        };

        let wrapped: Vec<String> = body
            .iter()
            .flat_map(|line| wrap(line, self.wrap_width.max(1)))
            .collect();

        let mut pages: Vec<Vec<String>> = wrapped
            .chunks(self.lines_per_page.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            String::new(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut kids = Vec::with_capacity(pages.len());
        for (index, page_lines) in pages.iter().enumerate() {
            let page_id = objects.len() + 1;
            let content_id = page_id + 1;
            kids.push(format!("{} 0 R", page_id));

            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id
            ));

            let stream = self.page_stream(if index == 0 { heading } else { None }, page_lines);
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        objects[1] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        );

        assemble(&objects)
    }

    fn page_stream(&self, heading: Option<&str>, lines: &[String]) -> String {
        let leading = self.font_size + self.font_size / 2;
        let mut stream = format!("BT\n{} {} Td\n", MARGIN, PAGE_HEIGHT - MARGIN);

        if let Some(heading) = heading {
            stream.push_str(&format!(
                "/F2 {} Tf\n({}) Tj\n0 -{} Td\n",
                self.heading_size,
                escape(heading),
                self.heading_size * 2
            ));
        }

        stream.push_str(&format!("/F1 {} Tf\n{} TL\n", self.font_size, leading));
        for line in lines {
            stream.push_str(&format!("({}) Tj\nT*\n", escape(line)));
        }
        stream.push_str("ET");
        stream
    }
}

/// Serializes numbered objects with the cross-reference table and trailer.
fn assemble(objects: &[String]) -> Vec<u8> {
    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    out.into_bytes()
}

/// Escapes a string literal, keeping the file pure ASCII.
///
/// Latin-1 and the WinAnsi extras become octal escapes. Other Latin
/// letters lose their diacritics; anything else is replaced with `?`.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            '\t' => escaped.push(' '),
            '\u{a0}'..='\u{ff}' => push_octal(&mut escaped, c as u32),
            '\u{132}' => escaped.push_str("IJ"),
            '\u{133}' => escaped.push_str("ij"),
            _ => match win_ansi_code(c) {
                Some(code) => push_octal(&mut escaped, code),
                None => escaped.push(fold_latin_extended(c).unwrap_or('?')),
            },
        }
    }
    escaped
}

fn push_octal(out: &mut String, code: u32) {
    out.push_str(&format!("\\{:03o}", code));
}

/// WinAnsiEncoding slots 0x80-0x9F.
fn win_ansi_code(c: char) -> Option<u32> {
    let code = match c {
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{2c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{152}' => 0x8c,
        '\u{17d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{153}' => 0x9c,
        '\u{17e}' => 0x9e,
        '\u{178}' => 0x9f,
        _ => return None,
    };
    Some(code)
}

/// Base letter for the Latin Extended-A block (U+0100-U+017F).
fn fold_latin_extended(c: char) -> Option<char> {
    let code = c as u32;
    let (upper, lower) = match code {
        0x100..=0x105 => ('A', 'a'),
        0x106..=0x10d => ('C', 'c'),
        0x10e..=0x111 => ('D', 'd'),
        0x112..=0x11b => ('E', 'e'),
        0x11c..=0x123 => ('G', 'g'),
        0x124..=0x127 => ('H', 'h'),
        0x128..=0x131 => ('I', 'i'),
        0x134..=0x135 => ('J', 'j'),
        0x136..=0x137 => ('K', 'k'),
        0x138 => return Some('k'),
        0x139..=0x142 => ('L', 'l'),
        0x143..=0x148 => ('N', 'n'),
        0x149 => return Some('n'),
        0x14a..=0x14b => ('N', 'n'),
        0x14c..=0x151 => ('O', 'o'),
        0x154..=0x159 => ('R', 'r'),
        0x15a..=0x15f => ('S', 's'),
        0x162..=0x167 => ('T', 't'),
        0x168..=0x173 => ('U', 'u'),
        0x174..=0x175 => ('W', 'w'),
        0x176..=0x177 => ('Y', 'y'),
        0x179..=0x17c => ('Z', 'z'),
        0x17f => return Some('s'),
        _ => return None,
    };

    // Capitals sit on odd code points in these two runs, even ones elsewhere.
    let odd_upper = matches!(code, 0x139..=0x148 | 0x179..=0x17e);
    if (code % 2 == 1) == odd_upper {
        Some(upper)
    } else {
        Some(lower)
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a (b) \\ c"), "a \\(b\\) \\\\ c");
        assert_eq!(escape("café"), "caf\\351");
        assert_eq!(escape("東京"), "??");
    }

    #[test]
    fn test_escape_european_names() {
        assert_eq!(escape("Łukasz Wałęsa"), "Lukasz Walesa");
        assert_eq!(escape("Kraków"), "Krak\\363w");
        assert_eq!(escape("İstanbul, Ağrı"), "Istanbul, Agri");
        assert_eq!(escape("Dvořák"), "Dvor\\341k");
        assert_eq!(escape("Šibenik"), "\\212ibenik");
        assert_eq!(escape("Œuvre 5\u{20ac}"), "\\214uvre 5\\200");
        assert_eq!(escape("Ĳsselmeer"), "IJsselmeer");
    }

    #[test]
    fn test_non_latin_text_keeps_document_ascii() {
        let pdf = TextPdfWriter::default().write(&["Łódź", "Participants: Zoë, Ørjan, 東京"]);

        assert!(pdf.is_ascii());
        let pdf = as_text(&pdf);
        assert!(pdf.contains("(L\\363dz) Tj"));
        assert!(pdf.contains("(Participants: Zo\\353, \\330rjan, ??) Tj"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("a  b", 10), vec!["a b"]);
    }

    #[test]
    fn test_single_page_document() {
        let pdf = as_text(&TextPdfWriter::default().write(&["Title", "Body line"]));

        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.contains("/F2 20 Tf\n(Title) Tj"));
        assert!(pdf.contains("(Body line) Tj"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = as_text(&TextPdfWriter::default().write(&["Title", "Body"]));

        let xref_start = pdf.find("xref\n").unwrap();
        let startxref: usize = pdf
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert_eq!(startxref, xref_start);

        let entries: Vec<usize> = pdf[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (index, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn test_long_documents_span_pages() {
        let writer = TextPdfWriter {
            lines_per_page: 2,
            ..TextPdfWriter::default()
        };
        let pdf = as_text(&writer.write(&["Title", "a", "b", "c", "d", "e"]));

        assert!(pdf.contains("/Count 3"));
        assert_eq!(pdf.matches("/Type /Page ").count(), 3);
        assert_eq!(pdf.matches("/F2 20 Tf").count(), 1);
    }

    #[test]
    fn test_empty_document_still_has_a_page() {
        let pdf = as_text(&TextPdfWriter::default().write(&[]));
        assert!(pdf.contains("/Count 1"));
    }
}
