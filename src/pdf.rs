//! PDF rendering for note export.
//!
//! Two sections: the title in bold, then the content as wrapped plain text.
//! Markdown is deliberately not rendered on this path.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TITLE_PT: f32 = 16.0;
const BODY_PT: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const WRAP_COLUMNS: usize = 90;

/// Build a downloadable PDF for a note
pub fn note_document(title: &str, content: &str) -> Result<Vec<u8>, String> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| format!("Failed to load font: {}", e))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| format!("Failed to load font: {}", e))?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM;

    let mut write_line = |line: String, size: f32, font: &IndirectFontRef, cursor: &mut f32| {
        if *cursor < MARGIN_MM {
            let (new_page, new_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current_layer = doc.get_page(new_page).get_layer(new_layer);
            *cursor = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        current_layer.use_text(line, size, Mm(MARGIN_MM), Mm(*cursor), font);
        *cursor -= LINE_HEIGHT_MM;
    };

    for line in wrap_text(title, WRAP_COLUMNS) {
        write_line(line, TITLE_PT, &bold, &mut cursor);
    }
    cursor -= LINE_HEIGHT_MM;

    for raw_line in content.lines() {
        for line in wrap_text(raw_line, WRAP_COLUMNS) {
            write_line(line, BODY_PT, &regular, &mut cursor);
        }
    }

    doc.save_to_bytes().map_err(|e| format!("Failed to serialize PDF: {}", e))
}

/// Greedy word wrap. Words longer than the column limit are split hard so a
/// pathological token cannot run off the page.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(columns) {
                lines.push(chunk.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current.chars().count() + 1 + word_len };
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        // Preserve blank lines as vertical space
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_line_is_untouched() {
        assert_eq!(wrap_text("hello world", 90), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_splits_at_word_boundaries() {
        let lines = wrap_text("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_wrap_hard_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty_line_is_kept() {
        assert_eq!(wrap_text("", 90), vec![""]);
    }

    #[test]
    fn test_note_document_produces_pdf_bytes() {
        let bytes = note_document("Meeting notes", "line one\n\nline two").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_note_document_handles_long_content() {
        let content = "word ".repeat(5000);
        let bytes = note_document("Long", &content).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
