//! Markdown-to-HTML conversion for note display.

use pulldown_cmark::{html, Options, Parser};

/// Render a note's markdown content to an HTML fragment
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markdown() {
        let out = render("# Heading\n\nSome *emphasis*.");
        assert!(out.contains("<h1>Heading</h1>"));
        assert!(out.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_renders_lists_and_code() {
        let out = render("- one\n- two\n\n`inline`");
        assert!(out.contains("<li>one</li>"));
        assert!(out.contains("<code>inline</code>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
