use scraper::Html;

/// Strip HTML tags, decode entities, and collapse whitespace runs.
///
/// Project descriptions arrive as rich-text HTML from the source platform;
/// only the visible text is worth chunking and embedding.
pub fn clean_html(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_tags_and_decodes_entities() {
        let html = "<p><strong>Welcome!</strong> This is <a href='#'>an example</a>. &copy; 2024</p>";
        assert_eq!(clean_html(html), "Welcome! This is an example . \u{a9} 2024");
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<div>line one\n\n   <span>line   two</span></div>";
        assert_eq!(clean_html(html), "line one line two");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(clean_html("already clean"), "already clean");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_html(""), "");
    }
}
