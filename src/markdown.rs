// Markdown-to-HTML for the legal pages.
// Line-oriented block parse, then a render pass with an explicit section wrapper,
// so the open/close balance of section tags holds structurally for any input.

/// One structural block of a legal document.
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading2(String),
    Heading3(String),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    List(Vec<String>),
    Paragraph(String),
    /// Pre-existing HTML (or an unsupported `#` heading level) passed through untouched.
    Raw(String),
}

const SECTION_OPEN: &str = "<section class=\"legal-section\">";
const SECTION_CLOSE: &str = "</section>";

/// Convert a legal-page Markdown body to HTML.
///
/// The whole document lives inside `legal-section` wrappers: the first wrapper
/// is synthesized even though no leading `## ` header exists, and every `## `
/// header closes the previous section and opens a new one. For k headers the
/// output contains exactly k+1 balanced section tags.
pub fn markdown_to_html(markdown: &str) -> String {
    let blocks = parse_blocks(markdown);
    let mut out = String::new();
    out.push_str(SECTION_OPEN);

    for block in blocks {
        match block {
            Block::Heading2(text) => {
                out.push_str(SECTION_CLOSE);
                out.push_str(SECTION_OPEN);
                out.push_str("<h2>");
                out.push_str(&render_inline(&text));
                out.push_str("</h2>");
            }
            Block::Heading3(text) => {
                out.push_str("<h3>");
                out.push_str(&render_inline(&text));
                out.push_str("</h3>");
            }
            Block::Table { header, rows } => render_table(&mut out, &header, &rows),
            Block::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&render_inline(&item));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Block::Paragraph(text) => {
                let rendered = render_inline(&text);
                if !rendered.is_empty() {
                    out.push_str("<p>");
                    out.push_str(&rendered);
                    out.push_str("</p>");
                }
            }
            Block::Raw(line) => out.push_str(&line),
        }
    }

    out.push_str(SECTION_CLOSE);
    out
}

fn parse_blocks(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        // Table: a pipe row followed by a separator row, then body rows.
        if is_table_row(trimmed) && i + 1 < lines.len() && is_table_separator(lines[i + 1].trim())
        {
            let header = split_cells(trimmed);
            let mut rows = Vec::new();
            let mut j = i + 2;
            while j < lines.len() && is_table_row(lines[j].trim()) {
                rows.push(split_cells(lines[j].trim()));
                j += 1;
            }
            blocks.push(Block::Table { header, rows });
            i = j;
            continue;
        }

        if let Some(text) = trimmed.strip_prefix("### ") {
            blocks.push(Block::Heading3(text.trim().to_string()));
            i += 1;
            continue;
        }

        if let Some(text) = trimmed.strip_prefix("## ") {
            blocks.push(Block::Heading2(text.trim().to_string()));
            i += 1;
            continue;
        }

        if trimmed.starts_with("- ") {
            let mut items = Vec::new();
            let mut j = i;
            while j < lines.len() {
                match lines[j].trim().strip_prefix("- ") {
                    Some(item) => items.push(item.trim().to_string()),
                    None => break,
                }
                j += 1;
            }
            blocks.push(Block::List(items));
            i = j;
            continue;
        }

        if trimmed.starts_with('<') || trimmed.starts_with('#') {
            blocks.push(Block::Raw(line.to_string()));
            i += 1;
            continue;
        }

        blocks.push(Block::Paragraph(trimmed.to_string()));
        i += 1;
    }

    blocks
}

fn is_table_row(line: &str) -> bool {
    line.starts_with('|') && line.len() > 1
}

fn is_table_separator(line: &str) -> bool {
    line.starts_with('|')
        && line.contains('-')
        && line.chars().all(|c| matches!(c, '|' | '-' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn render_table(out: &mut String, header: &[String], rows: &[Vec<String>]) {
    out.push_str("<div class=\"cookie-table\">");
    out.push_str("<div class=\"cookie-table__row cookie-table__header\">");
    for cell in header {
        out.push_str("<div class=\"cookie-table__cell\">");
        out.push_str(&render_inline(cell));
        out.push_str("</div>");
    }
    out.push_str("</div>");
    for row in rows {
        out.push_str("<div class=\"cookie-table__row\">");
        for cell in row {
            out.push_str("<div class=\"cookie-table__cell\">");
            out.push_str(&render_inline(cell));
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

/// Inline pass: `**bold**` then `[text](url)`.
fn render_inline(text: &str) -> String {
    render_links(&render_bold(text))
}

fn render_bold(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(0) => {
                // "****" carries no content, pass it through.
                out.push_str(&rest[..start + 2]);
                rest = &rest[start + 2..];
            }
            Some(len) => {
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&after[..len]);
                out.push_str("</strong>");
                rest = &rest[start + 2 + len + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn render_links(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let Some(sep) = rest[open..].find("](") else {
            break;
        };
        let sep = open + sep;
        let Some(end) = rest[sep + 2..].find(')') else {
            break;
        };
        let label = &rest[open + 1..sep];
        let url = &rest[sep + 2..sep + 2 + end];
        if label.is_empty() || url.is_empty() {
            out.push_str(&rest[..open + 1]);
            rest = &rest[open + 1..];
            continue;
        }
        out.push_str(&rest[..open]);
        out.push_str("<a href=\"");
        out.push_str(url);
        out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
        out.push_str(label);
        out.push_str("</a>");
        rest = &rest[sep + 3 + end..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn assert_sections(html: &str, expected: usize) {
        assert_eq!(count(html, SECTION_OPEN), expected, "open tags in {html}");
        assert_eq!(count(html, SECTION_CLOSE), expected, "close tags in {html}");
    }

    #[test]
    fn zero_headers_yield_one_section() {
        let html = markdown_to_html("Just a paragraph of policy text.");
        assert_sections(&html, 1);
        assert!(html.contains("<p>Just a paragraph of policy text.</p>"));
    }

    #[test]
    fn one_header_yields_two_sections() {
        let html = markdown_to_html("Intro text.\n\n## Data We Collect\n\nDetails.");
        assert_sections(&html, 2);
        assert!(html.contains("<h2>Data We Collect</h2>"));
    }

    #[test]
    fn three_headers_yield_four_sections() {
        let md = "## One\na\n## Two\nb\n## Three\nc\n";
        let html = markdown_to_html(md);
        assert_sections(&html, 4);
    }

    #[test]
    fn leading_header_does_not_produce_empty_dangling_close() {
        let html = markdown_to_html("## First\ntext");
        // Synthesized first section closes immediately before the header's section opens.
        assert!(html.starts_with(SECTION_OPEN));
        assert!(html.ends_with(SECTION_CLOSE));
    }

    #[test]
    fn table_renders_cookie_table_grid() {
        let html = markdown_to_html("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(count(&html, "<div class=\"cookie-table\">"), 1);
        assert_eq!(
            count(&html, "<div class=\"cookie-table__row cookie-table__header\">"),
            1
        );
        // One header row plus one body row.
        assert_eq!(count(&html, "cookie-table__row"), 2);
        assert!(html.contains("<div class=\"cookie-table__cell\">A</div>"));
        assert!(html.contains("<div class=\"cookie-table__cell\">2</div>"));
    }

    #[test]
    fn h3_bold_and_links_render() {
        let md = "### Cookies\nWe use **strictly necessary** cookies, see [our policy](https://example.com/p).";
        let html = markdown_to_html(md);
        assert!(html.contains("<h3>Cookies</h3>"));
        assert!(html.contains("<strong>strictly necessary</strong>"));
        assert!(html.contains(
            "<a href=\"https://example.com/p\" target=\"_blank\" rel=\"noopener noreferrer\">our policy</a>"
        ));
    }

    #[test]
    fn adjacent_list_items_share_one_list() {
        let html = markdown_to_html("- one\n- two\n\ntext\n\n- three\n");
        assert_eq!(count(&html, "<ul>"), 2);
        assert_eq!(count(&html, "<li>"), 3);
    }

    #[test]
    fn blank_lines_never_produce_empty_paragraphs() {
        let html = markdown_to_html("a\n\n\n\nb\n");
        assert!(!html.contains("<p></p>"));
        assert_eq!(count(&html, "<p>"), 2);
    }

    #[test]
    fn raw_html_lines_pass_through() {
        let html = markdown_to_html("<div class=\"note\">kept</div>\ntext");
        assert!(html.contains("<div class=\"note\">kept</div>"));
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn unterminated_bold_is_left_alone() {
        let html = markdown_to_html("a **dangling marker");
        assert!(html.contains("<p>a **dangling marker</p>"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Lines drawn from the shapes a legal document actually contains.
        fn line_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(String::new()),
                "[a-z ]{1,20}".prop_map(|s| s),
                "[a-z ]{1,12}".prop_map(|s| format!("## {s}")),
                "[a-z ]{1,12}".prop_map(|s| format!("### {s}")),
                "[a-z ]{1,12}".prop_map(|s| format!("- {s}")),
            ]
        }

        proptest! {
            /// For any document with k `## ` headers, the output holds exactly
            /// k+1 open section tags and k+1 matching closes.
            #[test]
            fn section_tags_stay_balanced(lines in prop::collection::vec(line_strategy(), 0..40)) {
                let md = lines.join("\n");
                let k = lines.iter().filter(|l| l.starts_with("## ")).count();
                let html = markdown_to_html(&md);
                prop_assert_eq!(html.matches(SECTION_OPEN).count(), k + 1);
                prop_assert_eq!(html.matches(SECTION_CLOSE).count(), k + 1);
            }

            #[test]
            fn output_never_contains_empty_paragraphs(lines in prop::collection::vec(line_strategy(), 0..40)) {
                let html = markdown_to_html(&lines.join("\n"));
                prop_assert!(!html.contains("<p></p>"));
            }
        }
    }
}
