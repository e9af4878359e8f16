use html_escape::encode_text;

use crate::render::{inline_text, Block, Cell, Inline};

const CLIPBOARD_STYLE: &str = "body { font-family: Calibri, sans-serif; font-size: 11pt; color: #333; }
h2 { font-size: 18pt; font-weight: bold; text-align: center; color: #1E293B; margin-top: 20px; margin-bottom: 15px; }
h3 { font-size: 14pt; font-weight: bold; color: #4338CA; margin-top: 20px; margin-bottom: 10px; padding-bottom: 5px; border-bottom: 1px solid #E2E8F0; }
table { border-collapse: collapse; width: 100%; margin-bottom: 15px; border: 1px solid #E2E8F0; }
th, td { border: 1px solid #E2E8F0; padding: 8px 12px; text-align: left; vertical-align: top; }
th { background-color: #F8FAFC; font-weight: bold; color: #1E293B; }
td { line-height: 1.5; color: #4B5563; }
strong { font-weight: bold; }
ul { list-style-type: disc; margin-left: 20px; }
li { margin-bottom: 5px; }";

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&encode_text(t)),
            Inline::Strong(t) => {
                out.push_str("<strong>");
                out.push_str(&encode_text(t));
                out.push_str("</strong>");
            }
        }
    }
}

fn push_cell(out: &mut String, cell: &Cell) {
    for (i, line) in cell.iter().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        push_inlines(out, line);
    }
}

/// Structural HTML for rendered script blocks.
pub fn render_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading(text) => {
                out.push_str("<h3>");
                out.push_str(&encode_text(text));
                out.push_str("</h3>\n");
            }
            Block::Paragraph(inlines) => {
                out.push_str("<p>");
                push_inlines(&mut out, inlines);
                out.push_str("</p>\n");
            }
            Block::List(items) => {
                out.push_str("<ul>\n");
                for item in items {
                    out.push_str("<li>");
                    push_inlines(&mut out, item);
                    out.push_str("</li>\n");
                }
                out.push_str("</ul>\n");
            }
            Block::Table { header, rows } => {
                out.push_str("<table>\n<thead>\n<tr>");
                for cell in header {
                    out.push_str("<th>");
                    out.push_str(&encode_text(cell));
                    out.push_str("</th>");
                }
                out.push_str("</tr>\n</thead>\n<tbody>\n");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        out.push_str("<td>");
                        push_cell(&mut out, cell);
                        out.push_str("</td>");
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
        }
    }
    out
}

/// Complete HTML document with inline CSS, suitable for rich-text paste
/// into word processors.
pub fn styled_document(blocks: &[Block]) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{CLIPBOARD_STYLE}\n</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        render_html(blocks)
    )
}

/// Plain-text rendering: one line per heading, paragraph and list item,
/// table cells separated by tabs.
pub fn plain_text(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in blocks {
        match block {
            Block::Heading(text) => lines.push(text.clone()),
            Block::Paragraph(inlines) => lines.push(inline_text(inlines)),
            Block::List(items) => lines.extend(items.iter().map(|i| inline_text(i))),
            Block::Table { header, rows } => {
                lines.push(header.join("\t"));
                for row in rows {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|cell| {
                            cell.iter()
                                .map(|line| inline_text(line))
                                .collect::<Vec<_>>()
                                .join("\n")
                        })
                        .collect();
                    lines.push(cells.join("\t"));
                }
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_script;

    #[test]
    fn test_table_html_structure() {
        let html = render_html(&render_script("| A | B |\n|---|---|\n| x<br>**y** | z |"));
        assert_eq!(
            html,
            "<table>\n<thead>\n<tr><th>A</th><th>B</th></tr>\n</thead>\n<tbody>\n<tr><td>x<br><strong>y</strong></td><td>z</td></tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_html(&render_script("a < b & **c>d**"));
        assert_eq!(html, "<p>a &lt; b &amp; <strong>c&gt;d</strong></p>\n");
    }

    #[test]
    fn test_styled_document_wraps_body() {
        let doc = styled_document(&render_script("**Tiêu đề**"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("h3 { font-size: 14pt;"));
        assert!(doc.contains("<body>\n<h3>Tiêu đề</h3>\n</body>"));
    }

    #[test]
    fn test_plain_text() {
        let blocks = render_script("**H**\n- a **b**\n| c | d |\n| e<br>f | g |");
        assert_eq!(plain_text(&blocks), "H\na b\nc\td\ne\nf\tg");
    }
}
