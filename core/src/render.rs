//! Line-oriented renderer for the narrow markdown subset the model emits:
//! pipe tables, `-`/`*` bullet lists, `**bold**` headings and inline bold.

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
}

/// Cell sub-lines, split on `<br>` markers.
pub type Cell = Vec<Vec<Inline>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(Vec<Inline>),
    List(Vec<Vec<Inline>>),
    Table { header: Vec<String>, rows: Vec<Vec<Cell>> },
}

/// What the renderer is currently collecting.
#[derive(Debug, Default)]
enum Pending {
    #[default]
    Empty,
    Table(Vec<Vec<String>>),
    List(Vec<String>),
}

struct Renderer {
    blocks: Vec<Block>,
    pending: Pending,
}

impl Renderer {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            pending: Pending::Empty,
        }
    }

    fn push_table_row(&mut self, cells: Vec<String>) {
        if !matches!(self.pending, Pending::Table(_)) {
            self.flush();
        }
        match &mut self.pending {
            Pending::Table(rows) => rows.push(cells),
            pending => *pending = Pending::Table(vec![cells]),
        }
    }

    fn push_list_item(&mut self, item: String) {
        if !matches!(self.pending, Pending::List(_)) {
            self.flush();
        }
        match &mut self.pending {
            Pending::List(items) => items.push(item),
            pending => *pending = Pending::List(vec![item]),
        }
    }

    /// Emit whatever run is pending.
    fn flush(&mut self) {
        match std::mem::take(&mut self.pending) {
            Pending::Empty => {}
            Pending::Table(mut rows) => {
                if rows.is_empty() {
                    return;
                }
                let header = rows.remove(0);
                let rows = rows
                    .into_iter()
                    .map(|row| row.iter().map(|cell| parse_cell(cell)).collect())
                    .collect();
                self.blocks.push(Block::Table { header, rows });
            }
            Pending::List(items) => {
                if items.is_empty() {
                    return;
                }
                let items = items.iter().map(|item| parse_inline(item)).collect();
                self.blocks.push(Block::List(items));
            }
        }
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.starts_with('|') {
            // A separator row still ends a pending list.
            if matches!(self.pending, Pending::List(_)) {
                self.flush();
            }
            if trimmed.contains("---") {
                return;
            }
            self.push_table_row(split_row(trimmed));
        } else if trimmed.starts_with("* ") || trimmed.starts_with("- ") {
            let item = trimmed
                .split_once(' ')
                .map(|(_, rest)| rest)
                .unwrap_or_default();
            self.push_list_item(item.to_string());
        } else {
            self.flush();
            if trimmed.is_empty() {
                return;
            }
            if trimmed.starts_with("**") && trimmed.ends_with("**") {
                self.blocks.push(Block::Heading(trimmed.replace("**", "")));
            } else {
                self.blocks.push(Block::Paragraph(parse_inline(trimmed)));
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Cells between the outer pipes, trimmed. The piece before the first pipe
/// and the piece after the last one are dropped.
fn split_row(line: &str) -> Vec<String> {
    let pieces: Vec<&str> = line.split('|').collect();
    if pieces.len() < 2 {
        return Vec::new();
    }
    pieces[1..pieces.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Render a whole script into blocks.
pub fn render_script(script: &str) -> Vec<Block> {
    let mut renderer = Renderer::new();
    for line in script.split('\n') {
        renderer.line(line);
    }
    renderer.finish()
}

/// Resolve `**bold**` spans. An unmatched `**` stays literal text.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if open > 0 {
            out.push(Inline::Text(rest[..open].to_string()));
        }
        out.push(Inline::Strong(after_open[..close].to_string()));
        rest = &after_open[close + 2..];
    }
    if !rest.is_empty() {
        out.push(Inline::Text(rest.to_string()));
    }
    out
}

/// Split a table cell on `<br>`, `<br/>` or `<br />` (any case) and resolve
/// inline bold per sub-line.
pub fn parse_cell(text: &str) -> Cell {
    split_line_breaks(text)
        .into_iter()
        .map(parse_inline)
        .collect()
}

fn split_line_breaks(text: &str) -> Vec<&str> {
    // ASCII lower-casing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(found) = lower[search..].find("<br") {
        let tag_start = search + found;
        let mut i = tag_start + 3;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'/' {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'>' {
            parts.push(&text[start..tag_start]);
            start = i + 1;
            search = start;
        } else {
            search = tag_start + 3;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Concatenated text of inline runs, markers removed.
pub fn inline_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|i| match i {
            Inline::Text(t) | Inline::Strong(t) => t.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn strong(s: &str) -> Inline {
        Inline::Strong(s.to_string())
    }

    #[test]
    fn test_table_header_and_body() {
        let blocks = render_script("| A | B |\n|---|---|\n| x | y |");
        assert_eq!(
            blocks,
            vec![Block::Table {
                header: vec!["A".to_string(), "B".to_string()],
                rows: vec![vec![vec![vec![text("x")]], vec![vec![text("y")]]]],
            }]
        );
    }

    #[test]
    fn test_list_markers() {
        let blocks = render_script("- item\n* second **bold**");
        assert_eq!(
            blocks,
            vec![Block::List(vec![
                vec![text("item")],
                vec![text("second "), strong("bold")],
            ])]
        );
    }

    #[test]
    fn test_heading_strips_markers() {
        assert_eq!(
            render_script("  **Heading**  "),
            vec![Block::Heading("Heading".to_string())]
        );
        assert_eq!(
            render_script("**I. KHỞI ĐỘNG** (5 **phút**)**"),
            vec![Block::Heading("I. KHỞI ĐỘNG (5 phút)".to_string())]
        );
    }

    #[test]
    fn test_inline_bold_in_paragraph() {
        assert_eq!(
            render_script("Môn: **Toán** lớp 5"),
            vec![Block::Paragraph(vec![text("Môn: "), strong("Toán"), text(" lớp 5")])]
        );
        assert_eq!(parse_inline("a ** b"), vec![text("a ** b")]);
        assert_eq!(parse_inline("**x**"), vec![strong("x")]);
    }

    #[test]
    fn test_runs_flush_on_transition() {
        let script = "Intro\n- a\n- b\n| H1 | H2 |\n| c | d |\n\nOutro";
        let blocks = render_script(script);
        assert_eq!(blocks.len(), 4);
        assert!(matches!(blocks[0], Block::Paragraph(_)));
        assert!(matches!(&blocks[1], Block::List(items) if items.len() == 2));
        assert!(matches!(&blocks[2], Block::Table { rows, .. } if rows.len() == 1));
        assert!(matches!(blocks[3], Block::Paragraph(_)));
    }

    #[test]
    fn test_separator_only_table_emits_nothing() {
        assert!(render_script("|---|---|").is_empty());
        assert!(render_script("\n\n   \n").is_empty());
    }

    #[test]
    fn test_bullet_without_text_after_marker() {
        // "-x" is not a bullet; "- " alone trims to "-" and is a paragraph.
        assert_eq!(render_script("-x"), vec![Block::Paragraph(vec![text("-x")])]);
        assert_eq!(render_script("- "), vec![Block::Paragraph(vec![text("-")])]);
    }

    #[test]
    fn test_cell_line_breaks() {
        let cell = parse_cell("- **[GV]** hỏi<br>- chờ<BR />- khen<br/>");
        assert_eq!(
            cell,
            vec![
                vec![text("- "), strong("[GV]"), text(" hỏi")],
                vec![text("- chờ")],
                vec![text("- khen")],
                vec![],
            ]
        );
        assert_eq!(parse_cell("a<brx>b"), vec![vec![text("a<brx>b")]]);
    }

    #[test]
    fn test_header_cells_are_raw() {
        let blocks = render_script("| **GV** | HS |\n| a | b |");
        let Block::Table { header, .. } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(header, &vec!["**GV**".to_string(), "HS".to_string()]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let script = "**A**\nText **b**\n- x\n| h | i |\n|--|--|\n| 1<br>2 | 3 |";
        assert_eq!(render_script(script), render_script(script));
    }

    #[test]
    fn test_row_without_trailing_pipe_drops_last_piece() {
        let blocks = render_script("| a | b\n| c | d |");
        let Block::Table { header, rows } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(header, &vec!["a".to_string()]);
        assert_eq!(rows[0].len(), 2);
    }
}
