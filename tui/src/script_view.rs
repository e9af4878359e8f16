use lesson_core::render::{Block as ScriptBlock, Cell, Inline};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn spans(inlines: &[Inline], base: Style) -> Vec<Span<'static>> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(t) => Span::styled(t.clone(), base),
            Inline::Strong(t) => Span::styled(t.clone(), base.add_modifier(Modifier::BOLD)),
        })
        .collect()
}

fn cell_lines(label: &str, cell: &Cell, out: &mut Vec<Line<'static>>) {
    out.push(Line::from(Span::styled(
        format!("  {label}"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    for sub in cell {
        let mut line = vec![Span::raw("    ")];
        line.extend(spans(sub, Style::default()));
        out.push(Line::from(line));
    }
}

/// Terminal rendering of script blocks.
///
/// Tables are too wide for most terminals, so each body row is stacked:
/// every cell is printed under its column header.
pub fn script_lines(blocks: &[ScriptBlock]) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let rule = Style::default().fg(Color::DarkGray);

    let mut out = Vec::new();
    for block in blocks {
        match block {
            ScriptBlock::Heading(text) => {
                out.push(Line::from(""));
                out.push(Line::from(Span::styled(text.clone(), heading)));
            }
            ScriptBlock::Paragraph(inlines) => out.push(Line::from(spans(inlines, Style::default()))),
            ScriptBlock::List(items) => {
                for item in items {
                    let mut line = vec![Span::raw("  • ")];
                    line.extend(spans(item, Style::default()));
                    out.push(Line::from(line));
                }
            }
            ScriptBlock::Table { header, rows } => {
                out.push(Line::from(Span::styled(
                    header.join(" │ "),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for row in rows {
                    out.push(Line::from(Span::styled("─".repeat(40), rule)));
                    for (i, cell) in row.iter().enumerate() {
                        let label = header.get(i).map(String::as_str).unwrap_or("");
                        cell_lines(label, cell, &mut out);
                    }
                }
                out.push(Line::from(Span::styled("─".repeat(40), rule)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::render::render_script;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_bold_spans_are_styled() {
        let lines = script_lines(&render_script("Môn: **Toán**"));
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "Môn: Toán");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_table_rows_are_stacked_under_headers() {
        let lines = script_lines(&render_script(
            "| GV | HS |\n|---|---|\n| Hỏi<br>Gợi ý | Trả lời |",
        ));
        let rendered: Vec<String> = lines.iter().map(text).collect();
        let rule = "─".repeat(40);
        assert_eq!(
            rendered,
            vec![
                "GV │ HS",
                rule.as_str(),
                "  GV",
                "    Hỏi",
                "    Gợi ý",
                "  HS",
                "    Trả lời",
                rule.as_str(),
            ]
        );
    }

    #[test]
    fn test_list_and_heading() {
        let lines = script_lines(&render_script("**I. KHỞI ĐỘNG**\n- Hát"));
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered, vec!["", "I. KHỞI ĐỘNG", "  • Hát"]);
    }
}
