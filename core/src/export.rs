use lesson_common::{export_file_name, Slide};
use std::fmt::Write as _;

const SLIDE_SEPARATOR: &str = "==================================================";
const TOPIC_PREFIX: &str = "Chủ đề: ";

pub fn script_file_name(topic: &str) -> String {
    export_file_name("kich-ban", topic)
}

pub fn slides_file_name(topic: &str) -> String {
    export_file_name("slides", topic)
}

/// Slide deck saved as JSON, for viewing later.
pub fn slides_json_file_name(topic: &str) -> String {
    let name = slides_file_name(topic);
    let stem = name.strip_suffix(".txt").unwrap_or(&name);
    format!("{stem}.json")
}

/// Downloadable script: topic header followed by the raw script text.
pub fn script_export(topic: &str, script: &str) -> String {
    format!("{TOPIC_PREFIX}{topic}\n\n{script}")
}

/// Split a file written by [`script_export`] back into topic and script.
/// Text without the header is returned whole with no topic.
pub fn parse_script_export(content: &str) -> (Option<&str>, &str) {
    if let Some(rest) = content.strip_prefix(TOPIC_PREFIX) {
        if let Some((topic, script)) = rest.split_once("\n\n") {
            return (Some(topic), script);
        }
    }
    (None, content)
}

pub fn slides_json(slides: &[Slide]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(slides)
}

/// Downloadable slide outline, one block per slide.
pub fn slides_export(topic: &str, slides: &[Slide]) -> String {
    let mut content = format!("{TOPIC_PREFIX}{topic}\n\n");

    for (index, slide) in slides.iter().enumerate() {
        let _ = write!(content, "--- SLIDE {}: {} ---\n\n", index + 1, slide.title);

        content.push_str("[ NỘI DUNG ]\n");
        if slide.content.is_empty() {
            content.push_str("(Không có nội dung)\n");
        } else {
            for point in &slide.content {
                let _ = writeln!(content, "- {point}");
            }
        }
        content.push('\n');

        if let Some(notes) = slide.speaker_notes.as_deref().filter(|n| !n.is_empty()) {
            content.push_str("[ GHI CHÚ CHO NGƯỜI TRÌNH BÀY ]\n");
            let _ = write!(content, "{notes}\n\n");
        }

        if let Some(visual) = &slide.visual_suggestion {
            content.push_str("[ GỢI Ý HÌNH ẢNH ]\n");
            let _ = writeln!(content, "  Gợi ý: {}", visual.suggestion);
            let _ = write!(content, "  Lý do: {}\n\n", visual.rationale);
        }

        let _ = write!(content, "{SLIDE_SEPARATOR}\n\n");
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_common::VisualSuggestion;

    #[test]
    fn test_script_export() {
        assert_eq!(script_export("Phân số", "Môn: Toán"), "Chủ đề: Phân số\n\nMôn: Toán");
        assert_eq!(script_file_name("Phân số"), "kich-ban-phn-s.txt");
        assert_eq!(slides_file_name(""), "slides-bai-giang.txt");
        // Whitespace alone still slugs to a dash.
        assert_eq!(slides_file_name("   "), "slides--.txt");
    }

    #[test]
    fn test_parse_script_export() {
        let saved = script_export("Phân số", "**I. KHỞI ĐỘNG**\n\nMôn: Toán");
        assert_eq!(
            parse_script_export(&saved),
            (Some("Phân số"), "**I. KHỞI ĐỘNG**\n\nMôn: Toán")
        );
        assert_eq!(parse_script_export("Môn: Toán"), (None, "Môn: Toán"));
        assert_eq!(slides_json_file_name("Phân số"), "slides-phn-s.json");
    }

    #[test]
    fn test_slides_json_uses_camel_case() {
        let json = slides_json(&[Slide {
            title: "A".to_string(),
            content: vec![],
            speaker_notes: Some("n".to_string()),
            visual_suggestion: None,
        }])
        .unwrap();
        assert!(json.contains("\"speakerNotes\": \"n\""));
    }

    #[test]
    fn test_slides_export_layout() {
        let slides = vec![
            Slide {
                title: "Khởi động".to_string(),
                content: vec!["Trò chơi".to_string(), "Hỏi đáp".to_string()],
                speaker_notes: Some("Chia nhóm".to_string()),
                visual_suggestion: Some(VisualSuggestion {
                    suggestion: "Ảnh lớp học".to_string(),
                    rationale: "Tạo hứng thú".to_string(),
                }),
            },
            Slide {
                title: "Củng cố".to_string(),
                content: vec![],
                speaker_notes: None,
                visual_suggestion: None,
            },
        ];

        let expected = "Chủ đề: Toán\n\n\
--- SLIDE 1: Khởi động ---\n\n\
[ NỘI DUNG ]\n- Trò chơi\n- Hỏi đáp\n\n\
[ GHI CHÚ CHO NGƯỜI TRÌNH BÀY ]\nChia nhóm\n\n\
[ GỢI Ý HÌNH ẢNH ]\n  Gợi ý: Ảnh lớp học\n  Lý do: Tạo hứng thú\n\n\
==================================================\n\n\
--- SLIDE 2: Củng cố ---\n\n\
[ NỘI DUNG ]\n(Không có nội dung)\n\n\
==================================================\n\n";
        assert_eq!(slides_export("Toán", &slides), expected);
    }
}
