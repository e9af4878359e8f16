//! Instruction text sent to the model.
//!
//! Everything here is pure: the same details always produce the same prompt.

use lesson_common::LessonDetails;
use serde_json::{json, Value};

/// How inventive the generated activities and wording should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creativity {
    Practical,
    Balanced,
    High,
}

impl Creativity {
    /// Unknown labels fall back to [`Creativity::Balanced`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Thực tế" => Self::Practical,
            "Sáng tạo cao" => Self::High,
            _ => Self::Balanced,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Practical => "Thực tế",
            Self::Balanced => "Cân bằng",
            Self::High => "Sáng tạo cao",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Practical => "Tập trung vào các phương pháp giảng dạy truyền thống và thông tin thực tế. Tránh các phép loại suy phức tạp hoặc các hoạt động quá sáng tạo.",
            Self::High => "Sử dụng các phép loại suy độc đáo, các hoạt động đổi mới và cách tiếp cận kể chuyện để làm cho bài học trở nên hấp dẫn. Đừng ngại đề xuất các ý tưởng độc đáo.",
            Self::Balanced => "Kết hợp các phương pháp giảng dạy đáng tin cậy với các yếu tố sáng tạo để giữ cho học sinh hứng thú.",
        }
    }
}

/// How much detail the script should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Concise,
    Detailed,
    Comprehensive,
}

impl Verbosity {
    /// Unknown labels fall back to [`Verbosity::Detailed`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Ngắn gọn" => Self::Concise,
            "Toàn diện" => Self::Comprehensive,
            _ => Self::Detailed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Concise => "Ngắn gọn",
            Self::Detailed => "Chi tiết",
            Self::Comprehensive => "Toàn diện",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Self::Concise => "Giữ cho kịch bản ngắn gọn và đi thẳng vào vấn đề. Ưu tiên sự rõ ràng và hiệu quả hơn là các giải thích dài dòng.",
            Self::Comprehensive => "Cung cấp một kịch bản rất chi tiết với các giải thích sâu sắc, các điểm thảo luận bổ sung và các câu trả lời tiềm năng cho các câu hỏi của học sinh. Bao quát chủ đề một cách toàn diện.",
            Self::Detailed => "Cung cấp một lượng chi tiết cân bằng, bao gồm các giải thích rõ ràng và đủ thông tin cho một bài học đầy đủ mà không làm học sinh quá tải.",
        }
    }
}

/// Leading integer of `s` after trimming, the way a lenient form parser reads it.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Grade number from a label such as `"Lớp 7"`.
pub fn grade_number(grade_level: &str) -> Option<i64> {
    parse_leading_int(&grade_level.replace("Lớp ", ""))
}

/// Minutes per period: 45 for grades 6 to 9, 35 otherwise.
pub fn period_duration(grade_level: &str) -> u32 {
    match grade_number(grade_level) {
        Some(6..=9) => 45,
        _ => 35,
    }
}

/// Period count; non-numeric, missing or zero input counts as one period.
pub fn period_count(number_of_periods: &str) -> u32 {
    match parse_leading_int(number_of_periods) {
        Some(0) | None => 1,
        Some(n) => u32::try_from(n).unwrap_or(1),
    }
}

/// Derived timing for a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonTiming {
    pub periods: u32,
    pub period_minutes: u32,
}

impl LessonTiming {
    pub fn from_details(details: &LessonDetails) -> Self {
        Self {
            periods: period_count(&details.number_of_periods),
            period_minutes: period_duration(&details.grade_level),
        }
    }

    pub fn total_minutes(self) -> u32 {
        self.periods.saturating_mul(self.period_minutes)
    }

    pub fn is_multi_period(self) -> bool {
        self.periods > 1
    }
}

fn multi_period_instruction(timing: LessonTiming) -> String {
    if !timing.is_multi_period() {
        return String::new();
    }
    let n = timing.periods;
    let total = timing.total_minutes();
    let minutes = timing.period_minutes;
    format!(
        "**LƯU Ý QUAN TRỌNG VỀ BÀI DẠY NHIỀU TIẾT:**
- Bài dạy này kéo dài **{n} tiết**. Tổng thời lượng là **{total} phút**.
- Bạn phải thiết kế một chuỗi các hoạt động liền mạch, logic trải dài qua tất cả các tiết.
- **Cực kỳ quan trọng:** Phân chia nội dung và hoạt động một cách hợp lý. **Mỗi tiết học phải được trình bày riêng biệt**, bắt đầu bằng tiêu đề rõ ràng (ví dụ: \"TIẾT 1: [Tên chủ đề của tiết 1]\").
- **Trong mỗi tiết**, bạn phải đảm bảo có đủ các bước sư phạm cần thiết (Khởi động/Kết nối, Hình thành kiến thức, Luyện tập, Vận dụng, Củng cố). Hoạt động khởi động của các tiết sau (từ tiết 2 trở đi) nên tập trung vào việc ôn lại kiến thức của tiết trước và tạo cầu nối sang nội dung mới của tiết hiện tại.
- Phân bổ thời gian cho các hoạt động trong từng tiết phải hợp lý, đảm bảo tổng thời gian của mỗi tiết là **{minutes} phút**.
"
    )
}

fn file_instruction(files_provided: bool) -> &'static str {
    if files_provided {
        "Nhiệm vụ của bạn là phân tích các tài liệu được cung cấp (có thể là giáo án, trang sách, hoặc hình ảnh) và tạo ra một kịch bản thuyết trình chi tiết, hấp dẫn và phù hợp với lứa tuổi cho giáo viên. Hãy sử dụng các tài liệu này làm nguồn thông tin chính."
    } else {
        "Nhiệm vụ của bạn là tạo ra một kịch bản thuyết trình chi tiết, hấp dẫn và phù hợp với lứa tuổi cho giáo viên dựa trên các chi tiết kế hoạch bài học được cung cấp."
    }
}

const STRUCTURE_REQUIREMENTS: &str = "**YÊU CẦU CẤU TRÚC TỔNG THỂ CỦA GIÁO ÁN:**
Giáo án phải bao gồm hai phần chính:
1.  **Phần đầu:** Thông tin chung, Yêu cầu cần đạt và Đồ dùng dạy học.
2.  **Phần thân:** Chi tiết các hoạt động dạy và học, trình bày dưới dạng bảng hai cột và tuân theo cấu trúc 5 bước sư phạm.

---

**PHẦN 1: THÔNG TIN CHUNG, YÊU CẦU, ĐỒ DÙNG**

**Yêu cầu định dạng:**
- Trình bày chính xác theo các mục dưới đây.
- Từ **Mục tiêu học tập** được cung cấp, hãy suy luận và viết chi tiết cho mục **I. YÊU CẦU CẦN ĐẠT**, phân tách rõ ràng thành 3 phần: Năng lực đặc thù, Năng lực chung, và Phẩm chất, bám sát các yêu cầu của Chương trình GDPT 2018.
- Tự suy luận và điền thông tin hợp lý cho mục **II. ĐỒ DÙNG DẠY HỌC**.";

const PART_ONE_EXAMPLE_BODY: &str = "**I. YÊU CẦU CẦN ĐẠT:**
**1. Năng lực đặc thù:**
- HS nhận biết được hàng của số thập phân; đọc, viết được số thập phân.
- HS vận dụng được việc nhận biết hàng của số thập phân; đọc, viết được số thập phân trong một số tình huống thực tế.
- HS có cơ hội phát triển năng lực tư duy toán học và năng lực giao tiếp toán học.
**2. Năng lực chung.**
- Năng lực tự chủ, tự học: Chủ động tích cực tìm hiểu và viết được hàng của số thập phân; đọc, viết được số thập phân.
- Năng lực giải quyết vấn đề và sáng tạo: Biết vận dụng được viết số tự nhiên thành tổng để giải quyết một số tình huống thực tế.
- Năng lực giao tiếp và hợp tác: Có thói quen trao đổi, thảo luận cùng nhau hoàn thành nhiệm vụ dưới sự hướng dẫn của giáo viên.
**3. Phẩm chất.**
- Phẩm chất chăm chỉ: Ham học hỏi tìm tòi để hoàn thành tốt nội dung học tập.
- Phẩm chất trách nhiệm: Có ý thức trách nhiệm với lớp, tôn trọng tập thể.
**II. ĐỒ DÙNG DẠY HỌC**
- **GV:** SGK, kế hoạch bài và các thiết bị, học liệu và đồ dùng phục vụ cho tiết dạy.
- **HS:** SGK, vở ghi.";

const PART_TWO: &str = "**PHẦN 2: CÁC HOẠT ĐỘNG DẠY HỌC CHỦ YẾU**

**Yêu cầu về cấu trúc và nội dung sư phạm:**
- **Cấu trúc 5 bước:** Phải thiết kế các hoạt động theo đúng 5 bước của một tiết học hiện đại:
    1.  **HOẠT ĐỘNG KHỞI ĐỘNG:** Gây hứng thú, kết nối bài cũ - bài mới.
    2.  **HOẠT ĐỘNG HÌNH THÀNH KIẾN THỨC MỚI (KHÁM PHÁ):** Tổ chức cho học sinh tự tìm tòi, khám phá kiến thức.
    3.  **HOẠT ĐỘNG LUYỆN TẬP:** Rèn luyện kỹ năng, áp dụng kiến thức vừa học.
    4.  **HOẠT ĐỘNG VẬN DỤNG:** Khuyến khích học sinh áp dụng kiến thức vào tình huống thực tế.
    5.  **HOẠT ĐỘNG CỦNG CỐ, DẶN DÒ:** Hệ thống hóa kiến thức, giao nhiệm vụ về nhà.
- **Định dạng bảng 2 cột:** Mỗi hoạt động phải được trình bày trong bảng markdown 2 cột: \"Hoạt động của giáo viên\" và \"Hoạt động của học sinh\".
- **Chi tiết và thực tiễn:**
    - **Hoạt động của giáo viên:** Mô tả rõ ràng từng bước (lời nói, hành động, câu hỏi gợi mở, cách tổ chức...). Tích hợp các kỹ thuật đánh giá thường xuyên (quan sát, đặt câu hỏi, nhận xét sản phẩm...). Gợi ý phương án hỗ trợ học sinh gặp khó khăn hoặc thử thách cho học sinh khá giỏi.
    - **Hoạt động của học sinh:** Mô tả chi tiết các hành động tương ứng (lắng nghe, trả lời, thảo luận nhóm, làm bài tập, báo cáo...).
- **Tiêu đề rõ ràng:** Mỗi hoạt động lớn phải có tiêu đề in đậm và ghi rõ thời gian dự kiến (ví dụ: **I. HOẠT ĐỘNG KHỞI ĐỘNG (3-5 phút)**).
- **Ký hiệu:** Sử dụng **[GV]** và **[HS]** để làm rõ.

**Ví dụ định dạng đầu ra mong muốn cho Phần 2:**

**I. HOẠT ĐỘNG KHỞI ĐỘNG (3-5 phút)**
*   **Mục tiêu:** Tạo không khí vui vẻ, kết nối kiến thức cũ, dẫn dắt vào bài mới.
*   **Cách tiến hành:**

| HOẠT ĐỘNG CỦA GIÁO VIÊN | HOẠT ĐỘNG CỦA HỌC SINH |
|--------------------------|------------------------|
| - **[GV]** Tổ chức trò chơi \"Ai nhanh hơn?\" để ôn lại bảng nhân 2. **[GV]** Chiếu câu hỏi lên màn hình. | - **[HS]** Hào hứng tham gia trò chơi. |
| - **[GV]** Nhận xét, tuyên dương. Đặt câu hỏi: \"Khi muốn lấy 2 cái bánh 3 lần, ta làm phép tính gì?\" Dẫn dắt vào bài học mới. | - **[HS]** Trả lời: \"Phép nhân 2x3 ạ\". Lắng nghe GV giới thiệu bài mới. |";

/// Full script-generation instruction for the given lesson.
pub fn build_prompt(details: &LessonDetails, files_provided: bool) -> String {
    let timing = LessonTiming::from_details(details);
    let period_minutes = timing.period_minutes;
    let total = timing.total_minutes();
    let periods_label = &details.number_of_periods;
    let creativity = Creativity::from_label(&details.creativity).instruction();
    let verbosity = Verbosity::from_label(&details.verbosity).instruction();

    format!(
        "Bạn là một chuyên gia soạn giáo án tiểu học hàng đầu, chuyên tạo ra các kịch bản bài giảng (giáo án) chi tiết, hấp dẫn và tuân thủ chặt chẽ theo **Chương trình giáo dục phổ thông 2018 của Việt Nam**, tập trung vào việc phát triển năng lực và phẩm chất của học sinh.
{file_instruction}

{multi_period}

{STRUCTURE_REQUIREMENTS}

**Ví dụ định dạng đầu ra mong muốn cho Phần 1:**

Môn: Toán
Bài dạy: Luyện tập Số thập phân
Lớp: 5
Số tiết: {periods_label}
Thời lượng: {period_minutes} phút/tiết

{PART_ONE_EXAMPLE_BODY}

---

{PART_TWO}

---

**THÔNG TIN BÀI HỌC ĐỂ SOẠN GIÁO ÁN:**
- **Chủ đề (Bài dạy):** {topic}
- **Cấp lớp:** {grade}
- **Số tiết:** {periods_label}
- **Tổng thời lượng:** {total} phút ({periods_label} tiết x {period_minutes} phút/tiết)
- **Mục tiêu học tập (Dùng để phát triển mục I. YÊU CẦU CẦN ĐẠT):**
  {objectives}
- **Nội dung chính cần đề cập:** {key_concepts}
- **Gợi ý Hoạt động trong lớp:** {activities}
- **Giọng điệu mong muốn:** {tone}
- **Mức độ sáng tạo:** {creativity}
- **Mức độ chi tiết:** {verbosity}

Dựa vào thông tin được cung cấp, hãy tạo giáo án hoàn chỉnh theo đúng cấu trúc và định dạng yêu cầu. Bắt đầu với phần \"Môn:\".
",
        file_instruction = file_instruction(files_provided),
        multi_period = multi_period_instruction(timing),
        topic = details.topic,
        grade = details.grade_level,
        objectives = details.objectives,
        key_concepts = details.key_concepts,
        activities = details.activities,
        tone = details.tone,
    )
}

/// Instruction for turning a finished script into slides.
pub fn slides_prompt(script: &str) -> String {
    format!(
        "Bạn là một chuyên gia thiết kế bài giảng bậc thầy, có kỹ năng biến các kịch bản giảng dạy chi tiết thành các slide trình bày rõ ràng, hấp dẫn và có hình ảnh thu hút cho học sinh nhỏ tuổi.
Kịch bản được cung cấp có cấu trúc dạng bảng markdown hai cột, phác thảo các hoạt động của giáo viên và học sinh.
Nhiệm vụ của bạn là phân tích kỹ lưỡng kịch bản này và tạo ra một chuỗi các slide tương ứng, tuân thủ nghiêm ngặt định dạng JSON được yêu cầu.

Đối với mỗi slide, hãy xây dựng nội dung chi tiết như sau:
1.  **title**: Tiêu đề phải tương ứng trực tiếp với các tiêu đề hoạt động chính trong kịch bản (ví dụ: \"I. HOẠT ĐỘNG KHỞI ĐỘNG (4 - 5 phút)\", \"II. HÌNH THÀNH KIẾN THỨC MỚI\", v.v.).
2.  **content**: Trích xuất và tóm tắt các điểm chính, câu hỏi hoặc hướng dẫn *quan trọng nhất* từ kịch bản mà học sinh cần nhìn thấy trên màn hình. Giữ nội dung ngắn gọn, súc tích, sử dụng các gạch đầu dòng ngắn. **Đặc biệt quan trọng**: Đối với các slide chứa bài tập hoặc câu hỏi luyện tập, hãy trình bày rõ ràng cả **đề bài** và **lời giải** hoặc **đáp án** ngay trên cùng một slide. Cấu trúc này giúp học sinh dễ dàng theo dõi và đối chiếu. Đây là thông tin \"dành cho học sinh\".
3.  **speakerNotes**: Đây là phần cực kỳ quan trọng. Hãy lấy các hướng dẫn chi tiết từ cột 'HOẠT ĐỘNG CỦA GIÁO VIÊN' cho phần tương ứng của kịch bản. Nội dung này phải là một bản hướng dẫn gần như nguyên văn cho giáo viên, cho họ biết chính xác phải nói gì và làm gì. Bao gồm các gợi ý cho câu hỏi và các tương tác mong đợi của học sinh.
4.  **visualSuggestion**: Cung cấp một ý tưởng hình ảnh *cụ thể và sáng tạo*. Thay vì \"một hình ảnh về cái cây\", hãy đề xuất \"Một video tua nhanh thời gian về một hạt đậu nảy mầm\" hoặc \"Một sơ đồ hoạt hình đầy màu sắc cho thấy các bộ phận của bông hoa\". Trong phần 'rationale', hãy giải thích rõ ràng ý tưởng hình ảnh này hỗ trợ trực tiếp cho mục tiêu học tập của slide như thế nào.

Hãy đảm bảo rằng chuỗi các slide tuân theo logic của kịch bản bài học từ đầu đến cuối, bao gồm tất cả các hoạt động chính. Đầu ra phải là một mảng JSON hợp lệ gồm các đối tượng slide.

Kịch bản cần phân tích:
---
{script}
---
"
    )
}

/// Response schema for the slide request: an array of slide objects.
pub fn slides_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "Tiêu đề của slide."
                },
                "content": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Danh sách các gạch đầu dòng chính cho nội dung của slide."
                },
                "speakerNotes": {
                    "type": "STRING",
                    "description": "Ghi chú chi tiết cho người trình bày để giải thích thêm về nội dung."
                },
                "visualSuggestion": {
                    "type": "OBJECT",
                    "description": "Gợi ý về hình ảnh hoặc sơ đồ để minh họa cho slide, bao gồm cả lý do.",
                    "properties": {
                        "suggestion": {
                            "type": "STRING",
                            "description": "Gợi ý cụ thể về hình ảnh hoặc sơ đồ."
                        },
                        "rationale": {
                            "type": "STRING",
                            "description": "Giải thích tại sao gợi ý này phù hợp và hiệu quả."
                        }
                    },
                    "required": ["suggestion", "rationale"]
                }
            },
            "required": ["title", "content", "speakerNotes", "visualSuggestion"]
        }
    })
}

pub const OBJECTIVES_PROMPT: &str = "Bạn là một trợ lý giáo dục AI. Hãy phân tích kỹ lưỡng (các) tài liệu được cung cấp và trích xuất các mục tiêu học tập chính. Liệt kê mỗi mục tiêu trên một dòng riêng biệt, bắt đầu bằng số thứ tự (1., 2., 3., ...). Nếu không tìm thấy mục tiêu nào, hãy trả về một chuỗi trống.";

pub const KEY_CONCEPTS_PROMPT: &str = "Bạn là một trợ lý giáo dục AI. Hãy phân tích kỹ lưỡng (các) tài liệu được cung cấp và trích xuất các khái niệm hoặc thuật ngữ chính quan trọng nhất. Liệt kê chúng thành một danh sách duy nhất, cách nhau bằng dấu phẩy. Ví dụ: Khái niệm A, Khái niệm B, Khái niệm C. Nếu không tìm thấy khái niệm nào, hãy trả về một chuỗi trống.";

/// Activity suggestions, phrased per period when the lesson spans several.
pub fn activities_prompt(details: &LessonDetails) -> String {
    let periods = period_count(&details.number_of_periods);
    let period_instruction = if periods > 1 {
        format!(
            "Bài học này được thiết kế cho {periods} tiết. Hãy đề xuất các hoạt động sáng tạo, hấp dẫn và có tính kết nối, phân bổ hợp lý cho từng tiết. Ví dụ: \"Tiết 1: Thảo luận nhóm, Tiết 2: Đóng vai tình huống, Tiết 3: Dự án nhỏ\"."
        )
    } else {
        "Hãy đề xuất 2-3 hoạt động sáng tạo và hấp dẫn cho lớp học.".to_string()
    };

    format!(
        "Bạn là một trợ lý giáo dục AI. Dựa trên nội dung của (các) tài liệu được cung cấp, hãy đề xuất các hoạt động cho lớp học.
{period_instruction}
Các hoạt động này có thể bao gồm thảo luận nhóm, thí nghiệm thực hành, câu đố nhanh, đóng vai, v.v. Trình bày các ý tưởng dưới dạng một danh sách ngắn gọn, cách nhau bằng dấu phẩy. Nếu không có ý tưởng nào, hãy trả về chuỗi trống."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(grade: &str, periods: &str) -> LessonDetails {
        LessonDetails {
            topic: "Phân số".to_string(),
            grade_level: grade.to_string(),
            number_of_periods: periods.to_string(),
            ..LessonDetails::default()
        }
    }

    #[test]
    fn test_period_duration_by_grade() {
        for grade in 1..=9 {
            let expected = if (6..=9).contains(&grade) { 45 } else { 35 };
            assert_eq!(period_duration(&format!("Lớp {grade}")), expected, "grade {grade}");
        }
        assert_eq!(period_duration("Lớp 10"), 35);
        assert_eq!(period_duration("Mẫu giáo"), 35);
        assert_eq!(period_duration(""), 35);
    }

    #[test]
    fn test_period_count_defaults_to_one() {
        assert_eq!(period_count("3"), 3);
        assert_eq!(period_count(" 2 tiết"), 2);
        assert_eq!(period_count(""), 1);
        assert_eq!(period_count("abc"), 1);
        assert_eq!(period_count("0"), 1);
    }

    #[test]
    fn test_total_duration() {
        let timing = LessonTiming::from_details(&details("Lớp 7", "3"));
        assert_eq!(timing.period_minutes, 45);
        assert_eq!(timing.total_minutes(), 135);

        let timing = LessonTiming::from_details(&details("Lớp 2", "x"));
        assert_eq!(timing.total_minutes(), 35);
    }

    #[test]
    fn test_huge_period_count_saturates() {
        let d = details("Lớp 7", "100000000");
        let timing = LessonTiming::from_details(&d);
        assert_eq!(timing.periods, 100_000_000);
        assert_eq!(timing.total_minutes(), u32::MAX);

        let prompt = build_prompt(&d, false);
        assert!(prompt.contains("**100000000 tiết**"));
    }

    #[test]
    fn test_two_period_scenario() {
        let d = details("Lớp 5", "2");
        let timing = LessonTiming::from_details(&d);
        assert_eq!(timing.total_minutes(), 70);

        let prompt = build_prompt(&d, false);
        assert!(prompt.contains("LƯU Ý QUAN TRỌNG VỀ BÀI DẠY NHIỀU TIẾT"));
        assert!(prompt.contains("**2 tiết**"));
        assert!(prompt.contains("**70 phút**"));
        assert!(prompt.contains("70 phút (2 tiết x 35 phút/tiết)"));
        assert!(prompt.contains("**Chủ đề (Bài dạy):** Phân số"));
    }

    #[test]
    fn test_single_period_has_no_multi_period_block() {
        for periods in ["1", "", "0", "abc"] {
            let prompt = build_prompt(&details("Lớp 5", periods), false);
            assert!(!prompt.contains("BÀI DẠY NHIỀU TIẾT"), "periods {periods:?}");
        }
    }

    #[test]
    fn test_file_instruction_switches() {
        let d = details("Lớp 5", "1");
        assert!(build_prompt(&d, true).contains("phân tích các tài liệu được cung cấp"));
        assert!(!build_prompt(&d, false).contains("phân tích các tài liệu được cung cấp"));
    }

    #[test]
    fn test_presets_and_defaults() {
        assert_eq!(Creativity::from_label("Thực tế"), Creativity::Practical);
        assert_eq!(Creativity::from_label("???"), Creativity::Balanced);
        assert_eq!(Verbosity::from_label("Toàn diện"), Verbosity::Comprehensive);
        assert_eq!(Verbosity::from_label(""), Verbosity::Detailed);

        let mut d = details("Lớp 5", "1");
        d.creativity = "Sáng tạo cao".to_string();
        d.verbosity = "Ngắn gọn".to_string();
        let prompt = build_prompt(&d, false);
        assert!(prompt.contains(Creativity::High.instruction()));
        assert!(prompt.contains(Verbosity::Concise.instruction()));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let d = details("Lớp 8", "2");
        assert_eq!(build_prompt(&d, true), build_prompt(&d, true));
    }

    #[test]
    fn test_activities_prompt_phrasing() {
        assert!(activities_prompt(&details("Lớp 5", "3")).contains("thiết kế cho 3 tiết"));
        assert!(activities_prompt(&details("Lớp 5", "1")).contains("2-3 hoạt động"));
    }

    #[test]
    fn test_slides_schema_required_fields() {
        let schema = slides_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        let nested = &schema["items"]["properties"]["visualSuggestion"]["required"];
        assert_eq!(nested, &serde_json::json!(["suggestion", "rationale"]));
    }
}
