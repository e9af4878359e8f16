use lesson_common::LessonDetails;
use lesson_core::extraction::ExtractionFlags;
use lesson_core::prompt::{Creativity, LessonTiming, Verbosity};

pub const GRADE_LEVELS: [&str; 9] = [
    "Lớp 1", "Lớp 2", "Lớp 3", "Lớp 4", "Lớp 5", "Lớp 6", "Lớp 7", "Lớp 8", "Lớp 9",
];

pub const TONES: [&str; 8] = [
    "Hấp dẫn và Tương tác",
    "Thân thiện và Gần gũi",
    "Kể chuyện và Gợi cảm hứng",
    "Khám phá và Gợi mở",
    "Đơn giản và Trực quan",
    "Hài hước và Vui nhộn",
    "Trang trọng và Khoa học",
    "Hướng dẫn chi tiết, từng bước",
];

/// Option after `current`; unknown values restart at the first option.
fn next_option(options: &[&str], current: &str) -> String {
    let next = options
        .iter()
        .position(|o| *o == current)
        .map_or(0, |i| (i + 1) % options.len());
    options[next].to_string()
}

/// Editable rows of the lesson form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Topic,
    GradeLevel,
    NumberOfPeriods,
    Objectives,
    KeyConcepts,
    Tone,
    Activities,
    Creativity,
    Verbosity,
}

impl DetailField {
    pub const ALL: [DetailField; 9] = [
        DetailField::Topic,
        DetailField::GradeLevel,
        DetailField::NumberOfPeriods,
        DetailField::Objectives,
        DetailField::KeyConcepts,
        DetailField::Tone,
        DetailField::Activities,
        DetailField::Creativity,
        DetailField::Verbosity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailField::Topic => "Chủ đề",
            DetailField::GradeLevel => "Lớp",
            DetailField::NumberOfPeriods => "Số tiết",
            DetailField::Objectives => "Mục tiêu",
            DetailField::KeyConcepts => "Khái niệm chính",
            DetailField::Tone => "Giọng điệu",
            DetailField::Activities => "Hoạt động",
            DetailField::Creativity => "Mức độ sáng tạo",
            DetailField::Verbosity => "Mức độ chi tiết",
        }
    }

    pub fn get(self, details: &LessonDetails) -> &str {
        match self {
            DetailField::Topic => &details.topic,
            DetailField::GradeLevel => &details.grade_level,
            DetailField::NumberOfPeriods => &details.number_of_periods,
            DetailField::Objectives => &details.objectives,
            DetailField::KeyConcepts => &details.key_concepts,
            DetailField::Tone => &details.tone,
            DetailField::Activities => &details.activities,
            DetailField::Creativity => &details.creativity,
            DetailField::Verbosity => &details.verbosity,
        }
    }

    pub fn set(self, details: &mut LessonDetails, value: String) {
        let slot = match self {
            DetailField::Topic => &mut details.topic,
            DetailField::GradeLevel => &mut details.grade_level,
            DetailField::NumberOfPeriods => &mut details.number_of_periods,
            DetailField::Objectives => &mut details.objectives,
            DetailField::KeyConcepts => &mut details.key_concepts,
            DetailField::Tone => &mut details.tone,
            DetailField::Activities => &mut details.activities,
            DetailField::Creativity => &mut details.creativity,
            DetailField::Verbosity => &mut details.verbosity,
        };
        *slot = value;
    }

    /// Enumerated fields cycle through their options instead of taking text.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            DetailField::GradeLevel
                | DetailField::Tone
                | DetailField::Creativity
                | DetailField::Verbosity
        )
    }

    /// Extracted fields are read-only while their extraction is running.
    pub fn is_locked(self, extracting: ExtractionFlags) -> bool {
        match self {
            DetailField::Objectives => extracting.objectives,
            DetailField::KeyConcepts => extracting.key_concepts,
            DetailField::Activities => extracting.activities,
            _ => false,
        }
    }

    /// Advance an enumerated field to its next option.
    pub fn cycle(self, details: &mut LessonDetails) {
        match self {
            DetailField::GradeLevel => {
                details.grade_level = next_option(&GRADE_LEVELS, &details.grade_level);
            }
            DetailField::Tone => details.tone = next_option(&TONES, &details.tone),
            DetailField::Creativity => {
                let next = match Creativity::from_label(&details.creativity) {
                    Creativity::Practical => Creativity::Balanced,
                    Creativity::Balanced => Creativity::High,
                    Creativity::High => Creativity::Practical,
                };
                details.creativity = next.label().to_string();
            }
            DetailField::Verbosity => {
                let next = match Verbosity::from_label(&details.verbosity) {
                    Verbosity::Concise => Verbosity::Detailed,
                    Verbosity::Detailed => Verbosity::Comprehensive,
                    Verbosity::Comprehensive => Verbosity::Concise,
                };
                details.verbosity = next.label().to_string();
            }
            _ => {}
        }
    }
}

/// `2 tiết × 35 phút = 70 phút`
pub fn timing_summary(details: &LessonDetails) -> String {
    let timing = LessonTiming::from_details(details);
    format!(
        "{} tiết × {} phút = {} phút",
        timing.periods,
        timing.period_minutes,
        timing.total_minutes()
    )
}
