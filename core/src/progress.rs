use std::time::Duration;

/// Tick period of the progress animation.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
/// The bar never passes this until the real result arrives.
pub const PROGRESS_CAP: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    Script,
    Slides,
}

impl ProgressKind {
    pub fn estimated_duration(self) -> Duration {
        match self {
            ProgressKind::Script => Duration::from_secs(15),
            ProgressKind::Slides => Duration::from_secs(8),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProgressKind::Script => "Đang tạo kịch bản của bạn...",
            ProgressKind::Slides => "Đang tạo slides...",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            ProgressKind::Script => "AI đang soạn những lời hoàn hảo cho bài học của bạn.",
            ProgressKind::Slides => "AI đang phân tích kịch bản để tạo dàn bài.",
        }
    }
}

/// Synthetic progress estimate; advances toward 95% over the expected
/// duration of the call. It measures nothing.
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    kind: ProgressKind,
    percent: f64,
    increment: f64,
}

impl ProgressEstimator {
    pub fn new(kind: ProgressKind) -> Self {
        let ticks = kind.estimated_duration().as_secs_f64() / TICK_INTERVAL.as_secs_f64();
        Self {
            kind,
            percent: 0.0,
            increment: 100.0 / ticks,
        }
    }

    pub fn kind(&self) -> ProgressKind {
        self.kind
    }

    /// Advance one tick. Returns false once the cap is reached.
    pub fn tick(&mut self) -> bool {
        if self.percent >= PROGRESS_CAP {
            self.percent = PROGRESS_CAP;
            return false;
        }
        self.percent = (self.percent + self.increment).min(PROGRESS_CAP);
        true
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whole percent for display.
    pub fn rounded(&self) -> u16 {
        self.percent.round() as u16
    }

    pub fn ratio(&self) -> f64 {
        self.percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_estimate_reaches_cap_after_expected_ticks() {
        let mut p = ProgressEstimator::new(ProgressKind::Script);
        // 15 s / 50 ms = 300 ticks for 100%, so 95% takes 285.
        for _ in 0..284 {
            assert!(p.tick());
        }
        assert!(p.percent() < PROGRESS_CAP);
        for _ in 0..10 {
            p.tick();
        }
        assert_eq!(p.percent(), PROGRESS_CAP);
        assert!(!p.tick());
        assert_eq!(p.rounded(), 95);
    }

    #[test]
    fn test_slides_are_faster() {
        let mut script = ProgressEstimator::new(ProgressKind::Script);
        let mut slides = ProgressEstimator::new(ProgressKind::Slides);
        script.tick();
        slides.tick();
        assert!(slides.percent() > script.percent());
        assert_eq!(slides.kind().title(), "Đang tạo slides...");
    }

    #[test]
    fn test_never_exceeds_cap() {
        let mut p = ProgressEstimator::new(ProgressKind::Slides);
        for _ in 0..10_000 {
            p.tick();
        }
        assert!(p.percent() <= PROGRESS_CAP);
        assert!(p.ratio() < 1.0);
    }
}
