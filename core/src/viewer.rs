use lesson_common::Slide;
use std::time::Duration;

/// Length of the exit animation before the index moves.
pub const TRANSITION: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Notes,
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Resting or sliding in.
    Entering,
    /// Sliding out; the index moves when it completes.
    Exiting(Direction),
}

/// Paging state for a slide deck.
#[derive(Debug, Clone)]
pub struct SlideNavigator {
    slides: Vec<Slide>,
    index: usize,
    tab: DetailTab,
    transition: Transition,
}

impl SlideNavigator {
    pub fn new(slides: Vec<Slide>) -> Self {
        let mut nav = Self {
            slides: Vec::new(),
            index: 0,
            tab: DetailTab::Notes,
            transition: Transition::Entering,
        };
        nav.set_slides(slides);
        nav
    }

    /// Replace the deck and go back to the first slide.
    pub fn set_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
        self.index = 0;
        self.transition = Transition::Entering;
        self.sync_tab();
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.index)
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.slides.len()
    }

    /// `SLIDE 2 / 7`
    pub fn position_label(&self) -> String {
        format!("SLIDE {} / {}", self.index + 1, self.slides.len())
    }

    /// Start moving forward. No-op on the last slide or mid-transition.
    pub fn go_to_next(&mut self) -> bool {
        if self.is_last() || self.is_exiting() {
            return false;
        }
        self.transition = Transition::Exiting(Direction::Forward);
        true
    }

    /// Start moving back. No-op on the first slide or mid-transition.
    pub fn go_to_previous(&mut self) -> bool {
        if self.is_first() || self.is_exiting() {
            return false;
        }
        self.transition = Transition::Exiting(Direction::Back);
        true
    }

    fn is_exiting(&self) -> bool {
        matches!(self.transition, Transition::Exiting(_))
    }

    /// Finish the exit animation: move the index one step and enter.
    pub fn complete_transition(&mut self) {
        let Transition::Exiting(direction) = self.transition else {
            return;
        };
        match direction {
            Direction::Forward if !self.is_last() => self.index += 1,
            Direction::Back if !self.is_first() => self.index -= 1,
            _ => {}
        }
        self.transition = Transition::Entering;
        self.sync_tab();
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    /// Switch between notes and visual when the slide has both.
    pub fn toggle_tab(&mut self) {
        let Some(slide) = self.current() else {
            return;
        };
        if slide.has_speaker_notes() && slide.has_visual_suggestion() {
            self.tab = match self.tab {
                DetailTab::Notes => DetailTab::Visual,
                DetailTab::Visual => DetailTab::Notes,
            };
        }
    }

    /// Notes if the slide has them, else visual if it has one; otherwise the
    /// previous choice stays.
    fn sync_tab(&mut self) {
        let Some(slide) = self.slides.get(self.index) else {
            return;
        };
        if slide.has_speaker_notes() {
            self.tab = DetailTab::Notes;
        } else if slide.has_visual_suggestion() {
            self.tab = DetailTab::Visual;
        }
    }
}
