use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lesson_common::Slide;
use lesson_core::progress::TICK_INTERVAL;
use lesson_core::viewer::{DetailTab, SlideNavigator, Transition, TRANSITION};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use std::io;
use std::time::Instant;

/// Slide navigator plus the clock for its exit animation.
pub struct SlideDeck {
    nav: SlideNavigator,
    exit_started: Option<Instant>,
}

impl SlideDeck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            nav: SlideNavigator::new(slides),
            exit_started: None,
        }
    }

    pub fn set_slides(&mut self, slides: Vec<Slide>) {
        self.nav.set_slides(slides);
        self.exit_started = None;
    }

    pub fn navigator(&self) -> &SlideNavigator {
        &self.nav
    }

    pub fn is_empty(&self) -> bool {
        self.nav.slides().is_empty()
    }

    pub fn next(&mut self) {
        if self.nav.go_to_next() {
            self.exit_started = Some(Instant::now());
        }
    }

    pub fn previous(&mut self) {
        if self.nav.go_to_previous() {
            self.exit_started = Some(Instant::now());
        }
    }

    pub fn toggle_tab(&mut self) {
        self.nav.toggle_tab();
    }

    /// Finish the exit animation once it has run its course.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(started) = self.exit_started {
            if now.duration_since(started) >= TRANSITION {
                self.nav.complete_transition();
                self.exit_started = None;
            }
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(slide) = self.nav.current() else {
            Paragraph::new("Chưa có slide nào.")
                .block(Block::default().borders(Borders::ALL).title("Slides"))
                .render(area, buf);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(9)])
            .split(area);

        let exiting = matches!(self.nav.transition(), Transition::Exiting(_));
        let body_style = if exiting {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut lines = vec![
            Line::from(Span::styled(
                slide.title.clone(),
                body_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if slide.content.is_empty() {
            lines.push(Line::from(Span::styled("(Không có nội dung)", body_style)));
        }
        for point in &slide.content {
            lines.push(Line::from(Span::styled(format!("• {point}"), body_style)));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.nav.position_label()),
            )
            .wrap(Wrap { trim: false })
            .render(chunks[0], buf);

        self.render_details(slide, chunks[1], buf);
    }

    fn render_details(&self, slide: &Slide, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let selected = match self.nav.tab() {
            DetailTab::Notes => 0,
            DetailTab::Visual => 1,
        };
        Tabs::new(vec!["Ghi chú", "Gợi ý hình ảnh"])
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .render(chunks[0], buf);

        let text: Vec<Line> = match self.nav.tab() {
            DetailTab::Notes => match slide.speaker_notes.as_deref().filter(|n| !n.is_empty()) {
                Some(notes) => notes.lines().map(|l| Line::from(l.to_string())).collect(),
                None => vec![Line::from("Không có ghi chú cho slide này.")],
            },
            DetailTab::Visual => match &slide.visual_suggestion {
                Some(visual) => vec![
                    Line::from(vec![
                        Span::styled("Gợi ý: ", Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(visual.suggestion.clone()),
                    ]),
                    Line::from(vec![
                        Span::styled("Lý do: ", Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(visual.rationale.clone()),
                    ]),
                ],
                None => vec![Line::from("Không có gợi ý hình ảnh.")],
            },
        };

        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}

/// Standalone full-screen viewer for a saved slide deck.
pub struct SlidePreview {
    deck: SlideDeck,
    running: bool,
}

impl SlidePreview {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            deck: SlideDeck::new(slides),
            running: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(TICK_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
            self.deck.on_tick(Instant::now());
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Left | KeyCode::Char('h') => self.deck.previous(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.deck.next(),
            KeyCode::Tab | KeyCode::Char('n') => self.deck.toggle_tab(),
            _ => {}
        }
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        self.deck.render(chunks[0], f.buffer_mut());
        f.render_widget(
            Paragraph::new("←/→: chuyển slide  Tab: ghi chú/hình ảnh  q: thoát")
                .style(Style::default().fg(Color::Gray)),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide {
                title: format!("Slide {i}"),
                content: vec![format!("Ý {i}")],
                speaker_notes: Some(format!("Ghi chú {i}")),
                visual_suggestion: None,
            })
            .collect()
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_index_moves_after_transition_elapses() {
        let mut deck = SlideDeck::new(slides(3));
        let start = Instant::now();
        deck.next();
        deck.on_tick(start);
        assert_eq!(deck.navigator().index(), 0);
        deck.on_tick(start + TRANSITION + Duration::from_millis(1));
        assert_eq!(deck.navigator().index(), 1);
    }

    #[test]
    fn test_preview_keys() {
        let mut preview = SlidePreview::new(slides(2));
        preview.handle_key(KeyCode::Left);
        assert!(preview.deck.exit_started.is_none());
        preview.handle_key(KeyCode::Right);
        assert!(preview.deck.exit_started.is_some());
        preview.handle_key(KeyCode::Char('q'));
        assert!(!preview.running);
    }

    #[test]
    fn test_render_shows_position_and_notes() {
        let deck = SlideDeck::new(slides(2));
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        deck.render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("SLIDE 1 / 2"));
        assert!(text.contains("Slide 0"));
        assert!(text.contains("Ghi chú 0"));
    }
}
