use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lesson_common::{format_bytes, save_export, SourceFile};
use lesson_core::clipboard::{copy_script, ClipboardSink, CopyOutcome};
use lesson_core::export;
use lesson_core::progress::{ProgressEstimator, ProgressKind, TICK_INTERVAL};
use lesson_core::render::render_script;
use lesson_core::{LessonService, Session};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::app_event::{AppEvent, AppEventSender};
use crate::form::{timing_summary, DetailField};
use crate::preview::SlideDeck;
use crate::script_view::script_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTab {
    Script,
    Slides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTarget {
    Field(DetailField),
    AddFile,
}

#[derive(Debug, Clone)]
struct InputState {
    target: InputTarget,
    buffer: String,
}

/// Work the event loop has to do with the terminal itself.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    EditScript,
}

/// Interactive authoring screen: lesson form on the left, script and slide
/// tabs on the right.
pub struct App {
    session: Session,
    service: LessonService,
    clipboard: Arc<dyn ClipboardSink + Send + Sync>,
    output_dir: PathBuf,
    tab: MainTab,
    deck: SlideDeck,
    selected_row: usize,
    input: Option<InputState>,
    progress: Option<ProgressEstimator>,
    status: Option<String>,
    script_scroll: u16,
    should_quit: bool,
    app_event_tx: AppEventSender,
    app_event_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        session: Session,
        service: LessonService,
        clipboard: Arc<dyn ClipboardSink + Send + Sync>,
        output_dir: PathBuf,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            session,
            service,
            clipboard,
            output_dir,
            tab: MainTab::Script,
            deck: SlideDeck::new(Vec::new()),
            selected_row: 0,
            input: None,
            progress: None,
            status: None,
            script_scroll: 0,
            should_quit: false,
            app_event_tx: AppEventSender::new(tx),
            app_event_rx: rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn row_count(&self) -> usize {
        DetailField::ALL.len() + self.session.files().len()
    }

    fn selected_file(&self) -> Option<&SourceFile> {
        self.selected_row
            .checked_sub(DetailField::ALL.len())
            .and_then(|i| self.session.files().as_slice().get(i))
    }

    fn sync_deck(&mut self) {
        self.deck.set_slides(self.session.slides().to_vec());
    }

    // ---- keys ----

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.input.is_some() {
            self.handle_input_key(key);
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.tab = match self.tab {
                    MainTab::Script => MainTab::Slides,
                    MainTab::Slides => MainTab::Script,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_row + 1 < self.row_count() {
                    self.selected_row += 1;
                }
            }
            KeyCode::Enter => self.activate_row(),
            KeyCode::Char('a') => {
                self.input = Some(InputState {
                    target: InputTarget::AddFile,
                    buffer: String::new(),
                });
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_file(),
            KeyCode::Char('g') => self.start_script(),
            KeyCode::Char('s') => self.start_slides(),
            KeyCode::Char('e') => {
                if self.session.begin_edit() {
                    return Action::EditScript;
                }
            }
            KeyCode::Char('c') => self.copy(),
            KeyCode::Char('w') => self.export(),
            KeyCode::PageDown => self.script_scroll = self.script_scroll.saturating_add(10),
            KeyCode::PageUp => self.script_scroll = self.script_scroll.saturating_sub(10),
            KeyCode::Left | KeyCode::Char('h') if self.tab == MainTab::Slides => {
                self.deck.previous();
            }
            KeyCode::Right | KeyCode::Char('l') if self.tab == MainTab::Slides => {
                self.deck.next();
            }
            KeyCode::Char('n') if self.tab == MainTab::Slides => self.deck.toggle_tab(),
            _ => {}
        }
        Action::None
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.commit_input(input);
                }
            }
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.buffer.push(c);
            }
            _ => {}
        }
    }

    fn activate_row(&mut self) {
        let Some(field) = DetailField::ALL.get(self.selected_row).copied() else {
            return;
        };
        if field.is_locked(self.session.extracting()) {
            return;
        }
        if field.is_choice() {
            field.cycle(&mut self.session.details);
        } else {
            self.input = Some(InputState {
                target: InputTarget::Field(field),
                buffer: field.get(&self.session.details).to_string(),
            });
        }
    }

    fn commit_input(&mut self, input: InputState) {
        match input.target {
            InputTarget::Field(field) if field.is_locked(self.session.extracting()) => {}
            InputTarget::Field(field) => field.set(&mut self.session.details, input.buffer),
            InputTarget::AddFile => self.add_file(input.buffer.trim().trim_matches(['"', '\''])),
        }
    }

    // ---- files ----

    fn add_file(&mut self, raw_path: &str) {
        if raw_path.is_empty() {
            return;
        }
        let path = Path::new(raw_path);
        if !path.is_file() {
            self.status = Some(format!("Không tìm thấy tệp: {raw_path}"));
            return;
        }

        let outcome = self.session.add_files([SourceFile::from_path(path)]);
        if let Some(name) = outcome.rejected.first() {
            self.status = Some(format!(
                "Định dạng tệp không được hỗ trợ: {name}. Chỉ chấp nhận PDF, PNG, JPEG."
            ));
        } else if let Some(name) = outcome.duplicates.first() {
            self.status = Some(format!("Tệp đã được thêm: {name}"));
        }
        if outcome.changed() {
            self.status = None;
            self.spawn_extraction();
        }
    }

    fn remove_selected_file(&mut self) {
        let Some(name) = self.selected_file().map(|f| f.name.clone()) else {
            return;
        };
        if self.session.remove_file(&name) {
            self.selected_row = self.selected_row.min(self.row_count().saturating_sub(1));
            self.spawn_extraction();
        }
    }

    /// Re-run extraction for the current file set. No-op without files.
    pub fn spawn_extraction(&mut self) {
        let Some(ticket) = self.session.start_extraction() else {
            return;
        };
        let service = self.service.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = ticket.run(&service).await;
            tx.send(AppEvent::ExtractionDone {
                generation: ticket.generation,
                result,
            });
        });
    }

    // ---- generation ----

    fn start_script(&mut self) {
        let Some(request) = self.session.begin_script_generation() else {
            return;
        };
        self.progress = Some(ProgressEstimator::new(ProgressKind::Script));
        self.tab = MainTab::Script;
        self.script_scroll = 0;
        self.sync_deck();

        let service = self.service.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = request.run(&service).await;
            tx.send(AppEvent::ScriptDone(result));
        });
    }

    fn start_slides(&mut self) {
        let Some(request) = self.session.begin_slide_generation() else {
            return;
        };
        self.progress = Some(ProgressEstimator::new(ProgressKind::Slides));
        self.tab = MainTab::Slides;
        self.sync_deck();

        let service = self.service.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = request.run(&service).await;
            tx.send(AppEvent::SlidesDone(result));
        });
    }

    // ---- copy / export / edit ----

    fn copy(&mut self) {
        if self.session.script().is_empty() {
            self.status = Some("Chưa có kịch bản để sao chép.".to_string());
            return;
        }
        let script = self.session.script().to_string();
        let clipboard = self.clipboard.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let outcome = copy_script(&script, clipboard.as_ref()).await;
            tx.send(AppEvent::Copied(outcome));
        });
    }

    fn export(&mut self) {
        let topic = self.session.details.topic.clone();
        let (file_name, content) = match self.tab {
            MainTab::Script if !self.session.script().is_empty() => (
                export::script_file_name(&topic),
                export::script_export(&topic, self.session.script()),
            ),
            MainTab::Slides if !self.session.slides().is_empty() => (
                export::slides_file_name(&topic),
                export::slides_export(&topic, self.session.slides()),
            ),
            _ => {
                self.status = Some("Chưa có nội dung để tải xuống.".to_string());
                return;
            }
        };

        let dir = self.output_dir.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = save_export(&dir, &file_name, &content)
                .await
                .map_err(|e| format!("{e:#}"));
            tx.send(AppEvent::Exported(result));
        });
    }

    /// Apply the outcome of an external editor session started by
    /// [`Action::EditScript`].
    pub fn finish_external_edit(&mut self, result: Result<String>) {
        match result {
            Ok(text) => {
                self.session.update_edit(text);
                self.session.save_edit();
                self.sync_deck();
                self.status = Some("Đã lưu kịch bản.".to_string());
            }
            Err(e) => {
                self.session.cancel_edit();
                tracing::warn!("external editor failed: {e:#}");
                self.status = Some(format!("Không thể mở trình soạn thảo: {e:#}"));
            }
        }
    }

    // ---- background results ----

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ExtractionDone { generation, result } => {
                self.session.finish_extraction(generation, result);
            }
            AppEvent::ScriptDone(result) => {
                self.progress = None;
                self.session.finish_script_generation(result);
                self.sync_deck();
            }
            AppEvent::SlidesDone(result) => {
                self.progress = None;
                self.session.finish_slide_generation(result);
                self.sync_deck();
            }
            AppEvent::Copied(outcome) => {
                self.status = Some(match outcome {
                    CopyOutcome::Rich => "Đã sao chép kịch bản.".to_string(),
                    CopyOutcome::PlainText => "Đã sao chép kịch bản (văn bản thuần).".to_string(),
                    CopyOutcome::Failed(message) => message,
                });
            }
            AppEvent::Exported(Ok(path)) => {
                self.status = Some(format!("Đã lưu: {}", path.display()));
            }
            AppEvent::Exported(Err(e)) => {
                tracing::error!("export failed: {e}");
                self.status = Some(format!("Không thể lưu tệp: {e}"));
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some(progress) = self.progress.as_mut() {
            progress.tick();
        }
        self.deck.on_tick(now);
    }

    // ---- drawing ----

    fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(f.area());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(rows[0]);

        self.draw_form(f, columns[0]);
        self.draw_main(f, columns[1]);
        self.draw_status(f, rows[1]);
    }

    fn draw_form(&self, f: &mut Frame, area: Rect) {
        let selected = Style::default().fg(Color::Black).bg(Color::Cyan);
        let label_style = Style::default().fg(Color::Cyan);
        let mut lines: Vec<Line> = Vec::new();

        for (i, field) in DetailField::ALL.iter().enumerate() {
            let value = match &self.input {
                Some(InputState {
                    target: InputTarget::Field(editing),
                    buffer,
                }) if editing == field => format!("{buffer}▏"),
                _ => field.get(&self.session.details).replace('\n', " "),
            };
            let line = Line::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                Span::raw(value),
            ]);
            lines.push(if i == self.selected_row {
                line.style(selected)
            } else {
                line
            });
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            timing_summary(&self.session.details),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tài liệu nguồn",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if self.session.files().is_empty() {
            lines.push(Line::from(Span::styled(
                "(a: thêm PDF, PNG, JPEG)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, file) in self.session.files().iter().enumerate() {
            let line = Line::from(format!("  {} ({})", file.name, format_bytes(file.size)));
            lines.push(if DetailField::ALL.len() + i == self.selected_row {
                line.style(selected)
            } else {
                line
            });
        }
        if self.session.extracting().any() {
            lines.push(Line::from(Span::styled(
                "Đang phân tích tệp...",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(err) = self.session.extraction_error() {
            lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
        }

        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Thông tin bài học"))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn draw_main(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        let selected = match self.tab {
            MainTab::Script => 0,
            MainTab::Slides => 1,
        };
        f.render_widget(
            Tabs::new(vec!["Kịch bản", "Slides"])
                .select(selected)
                .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        if let Some(progress) = &self.progress {
            self.draw_progress(f, chunks[1], progress);
            return;
        }

        let error_style = Style::default().fg(Color::Red);
        match self.tab {
            MainTab::Script => {
                let block = Block::default().borders(Borders::ALL);
                let widget = if let Some(err) = self.session.error() {
                    Paragraph::new(Span::styled(err.to_string(), error_style))
                } else if self.session.script().is_empty() {
                    Paragraph::new("Nhấn g để tạo kịch bản.")
                } else {
                    Paragraph::new(script_lines(&render_script(self.session.script())))
                        .scroll((self.script_scroll, 0))
                };
                f.render_widget(widget.block(block).wrap(Wrap { trim: false }), chunks[1]);
            }
            MainTab::Slides => {
                if let Some(err) = self.session.slide_error() {
                    f.render_widget(
                        Paragraph::new(Span::styled(err.to_string(), error_style))
                            .block(Block::default().borders(Borders::ALL)),
                        chunks[1],
                    );
                } else if self.deck.is_empty() {
                    f.render_widget(
                        Paragraph::new("Nhấn s để tạo slides từ kịch bản.")
                            .block(Block::default().borders(Borders::ALL)),
                        chunks[1],
                    );
                } else {
                    self.deck.render(chunks[1], f.buffer_mut());
                }
            }
        }
    }

    fn draw_progress(&self, f: &mut Frame, area: Rect, progress: &ProgressEstimator) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(2), Constraint::Min(0)])
            .split(area);
        let kind = progress.kind();

        f.render_widget(
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(kind.title()))
                .gauge_style(Style::default().fg(Color::Magenta))
                .ratio(progress.ratio())
                .label(format!("{}%", progress.rounded())),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(kind.subtitle()).style(Style::default().fg(Color::Gray)),
            chunks[1],
        );
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.input, &self.status) {
            (
                Some(InputState {
                    target: InputTarget::AddFile,
                    buffer,
                }),
                _,
            ) => Line::from(format!("Đường dẫn tệp: {buffer}▏")),
            (_, Some(status)) => Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            )),
            _ => Line::from(Span::styled(
                "g: tạo kịch bản  s: tạo slides  e: sửa  c: sao chép  w: tải xuống  a: thêm tệp  Tab: đổi tab  q: thoát",
                Style::default().fg(Color::Gray),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}

/// Open the script in `$VISUAL`/`$EDITOR` and return the saved text.
fn edit_in_external_editor(text: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("kich-ban-")
        .suffix(".md")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");

    let status = std::process::Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(std::fs::read_to_string(file.path())?)
}

fn enter_tui() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

fn leave_tui() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

pub async fn run_app(mut app: App) -> Result<()> {
    enter_tui()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut app, &mut terminal);

    leave_tui()?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(app: &mut App, terminal: &mut Terminal<B>) -> Result<()> {
    // Files passed on the command line are analysed right away.
    app.spawn_extraction();
    let mut last_tick = Instant::now();

    while !app.should_quit {
        while let Ok(ev) = app.app_event_rx.try_recv() {
            app.handle_app_event(ev);
        }

        terminal.draw(|f| app.draw(f))?;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) == Action::EditScript {
                    let text = app.session.edit_buffer().unwrap_or_default().to_string();
                    leave_tui()?;
                    let edited = edit_in_external_editor(&text);
                    enter_tui()?;
                    terminal.clear()?;
                    app.finish_external_edit(edited);
                }
            }
        }

        let now = Instant::now();
        if now.duration_since(last_tick) >= TICK_INTERVAL {
            app.on_tick(now);
            last_tick = now;
        }
    }
    Ok(())
}
