mod details;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use lesson_common::save_export;
use lesson_core::clipboard::{copy_script, CopyOutcome, SystemClipboard};
use lesson_core::export;
use lesson_core::html;
use lesson_core::progress::{ProgressEstimator, ProgressKind, TICK_INTERVAL};
use lesson_core::render::render_script;
use lesson_core::{Config, GeminiAdapter, LessonService, Session};
use std::future::Future;
use std::io::{IsTerminal, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub use details::DetailsArgs;

#[derive(Parser)]
#[command(name = "lesson", version)]
#[command(about = "AI lesson-script and slide authoring for teachers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override model (e.g., gemini-2.5-flash, gemini-2.5-pro)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Config file (TOML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a lesson script (and optionally slides)
    Generate {
        #[command(flatten)]
        lesson: DetailsArgs,
        /// Skip filling objectives, key concepts and activities from the files
        #[arg(long)]
        no_extract: bool,
        /// Also generate slides from the new script
        #[arg(long)]
        slides: bool,
        /// Export directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Also save slides as JSON for `lesson view`
        #[arg(long)]
        json: bool,
    },
    /// Generate slides from an existing script file
    Slides {
        script: PathBuf,
        /// Topic used for file names when the script has no header
        #[arg(long)]
        topic: Option<String>,
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Extract objectives, key concepts and activities from documents
    Extract {
        #[command(flatten)]
        lesson: DetailsArgs,
    },
    /// Render a script file to plain text or styled HTML (offline)
    Render {
        script: PathBuf,
        #[arg(long)]
        html: bool,
    },
    /// Copy a script file to the clipboard as rich text
    Copy { script: PathBuf },
    /// Browse a slide deck saved as JSON
    View { file: PathBuf },
    /// Interactive authoring mode
    Interactive {
        #[command(flatten)]
        lesson: DetailsArgs,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let uses_tui = matches!(
        cli.command,
        None | Some(Commands::Interactive { .. }) | Some(Commands::View { .. })
    );
    init_tracing(cli.debug, config.log_path.as_deref(), uses_tui)?;

    match cli.command {
        Some(Commands::Generate {
            lesson,
            no_extract,
            slides,
            out_dir,
            json,
        }) => {
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            generate(&config, &lesson, !no_extract, slides, json, &out_dir).await?;
        }
        Some(Commands::Slides {
            script,
            topic,
            out_dir,
            json,
        }) => {
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            slides_from_file(&config, &script, topic, json, &out_dir).await?;
        }
        Some(Commands::Extract { lesson }) => extract(&config, &lesson).await?,
        Some(Commands::Render { script, html }) => render(&script, html).await?,
        Some(Commands::Copy { script }) => copy(&script).await?,
        Some(Commands::View { file }) => lesson_tui::run_preview(&file).await?,
        Some(Commands::Interactive { lesson }) => interactive(&config, &lesson).await?,
        None => interactive(&config, &DetailsArgs::default()).await?,
    }

    Ok(())
}

/// Config file (explicit or discovered), then environment, then flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_with_fallback(),
    };
    config.apply_env();
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    Ok(config)
}

/// Logs go to the configured file, else to stderr. Full-screen modes without
/// a log file discard them so the screen stays intact.
fn init_tracing(debug: bool, log_path: Option<&Path>, uses_tui: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Arc::new(file)).try_init()
        }
        None if uses_tui => builder.with_writer(std::io::sink).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

fn build_service(config: &Config) -> Result<LessonService> {
    let client = GeminiAdapter::from_config(config)?;
    tracing::debug!(model = %config.model, "using Gemini model");
    Ok(LessonService::new(Arc::new(client)))
}

/// Await `work` while drawing the estimated progress on stderr.
async fn with_progress<T>(kind: ProgressKind, work: impl Future<Output = T>) -> T {
    let interactive = std::io::stderr().is_terminal();
    let mut progress = ProgressEstimator::new(kind);
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    tokio::pin!(work);

    if !interactive {
        eprintln!("{}", kind.title());
    }
    loop {
        tokio::select! {
            out = &mut work => {
                if interactive {
                    eprintln!("\r{} 100%", kind.title());
                }
                return out;
            }
            _ = ticker.tick() => {
                progress.tick();
                if interactive {
                    let mut stderr = std::io::stderr();
                    let _ = write!(stderr, "\r{} {:>3}%", kind.title(), progress.rounded());
                    let _ = stderr.flush();
                }
            }
        }
    }
}

async fn run_slides(session: &mut Session, service: &LessonService) -> Result<()> {
    if let Some(request) = session.begin_slide_generation() {
        let result = with_progress(ProgressKind::Slides, request.run(service)).await;
        session.finish_slide_generation(result);
    }
    if let Some(err) = session.slide_error() {
        bail!("{err}");
    }
    Ok(())
}

async fn save_slides(session: &Session, json: bool, out_dir: &Path) -> Result<()> {
    let topic = &session.details.topic;
    let path = save_export(
        out_dir,
        &export::slides_file_name(topic),
        &export::slides_export(topic, session.slides()),
    )
    .await?;
    println!("Đã lưu slides: {}", path.display());

    if json {
        let path = save_export(
            out_dir,
            &export::slides_json_file_name(topic),
            &export::slides_json(session.slides())?,
        )
        .await?;
        println!("Đã lưu slides (JSON): {}", path.display());
    }
    Ok(())
}

async fn generate(
    config: &Config,
    lesson: &DetailsArgs,
    extract: bool,
    slides: bool,
    json: bool,
    out_dir: &Path,
) -> Result<()> {
    let service = build_service(config)?;
    let mut session = lesson.session()?;

    if extract && !session.files().is_empty() {
        session.extract(&service).await;
        if let Some(err) = session.extraction_error() {
            eprintln!("{err}");
        }
    }

    if let Some(request) = session.begin_script_generation() {
        let result = with_progress(ProgressKind::Script, request.run(&service)).await;
        session.finish_script_generation(result);
    }
    if let Some(err) = session.error() {
        bail!("{err}");
    }

    let topic = &session.details.topic;
    let path = save_export(
        out_dir,
        &export::script_file_name(topic),
        &export::script_export(topic, session.script()),
    )
    .await?;
    println!("Đã lưu kịch bản: {}", path.display());

    if slides {
        run_slides(&mut session, &service).await?;
        save_slides(&session, json, out_dir).await?;
    }
    Ok(())
}

async fn read_script(path: &Path) -> Result<(Option<String>, String)> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let (topic, script) = export::parse_script_export(&content);
    Ok((topic.map(str::to_string), script.to_string()))
}

async fn slides_from_file(
    config: &Config,
    script_path: &Path,
    topic: Option<String>,
    json: bool,
    out_dir: &Path,
) -> Result<()> {
    let service = build_service(config)?;
    let (saved_topic, script) = read_script(script_path).await?;
    if script.trim().is_empty() {
        bail!("script {} is empty", script_path.display());
    }

    let mut session = Session::default();
    session.details.topic = topic.or(saved_topic).unwrap_or_default();
    session.load_script(script);

    run_slides(&mut session, &service).await?;
    save_slides(&session, json, out_dir).await
}

async fn extract(config: &Config, lesson: &DetailsArgs) -> Result<()> {
    if lesson.files.is_empty() {
        bail!("extract needs at least one --file");
    }
    let service = build_service(config)?;
    let mut session = lesson.session()?;

    session.extract(&service).await;
    if let Some(err) = session.extraction_error() {
        bail!("{err}");
    }
    println!("{}", serde_json::to_string_pretty(&session.details)?);
    Ok(())
}

async fn render(script_path: &Path, as_html: bool) -> Result<()> {
    let (_, script) = read_script(script_path).await?;
    let blocks = render_script(&script);
    if as_html {
        print!("{}", html::styled_document(&blocks));
    } else {
        println!("{}", html::plain_text(&blocks));
    }
    Ok(())
}

async fn copy(script_path: &Path) -> Result<()> {
    let (_, script) = read_script(script_path).await?;
    match copy_script(&script, &SystemClipboard::default()).await {
        CopyOutcome::Rich => println!("Đã sao chép kịch bản."),
        CopyOutcome::PlainText => println!("Đã sao chép kịch bản (văn bản thuần)."),
        CopyOutcome::Failed(message) => eprintln!("{message}"),
    }
    Ok(())
}

async fn interactive(config: &Config, lesson: &DetailsArgs) -> Result<()> {
    let service = build_service(config)?;
    let session = lesson.session()?;
    lesson_tui::run_interactive(session, service, config.output_dir.clone()).await
}
