use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::html;
use crate::render::render_script;

pub const COPY_FAILED_MESSAGE: &str = "Không thể sao chép vào clipboard.";

#[async_trait]
pub trait ClipboardSink {
    /// Write HTML with a plain-text alternative.
    async fn write_rich(&self, html: &str, plain: &str) -> Result<()>;
    async fn write_text(&self, plain: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Rich,
    PlainText,
    /// Both attempts failed; carries the message to show.
    Failed(String),
}

impl CopyOutcome {
    pub fn copied(&self) -> bool {
        !matches!(self, CopyOutcome::Failed(_))
    }
}

/// Render the script again and copy it, rich text first, then plain text.
pub async fn copy_script(script: &str, sink: &(dyn ClipboardSink + Send + Sync)) -> CopyOutcome {
    let blocks = render_script(script);
    let document = html::styled_document(&blocks);
    let plain = html::plain_text(&blocks);

    match sink.write_rich(&document, &plain).await {
        Ok(()) => return CopyOutcome::Rich,
        Err(e) => tracing::warn!("rich text copy failed, retrying as plain text: {e:#}"),
    }
    match sink.write_text(&plain).await {
        Ok(()) => CopyOutcome::PlainText,
        Err(e) => {
            tracing::error!("plain text copy failed: {e:#}");
            CopyOutcome::Failed(COPY_FAILED_MESSAGE.to_string())
        }
    }
}

/// One clipboard command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tool {
    program: String,
    args: Vec<String>,
}

impl Tool {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Clipboard backed by the platform's command-line tools.
///
/// Rich tools receive `MIME DATA` pairs as arguments and publish all of them
/// in one clipboard item. Tools that hold a single type per copy (`wl-copy`,
/// `xclip`) only serve the plain-text path, so HTML is never offered without
/// its plain-text alternative.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    rich: Vec<Tool>,
    text: Vec<Tool>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            rich: vec![Tool::new("copyq", &["copy"])],
            text: vec![
                Tool::new("wl-copy", &[]),
                Tool::new("xclip", &["-selection", "clipboard"]),
                Tool::new("xsel", &["--clipboard", "--input"]),
                Tool::new("pbcopy", &[]),
                Tool::new("clip", &[]),
            ],
        }
    }
}

impl SystemClipboard {
    async fn run(tool: &Tool, extra_args: &[&str], input: Option<&str>) -> Result<()> {
        let mut child = Command::new(&tool.program)
            .args(&tool.args)
            .args(extra_args)
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("{} exited with {status}", tool.program))
        }
    }

    async fn first_success(tools: &[Tool], extra_args: &[&str], input: Option<&str>) -> Result<()> {
        let mut last_err = anyhow!("no clipboard tool available");
        for tool in tools {
            match Self::run(tool, extra_args, input).await {
                Ok(()) => {
                    tracing::debug!("copied with {}", tool.program);
                    return Ok(());
                }
                Err(e) => last_err = e.context(format!("{} failed", tool.program)),
            }
        }
        Err(last_err)
    }
}

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_rich(&self, html: &str, plain: &str) -> Result<()> {
        let pairs = ["text/plain", plain, "text/html", html];
        Self::first_success(&self.rich, &pairs, None).await
    }

    async fn write_text(&self, plain: &str) -> Result<()> {
        Self::first_success(&self.text, &[], Some(plain)).await
    }
}
