use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lesson_cli::run_cli().await
}
