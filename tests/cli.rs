use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const SCRIPT: &str = "Chủ đề: Phân số\n\n**I. KHỞI ĐỘNG**\n| GV | HS |\n|---|---|\n| Hỏi<br>**Gợi ý** | Đáp |\n- Hát tập thể\n";

fn lesson(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("lesson").expect("bin");
    cmd.current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("RUST_LOG")
        .env_remove("LESSON_LOG_PATH");
    cmd
}

#[test]
fn render_plain_text_strips_export_header() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("kich-ban.txt"), SCRIPT).unwrap();

    lesson(tmp.path())
        .args(["render", "kich-ban.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("I. KHỞI ĐỘNG\nGV\tHS\nHỏi\nGợi ý\tĐáp\nHát tập thể"))
        .stdout(predicate::str::contains("Chủ đề").not());
}

#[test]
fn render_html_is_a_styled_document() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("kich-ban.txt"), SCRIPT).unwrap();

    lesson(tmp.path())
        .args(["render", "--html", "kich-ban.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<h3>I. KHỞI ĐỘNG</h3>"))
        .stdout(predicate::str::contains("<th>GV</th><th>HS</th>"))
        .stdout(predicate::str::contains("<td>Hỏi<br><strong>Gợi ý</strong></td>"))
        .stdout(predicate::str::contains("<li>Hát tập thể</li>"));
}

#[test]
fn generate_without_api_key_fails() {
    let tmp = tempfile::tempdir().unwrap();

    lesson(tmp.path())
        .args(["generate", "--topic", "Phân số"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
    assert!(!tmp.path().join("kich-ban-phn-s.txt").exists());
}

#[test]
fn extract_requires_files() {
    let tmp = tempfile::tempdir().unwrap();

    lesson(tmp.path())
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn view_missing_deck_fails_before_drawing() {
    let tmp = tempfile::tempdir().unwrap();

    lesson(tmp.path())
        .args(["view", "slides.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slides.json"));
}
