use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

pub fn pixwise() -> Command {
    let mut cmd = Command::cargo_bin("pixwise").unwrap();
    cmd.env_remove("OPENAI_API_KEY").arg("--no-transcribe");
    cmd
}

/// Write a Google Takeout style sidecar.
pub fn write_export_sidecar(dir: &TempDir, name: &str, timestamp: &str) -> ChildPath {
    let sidecar = dir.child(name);
    sidecar
        .write_str(&format!(
            r#"{{
  "title": "{}",
  "imageViews": "7",
  "photoTakenTime": {{ "timestamp": "{}", "formatted": "Jan 1, 2021, 12:00:00 AM UTC" }}
}}"#,
            name.trim_end_matches(".json"),
            timestamp
        ))
        .unwrap();
    sidecar
}
