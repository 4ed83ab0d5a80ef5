use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn create_test_files(dir: &TempDir, files: &[(&str, &str)]) -> Result<()> {
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            found.push(path);
        }
    }
    Ok(found)
}

fn textscout() -> Result<Command> {
    let mut cmd = Command::cargo_bin("textscout")?;
    cmd.env_remove("RUST_LOG")
        .env_remove("CLICOLOR_FORCE")
        .env("NO_COLOR", "1")
        .arg("--quiet");
    Ok(cmd)
}

#[test]
fn test_match_writes_report() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(
        &temp_dir,
        &[("a.txt", "foo\nbar"), ("sub/d.md", "TODO: x\nTODO: y\nTODO: z\n")],
    )?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo|TODO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 matches in 2 files"))
        .stdout(predicate::str::contains("Report written to"));

    let reports = report_files(temp_dir.path())?;
    assert_eq!(reports.len(), 1);
    let name = reports[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with("_result_foo_TODO.json"), "unexpected name {name}");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&reports[0])?)?;
    assert_eq!(json["results"].as_object().unwrap().len(), 2);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn test_no_matches_writes_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(&temp_dir, &[("b.png", "foo"), ("c.txt", "bar")])?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));

    assert!(report_files(temp_dir.path())?.is_empty());
    Ok(())
}

#[test]
fn test_invalid_directory() -> Result<()> {
    let temp_dir = tempdir()?;
    let missing = temp_dir.path().join("missing");

    textscout()?
        .args([missing.to_str().unwrap(), "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid directory"));
    Ok(())
}

#[test]
fn test_invalid_pattern() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(&temp_dir, &[("a.txt", "foo(")])?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));

    assert!(report_files(temp_dir.path())?.is_empty());
    Ok(())
}

#[test]
fn test_exclude_option() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(
        &temp_dir,
        &[("keep.py", "needle"), ("drop_test.py", "needle")],
    )?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "needle", "--exclude", "_test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"));

    let reports = report_files(temp_dir.path())?;
    let text = fs::read_to_string(&reports[0])?;
    assert!(text.contains("keep.py"));
    assert!(!text.contains("drop_test.py"));
    Ok(())
}

#[test]
fn test_invalid_exclude_pattern() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(&temp_dir, &[("a.txt", "foo")])?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo", "--exclude", "["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclude pattern"));
    Ok(())
}

#[test]
fn test_encoding_option() -> Result<()> {
    let temp_dir = tempdir()?;
    // "Тест" in cp866
    fs::write(temp_dir.path().join("dos.txt"), [0x92u8, 0xA5, 0xE1, 0xE2])?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "Тест", "-e", "utf-8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) could not be read"));
    for report in report_files(temp_dir.path())? {
        fs::remove_file(report)?;
    }

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "Тест", "-e", "utf-8", "-e", "cp866"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"));
    Ok(())
}

#[test]
fn test_unknown_encoding() -> Result<()> {
    let temp_dir = tempdir()?;
    create_test_files(&temp_dir, &[("a.txt", "foo")])?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo", "-e", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown encoding: klingon"));
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_dir = tempdir()?;
    create_test_files(&temp_dir, &[("keep.sql", "needle"), ("gen_schema.sql", "needle")])?;
    let config_path = config_dir.path().join("textscout.yaml");
    fs::write(&config_path, "exclude_pattern: \"^gen_\"\nencodings: [\"utf-8\"]\n")?;

    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "needle", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"));
    Ok(())
}

#[test]
fn test_cli_default_values_override_config() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_dir = tempdir()?;
    create_test_files(&temp_dir, &[("a.txt", "needle")])?;
    let config_path = config_dir.path().join("textscout.yaml");
    fs::write(&config_path, "encodings: [\"klingon\"]\n")?;

    // The file alone names an unknown encoding
    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "needle", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown encoding: klingon"));

    // An explicit utf-8 wins even though it is also the default
    textscout()?
        .args([temp_dir.path().to_str().unwrap(), "needle", "-e", "utf-8", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unwritable_root_fails() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    create_test_files(&temp_dir, &[("a.txt", "foo")])?;
    fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o555))?;

    let write_check = temp_dir.path().join("write_check");
    if fs::write(&write_check, "").is_ok() {
        // Running with privileges that bypass file modes
        fs::remove_file(&write_check)?;
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let assert = textscout()?
        .args([temp_dir.path().to_str().unwrap(), "foo"])
        .assert();
    fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755))?;

    assert
        .failure()
        .stderr(predicate::str::contains("Failed to write report"));
    assert!(report_files(temp_dir.path())?.is_empty());
    Ok(())
}
