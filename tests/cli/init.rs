use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["entries"], serde_json::json!(["locales/en.json"]));
    assert_eq!(parsed["assets"]["property"], "LocalizationText");
    assert!(
        parsed.get("scanner").is_none(),
        "Default config should not configure a scanner"
    );
    assert!(
        content.contains("\n  \"entries\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .loctextrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".loctextrc.json").exists());
    let content = test.read_file(".loctextrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".loctextrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: .loctextrc.json already exists
    ");

    assert_eq!(test.read_file(".loctextrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file(
        "assets/title.json",
        r#"{ "LocalizationText": "New Game" }"#,
    )?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        test.read_file("locales/en.json")?,
        "{\n  \"Text\": {\n    \"New Game\": \"New Game\"\n  }\n}\n"
    );

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.command().output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("lookup"));
    assert!(stdout.contains("init"));
    Ok(())
}
