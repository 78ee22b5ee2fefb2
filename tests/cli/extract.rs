use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, endpoint_name, scanner_bin};

const FRENCH: &str = r#"{
  "Text": {
    "Play": "Jouer",
    "Old": "Vieux"
  }
}
"#;

fn setup_project(test: &CliTest) -> Result<()> {
    test.write_file(
        ".loctextrc.json",
        r#"{
            "entries": ["locales/en.json", "locales/fr.json"],
            "texts": ["Quit"],
            "assets": { "includes": ["assets"] }
        }"#,
    )?;
    test.write_file(
        "assets/menu.json",
        r#"{ "name": "main", "LocalizationText": "Play" }"#,
    )?;
    test.write_file("locales/fr.json", FRENCH)
}

fn setup_scanner_project(test: &CliTest, endpoint: &str, executable: &str) -> Result<()> {
    let config = serde_json::json!({
        "entries": ["locales/de.json"],
        "scanner": {
            "executable": executable,
            "contextPath": "src",
            "endpointName": endpoint,
        }
    });
    test.write_file(".loctextrc.json", &serde_json::to_string_pretty(&config)?)?;
    test.write_file(
        "locales/de.json",
        r#"{ "Text": { "Hello": "Hallo", "Unused": "Unbenutzt" } }"#,
    )?;
    test.write_file(
        "src/menu.rs",
        r#"
        fn build() {
            button(tr("Hello"));
            button(localize("Settings"));
        }
        "#,
    )
}

#[test]
fn test_extract_reconciles_entries() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    source assets 1 text (1 new)
    source inline 1 text (1 new)
    updated en  +2 -0 =0
    updated fr  +1 -1 =1
    ✓ Discovered 2 texts, updated 2 of 2 entries

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("locales/fr.json")?,
        "{\n  \"Text\": {\n    \"Play\": \"Jouer\",\n    \"Quit\": \"Quit\"\n  }\n}\n"
    );
    assert_eq!(
        test.read_file("locales/en.json")?,
        "{\n  \"Text\": {\n    \"Play\": \"Play\",\n    \"Quit\": \"Quit\"\n  }\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_is_idempotent() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    test.extract_command().output()?;
    let first = test.read_file("locales/fr.json")?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    source assets 1 text (1 new)
    source inline 1 text (1 new)
    unchanged en  +0 -0 =2
    unchanged fr  +0 -0 =2
    ✓ Discovered 2 texts, all 2 entries are up to date

    ----- stderr -----
    ");
    assert_eq!(test.read_file("locales/fr.json")?, first);

    Ok(())
}

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test.extract_command().arg("--dry-run").output()?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("would change (dry run)"));
    assert_eq!(test.read_file("locales/fr.json")?, FRENCH);
    assert!(!test.root().join("locales/en.json").exists());

    Ok(())
}

#[test]
fn test_extract_check_exit_status() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test.extract_command().arg("--check").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file("locales/fr.json")?, FRENCH);

    test.extract_command().output()?;

    let output = test.extract_command().arg("--check").output()?;
    assert_eq!(output.status.code(), Some(0));

    Ok(())
}

#[test]
fn test_extract_malformed_entry_fails() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;
    test.write_file("locales/fr.json", r#"{ "Text": { "Play": "#)?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load entry"), "stderr: {}", stderr);
    assert!(!test.root().join("locales/en.json").exists());

    Ok(())
}

#[test]
fn test_extract_with_scanner() -> Result<()> {
    let test = CliTest::new()?;
    let endpoint = endpoint_name("scanner");
    setup_scanner_project(&test, &endpoint, &scanner_bin().to_string_lossy())?;

    let output = test.extract_command().output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("source scanner 2 texts (2 new)"), "{}", stdout);
    assert_eq!(
        test.read_file("locales/de.json")?,
        "{\n  \"Text\": {\n    \"Hello\": \"Hallo\",\n    \"Settings\": \"Settings\"\n  }\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_no_scanner_skips_scanner() -> Result<()> {
    let test = CliTest::new()?;
    let endpoint = endpoint_name("no-scanner");
    setup_scanner_project(&test, &endpoint, "tools/does-not-exist")?;

    let output = test.extract_command().arg("--no-scanner").output()?;

    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("source scanner"));

    Ok(())
}

#[test]
fn test_extract_missing_scanner_fails() -> Result<()> {
    let test = CliTest::new()?;
    let endpoint = endpoint_name("missing");
    setup_scanner_project(&test, &endpoint, "tools/does-not-exist")?;
    let before = test.read_file("locales/de.json")?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to launch scanner"), "stderr: {}", stderr);
    assert_eq!(test.read_file("locales/de.json")?, before);

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_extract_scanner_crash_cancels_run() -> Result<()> {
    let test = CliTest::new()?;
    let endpoint = endpoint_name("crash");
    // `/bin/sh <project>/src <address>` runs a directory as script and exits.
    setup_scanner_project(&test, &endpoint, "/bin/sh")?;
    let before = test.read_file("locales/de.json")?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("exited before delivering its payload"),
        "stderr: {}",
        stderr
    );
    assert_eq!(test.read_file("locales/de.json")?, before);

    Ok(())
}

#[test]
fn test_extract_without_config_uses_defaults() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    source assets 0 texts (0 new)
    unchanged en  +0 -0 =0
    ✓ Discovered 0 texts, the entry is up to date

    ----- stderr -----
    warning: no .loctextrc.json found, using defaults
    ");

    Ok(())
}
