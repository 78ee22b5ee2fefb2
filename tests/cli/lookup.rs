use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

fn setup_project(test: &CliTest) -> Result<()> {
    test.write_file(
        ".loctextrc.json",
        r#"{ "entries": ["locales/en.json", "locales/fr.json"], "assets": null }"#,
    )?;
    test.write_file(
        "locales/fr.json",
        r#"{ "Text": { "Play": "Jouer", "Quit": "Quitter" } }"#,
    )
}

#[test]
fn test_lookup_existing_key() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    assert_cmd_snapshot!(test.lookup_command("FR", "play"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Jouer

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_lookup_missing_key_prints_sentinel() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test.lookup_command("fr", "Options").output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "*Options*\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Options"));

    Ok(())
}

#[test]
fn test_lookup_unknown_entry() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    assert_cmd_snapshot!(test.lookup_command("de", "Play"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: no entry titled 'de'
    ");

    Ok(())
}

#[test]
fn test_lookup_with_root_flag() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "game/.loctextrc.json",
        r#"{ "entries": ["i18n/es.json"] }"#,
    )?;
    test.write_file("game/i18n/es.json", r#"{ "Text": { "Play": "Jugar" } }"#)?;

    let output = test
        .lookup_command("es", "Play")
        .args(["--root", "game"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Jugar\n");

    Ok(())
}
