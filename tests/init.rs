use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitpace"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "gitpace init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".gitpace.toml");
    assert!(config_path.exists(), ".gitpace.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[sessions]"));
    assert!(content.contains("[estimation.scenarios]"));

    // Parses and validates to the defaults
    let config = gitpace_core::GitpaceConfig::from_toml(&content).unwrap();
    assert_eq!(config.sessions.idle_gap_secs, 7200);
    assert_eq!(config.estimation.scenarios.average, 125.0);
    let _raw: toml::Value = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".gitpace.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitpace"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let existing = std::fs::read_to_string(dir.path().join(".gitpace.toml")).unwrap();
    assert_eq!(existing, "# existing");
}

#[test]
fn no_arguments_prints_banner() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitpace"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gitpace analyze"));
}
