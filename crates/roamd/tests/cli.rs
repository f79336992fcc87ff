use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope
use tempfile::tempdir;

#[test]
fn test_check_on_empty_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("roamd")?;
    cmd.arg("check").arg("--dir").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("store ok: 0 provider(s)"));

    Ok(())
}

#[test]
fn test_check_rejects_corrupt_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("user_general.store"), "RealmStore {\n}\n")?;

    let mut cmd = Command::cargo_bin("roamd")?;
    cmd.arg("check").arg("--dir").arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("version"));

    Ok(())
}

#[test]
fn test_validate_profile() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let profile = dir.path().join("profile.json");
    std::fs::write(&profile, "{\"home_fqdn\": \"cli.example.com\"}")?;

    let mut cmd = Command::cargo_bin("roamd")?;
    cmd.arg("validate-profile").arg(&profile);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("profile ok: cli.example.com"));

    Ok(())
}

#[test]
fn test_validate_profile_rejects_bad_documents() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let profile = dir.path().join("broken.json");
    std::fs::write(&profile, "{")?;

    let mut cmd = Command::cargo_bin("roamd")?;
    cmd.arg("validate-profile").arg(&profile);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    Ok(())
}

#[test]
fn test_run_reports_mode_transitions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let mut cmd = Command::cargo_bin("roamd")?;
    cmd.arg("run").arg("--dir").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("scan mode: Started"))
        .stdout(predicate::str::contains("scan mode: Idle"));

    Ok(())
}
