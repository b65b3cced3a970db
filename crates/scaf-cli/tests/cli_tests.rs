//! End-to-end tests that invoke the compiled `scaf` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn scaf() -> Command {
    Command::cargo_bin("scaf").expect("binary builds")
}

#[test]
fn test_env_set_quotes_values_with_spaces() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "APP_NAME=Laravel\nAPP_ENV=local\n").unwrap();

    scaf()
        .args(["env", env.to_str().unwrap(), "set", "APP_NAME", "My App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    let written = std::fs::read_to_string(&env).unwrap();
    assert_eq!(written, "APP_NAME=\"My App\"\nAPP_ENV=local\n");
}

#[test]
fn test_env_get_prints_the_value() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "APP_ENV=local\n").unwrap();

    scaf()
        .args(["env", env.to_str().unwrap(), "get", "APP_ENV"])
        .assert()
        .success()
        .stdout("local\n");
}

#[test]
fn test_env_get_missing_key_fails() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "APP_ENV=local\n").unwrap();

    scaf()
        .args(["env", env.to_str().unwrap(), "get", "MISSING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key not found"));
}

#[test]
fn test_env_uncomment() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "# DB_HOST=127.0.0.1\n").unwrap();

    scaf()
        .args(["env", env.to_str().unwrap(), "uncomment", "DB_HOST"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&env).unwrap(),
        "DB_HOST=127.0.0.1\n"
    );
}

#[test]
fn test_dry_run_prints_a_diff_and_leaves_the_file_alone() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "APP_ENV=local\n").unwrap();

    scaf()
        .args([
            "env",
            env.to_str().unwrap(),
            "set",
            "APP_ENV",
            "production",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("would update"))
        .stdout(predicate::str::contains("-APP_ENV=local"))
        .stdout(predicate::str::contains("+APP_ENV=production"));

    assert_eq!(std::fs::read_to_string(&env).unwrap(), "APP_ENV=local\n");
}

#[test]
fn test_manifest_add_script() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("package.json");
    std::fs::write(&manifest, "{\n  \"name\": \"app\"\n}\n").unwrap();

    scaf()
        .args([
            "manifest",
            manifest.to_str().unwrap(),
            "add-script",
            "test",
            "phpunit",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&manifest).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["scripts"]["test"], "phpunit");
    assert_eq!(json["name"], "app");
}

#[test]
fn test_manifest_set_parses_json_values() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("composer.json");
    std::fs::write(&manifest, "{\n  \"name\": \"vendor/app\"\n}\n").unwrap();

    scaf()
        .args([
            "manifest",
            manifest.to_str().unwrap(),
            "set",
            "config.optimize-autoloader",
            "true",
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(json["config"]["optimize-autoloader"], true);
}

#[test]
fn test_config_append_raw_expression() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("app.php");
    std::fs::write(
        &config,
        "<?php\n\nreturn [\n    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n    ],\n];\n",
    )
    .unwrap();

    scaf()
        .args([
            "config",
            config.to_str().unwrap(),
            "append",
            "providers",
            "App\\Providers\\EventServiceProvider::class",
            "--raw",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("        App\\Providers\\EventServiceProvider::class,\n    ],"));
}

#[test]
fn test_provider_boot_statement() {
    let dir = TempDir::new().unwrap();
    let provider = dir.path().join("AppServiceProvider.php");
    std::fs::write(
        &provider,
        "<?php\n\nnamespace App\\Providers;\n\nclass AppServiceProvider\n{\n    public function boot(): void\n    {\n        //\n    }\n}\n",
    )
    .unwrap();

    scaf()
        .args([
            "provider",
            provider.to_str().unwrap(),
            "boot",
            "Model::unguard();",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&provider).unwrap();
    assert!(written.contains("    {\n        Model::unguard();\n    }\n"));
}

#[test]
fn test_provider_rejects_a_broken_statement() {
    let dir = TempDir::new().unwrap();
    let provider = dir.path().join("AppServiceProvider.php");
    std::fs::write(
        &provider,
        "<?php\n\nclass AppServiceProvider\n{\n    public function boot(): void\n    {\n        //\n    }\n}\n",
    )
    .unwrap();

    scaf()
        .args(["provider", provider.to_str().unwrap(), "boot", "broken("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_text_replace_literal() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("README.md");
    std::fs::write(&file, "# Laravel\n\nLaravel starter.\n").unwrap();

    scaf()
        .args([
            "text",
            file.to_str().unwrap(),
            "replace",
            "Laravel",
            "Blog",
        ])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "# Blog\n\nBlog starter.\n"
    );
}

#[test]
fn test_unchanged_save_reports_unchanged() {
    let dir = TempDir::new().unwrap();
    let env = dir.path().join(".env");
    std::fs::write(&env, "APP_ENV=local\n").unwrap();

    scaf()
        .args(["env", env.to_str().unwrap(), "set", "APP_ENV", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(std::fs::read_to_string(&env).unwrap(), "APP_ENV=local\n");
}
