//! End-to-end scaffold flow over a temporary project tree
//!
//! Drives every editor the way an installer would: environment setup, manifest
//! scripts, config-module registration, provider wiring, and a rename sweep.
//! Asserts both the semantic results and that untouched content survives
//! byte for byte.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use scaf_edit::{
    DocumentEditor, Editor, EnvEditor, LiteralReplacement, TextEditor, Value,
};
use scaf_php::{ConfigEditor, ProviderEditor};
use tempfile::TempDir;

const ENV: &str = "APP_NAME=Laravel\nAPP_ENV=local\nAPP_DEBUG=true\n\n# DB_HOST=127.0.0.1\n# DB_PORT=3306\n\nMAIL_MAILER=log\n";

const COMPOSER: &str = "{\n  \"name\": \"laravel/laravel\",\n  \"require\": {\n    \"php\": \"^8.2\"\n  },\n  \"scripts\": {\n    \"test\": \"phpunit\"\n  }\n}\n";

const CONFIG: &str = "<?php\n\nreturn [\n    'name' => env('APP_NAME', 'Laravel'),\n    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n    ],\n];\n";

const PROVIDER: &str = "<?php\n\nnamespace App\\Providers;\n\nuse Illuminate\\Support\\ServiceProvider;\n\nclass AppServiceProvider extends ServiceProvider\n{\n    public function register(): void\n    {\n        //\n    }\n\n    public function boot(): void\n    {\n        //\n    }\n}\n";

const README: &str = "# Laravel Starter\n\nA Laravel application.\n";

struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("config")).unwrap();
        fs::create_dir_all(root.join("app/Providers")).unwrap();
        fs::write(root.join(".env"), ENV).unwrap();
        fs::write(root.join("composer.json"), COMPOSER).unwrap();
        fs::write(root.join("config/app.php"), CONFIG).unwrap();
        fs::write(root.join("app/Providers/AppServiceProvider.php"), PROVIDER).unwrap();
        fs::write(root.join("README.md"), README).unwrap();
        Self { _dir: dir, root }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }
}

fn scaffold(project: &Project) {
    // Environment: name the app, switch to a real database, enable mail.
    let mut env = EnvEditor::from_path(project.path(".env")).unwrap();
    env.set("APP_NAME", "My Blog")
        .uncomment_all(["DB_HOST", "DB_PORT"])
        .set("DB_DATABASE", "blog")
        .comment("MAIL_MAILER")
        .empty_line()
        .set("TELESCOPE_ENABLED", "true");
    assert!(env.save().unwrap());

    // Manifest: wire up a lint script next to the existing test script.
    let mut composer = DocumentEditor::from_path(project.path("composer.json")).unwrap();
    composer
        .add_script("lint", "pint")
        .unwrap()
        .append_to_script("test", "pint --test")
        .unwrap()
        .set("require.laravel/telescope", Value::str("^5.0"))
        .unwrap();
    assert!(composer.save().unwrap());

    // Config module: register the new provider and a feature flag.
    let mut config = ConfigEditor::from_path(project.path("config/app.php")).unwrap();
    config
        .append(
            "providers",
            Value::raw("App\\Providers\\TelescopeServiceProvider::class"),
        )
        .set("telescope.enabled", Value::raw("fn () => env('TELESCOPE_ENABLED')"));
    assert!(config.save().unwrap());

    // Provider: import the facade and boot it.
    let mut provider =
        ProviderEditor::from_path(project.path("app/Providers/AppServiceProvider.php")).unwrap();
    provider.add_use_statements(["Laravel\\Telescope\\Telescope"]);
    provider.add_to_boot("Telescope::ignoreMigrations();").unwrap();
    assert!(provider.save().unwrap());

    // Rename sweep over the README.
    let mut readme = TextEditor::from_path(project.path("README.md")).unwrap();
    readme.replace(&LiteralReplacement::new("Laravel Starter", "My Blog").unwrap());
    assert!(readme.save().unwrap());
}

#[test]
fn test_scaffold_flow_end_to_end() {
    let project = Project::new();
    scaffold(&project);

    let env = project.read(".env");
    assert_eq!(
        env,
        "APP_NAME=\"My Blog\"\nAPP_ENV=local\nAPP_DEBUG=true\n\nDB_HOST=127.0.0.1\nDB_PORT=3306\n\n# MAIL_MAILER=log\nDB_DATABASE=blog\n\nTELESCOPE_ENABLED=true\n"
    );

    let composer: serde_json::Value = serde_json::from_str(&project.read("composer.json")).unwrap();
    assert_eq!(composer["scripts"]["lint"], "pint");
    assert_eq!(
        composer["scripts"]["test"],
        serde_json::json!(["phpunit", "pint --test"])
    );
    assert_eq!(composer["require"]["php"], "^8.2");
    assert_eq!(composer["require"]["laravel/telescope"], "^5.0");

    let config = project.read("config/app.php");
    assert!(config.contains(
        "    'providers' => [\n        App\\Providers\\AppServiceProvider::class,\n        App\\Providers\\TelescopeServiceProvider::class,\n    ],"
    ));
    // The arrow function collapsed to its inner expression.
    assert!(config.contains("'enabled' => env('TELESCOPE_ENABLED'),"));
    // Untouched entry kept verbatim.
    assert!(config.contains("    'name' => env('APP_NAME', 'Laravel'),\n"));

    let provider = project.read("app/Providers/AppServiceProvider.php");
    assert!(provider.contains(
        "use Illuminate\\Support\\ServiceProvider;\nuse Laravel\\Telescope\\Telescope;\n"
    ) || provider.contains(
        "use Laravel\\Telescope\\Telescope;\nuse Illuminate\\Support\\ServiceProvider;\n"
    ));
    assert!(provider.contains(
        "    public function boot(): void\n    {\n        Telescope::ignoreMigrations();\n    }\n"
    ));
    // register keeps its placeholder body
    assert!(provider.contains(
        "    public function register(): void\n    {\n        //\n    }\n"
    ));

    assert_eq!(project.read("README.md"), "# My Blog\n\nA Laravel application.\n");
}

#[test]
fn test_scaffold_flow_is_idempotent_where_promised() {
    let project = Project::new();
    scaffold(&project);
    let first = (
        project.read(".env"),
        project.read("composer.json"),
        project.read("config/app.php"),
        project.read("app/Providers/AppServiceProvider.php"),
    );

    // Re-running the operations that promise idempotence changes nothing.
    let mut env = EnvEditor::from_path(project.path(".env")).unwrap();
    env.set("DB_DATABASE", "blog");
    assert!(!env.save().unwrap());

    let mut composer = DocumentEditor::from_path(project.path("composer.json")).unwrap();
    composer.add_script("lint", "eslint").unwrap();
    assert!(!composer.save().unwrap());

    let mut provider =
        ProviderEditor::from_path(project.path("app/Providers/AppServiceProvider.php")).unwrap();
    provider.add_use_statements(["Laravel\\Telescope\\Telescope"]);
    assert!(!provider.save().unwrap());

    assert_eq!(project.read(".env"), first.0);
    assert_eq!(project.read("composer.json"), first.1);
    assert_eq!(project.read("config/app.php"), first.2);
    assert_eq!(project.read("app/Providers/AppServiceProvider.php"), first.3);
}

#[test]
fn test_untouched_files_are_never_rewritten() {
    let project = Project::new();
    let before = project.read("config/app.php");

    let mut config = ConfigEditor::from_path(project.path("config/app.php")).unwrap();
    config.remove("nonexistent");
    assert!(!config.save().unwrap());
    assert_eq!(project.read("config/app.php"), before);
}

#[test]
fn test_atomic_write_creates_missing_parents() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("deep/nested/file.txt");
    scaf_fs::write_text(&nested, "content\n").unwrap();
    assert_eq!(fs::read_to_string(&nested).unwrap(), "content\n");
}

#[test]
fn test_editor_errors_surface_with_context() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope/.env");
    let err = EnvEditor::from_path(&missing).unwrap_err();
    assert!(err.to_string().contains("nope"));

    let broken = dir.path().join("broken.php");
    fs::write(&broken, "<?php\nreturn ['a' => 1\n").unwrap();
    let mut config = ConfigEditor::from_path(&broken).unwrap();
    config.set("a", Value::Int(2));
    let err = config.save().unwrap_err();
    assert!(err.to_string().contains("line"));
}

#[test]
fn test_multiline_paths_and_quoting_survive_a_full_cycle() {
    let project = Project::new();

    let mut env = EnvEditor::from_path(project.path(".env")).unwrap();
    env.set_quoted("APP_KEY", "base64:abc123");
    assert!(env.save().unwrap());

    // A second editor sees the value unquoted and does not re-mark it dirty.
    let env = EnvEditor::from_path(project.path(".env")).unwrap();
    assert_eq!(env.get("APP_KEY"), Some("base64:abc123"));
    assert!(!env.is_changed());

    let content = project.read(".env");
    assert!(content.contains("APP_KEY=\"base64:abc123\"\n"));
}

/// Guard: editors only ever write through their own path; a scaffold run
/// touches nothing outside the project root.
#[test]
fn test_no_stray_files_in_project_root() {
    let project = Project::new();
    scaffold(&project);

    let mut names: Vec<String> = fs::read_dir(&project.root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![".env", "README.md", "app", "composer.json", "config"]
    );
}
