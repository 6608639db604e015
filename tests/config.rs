// tests/config.rs

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use hotrun::config::duration::parse_duration;
use hotrun::config::{ConfigFile, load_and_validate, load_from_path, resolve_config};
use hotrun::errors::HotrunError;
use hotrun::fs::RealFileSystem;
use hotrun::fs::mock::MockFileSystem;
use hotrun_test_utils::builders::ConfigFileBuilder;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn defaults_without_config_file() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj");

    let cfg = resolve_config(&fs, None, Path::new("/proj"))?;
    assert_eq!(cfg.debounce(), Duration::from_millis(1500));
    assert_eq!(cfg.source_extension(), "go");
    assert_eq!(cfg.compiler(), "go build");
    assert_eq!(cfg.output_dir(), Path::new("bin"));
    assert_eq!(cfg.generated_file(), "data-swagger.go");
    assert!(cfg.reload_ignore().is_empty());
    assert_eq!(cfg.pack_section().swagger_command, "gf swagger");
    assert_eq!(
        cfg.pack_section().pack_command,
        "gf pack swagger packed/data-swagger.go -n packed -y"
    );
    Ok(())
}

#[test]
fn default_file_in_root_is_picked_up() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/proj/hotrun.toml",
        r#"
[run]
reload_ignore = ["vendor/", "*_test.go"]
debounce = "500ms"
"#,
    );

    let cfg = resolve_config(&fs, None, Path::new("/proj"))?;
    assert_eq!(cfg.reload_ignore(), ["vendor/", "*_test.go"]);
    assert_eq!(cfg.debounce(), Duration::from_millis(500));
    // Untouched keys keep their defaults.
    assert_eq!(cfg.compiler(), "go build");
    Ok(())
}

#[test]
fn explicit_path_must_exist() {
    let fs = MockFileSystem::new();
    let err = resolve_config(&fs, Some(Path::new("/etc/hotrun.toml")), Path::new("/proj"))
        .unwrap_err();
    assert!(matches!(err, HotrunError::ConfigError(_)), "{err}");
}

#[test]
fn explicit_path_wins_over_root_file() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/hotrun.toml", "[run]\nsource_extension = \"go\"\n");
    fs.add_file("/cfg/rust.toml", "[run]\nsource_extension = \"rs\"\ncompiler = \"rustc\"\n");

    let cfg = resolve_config(&fs, Some(Path::new("/cfg/rust.toml")), Path::new("/proj"))?;
    assert_eq!(cfg.source_extension(), "rs");
    assert_eq!(cfg.compiler(), "rustc");
    Ok(())
}

#[test]
fn pack_section_is_configurable() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/proj/hotrun.toml",
        r#"
[pack]
swagger_command = "swag init"
swagger_dir = "docs"
pack_command = "go generate ./docs"
generated_file = "docs.go"
"#,
    );

    let cfg = load_and_validate(&fs, "/proj/hotrun.toml")?;
    let pack = cfg.pack_section();
    assert_eq!(pack.swagger_command, "swag init");
    assert_eq!(pack.swagger_dir, "docs");
    assert_eq!(cfg.generated_file(), "docs.go");
    Ok(())
}

#[test]
fn unknown_fields_are_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/hotrun.toml", "[run]\nreload_ignored = [\"vendor\"]\n");

    let err = load_from_path(&fs, "/proj/hotrun.toml").unwrap_err();
    assert!(matches!(err, HotrunError::TomlError(_)), "{err}");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/hotrun.toml", "[run\n");

    let err = load_from_path(&fs, "/proj/hotrun.toml").unwrap_err();
    assert!(matches!(err, HotrunError::TomlError(_)));
}

#[test]
fn unreadable_file_is_a_config_error() {
    let fs = MockFileSystem::new();
    let err = load_from_path(&fs, "/missing.toml").unwrap_err();
    assert!(matches!(err, HotrunError::ConfigError(_)));
}

#[test]
fn loads_from_real_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("hotrun.toml"),
        "[run]\noutput_dir = \"target/dev\"\ndebounce = \"2s\"\n",
    )?;

    let cfg = resolve_config(&RealFileSystem, None, dir.path())?;
    assert_eq!(cfg.output_dir(), Path::new("target/dev"));
    assert_eq!(cfg.debounce(), Duration::from_secs(2));
    Ok(())
}

mod validation {
    use super::*;

    fn rejected(builder: ConfigFileBuilder, needle: &str) {
        match ConfigFile::try_from(builder.raw()) {
            Err(HotrunError::ConfigError(msg)) => {
                assert!(msg.contains(needle), "{msg:?} should mention {needle:?}")
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn builder_defaults_are_valid() {
        let cfg = ConfigFileBuilder::new().ignore("vendor/").build();
        assert_eq!(cfg.reload_ignore(), ["vendor/"]);
    }

    #[test]
    fn debounce_must_parse() {
        rejected(ConfigFileBuilder::new().debounce("soon"), "debounce");
        rejected(ConfigFileBuilder::new().debounce("1500"), "debounce");
        rejected(ConfigFileBuilder::new().debounce("3 fortnights"), "debounce");
    }

    #[test]
    fn debounce_must_be_positive() {
        rejected(ConfigFileBuilder::new().debounce("0ms"), "greater than zero");
    }

    #[test]
    fn extension_without_dot() {
        rejected(ConfigFileBuilder::new().source_extension(".go"), "dot");
        rejected(ConfigFileBuilder::new().source_extension(""), "source_extension");
    }

    #[test]
    fn compiler_must_be_set() {
        rejected(ConfigFileBuilder::new().compiler("  "), "compiler");
    }

    #[test]
    fn output_dir_must_be_set() {
        let mut raw = ConfigFileBuilder::new().raw();
        raw.run.output_dir = String::new();
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn invalid_ignore_rule_is_not_a_config_error() {
        let cfg = ConfigFileBuilder::new().ignore("a(b").build();
        assert_eq!(cfg.reload_ignore(), ["a(b"]);
    }
}

#[test]
fn duration_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert_eq!(parse_duration(" 10S "), Ok(Duration::from_secs(10)));
    assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
    assert_eq!(parse_duration("1s 500ms"), Ok(Duration::from_millis(1500)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("5d").is_err());
    assert!(parse_duration("ms").is_err());
}
