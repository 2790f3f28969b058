use crate::{Config, ConfigError, LogFormat, LoggingConfig, SchemaConfig};

#[test]
fn empty_document_uses_defaults() {
    let config = Config::parse_toml("").expect("empty config is valid");

    assert_eq!(config, Config::default());
    assert_eq!(config.schema.junction_separator, "__");
    assert!(config.schema.lowercase_identities);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn sections_override_defaults() {
    let config = Config::parse_toml(
        r#"
        [schema]
        junction_separator = "--"
        lowercase_identities = false

        [logging]
        level = "mooring_core=trace,info"
        format = "json"
        "#,
    )
    .expect("config should parse");

    assert_eq!(
        config.schema,
        SchemaConfig {
            junction_separator: "--".to_string(),
            lowercase_identities: false,
        }
    );
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "mooring_core=trace,info".to_string(),
            format: LogFormat::Json,
        }
    );

    let options = config.schema.resolve_options();
    assert_eq!(options.junction_separator, "--");
    assert!(!options.lowercase_identities);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Config::parse_toml("[schema]\nseparator = \"-\"").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn separator_must_be_usable() {
    for separator in ["", ".x", "a b"] {
        let err = Config::parse_toml(&format!("[schema]\njunction_separator = \"{separator}\""))
            .unwrap_err();

        assert!(
            matches!(
                err,
                ConfigError::InvalidValue {
                    field: "schema.junction_separator",
                    ..
                }
            ),
            "separator {separator:?} should be rejected"
        );
    }
}

#[test]
fn log_level_must_parse_as_a_filter() {
    let err = Config::parse_toml("[logging]\nlevel = \"[[\"").unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "logging.level",
            ..
        }
    ));
}

#[test]
fn unknown_log_format_is_a_parse_error() {
    let err = Config::parse_toml("[logging]\nformat = \"xml\"").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("mooring-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").expect("write temp config");

    let config = Config::load(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(config.expect("config should load").logging.level, "debug");
}

#[test]
fn load_reports_missing_files() {
    let err = Config::load("/definitely/not/here/mooring.toml").unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("mooring.toml"));
}
