// Config persistence, isolated with TestContext.
use quicktask::config::{Config, DEFAULT_AI_ENDPOINT};
use quicktask::context::{AppContext, StandardContext, TestContext};
use quicktask::store::{SortKey, StatusFilter};
use std::fs;

#[test]
fn test_missing_file_is_reported_and_defaults_apply() {
    let ctx = TestContext::new();

    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));

    let config = Config::load_or_default(&ctx).unwrap();
    assert_eq!(config, Config::default());
    assert!(!config.use_ai);
    assert_eq!(config.ai_endpoint, DEFAULT_AI_ENDPOINT);
    assert_eq!(config.ai_timeout_secs, 30);
}

#[test]
fn test_save_then_load_roundtrip() {
    let ctx = TestContext::new();
    let config = Config {
        use_ai: true,
        api_key: "secret".to_string(),
        ai_endpoint: "http://localhost:9999/generate".to_string(),
        ai_timeout_secs: 0,
        default_sort: SortKey::DueDate,
        hide_completed: true,
    };
    config.save(&ctx).unwrap();

    let path = ctx.get_config_file_path().unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    assert_eq!(Config::load(&ctx).unwrap(), config);
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "use_ai = true\napi_key = \"abc\"\n").unwrap();

    let config = Config::load(&ctx).unwrap();
    assert!(config.use_ai);
    assert_eq!(config.api_key, "abc");
    assert_eq!(config.ai_endpoint, DEFAULT_AI_ENDPOINT);
    assert_eq!(config.default_sort, SortKey::Created);
}

#[test]
fn test_invalid_file_is_an_error_not_missing() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "use_ai = \"maybe\"").unwrap();

    let err = Config::load(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("Failed to parse config file"));
    assert!(Config::load_or_default(&ctx).is_err());
}

#[test]
fn test_override_root_keeps_everything_inside() {
    let scratch = TestContext::new();
    let ctx = StandardContext::new(Some(scratch.root.clone()));

    let config_path = ctx.get_config_file_path().unwrap();
    assert!(config_path.starts_with(&scratch.root));
    assert!(config_path.ends_with("config/config.toml"));

    let log_path = ctx.get_log_file_path().unwrap();
    assert!(log_path.starts_with(scratch.root.join("cache")));

    assert_eq!(
        Config::get_path_string(&ctx).unwrap(),
        config_path.to_string_lossy()
    );
}

#[test]
fn test_filter_options_follow_view_settings() {
    let config = Config::default();
    let opts = config.filter_options("report");
    assert_eq!(opts.search_term, "report");
    assert_eq!(opts.status, StatusFilter::All);
    assert_eq!(opts.sort, SortKey::Created);

    let config = Config {
        hide_completed: true,
        default_sort: SortKey::Priority,
        ..Default::default()
    };
    let opts = config.filter_options("");
    assert_eq!(opts.status, StatusFilter::Active);
    assert_eq!(opts.sort, SortKey::Priority);
}
