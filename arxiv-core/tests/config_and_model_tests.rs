use std::time::Duration;

use arxiv_core::{lookup_key, parse_timestamp, AppConfig, PushTime, TopicCode};
use chrono::{TimeZone, Utc};

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "arxiv_agent_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[test]
fn default_config_targets_api_base_path() {
    let config = AppConfig::default();
    assert_eq!(config.api.base_path, "/api");
    assert_eq!(config.api.base_url(), "http://localhost:8000/api");
    assert_eq!(config.ui.notice_duration(), Duration::from_secs(3));
}

#[test]
fn missing_config_is_created_with_defaults() {
    let dir = temp_dir("init");
    let path = dir.join("config.json");

    let config = AppConfig::load_or_init(&path);

    assert_eq!(config.api.server_url, "http://localhost:8000");
    assert!(path.exists(), "defaults are written out");
    let reloaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(reloaded.api.base_path, "/api");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn partial_config_keeps_defaults_for_missing_fields() {
    let dir = temp_dir("partial");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, r#"{ "api": { "server_url": "https://arxiv.club/" } }"#).unwrap();

    let config = AppConfig::load_from(&path).unwrap();

    assert_eq!(config.api.base_url(), "https://arxiv.club/api");
    assert_eq!(config.ui.notice_seconds, 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn env_override_replaces_server_url() {
    let mut config = AppConfig::default();
    config.apply_env_overrides(Some("  ".into()));
    assert_eq!(config.api.server_url, "http://localhost:8000");
    config.apply_env_overrides(Some("http://10.0.0.2:9000".into()));
    assert_eq!(config.api.base_url(), "http://10.0.0.2:9000/api");
}

#[test]
fn lookup_key_is_final_path_segment() {
    assert_eq!(lookup_key("http://arxiv.org/abs/2401.00001v1"), "2401.00001v1");
    assert_eq!(lookup_key("2401.00001v1"), "2401.00001v1");
}

#[test]
fn timestamps_accept_naive_and_offset_forms() {
    let expected = Utc.with_ymd_and_hms(2024, 10, 21, 7, 28, 0).unwrap();
    assert_eq!(parse_timestamp("2024-10-21T07:28:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-10-21 07:28:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-10-21T07:28:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-10-21T09:28:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-10-21T07:28:00.000"), Some(expected));
    assert_eq!(parse_timestamp("not a date"), None);
}

#[test]
fn topic_codes_round_trip_through_strings() {
    for topic in TopicCode::ALL {
        assert_eq!(topic.code().parse::<TopicCode>().unwrap(), topic);
        assert_eq!(serde_json::to_value(topic).unwrap(), topic.code());
    }
    assert!("cs.XX".parse::<TopicCode>().is_err());
}

#[test]
fn push_time_formats_and_validates() {
    assert_eq!(PushTime::new(7, 5).unwrap().to_string(), "07:05");
    assert_eq!("23:45".parse::<PushTime>().unwrap(), PushTime::new(23, 45).unwrap());
    assert!("24:00".parse::<PushTime>().is_err());
    assert!("9:00".parse::<PushTime>().is_err());
    assert!(PushTime::new(12, 60).is_none());
}

#[test]
fn default_topic_is_artificial_intelligence() {
    assert_eq!(TopicCode::default(), TopicCode::ArtificialIntelligence);
    assert_eq!(TopicCode::default().code(), "cs.AI");
}
