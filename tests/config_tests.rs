//! Configuration loading tests.
//!
//! These tests cover the environment-style lookup and JSON file loading that
//! produce a `CorsConfiguration`.

use std::collections::HashMap;
use std::io::Write;
use websecurity::config::{load_cors_file, Config, CorsConfiguration};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

/// Test module for environment lookups
mod env_tests {
    use super::*;

    #[test]
    fn test_server_overrides() {
        let config =
            Config::from_lookup(lookup_from(&[("SERVER_HOST", "0.0.0.0"), ("SERVER_PORT", "8080")]))
                .unwrap();

        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert!(!config.cors.enabled());
    }

    #[test]
    fn test_invalid_port_parsing() {
        let result = Config::from_lookup(lookup_from(&[("SERVER_PORT", "not_a_port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_origins_enable_cors() {
        let config = Config::from_lookup(lookup_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:3000,https://example.com",
        )]))
        .unwrap();

        assert!(config.cors.enabled());
        assert_eq!(
            config.cors.allowed_origins(),
            Some("http://localhost:3000,https://example.com")
        );
    }

    #[test]
    fn test_whitespace_in_numbers_tolerated() {
        let config =
            Config::from_lookup(lookup_from(&[("CORS_PREFLIGHT_MAX_AGE", " 600 ")])).unwrap();
        assert_eq!(config.cors.preflight_max_age(), Some(600));
    }
}

/// Test module for JSON configuration files
mod file_tests {
    use super::*;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_json(
            r#"{
                "allowCredentials": true,
                "allowedHeaders": "X-Custom",
                "allowedMethods": "GET,POST",
                "allowedOrigins": "https://a.com",
                "chainPreflight": false,
                "exposedHeaders": "X-Exposed",
                "preflightMaxAge": 3600
            }"#,
        );

        let cors = load_cors_file(file.path()).unwrap();
        let expected = CorsConfiguration::builder()
            .allow_credentials(true)
            .allowed_headers("X-Custom")
            .allowed_methods("GET,POST")
            .allowed_origins("https://a.com")
            .chain_preflight(false)
            .exposed_headers("X-Exposed")
            .preflight_max_age(3600)
            .build();
        assert_eq!(cors, expected);
    }

    #[test]
    fn test_load_empty_object_is_default() {
        let file = write_json("{}");
        assert_eq!(load_cors_file(file.path()).unwrap(), CorsConfiguration::DEFAULT);
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let file = write_json(r#"{"preflightMaxAge": "an hour"}"#);
        assert!(load_cors_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_cors_file(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
