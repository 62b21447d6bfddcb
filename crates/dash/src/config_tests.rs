// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

use super::DashConfig;
use crate::token::AuthMethod;

fn parse(args: &[&str]) -> anyhow::Result<DashConfig> {
    let mut argv = vec!["propeldash"];
    argv.extend_from_slice(args);
    Ok(DashConfig::try_parse_from(argv)?)
}

#[test]
fn defaults() -> anyhow::Result<()> {
    let config = parse(&[])?;
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert!(config.token_cache);
    assert!(!config.token_prefetch);
    assert_eq!(config.token_auth_method, AuthMethod::Header);
    assert_eq!(config.default_layout, "last-30-days");
    assert_eq!(config.dimensions, vec!["restaurant_name", "taco_name"]);
    config.validate()?;
    Ok(())
}

#[test]
fn empty_credentials_still_validate() -> anyhow::Result<()> {
    let config = parse(&["--client-id", "", "--token-host", ""])?;
    config.validate()?;
    assert_eq!(config.credentials().missing_fields().len(), 3);
    Ok(())
}

#[test]
fn credentials_from_flags() -> anyhow::Result<()> {
    let config = parse(&[
        "--client-id",
        "abc",
        "--client-secret",
        "xyz",
        "--token-host",
        "https://auth.example.com/",
        "--token-path",
        "oauth/token",
        "--token-auth-method",
        "body",
        "--token-scope",
        "",
    ])?;
    let creds = config.credentials();
    assert_eq!(creds.client_id, "abc");
    assert_eq!(creds.token_url(), "https://auth.example.com/oauth/token");
    assert_eq!(creds.auth_method, AuthMethod::Body);
    assert_eq!(creds.scope, None, "empty scope is treated as unset");
    Ok(())
}

#[test]
fn token_settings_follow_flags() -> anyhow::Result<()> {
    let config = parse(&[
        "--token-cache",
        "false",
        "--token-refresh-margin-secs",
        "5",
        "--token-fallback-ttl-secs",
        "42",
        "--token-max-retries",
        "1",
        "--token-retry-backoff-ms",
        "20",
        "--token-timeout-ms",
        "750",
    ])?;
    let settings = config.token_settings();
    assert!(!settings.cache);
    assert_eq!(settings.refresh_margin, Duration::from_secs(5));
    assert_eq!(settings.fallback_ttl, Duration::from_secs(42));
    assert_eq!(settings.request_timeout, Duration::from_millis(750));
    assert_eq!(settings.retry.max_retries, 1);
    assert_eq!(settings.retry.initial_backoff, Duration::from_millis(20));
    Ok(())
}

#[test]
fn dimensions_are_comma_separated() -> anyhow::Result<()> {
    let config = parse(&["--dimension", "city,,store_name", "--data-pool", "sales"])?;
    let dataset = config.dataset();
    assert_eq!(dataset.data_pool, "sales");
    assert_eq!(dataset.dimensions, vec!["city", "store_name"]);
    Ok(())
}

#[yare::parameterized(
    bad_log_format = { &["--log-format", "yaml"], "log-format" },
    too_many_retries = { &["--token-max-retries", "11"], "max-retries" },
    zero_timeout = { &["--token-timeout-ms", "0"], "timeout" },
    blank_default = { &["--default-layout", " "], "default-layout" },
    blank_pool = { &["--data-pool", ""], "data-pool" },
)]
fn validate_rejects(args: &[&str], needle: &str) {
    let config = parse(args).expect("parse");
    crate::assert_err_contains!(config.validate(), needle);
}
