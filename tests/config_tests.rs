use std::env;

use serial_test::serial;

use expiry_warden::config::WardenConfig;

const MISSING_FILE: &str = "does-not-exist/warden";

fn clear_env() {
    for name in [
        "WARDEN_DATABASE_TYPE",
        "WARDEN_DATABASE_URL",
        "WARDEN_EXPIRE_WARNING",
        "WARDEN_EXPIRE_DAYS",
        "WARDEN_WEBSITE_NAME",
        "WARDEN_SMTP_PORT",
        "WARDEN_LOG_LEVEL",
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn defaults_apply_without_file_or_env() {
    clear_env();

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");

    assert!(config.warning.expire_warning);
    assert_eq!(config.warning.expire_days, 15);
    assert_eq!(config.database.db_type, "sqlite");
    assert_eq!(config.smtp.port, 587);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn environment_overrides_warning_settings() {
    clear_env();
    env::set_var("WARDEN_EXPIRE_WARNING", "false");
    env::set_var("WARDEN_EXPIRE_DAYS", "7");
    env::set_var("WARDEN_WEBSITE_NAME", "Acme Cloud");

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");

    assert!(!config.warning.expire_warning);
    assert_eq!(config.warning.expire_days, 7);
    assert_eq!(config.warning.website_name, "Acme Cloud");

    clear_env();
}

#[test]
#[serial]
fn database_url_routes_by_scheme() {
    clear_env();
    env::set_var("WARDEN_DATABASE_TYPE", "postgres");
    env::set_var("WARDEN_DATABASE_URL", "postgres://db.internal/accounts");

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");

    assert_eq!(config.database.url(), "postgres://db.internal/accounts");
    assert_eq!(config.database.sqlite_url, "sqlite://warden.db");

    clear_env();
}

#[test]
#[serial]
fn invalid_log_level_fails_validation() {
    clear_env();
    env::set_var("WARDEN_LOG_LEVEL", "chatty");

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");
    assert!(config.validate().is_err());

    clear_env();
}

#[test]
#[serial]
fn numeric_switch_disables_warnings() {
    clear_env();
    env::set_var("WARDEN_EXPIRE_WARNING", "0");

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");
    assert!(!config.warning.expire_warning);

    env::set_var("WARDEN_EXPIRE_WARNING", "off");
    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");
    assert!(!config.warning.expire_warning);

    clear_env();
}

#[test]
#[serial]
fn unparseable_number_is_rejected() {
    clear_env();
    env::set_var("WARDEN_EXPIRE_DAYS", "seven");

    let result = WardenConfig::load_from(MISSING_FILE);
    assert!(result.is_err());

    clear_env();
}

#[test]
#[serial]
fn smtp_port_from_environment() {
    clear_env();
    env::set_var("WARDEN_SMTP_PORT", "2525");

    let config = WardenConfig::load_from(MISSING_FILE).expect("config should load");
    assert_eq!(config.smtp.port, 2525);

    env::set_var("WARDEN_SMTP_PORT", "not-a-port");
    assert!(WardenConfig::load_from(MISSING_FILE).is_err());

    clear_env();
}
