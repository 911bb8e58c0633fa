use std::fs;
use std::time::Duration;

use clap::Parser;
use statik::config::{Cli, Config, DEFAULT_LISTEN_ADDR, FileConfig, ServerConfig, resolve_root};

#[test]
fn test_config_default_address() {
    let server = ServerConfig::default();

    assert_eq!(server.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(server.listen_addr, "0.0.0.0:8080");
    assert!(!server.sequential);
    assert_eq!(server.read_timeout_secs, None);
}

#[test]
fn test_cli_requires_root() {
    assert!(Cli::try_parse_from(["statik"]).is_err());
}

#[test]
fn test_cli_rejects_extra_positional() {
    assert!(Cli::try_parse_from(["statik", "/srv/a", "/srv/b"]).is_err());
}

#[test]
fn test_cli_flags() {
    let cli = Cli::try_parse_from([
        "statik",
        "/srv/www",
        "--listen",
        "127.0.0.1:9000",
        "--sequential",
    ])
    .unwrap();

    assert_eq!(cli.root.to_str(), Some("/srv/www"));
    assert_eq!(cli.listen.as_deref(), Some("127.0.0.1:9000"));
    assert!(cli.sequential);
    assert!(cli.config.is_none());
}

#[test]
fn test_config_load_resolves_root() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "statik",
        dir.path().to_str().unwrap(),
        "--listen",
        "127.0.0.1:0",
    ])
    .unwrap();

    let cfg = Config::load(&cli).unwrap();

    assert_eq!(cfg.root, fs::canonicalize(dir.path()).unwrap());
    assert!(cfg.root.is_absolute());
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:0");
}

#[test]
fn test_config_clone() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from(["statik", dir.path().to_str().unwrap(), "--listen", "127.0.0.1:1"]).unwrap();
    let cfg1 = Config::load(&cli).unwrap();
    let cfg2 = cfg1.clone();

    assert_eq!(cfg1.root, cfg2.root);
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    assert!(resolve_root(&missing).is_err());
}

#[test]
fn test_root_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    assert!(resolve_root(&file).is_err());
}

#[test]
fn test_relative_root_becomes_absolute() {
    let root = resolve_root(std::path::Path::new(".")).unwrap();

    assert!(root.is_absolute());
    assert_eq!(root, std::env::current_dir().unwrap().canonicalize().unwrap());
}

#[test]
fn test_yaml_file_config() {
    let file = FileConfig::from_yaml(
        "server:\n  listen_addr: \"127.0.0.1:8000\"\n  sequential: true\n  read_timeout_secs: 30\n",
    )
    .unwrap();

    assert_eq!(file.server.listen_addr, "127.0.0.1:8000");
    assert!(file.server.sequential);

    let options = file.server.connection_options();
    assert_eq!(options.read_timeout, Some(Duration::from_secs(30)));
    assert_eq!(options.max_request_bytes, 64 * 1024);
}

#[test]
fn test_yaml_partial_and_empty_config_use_defaults() {
    let partial = FileConfig::from_yaml("server:\n  max_request_bytes: 4096\n").unwrap();
    assert_eq!(partial.server.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(partial.server.max_request_bytes, 4096);

    let empty = FileConfig::from_yaml("{}").unwrap();
    assert_eq!(empty.server.listen_addr, DEFAULT_LISTEN_ADDR);
}

#[test]
fn test_yaml_invalid_config_is_an_error() {
    assert!(FileConfig::from_yaml("server: [1, 2").is_err());
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("statik.yaml");
    fs::write(
        &config_path,
        "server:\n  listen_addr: \"127.0.0.1:7000\"\n  read_timeout_secs: 5\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "statik",
        dir.path().to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--listen",
        "127.0.0.1:7001",
        "--sequential",
    ])
    .unwrap();
    let cfg = Config::load(&cli).unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:7001");
    assert_eq!(cfg.server.read_timeout_secs, Some(5));
    assert!(cfg.server.sequential);
}
