//! Integration tests for CLI configuration helpers

use entity_source::cli::{REPOSITORY_ENV, repository_dir};
use serial_test::serial;
use std::path::PathBuf;

#[test]
#[serial]
fn test_repository_dir_prefers_argument() {
    unsafe { std::env::set_var(REPOSITORY_ENV, "/from/env") };
    assert_eq!(repository_dir(Some("/from/arg")), PathBuf::from("/from/arg"));
    unsafe { std::env::remove_var(REPOSITORY_ENV) };
}

#[test]
#[serial]
fn test_repository_dir_falls_back_to_env() {
    unsafe { std::env::set_var(REPOSITORY_ENV, "/from/env") };
    assert_eq!(repository_dir(None), PathBuf::from("/from/env"));
    unsafe { std::env::remove_var(REPOSITORY_ENV) };
}

#[test]
#[serial]
fn test_repository_dir_defaults_to_current() {
    unsafe { std::env::remove_var(REPOSITORY_ENV) };
    assert_eq!(repository_dir(None), PathBuf::from("."));

    unsafe { std::env::set_var(REPOSITORY_ENV, "  ") };
    assert_eq!(repository_dir(None), PathBuf::from("."));
    unsafe { std::env::remove_var(REPOSITORY_ENV) };
}
