//! The global factory picking up `ECHOLOG_LEVEL` and `ECHOLOG_FORMAT`
//!
//! Runs in its own process: the variables must be set before the global
//! factory is first touched.

use std::env;

use echolog_core::config::{FORMAT_ENV, LEVEL_ENV};
use echolog_core::{get_logger, FormatSpec, Level};

#[test]
fn test_environment_configures_root_logger()
{
    env::set_var(LEVEL_ENV, "debug");
    env::set_var(FORMAT_ENV, "long");

    let root = get_logger(None, None, None).unwrap();
    assert_eq!(root.level(), Level::DEBUG);
    assert_eq!(root.handlers()[0].formatter().spec(), FormatSpec::Long);

    let named = get_logger(None, None, Some("worker")).unwrap();
    assert_eq!(named.level(), Level::ECHO);
    assert_eq!(named.handlers()[0].formatter().spec(), FormatSpec::ShortTime);
}
