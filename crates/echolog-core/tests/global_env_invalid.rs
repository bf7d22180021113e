//! The global factory with an invalid `ECHOLOG_LEVEL`
//!
//! Runs in its own process: the variables must be set before the global
//! factory is first touched.

use std::env;

use echolog_core::config::{COLOR_ENV, FORMAT_ENV, LEVEL_ENV};
use echolog_core::{get_logger, EchologError, FormatSpec, Level};

#[test]
fn test_invalid_level_surfaces_and_valid_values_survive()
{
    env::set_var(LEVEL_ENV, "chatty");
    env::set_var(COLOR_ENV, "never");
    env::set_var(FORMAT_ENV, "long");

    let err = get_logger(None, None, None).unwrap_err();
    assert!(matches!(err, EchologError::InvalidLevel(ref s) if s == "chatty"));

    let root = get_logger(None, None, None).unwrap();
    assert_eq!(root.level(), Level::ECHO);
    let handlers = root.handlers();
    assert_eq!(handlers.len(), 1);
    assert!(!handlers[0].formatter().is_colored());
    assert_eq!(handlers[0].formatter().spec(), FormatSpec::Long);
}
