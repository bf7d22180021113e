//! Tests for the echo primitive

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use echolog_core::callsite::{CallSite, CallSiteHint, CallSiteResolver, InlineResolver};
use echolog_core::echo::EchoInspector;
use echolog_core::{ColorMode, EchologError, Level, LoggerFactory, Result};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

impl Capture
{
    fn lines(&self) -> Vec<String>
    {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

struct NoSource;

impl CallSiteResolver for NoSource
{
    fn resolve(&self, hint: &CallSiteHint) -> Result<CallSite>
    {
        Err(EchologError::IntrospectionFailure(format!("{} is stripped", hint.file)))
    }
}

fn plain_factory() -> (LoggerFactory, Capture)
{
    let capture = Capture::default();
    let writer = capture.clone();
    let factory = LoggerFactory::with_writer(move || Box::new(writer.clone())).with_color(ColorMode::Never);
    factory.get_logger(Some(Level::ECHO), Some("short"), None).unwrap();
    (factory, capture)
}

#[test]
fn test_echo_two_positional()
{
    let (factory, capture) = plain_factory();
    let inspector = EchoInspector::new(&factory, &InlineResolver);
    let a = 2;
    let b = vec![3, 4];

    inspector
        .echo(&CallSiteHint::new("src/demo.rs", 14, "echo!(a, b)"), &[&a, &b], &[])
        .unwrap();

    assert_eq!(
        capture.lines(),
        vec!["[>] demo.rs @ line 14: a => 2", "[>] demo.rs @ line 14: b => [3, 4]"]
    );
}

#[test]
fn test_echo_keyword_name()
{
    let (factory, capture) = plain_factory();
    let inspector = EchoInspector::new(&factory, &InlineResolver);
    let text = "Example";
    let b = [3, 4];

    inspector
        .echo(
            &CallSiteHint::new("demo.rs", 3, "echo!(text, 2, blah = b)"),
            &[&text, &2],
            &[("blah", &b)],
        )
        .unwrap();

    let lines = capture.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[>] demo.rs @ line 3: text => \"Example\"");
    assert_eq!(lines[1], "[>] demo.rs @ line 3: 2 => 2");
    assert_eq!(lines[2], "[>] demo.rs @ line 3: blah => [3, 4]");
}

#[test]
fn test_echo_respects_root_threshold()
{
    let (factory, capture) = plain_factory();
    factory.get_logger(Some(Level::WARNING), None, None).unwrap();
    let inspector = EchoInspector::new(&factory, &InlineResolver);

    inspector
        .echo(&CallSiteHint::new("demo.rs", 1, "echo!(x)"), &[&1], &[])
        .unwrap();
    assert!(capture.lines().is_empty());
}

#[test]
fn test_missing_source_propagates()
{
    let (factory, capture) = plain_factory();
    let inspector = EchoInspector::new(&factory, &NoSource);

    let result = inspector.echo(&CallSiteHint::new("gen.rs", 1, ""), &[&1], &[]);
    assert!(matches!(result, Err(EchologError::IntrospectionFailure(ref m)) if m.contains("gen.rs")));
    assert!(capture.lines().is_empty());
}

#[test]
fn test_source_without_arguments_fails()
{
    let (factory, _) = plain_factory();
    let inspector = EchoInspector::new(&factory, &InlineResolver);

    let result = inspector.echo(&CallSiteHint::new("demo.rs", 1, "echo!"), &[&1], &[]);
    assert!(matches!(result, Err(EchologError::IntrospectionFailure(_))));
}

#[test]
fn test_colored_echo_line()
{
    let capture = Capture::default();
    let writer = capture.clone();
    let factory = LoggerFactory::with_writer(move || Box::new(writer.clone()));
    factory.get_logger(Some(Level::ECHO), Some("short"), None).unwrap();
    let inspector = EchoInspector::new(&factory, &InlineResolver);

    inspector
        .echo(&CallSiteHint::new("demo.rs", 8, "echo!(n)"), &[&5], &[])
        .unwrap();

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("demo.rs @ line \x1b[33;1m8\x1b[0m: \x1b[36;1mn\x1b[0m => \x1b[32;1m5\x1b[0m"));
}
