//! # Call-Site Resolution
//!
//! Recovers the source text of an `echo!` invocation.
//!
//! The echo primitive depends on call-site text only through the
//! [`CallSiteResolver`] trait. Two resolvers ship with the crate:
//!
//! - [`InlineResolver`] uses the token text the macro captured at compile
//!   time. It is always available.
//! - [`SourceFileResolver`] re-reads the caller's line from the source file on
//!   disk. It fails with [`EchologError::IntrospectionFailure`] when the file
//!   cannot be found (stripped deployments, generated code) or the line is out
//!   of range.
//!
//! Argument extraction is textual: the first balanced parenthesis group is
//! split on `", "`. Expressions that themselves contain `", "` (nested calls,
//! tuples, string literals) are split apart as well. This is a known
//! limitation, not something a real parser is meant to fix here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EchologError, Result};

/// What an `echo!` expansion knows about itself at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSiteHint
{
    /// `file!()` of the invocation
    pub file: &'static str,
    /// `line!()` of the invocation
    pub line: u32,
    /// The invocation re-assembled from its tokens, e.g. `echo!(a, b)`
    pub tokens: &'static str,
}

impl CallSiteHint
{
    /// Bundle the compile-time call-site facts
    #[must_use]
    pub const fn new(file: &'static str, line: u32, tokens: &'static str) -> Self
    {
        Self { file, line, tokens }
    }
}

/// A resolved call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite
{
    /// Path of the source file as the compiler saw it
    pub file: String,
    /// 1-based line number
    pub line: u32,
    /// Raw source text containing the invocation
    pub source: String,
}

impl CallSite
{
    /// Final path component of [`CallSite::file`]
    #[must_use]
    pub fn file_name(&self) -> &str
    {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

/// Turns a compile-time hint into source text
pub trait CallSiteResolver: Send + Sync
{
    /// Resolve the call site described by `hint`.
    ///
    /// ## Errors
    ///
    /// Returns [`EchologError::IntrospectionFailure`] if no source context is
    /// available.
    fn resolve(&self, hint: &CallSiteHint) -> Result<CallSite>;
}

/// Uses the macro-captured token text
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineResolver;

impl CallSiteResolver for InlineResolver
{
    fn resolve(&self, hint: &CallSiteHint) -> Result<CallSite>
    {
        Ok(CallSite {
            file: hint.file.to_string(),
            line: hint.line,
            source: hint.tokens.to_string(),
        })
    }
}

/// Re-reads the caller's line from its source file
///
/// `file!()` paths are relative to wherever the compiler was invoked (the
/// workspace root for cargo), so the path is tried as given and then joined
/// onto each search root.
#[derive(Debug, Clone)]
pub struct SourceFileResolver
{
    roots: Vec<PathBuf>,
}

impl Default for SourceFileResolver
{
    /// Searches the current directory and all of its ancestors
    fn default() -> Self
    {
        let roots = env::current_dir()
            .map(|cwd| cwd.ancestors().map(Path::to_path_buf).collect())
            .unwrap_or_default();
        Self { roots }
    }
}

impl SourceFileResolver
{
    /// Resolver searching only `roots` (plus the path as given)
    #[must_use]
    pub fn with_roots(roots: Vec<PathBuf>) -> Self
    {
        Self { roots }
    }

    fn locate(&self, file: &str) -> Option<PathBuf>
    {
        let direct = PathBuf::from(file);
        if direct.is_file() {
            return Some(direct);
        }
        if direct.is_absolute() {
            return None;
        }
        self.roots.iter().map(|root| root.join(file)).find(|candidate| candidate.is_file())
    }
}

impl CallSiteResolver for SourceFileResolver
{
    fn resolve(&self, hint: &CallSiteHint) -> Result<CallSite>
    {
        let path = self.locate(hint.file).ok_or_else(|| {
            EchologError::IntrospectionFailure(format!("source file {} is not available", hint.file))
        })?;
        let contents = fs::read_to_string(&path).map_err(|e| {
            EchologError::IntrospectionFailure(format!("cannot read {}: {e}", path.display()))
        })?;
        let index = usize::try_from(hint.line.saturating_sub(1)).unwrap_or(usize::MAX);
        let source = contents.lines().nth(index).ok_or_else(|| {
            EchologError::IntrospectionFailure(format!("{} has no line {}", path.display(), hint.line))
        })?;

        Ok(CallSite {
            file: hint.file.to_string(),
            line: hint.line,
            source: source.to_string(),
        })
    }
}

/// Interior of the first balanced parenthesis group in `source`.
///
/// ## Errors
///
/// Returns [`EchologError::IntrospectionFailure`] if `source` has no `(` or
/// the first `(` is never closed.
pub fn argument_list(source: &str) -> Result<&str>
{
    let open = source
        .find('(')
        .ok_or_else(|| EchologError::IntrospectionFailure(format!("no argument list in `{}`", source.trim())))?;

    let mut depth = 0usize;
    for (offset, ch) in source[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&source[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }

    Err(EchologError::IntrospectionFailure(format!(
        "unbalanced parentheses in `{}`",
        source.trim()
    )))
}

/// Split an argument list on `", "` into expression strings.
///
/// An empty (or blank) list yields no expressions.
#[must_use]
pub fn split_arguments(arguments: &str) -> Vec<String>
{
    if arguments.trim().is_empty() {
        return Vec::new();
    }
    arguments.split(", ").map(|expr| expr.trim().to_string()).collect()
}
