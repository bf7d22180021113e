//! # Echo
//!
//! Diagnostic printing of expressions next to their values.
//!
//! ```rust,no_run
//! use echolog_core::echo;
//!
//! fn main() -> echolog_core::Result<()>
//! {
//!     let a = 2;
//!     let b = vec![3, 4];
//!     echo!(a, b.len(), items = b)?;
//!     Ok(())
//! }
//! ```
//!
//! prints, at ECHO level through the root logger:
//!
//! ```text
//! 12:00:01.042 [>] main.rs @ line 7: a => 2
//! 12:00:01.042 [>] main.rs @ line 7: b.len() => 2
//! 12:00:01.042 [>] main.rs @ line 7: items => [3, 4]
//! ```
//!
//! Values are rendered with their `Debug` implementation. Named arguments
//! (`name = value`) are reported under their name rather than the value's
//! expression text.

use std::fmt::{self, Debug};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::callsite::{argument_list, split_arguments, CallSiteHint, CallSiteResolver, InlineResolver};
use crate::colors;
use crate::error::Result;
use crate::factory::LoggerFactory;

static RESOLVER: Lazy<RwLock<Arc<dyn CallSiteResolver>>> = Lazy::new(|| RwLock::new(Arc::new(InlineResolver)));

/// Replace the resolver used by `echo!` (defaults to [`InlineResolver`])
pub fn set_call_site_resolver(resolver: Arc<dyn CallSiteResolver>)
{
    *RESOLVER.write().unwrap_or_else(PoisonError::into_inner) = resolver;
}

fn current_resolver() -> Arc<dyn CallSiteResolver>
{
    Arc::clone(&RESOLVER.read().unwrap_or_else(PoisonError::into_inner))
}

/// Everything one echo invocation reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoCallSite
{
    /// Source file name (final path component)
    pub file_name: String,
    /// 1-based line number
    pub line: u32,
    /// Argument texts as split from the source, in order
    pub expressions: Vec<String>,
    /// `(expression or keyword, rendered value)` pairs, positional first
    pub pairs: Vec<(String, String)>,
}

impl EchoCallSite
{
    /// Render one pair as an output line
    #[must_use]
    pub fn render_pair(&self, name: &str, value: &str, colored: bool) -> String
    {
        format!(
            "{} @ line {}: {} => {}",
            self.file_name,
            colors::paint(colors::YELLOW, &self.line.to_string(), colored),
            colors::paint(colors::CYAN, name, colored),
            colors::paint(colors::GREEN, value, colored),
        )
    }
}

/// Resolves call sites and emits echo lines through a factory's root logger
pub struct EchoInspector<'a>
{
    factory: &'a LoggerFactory,
    resolver: &'a dyn CallSiteResolver,
}

impl fmt::Debug for EchoInspector<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("EchoInspector").field("factory", self.factory).finish_non_exhaustive()
    }
}

impl<'a> EchoInspector<'a>
{
    /// Inspector writing through `factory`'s root logger
    #[must_use]
    pub fn new(factory: &'a LoggerFactory, resolver: &'a dyn CallSiteResolver) -> Self
    {
        Self { factory, resolver }
    }

    /// Resolve the call site and pair expression names with values.
    ///
    /// With named values, the expression list is cut down to the positional
    /// arguments and each keyword is appended as its own name. Names and
    /// values are zipped, so surplus on either side is dropped.
    ///
    /// ## Errors
    ///
    /// Returns [`EchologError::IntrospectionFailure`](crate::EchologError::IntrospectionFailure)
    /// if the call site cannot be resolved or has no balanced argument list.
    pub fn inspect(
        &self,
        hint: &CallSiteHint,
        positional: &[&dyn Debug],
        named: &[(&str, &dyn Debug)],
    ) -> Result<EchoCallSite>
    {
        let site = self.resolver.resolve(hint)?;
        let expressions = split_arguments(argument_list(&site.source)?);

        let mut names = expressions.clone();
        if !named.is_empty() {
            names.truncate(positional.len());
            names.extend(named.iter().map(|(key, _)| (*key).to_string()));
        }

        let values = positional
            .iter()
            .map(|value| format!("{value:?}"))
            .chain(named.iter().map(|(_, value)| format!("{value:?}")));
        let pairs = names.into_iter().zip(values).collect();

        Ok(EchoCallSite {
            file_name: site.file_name().to_string(),
            line: site.line,
            expressions,
            pairs,
        })
    }

    /// Emit one ECHO line per argument through the root logger.
    ///
    /// ## Errors
    ///
    /// Introspection failures (see [`EchoInspector::inspect`]) and root logger
    /// configuration failures. Nothing is written in either case.
    pub fn echo(&self, hint: &CallSiteHint, positional: &[&dyn Debug], named: &[(&str, &dyn Debug)]) -> Result<()>
    {
        let call_site = self.inspect(hint, positional, named).inspect_err(|e| {
            tracing::debug!(file = hint.file, line = hint.line, error = %e, "echo call site rejected");
        })?;
        let arguments = positional.len() + named.len();
        if call_site.expressions.len() != arguments {
            // Commas inside an argument split it in two
            tracing::debug!(
                file = hint.file,
                line = hint.line,
                expressions = ?call_site.expressions,
                arguments,
                "echo argument text does not match argument count"
            );
        }

        let logger = self.factory.root()?;
        let colored = self.factory.colored();
        for (name, value) in &call_site.pairs {
            logger.echo(call_site.render_pair(name, value, colored));
        }
        Ok(())
    }
}

/// Entry point for `echo!`: global factory, globally configured resolver.
///
/// ## Errors
///
/// See [`EchoInspector::echo`].
#[doc(hidden)]
pub fn echo_values(hint: CallSiteHint, positional: &[&dyn Debug], named: &[(&str, &dyn Debug)]) -> Result<()>
{
    let resolver = current_resolver();
    EchoInspector::new(LoggerFactory::global(), resolver.as_ref()).echo(&hint, positional, named)
}

/// Log each argument's source expression and value at ECHO level.
///
/// Positional arguments are any expressions; named arguments are written
/// `name = value` and must come after the positional ones. Evaluates to
/// [`Result<()>`](crate::Result).
///
/// ```rust,no_run
/// # fn main() -> echolog_core::Result<()> {
/// let width = 80;
/// echolog_core::echo!(width, width / 2, label = "columns")?;
/// # Ok(())
/// # }
/// ```
///
/// A positional argument after a named one is rejected at compile time:
///
/// ```rust,compile_fail
/// # fn main() -> echolog_core::Result<()> {
/// let width = 80;
/// echolog_core::echo!(label = "columns", width)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! echo {
    (@munch $hint:expr; [$($pos:expr,)*]; [$($key:ident = $val:expr,)*];) => {
        $crate::echo::echo_values(
            $hint,
            &[$(&$pos as &dyn ::core::fmt::Debug),*],
            &[$((::core::stringify!($key), &$val as &dyn ::core::fmt::Debug)),*],
        )
    };
    (@munch $hint:expr; [$($pos:tt)*]; [$($named:tt)*]; $key:ident = $val:expr $(, $($rest:tt)*)?) => {
        $crate::echo!(@named $hint; [$($pos)*]; [$($named)* $key = $val,]; $($($rest)*)?)
    };
    (@munch $hint:expr; [$($pos:tt)*]; [$($named:tt)*]; $val:expr $(, $($rest:tt)*)?) => {
        $crate::echo!(@munch $hint; [$($pos)* $val,]; [$($named)*]; $($($rest)*)?)
    };
    // Once a named argument has been seen only named ones may follow
    (@named $hint:expr; [$($pos:tt)*]; [$($named:tt)*];) => {
        $crate::echo!(@munch $hint; [$($pos)*]; [$($named)*];)
    };
    (@named $hint:expr; [$($pos:tt)*]; [$($named:tt)*]; $key:ident = $val:expr $(, $($rest:tt)*)?) => {
        $crate::echo!(@named $hint; [$($pos)*]; [$($named)* $key = $val,]; $($($rest)*)?)
    };
    (@named $hint:expr; [$($pos:tt)*]; [$($named:tt)*]; $($rest:tt)+) => {
        ::core::compile_error!("positional echo! arguments must precede named ones")
    };
    () => {
        $crate::echo!(@munch $crate::callsite::CallSiteHint::new(::core::file!(), ::core::line!(), "echo!()"); []; [];)
    };
    ($($args:tt)+) => {
        $crate::echo!(
            @munch $crate::callsite::CallSiteHint::new(
                ::core::file!(),
                ::core::line!(),
                ::core::concat!("echo!(", ::core::stringify!($($args)+), ")"),
            );
            [];
            [];
            $($args)+
        )
    };
}
