use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use echolog_core::callsite::SourceFileResolver;
use echolog_core::echo::set_call_site_resolver;
use echolog_core::{echo, get_logger, newline, ColorFormatter, EchologConfig, FormatSpec, Level, Logger, Record};
use echolog_tracing::{debug, init_tracing};

/// Leveled console logging with an ECHO severity and call-site echo.
#[derive(Parser, Debug)]
#[command(name = "echolog")]
#[command(version)]
#[command(about = "Leveled console logging with an ECHO severity and call-site echo", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Walk through every format variant and severity
    Demo
    {
        /// Threshold for the demo loggers
        #[arg(short, long, default_value = "debug")]
        level: Level,
        /// Recover echo arguments by re-reading the source file
        #[arg(long, default_value_t = false)]
        from_source: bool,
    },
    /// Configure a logger and log a message at every severity
    Show
    {
        /// Format variant (short, short-time, long, long-time)
        #[arg(short, long, default_value = "short-time")]
        format: String,
        /// Logger threshold
        #[arg(short, long)]
        level: Option<Level>,
        /// Logger identifier (root logger when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Message to log
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// List the format variants with a sample header
    Formats,
}

fn main()
{
    // ECHOLOG_LEVEL / ECHOLOG_FORMAT / ECHOLOG_COLOR, RUST_LOG for the filter
    let config = match EchologConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid logging configuration: {e}");
            process::exit(2);
        }
    };
    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run_command(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(cli: Cli, config: &EchologConfig) -> Result<(), Box<dyn std::error::Error>>
{
    match cli.command {
        Commands::Demo { level, from_source } => {
            if from_source {
                set_call_site_resolver(Arc::new(SourceFileResolver::default()));
            }
            debug!("running demo at {level}");
            run_demo(level)?;
        }
        Commands::Show {
            format,
            level,
            id,
            message,
        } => {
            let log = get_logger(level, Some(format.as_str()), id.as_deref())?;
            log_every_level(&log, &message.join(" "));
        }
        Commands::Formats => {
            let colored = config.color.resolve();
            for spec in FormatSpec::ALL {
                let formatter = ColorFormatter::with_color(spec, colored);
                let sample = formatter.render(&Record::new(Level::ECHO, "sample message"));
                println!("{:<12}{sample}", spec.as_str());
            }
        }
    }
    Ok(())
}

fn log_every_level(log: &Logger, message: &str)
{
    log.debug(message);
    log.info(message);
    log.echo(message);
    log.warning(message);
    log.error(message);
    log.critical(message);
}

fn run_demo(level: Level) -> echolog_core::Result<()>
{
    newline(3)?;

    for fmt in FormatSpec::ALL {
        let log = get_logger(Some(level), Some(fmt.as_str()), None)?;

        let call = format!("Demo echo! call with fmt = {fmt}");
        echo!(call)?;
        log.debug(format!("Demo debug message with fmt = {fmt}."));
        log.echo(format!("Demo echo message with  fmt = {fmt}."));
        log.info(format!("Demo info message with  fmt = {fmt}."));
        log.warning(format!("Demo warn message with  fmt = {fmt}."));
        log.error(format!("Demo error message with fmt = {fmt}."));
        log.fatal(format!("Demo fatal message with fmt = {fmt}."));

        newline(2)?;
    }

    let a = 2;
    let b = vec![3, 4];

    echo!("Example call to echo! with multiple arguments.", a, blah = b)?;
    newline(2)?;
    Ok(())
}
