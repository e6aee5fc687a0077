use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use anyhow::{bail, Context};
use clap::Parser;
use rwlz::{
    errors::diagnostics::{Diagnostic, Diagnostics},
    lexer::lexer::tokenize,
    parser::parser::{parse_with, RecoveryMode},
    render_diagnostic,
    type_checker::type_checker::type_check,
};
use tracing_subscriber::{fmt, EnvFilter};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Front end for RWLZ plugin scripts: scanning, parsing and semantic checks.
#[derive(Debug, Parser)]
#[command(name = "rwlz", author, version, about)]
struct Args {
    /// The `.rwlz` source file
    file: PathBuf,

    /// Print the token stream and stop
    #[arg(long, conflicts_with_all = ["ast", "check"])]
    scan: bool,

    /// Print the parsed syntax tree and stop
    #[arg(long, conflicts_with = "check")]
    ast: bool,

    /// Run every phase and only report diagnostics (the default)
    #[arg(long)]
    check: bool,

    /// Report only the first syntax error instead of resynchronizing
    #[arg(long)]
    stop_at_first_error: bool,
}

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

fn main() -> anyhow::Result<ExitCode> {
    fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::trace!("arguments: {args:?}");

    if args.file.extension().and_then(|extension| extension.to_str()) != Some("rwlz") {
        bail!("expected a `.rwlz` file, got {}", args.file.display());
    }

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let source = read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let start = Instant::now();
    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.push(error);
            return Ok(report(&diagnostics, &source));
        }
    };
    tracing::info!("tokenized in {:?}", start.elapsed());

    if args.scan {
        for token in tokens.iter() {
            println!("{}", token);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mode = if args.stop_at_first_error {
        RecoveryMode::StopAtFirst
    } else {
        RecoveryMode::Resynchronize
    };

    let parse_start = Instant::now();
    let parsed = parse_with(tokens, Rc::new(file_name), mode);
    tracing::info!("parsed in {:?}", parse_start.elapsed());

    let mut program = match parsed {
        Ok(program) => program,
        Err(errors) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.extend(errors);
            return Ok(report(&diagnostics, &source));
        }
    };

    if args.ast {
        println!("{:#?}", program);
        return Ok(ExitCode::SUCCESS);
    }

    let check_start = Instant::now();
    let (_, diagnostics) = type_check(&mut program);
    tracing::info!("type checked in {:?}", check_start.elapsed());
    tracing::info!("total time: {:?}", start.elapsed());

    Ok(report(&diagnostics, &source))
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

/// Prints every diagnostic in line order followed by the totals. The run
/// fails only when at least one error was reported.
fn report(diagnostics: &Diagnostics, source: &str) -> ExitCode {
    for diagnostic in diagnostics.sorted() {
        print!("{}", render(diagnostic, source));
    }

    println!(
        "{} error(s), {} warning(s)",
        diagnostics.error_count(),
        diagnostics.warning_count()
    );

    if diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let mut rendered = render_diagnostic(diagnostic, source);
    rendered.push_str(&format!("  = {}\n\n", diagnostic.message()));
    rendered
}
