#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use tsz_auto_import::cli::args::CliArgs;
use tsz_auto_import::cli::driver;

fn main() -> ExitCode {
    // Initialize tracing if AUTO_IMPORT_LOG or RUST_LOG is set.
    tsz_auto_import::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let reports = driver::run(args, &cwd)?;

    if args.json {
        println!("{}", driver::render_plans(&reports)?);
        return Ok(());
    }

    if args.write {
        for path in driver::write_reports(&reports)? {
            eprintln!("{} {}", "updated".green(), path.display());
        }
        return Ok(());
    }

    let with_headers = reports.len() > 1;
    for report in &reports {
        if with_headers {
            println!("// {}", report.path.display());
        }
        print!("{}", report.output);
    }
    Ok(())
}
