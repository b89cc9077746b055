//! go2cpp - Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  STAGE 1: TRANSLATION                                        │
//! │    → classify each line against the open block context       │
//! │    → translate it, re-indent it                              │
//! │    → prototypes, literal suffixes, shims, includes           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  STAGE 2: FORMATTING (clang-format, optional)                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  STAGE 3: COMPILATION (g++ -std=c++17, reads stdin)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use go2cpp::driver::{compile, format_source, CompilerConfig, FormatterConfig};
use go2cpp::{translate, DriverError};

mod ansi {
    pub const BOLD_RED: &str = "\x1b[1;31m";
    pub const BOLD_YELLOW: &str = "\x1b[1;33m";
    pub const BOLD_GREEN: &str = "\x1b[1;32m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Parser, Debug)]
#[command(name = "go2cpp", version)]
#[command(about = "Translate a single-file Go program to C++17 and compile it")]
struct Cli {
    /// Go source file; stdin when absent
    input: Option<PathBuf>,

    /// Compile to this executable (or write the C++ here with --emit-cpp).
    /// Without it the C++ is printed to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the C++ to the output path instead of compiling
    #[arg(long)]
    emit_cpp: bool,

    /// Skip clang-format
    #[arg(short = 'O', long)]
    no_format: bool,

    /// C++ compiler
    #[arg(long, env = "GO2CPP_CXX", default_value = "g++")]
    cxx: String,

    /// C++ language standard
    #[arg(long = "std", env = "GO2CPP_STD", default_value = "c++17")]
    standard: String,

    /// clang-format style
    #[arg(long, default_value = "{BasedOnStyle: WebKit, ColumnLimit: 99}")]
    format_style: String,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GO2CPP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}error{}: {}", ansi::BOLD_RED, ansi::RESET, message);
    exit(1);
}

fn read_source(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let input_name = cli
        .input
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    let source = match read_source(cli.input.as_ref()) {
        Ok(s) => s,
        Err(e) => fail(format!("reading {}: {}", input_name, e)),
    };

    //==========================================================================
    // STAGE 1: translation
    //==========================================================================
    let translation = match translate(&source) {
        Ok(t) => t,
        Err(e) => fail(format!("{}:{}", input_name, e)),
    };
    if !cli.quiet {
        for notice in &translation.notices {
            eprintln!("{}warning{}: {}:{}", ansi::BOLD_YELLOW, ansi::RESET, input_name, notice);
        }
    }

    //==========================================================================
    // STAGE 2: formatting; a missing or failing formatter is not fatal
    //==========================================================================
    let mut cpp = translation.cpp;
    if !cli.no_format {
        let formatter = FormatterConfig { style: Some(cli.format_style.clone()), ..Default::default() };
        match format_source(&cpp, &formatter) {
            Ok(formatted) => cpp = formatted,
            Err(e) => warn!("{}, emitting unformatted C++", e),
        }
    }

    let Some(output) = cli.output.clone() else {
        print!("{}", cpp);
        return;
    };

    if cli.emit_cpp {
        if let Err(e) = fs::write(&output, &cpp) {
            fail(format!("writing {}: {}", output.display(), e));
        }
        debug!(path = %output.display(), "wrote C++");
        return;
    }

    //==========================================================================
    // STAGE 3: compilation
    //==========================================================================
    let compiler = CompilerConfig { program: cli.cxx.clone(), standard: cli.standard.clone(), ..Default::default() };
    match compile(&cpp, &output, &compiler) {
        Ok(()) => {
            if !cli.quiet {
                eprintln!("{}compiled{} {}", ansi::BOLD_GREEN, ansi::RESET, output.display());
            }
        }
        Err(DriverError::ToolFailed { tool, diagnostics, translated, .. }) => {
            eprintln!("{}───────────────────────────────────────────────────────────────{}", ansi::BLUE, ansi::RESET);
            eprintln!("{}Translated C++:{}", ansi::CYAN, ansi::RESET);
            eprintln!("{}───────────────────────────────────────────────────────────────{}", ansi::BLUE, ansi::RESET);
            for (i, line) in translated.lines().enumerate() {
                eprintln!("{:4} | {}", i + 1, line);
            }
            eprintln!("{}───────────────────────────────────────────────────────────────{}", ansi::BLUE, ansi::RESET);
            eprintln!("{}", diagnostics);
            fail(format!("{} rejected the translated program", tool));
        }
        Err(e) => fail(e),
    }
}
