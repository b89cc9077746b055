//! External tool drivers
//!
//! The translated program is piped through `clang-format` and then into
//! `g++`, both over stdin. Neither is required for translation itself.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::error::DriverError;

/// How the formatter is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    pub program: String,
    /// Passed as `--style=<style>` when set.
    pub style: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            program: "clang-format".to_string(),
            style: Some("{BasedOnStyle: WebKit, ColumnLimit: 99}".to_string()),
        }
    }
}

/// How the C++ compiler is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub program: String,
    pub standard: String,
    pub flags: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "g++".to_string(),
            standard: "c++17".to_string(),
            flags: ["-O2", "-pipe", "-fPIC", "-Wfatal-errors", "-s"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// Run `command` with `input` on stdin and collect its output.
fn run_with_stdin(mut command: Command, tool: &str, input: &str) -> Result<Output, DriverError> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => DriverError::ToolUnavailable {
                tool: tool.to_string(),
                source,
            },
            _ => DriverError::Io(source),
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdin not captured"))?;
    let input = input.to_string();
    let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child.wait_with_output()?;
    match writer.join() {
        Ok(result) => result?,
        Err(_) => return Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked").into()),
    }
    Ok(output)
}

/// Reformat C++ source. Returns the formatted text.
pub fn format_source(cpp: &str, config: &FormatterConfig) -> Result<String, DriverError> {
    let mut command = Command::new(&config.program);
    if let Some(style) = &config.style {
        command.arg(format!("--style={}", style));
    }
    debug!(program = %config.program, "running formatter");

    let output = run_with_stdin(command, &config.program, cpp)?;
    if !output.status.success() {
        return Err(DriverError::ToolFailed {
            tool: config.program.clone(),
            status: output.status,
            diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            translated: cpp.to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Compile C++ source read from stdin into the executable `output`.
pub fn compile(cpp: &str, output: &Path, config: &CompilerConfig) -> Result<(), DriverError> {
    let mut command = Command::new(&config.program);
    command
        .arg("-x")
        .arg("c++")
        .arg(format!("-std={}", config.standard))
        .args(&config.flags)
        .arg("-o")
        .arg(output)
        .arg("-");
    info!(program = %config.program, output = %output.display(), "compiling");

    let result = run_with_stdin(command, &config.program, cpp)?;
    if !result.status.success() {
        return Err(DriverError::ToolFailed {
            tool: config.program.clone(),
            status: result.status,
            diagnostics: String::from_utf8_lossy(&result.stderr).into_owned(),
            translated: cpp.to_string(),
        });
    }
    Ok(())
}
