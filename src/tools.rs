//! External collaborators: sub-project builds and the minifier.
//!
//! Both are reached through traits so the phases can be exercised without
//! the real toolchain installed. The process-backed implementations run the
//! commands named in the configuration.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::config::{BuildConfig, MinifierConfig, ProjectConfig};
use crate::error::{Error, Result};

/// Directory inside each project root where its own build is launched.
pub const BUILD_DIR: &str = "build";

/// Runs one sibling project's own build.
pub trait SubBuildRunner: Sync {
    fn run(&self, project: &ProjectConfig) -> Result<()>;
}

/// Runs the configured build command inside `<project>/build`.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(build: &BuildConfig) -> Self {
        Self {
            command: build.command.clone(),
            args: build.args.clone(),
        }
    }
}

impl SubBuildRunner for CommandRunner {
    fn run(&self, project: &ProjectConfig) -> Result<()> {
        let dir = project.root.join(BUILD_DIR);
        if !dir.is_dir() {
            return Err(Error::SubBuildFailure {
                project: project.name.clone(),
                message: format!("build directory {} does not exist", dir.display()),
            });
        }

        log::debug!("{}: running {} {:?}", project.name, self.command, self.args);
        let output = Command::new(&self.command)
            .args(&self.args)
            .current_dir(&dir)
            .output()
            .map_err(|e| Error::SubBuildFailure {
                project: project.name.clone(),
                message: format!("failed to start '{}': {}", self.command, e),
            })?;

        if !output.status.success() {
            return Err(Error::SubBuildFailure {
                project: project.name.clone(),
                message: failure_message(&output),
            });
        }

        Ok(())
    }
}

/// Exit status of a failed process, followed by its stderr when non-empty.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{} ({})", output.status, stderr)
    }
}

/// Input to a minifier run.
#[derive(Debug, Clone)]
pub struct MinifyRequest<'a> {
    /// Ordered, deduplicated sources.
    pub sources: &'a [PathBuf],
    /// Compile-time flag forced to `false` for dead-code elimination.
    pub flag: &'a str,
    /// License banner kept at the top of the output.
    pub banner: &'a str,
}

/// Produces a minified bundle from a list of sources.
pub trait Minifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<Vec<u8>>;
}

/// Runs an external minifier and captures its stdout.
#[derive(Debug, Clone)]
pub struct CommandMinifier {
    command: String,
    args: Vec<String>,
}

impl CommandMinifier {
    pub fn new(config: &MinifierConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }

    /// Expand `{sources}`, `{flag}` and `{banner}` placeholders.
    fn expand_args(&self, request: &MinifyRequest<'_>) -> Vec<OsString> {
        let mut out = Vec::new();
        for arg in &self.args {
            if arg == "{sources}" {
                out.extend(request.sources.iter().map(|p| p.as_os_str().to_owned()));
            } else {
                out.push(
                    arg.replace("{flag}", request.flag)
                        .replace("{banner}", request.banner)
                        .into(),
                );
            }
        }
        out
    }
}

impl Minifier for CommandMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<Vec<u8>> {
        let output = Command::new(&self.command)
            .args(self.expand_args(request))
            .output()
            .map_err(|e| Error::ExternalTool {
                tool: self.command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::ExternalTool {
                tool: self.command.clone(),
                message: failure_message(&output),
            });
        }

        Ok(output.stdout)
    }
}
