//! Running external commands through the platform's default shell.
//!
//! Commands go through the shell rather than being spawned directly so that
//! built-ins (`del`, `move`, `rd`) and pipes work. Every argument is quoted
//! for the shell dialect so file names never reach it as syntax.

use std::process::Command;

use crate::error::{CoreError, CoreResult};

/// Capability to run one command to completion and capture its output.
///
/// Implementations block until the process exits. There is no timeout.
pub trait ProcessRunner {
    /// Runs `command args...` and returns its output lines.
    ///
    /// # Errors
    ///
    /// [`CoreError::Operation`] when the process cannot be started or exits
    /// unsuccessfully; `output` carries the captured lines joined by `\n`.
    fn execute(&self, command: &str, args: &[&str]) -> CoreResult<Vec<String>>;

    /// Runs `stages` connected by pipes, each stage a command and its
    /// arguments. Errors as for [`ProcessRunner::execute`], judged by the
    /// exit status of the last stage.
    fn execute_pipeline(&self, stages: &[Stage<'_>]) -> CoreResult<Vec<String>>;
}

/// One pipeline stage: a command and its arguments.
pub type Stage<'a> = (&'a str, &'a [&'a str]);

/// Shell dialect used to build the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// `sh -c "…"`, arguments single-quoted.
    Posix,
    /// `cmd /C …`, arguments double-quoted when they contain whitespace or
    /// a cmd.exe metacharacter.
    Cmd,
}

impl ShellKind {
    /// Joins `command` and `args` into one command line for this dialect,
    /// with stderr folded into stdout.
    pub fn command_line(self, command: &str, args: &[&str]) -> String {
        self.pipeline_line(&[(command, args)])
    }

    /// Joins `stages` with `|`. Only the last stage's stderr is folded into
    /// stdout.
    pub fn pipeline_line(self, stages: &[Stage<'_>]) -> String {
        let mut line = String::new();
        for (i, (command, args)) in stages.iter().enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            line.push_str(command);
            for arg in *args {
                line.push(' ');
                match self {
                    Self::Posix => line.push_str(&posix_quote(arg)),
                    Self::Cmd => line.push_str(&cmd_quote(arg)),
                }
            }
        }
        line.push_str(" 2>&1");
        line
    }
}

/// Runs commands through `$COMSPEC /C` or `/bin/sh -c`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    kind: ShellKind,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>, kind: ShellKind) -> Self {
        Self {
            shell: shell.into(),
            kind,
        }
    }

    /// Always `/bin/sh`: the user's login shell may not speak POSIX
    /// redirections (csh reads `2>&1` as an argument plus a redirect).
    pub fn posix() -> Self {
        Self::new("/bin/sh", ShellKind::Posix)
    }

    /// `$COMSPEC`, falling back to `cmd.exe`.
    pub fn cmd() -> Self {
        let shell = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
        Self::new(shell, ShellKind::Cmd)
    }

    fn build(&self, line: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        match self.kind {
            ShellKind::Posix => {
                cmd.arg("-c").arg(line);
            }
            ShellKind::Cmd => {
                cmd.arg("/C");
                append_raw(&mut cmd, line);
            }
        }
        cmd
    }
}

impl ShellRunner {
    fn run(&self, line: &str) -> CoreResult<Vec<String>> {
        tracing::info!(shell = %self.shell, command = %line, "running command");

        let output = self.build(line).output().map_err(|e| CoreError::Operation {
            message: e.to_string(),
            output: String::new(),
        })?;

        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_owned)
            .collect();
        lines.extend(
            String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_owned),
        );

        if output.status.success() {
            Ok(lines)
        } else {
            let err = CoreError::Operation {
                message: output.status.to_string(),
                output: lines.join("\n"),
            };
            tracing::warn!(command = %line, error = %err, "command failed");
            Err(err)
        }
    }
}

impl ProcessRunner for ShellRunner {
    fn execute(&self, command: &str, args: &[&str]) -> CoreResult<Vec<String>> {
        self.run(&self.kind.command_line(command, args))
    }

    fn execute_pipeline(&self, stages: &[Stage<'_>]) -> CoreResult<Vec<String>> {
        self.run(&self.kind.pipeline_line(stages))
    }
}

fn posix_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Characters cmd.exe treats as syntax outside double quotes.
const CMD_SPECIAL: &[char] = &['&', '|', '<', '>', '^', '(', ')', '%', '!', ',', ';', '=', '"'];

fn cmd_quote(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || CMD_SPECIAL.contains(&c));
    if !needs_quotes {
        return arg.to_owned();
    }
    // `%` expands even inside quotes; step outside them and escape it.
    format!("\"{}\"", arg.replace('%', "\"^%\""))
}

// cmd.exe does its own parsing; the line must reach it unescaped.
#[cfg(windows)]
fn append_raw(cmd: &mut Command, line: &str) {
    use std::os::windows::process::CommandExt;
    cmd.raw_arg(line);
}

#[cfg(not(windows))]
fn append_raw(cmd: &mut Command, line: &str) {
    cmd.arg(line);
}
