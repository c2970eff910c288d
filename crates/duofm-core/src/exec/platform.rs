//! Platform-specific file operations.
//!
//! [`Platform`] is the seam between the dispatcher and the host: copy, move
//! and delete are delegated to the host's own utilities through a
//! [`ProcessRunner`], guarded by the root checks in [`super::guard`].

use std::path::Path;
use std::process::Command;

use crate::error::{CoreError, CoreResult};
use crate::exec::guard;
use crate::exec::runner::{ProcessRunner, ShellRunner};

/// Host capabilities the dispatcher needs.
pub trait Platform {
    /// Copies `src` (file or directory, recursively) into `dst_dir`.
    fn copy(&self, src: &Path, dst_dir: &Path) -> CoreResult<()>;

    /// Moves `src` into `dst_dir`, falling back to copy then delete.
    fn move_into(&self, src: &Path, dst_dir: &Path) -> CoreResult<()>;

    /// Removes `path` recursively.
    fn delete(&self, path: &Path) -> CoreResult<()>;

    /// Drive letters present on the host, uppercase. Empty where the host
    /// has no drives.
    fn list_drives(&self) -> Vec<char>;

    /// Runs an interactive shell in `dir` and blocks until it exits. The
    /// caller owns the terminal hand-over.
    fn spawn_interactive_shell(&self, dir: &Path) -> CoreResult<()>;
}

/// Unix-like hosts: `cp -R`, `mv -f`, `rm -rf`.
#[derive(Debug)]
pub struct PosixPlatform<R> {
    runner: R,
    shell: Option<String>,
}

impl<R: ProcessRunner> PosixPlatform<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            shell: None,
        }
    }

    /// Uses `program` for the interactive shell instead of `$SHELL`.
    #[must_use]
    pub fn with_shell(mut self, program: Option<String>) -> Self {
        self.shell = program;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: ProcessRunner> Platform for PosixPlatform<R> {
    fn copy(&self, src: &Path, dst_dir: &Path) -> CoreResult<()> {
        guard::check_copy(dst_dir)?;
        let src = src.to_string_lossy();
        let dst = dir_with_separator(dst_dir, '/');
        self.runner.execute("cp", &["-R", &*src, &*dst]).map(drop)
    }

    fn move_into(&self, src: &Path, dst_dir: &Path) -> CoreResult<()> {
        guard::check_move(src, dst_dir)?;
        let from = src.to_string_lossy();
        let dst = dir_with_separator(dst_dir, '/');
        let primary = self.runner.execute("mv", &["-f", &*from, &*dst]);
        move_fallback(self, primary, src, dst_dir)
    }

    fn delete(&self, path: &Path) -> CoreResult<()> {
        guard::check_delete(path)?;
        let target = path.to_string_lossy();
        self.runner.execute("rm", &["-rf", &*target]).map(drop)
    }

    fn list_drives(&self) -> Vec<char> {
        Vec::new()
    }

    fn spawn_interactive_shell(&self, dir: &Path) -> CoreResult<()> {
        let (program, args) = match &self.shell {
            Some(program) => (program.clone(), Vec::new()),
            None => match std::env::var("SHELL") {
                Ok(shell) => (shell, vec!["-i"]),
                Err(_) => ("/bin/sh".to_string(), Vec::new()),
            },
        };
        run_interactive(&program, &args, dir)
    }
}

/// Windows hosts: `xcopy` (which, unlike `copy`, handles hidden and system
/// files), `move /Y`, and `del` followed by `rd`.
#[derive(Debug)]
pub struct WindowsPlatform<R> {
    runner: R,
    shell: Option<String>,
}

impl<R: ProcessRunner> WindowsPlatform<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            shell: None,
        }
    }

    /// Uses `program` for the interactive shell instead of `%COMSPEC%`.
    #[must_use]
    pub fn with_shell(mut self, program: Option<String>) -> Self {
        self.shell = program;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: ProcessRunner> Platform for WindowsPlatform<R> {
    fn copy(&self, src: &Path, dst_dir: &Path) -> CoreResult<()> {
        guard::check_copy(dst_dir)?;
        let base = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let from = src.to_string_lossy();
        let full_dst = format!("{}{}", dir_with_separator(dst_dir, '\\'), base);
        // xcopy still asks "file or directory?" for single files; answer it.
        let answer: &[&str] = &["f"];
        let xcopy: &[&str] = &["/Q", "/I", "/K", "/H", "/Y", "/R", "/S", "/E", &*from, &*full_dst];
        self.runner
            .execute_pipeline(&[("echo", answer), ("xcopy", xcopy)])
            .map(drop)
    }

    fn move_into(&self, src: &Path, dst_dir: &Path) -> CoreResult<()> {
        guard::check_move(src, dst_dir)?;
        let from = src.to_string_lossy();
        let dst = dir_with_separator(dst_dir, '\\');
        let primary = self.runner.execute("move", &["/Y", &*from, &*dst]);
        move_fallback(self, primary, src, dst_dir)
    }

    fn delete(&self, path: &Path) -> CoreResult<()> {
        guard::check_delete(path)?;
        let target = path.to_string_lossy();
        let result = self.runner.execute("del", &["/Q", "/A", &*target]).map(drop);
        // `del` may already have removed everything; a failure here is noise.
        if let Err(e) = self.runner.execute("rd", &["/S", "/Q", &*target]) {
            tracing::debug!(path = %target, error = %e, "ignored rd failure");
        }
        result
    }

    fn list_drives(&self) -> Vec<char> {
        ('A'..='Z')
            .filter(|letter| Path::new(&format!("{letter}:\\")).exists())
            .collect()
    }

    fn spawn_interactive_shell(&self, dir: &Path) -> CoreResult<()> {
        let program = self
            .shell
            .clone()
            .or_else(|| std::env::var("COMSPEC").ok())
            .unwrap_or_else(|| "cmd.exe".to_string());
        run_interactive(&program, &[], dir)
    }
}

/// Picks the implementation for the running host. `shell` overrides the
/// interactive shell program.
pub fn detect_platform(shell: Option<String>) -> Box<dyn Platform> {
    if cfg!(windows) {
        tracing::debug!("using windows platform");
        Box::new(WindowsPlatform::new(ShellRunner::cmd()).with_shell(shell))
    } else {
        tracing::debug!("using posix platform");
        Box::new(PosixPlatform::new(ShellRunner::posix()).with_shell(shell))
    }
}

/// On a failed primary move, retries as copy then delete of the source and
/// reports only the retry's error.
fn move_fallback<P: Platform + ?Sized>(
    platform: &P,
    primary: CoreResult<Vec<String>>,
    src: &Path,
    dst_dir: &Path,
) -> CoreResult<()> {
    match primary {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::info!(src = %src.display(), error = %e, "move failed, retrying as copy and delete");
            platform.copy(src, dst_dir)?;
            platform.delete(src)
        }
    }
}

fn dir_with_separator(dir: &Path, separator: char) -> String {
    let mut out = guard::normalize(dir).to_string_lossy().into_owned();
    if !out.ends_with(separator) {
        out.push(separator);
    }
    out
}

fn run_interactive(program: &str, args: &[&str], dir: &Path) -> CoreResult<()> {
    tracing::info!(shell = program, dir = %dir.display(), "starting interactive shell");
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|e| CoreError::ShellLaunch(format!("Failed to start {program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(CoreError::ShellLaunch(format!("<< Exited shell: {status}")))
    }
}

/// Shell program from a `[shell] program` setting: `"auto"` or empty means
/// the host default.
pub fn shell_override(program: &str) -> Option<String> {
    let program = program.trim();
    if program.is_empty() || program.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(program.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::runner::testing::RecordingRunner;
    use crate::exec::runner::ShellKind;

    fn posix(runner: RecordingRunner) -> PosixPlatform<RecordingRunner> {
        PosixPlatform::new(runner)
    }

    fn windows(runner: RecordingRunner) -> WindowsPlatform<RecordingRunner> {
        WindowsPlatform::new(runner)
    }

    // --- guards run before any process ---

    #[test]
    fn copy_to_root_invokes_nothing() {
        let p = posix(RecordingRunner::new(ShellKind::Posix));
        let err = p.copy(Path::new("/srv/a"), Path::new("/")).unwrap_err();
        assert!(matches!(err, CoreError::SafetyRejection(_)));
        assert!(p.runner().calls().is_empty());
    }

    #[test]
    fn move_to_or_from_root_invokes_nothing() {
        let p = posix(RecordingRunner::new(ShellKind::Posix));
        assert!(matches!(
            p.move_into(Path::new("/srv/a"), Path::new("/tmp/..")),
            Err(CoreError::SafetyRejection(_))
        ));
        assert!(matches!(
            p.move_into(Path::new("/etc"), Path::new("/srv")),
            Err(CoreError::SafetyRejection(_))
        ));
        assert!(p.runner().calls().is_empty());
    }

    #[test]
    fn delete_from_root_invokes_nothing() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd));
        assert!(matches!(
            w.delete(Path::new("/boot")),
            Err(CoreError::SafetyRejection(_))
        ));
        assert!(w.runner().calls().is_empty());
    }

    // --- posix commands ---

    #[test]
    fn posix_copy_uses_recursive_cp() {
        let p = posix(RecordingRunner::new(ShellKind::Posix));
        p.copy(Path::new("/home/u/a"), Path::new("/home/u/b/")).unwrap();
        assert_eq!(
            p.runner().calls(),
            vec!["cp '-R' '/home/u/a' '/home/u/b/' 2>&1"]
        );
    }

    #[test]
    fn posix_move_success_runs_only_mv() {
        let p = posix(RecordingRunner::new(ShellKind::Posix));
        p.move_into(Path::new("/home/u/a"), Path::new("/home/u/b")).unwrap();
        assert_eq!(
            p.runner().calls(),
            vec!["mv '-f' '/home/u/a' '/home/u/b/' 2>&1"]
        );
    }

    #[test]
    fn posix_delete_uses_forced_recursive_rm() {
        let p = posix(RecordingRunner::new(ShellKind::Posix));
        p.delete(Path::new("/home/u/a")).unwrap();
        assert_eq!(p.runner().calls(), vec!["rm '-rf' '/home/u/a' 2>&1"]);
    }

    #[test]
    fn posix_failure_propagates_operation_error() {
        let p = posix(RecordingRunner::new(ShellKind::Posix).then_fail("exit status: 1", "cp: no"));
        let err = p.copy(Path::new("/home/u/a"), Path::new("/home/u/b")).unwrap_err();
        assert_eq!(err.to_string(), "exit status: 1: cp: no");
    }

    // --- move fallback ---

    #[test]
    fn move_falls_back_to_copy_then_delete() {
        let p = posix(
            RecordingRunner::new(ShellKind::Posix)
                .then_fail("exit status: 1", "mv: cross-device")
                .then_succeed()
                .then_succeed(),
        );
        p.move_into(Path::new("/mnt/x/f"), Path::new("/home/u")).unwrap();

        let calls = p.runner().calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("mv "));
        assert!(calls[1].starts_with("cp "));
        assert!(calls[2].starts_with("rm "));
    }

    #[test]
    fn move_fallback_reports_only_delete_error() {
        let p = posix(
            RecordingRunner::new(ShellKind::Posix)
                .then_fail("exit status: 1", "mv failed")
                .then_succeed()
                .then_fail("exit status: 2", "rm failed"),
        );
        let err = p
            .move_into(Path::new("/mnt/x/f"), Path::new("/home/u"))
            .unwrap_err();
        assert_eq!(err.to_string(), "exit status: 2: rm failed");
    }

    #[test]
    fn move_fallback_skips_delete_when_copy_fails() {
        let p = posix(
            RecordingRunner::new(ShellKind::Posix)
                .then_fail("exit status: 1", "mv failed")
                .then_fail("exit status: 1", "cp failed"),
        );
        let err = p
            .move_into(Path::new("/mnt/x/f"), Path::new("/home/u"))
            .unwrap_err();
        assert_eq!(err.to_string(), "exit status: 1: cp failed");
        assert_eq!(p.runner().calls().len(), 2);
    }

    // --- windows commands ---

    #[test]
    fn windows_copy_pipes_answer_into_xcopy() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd));
        w.copy(Path::new("/data/src"), Path::new("/backup")).unwrap();
        let calls = w.runner().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("echo f | xcopy /Q /I /K /H /Y /R /S /E "));
        assert!(calls[0].ends_with("src 2>&1"));
    }

    #[test]
    fn windows_move_uses_move_with_overwrite() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd));
        w.move_into(Path::new("/data/a"), Path::new("/data/b")).unwrap();
        let calls = w.runner().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("move /Y "));
    }

    #[test]
    fn windows_delete_always_runs_rd_and_ignores_its_error() {
        let w = windows(
            RecordingRunner::new(ShellKind::Cmd)
                .then_succeed()
                .then_fail("exit status: 2", "The system cannot find the file specified."),
        );
        w.delete(Path::new("/data/a")).unwrap();

        let calls = w.runner().calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("del /Q /A "));
        assert!(calls[1].starts_with("rd /S /Q "));
    }

    #[test]
    fn windows_delete_reports_del_error_after_rd() {
        let w = windows(
            RecordingRunner::new(ShellKind::Cmd)
                .then_fail("exit status: 1", "Access is denied.")
                .then_succeed(),
        );
        let err = w.delete(Path::new("/data/a")).unwrap_err();
        assert_eq!(err.to_string(), "exit status: 1: Access is denied.");
        assert_eq!(w.runner().calls().len(), 2);
    }

    #[test]
    fn windows_move_fallback_uses_xcopy_then_del() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd).then_fail("exit status: 1", ""));
        w.move_into(Path::new("/data/a"), Path::new("/data/b")).unwrap();
        let calls = w.runner().calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[1].starts_with("echo f | xcopy"));
        assert!(calls[2].starts_with("del "));
        assert!(calls[3].starts_with("rd "));
    }

    #[test]
    fn windows_quotes_names_with_ampersand() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd));
        w.delete(Path::new("/data/R&D")).unwrap();
        w.copy(Path::new("/data/R&D"), Path::new("/backup")).unwrap();
        w.move_into(Path::new("/data/R&D"), Path::new("/backup")).unwrap();

        let calls = w.runner().calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], "del /Q /A \"/data/R&D\" 2>&1");
        assert_eq!(calls[1], "rd /S /Q \"/data/R&D\" 2>&1");
        assert!(calls[2].starts_with("echo f | xcopy /Q /I /K /H /Y /R /S /E \"/data/R&D\" "));
        assert!(calls[2].ends_with("R&D\" 2>&1"));
        assert!(calls[3].starts_with("move /Y \"/data/R&D\" "));
        for call in &calls {
            assert!(!call.contains(" /data/R&D"), "unquoted name in {call}");
        }
    }

    #[test]
    fn windows_escapes_percent_in_names() {
        let w = windows(RecordingRunner::new(ShellKind::Cmd));
        w.delete(Path::new("/data/%USERPROFILE%")).unwrap();
        assert_eq!(
            w.runner().calls()[0],
            "del /Q /A \"/data/\"^%\"USERPROFILE\"^%\"\" 2>&1"
        );
    }

    #[test]
    fn posix_has_no_drives() {
        assert!(posix(RecordingRunner::new(ShellKind::Posix))
            .list_drives()
            .is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn interactive_shell_reports_abnormal_exit() {
        let p = posix(RecordingRunner::new(ShellKind::Posix)).with_shell(Some("false".into()));
        let err = p.spawn_interactive_shell(Path::new("/")).unwrap_err();
        assert!(matches!(err, CoreError::ShellLaunch(_)));
        assert!(err.to_string().starts_with("<< Exited shell"));
    }

    #[test]
    fn interactive_shell_reports_launch_failure() {
        let p = posix(RecordingRunner::new(ShellKind::Posix))
            .with_shell(Some("/no/such/duofm-shell".into()));
        let err = p
            .spawn_interactive_shell(&std::env::temp_dir())
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to start"));
    }

    #[test]
    fn shell_override_parsing() {
        assert_eq!(shell_override("auto"), None);
        assert_eq!(shell_override("  "), None);
        assert_eq!(shell_override("/bin/zsh"), Some("/bin/zsh".to_string()));
    }
}
