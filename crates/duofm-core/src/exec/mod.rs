//! External command execution.
//!
//! File operations are carried out by the host's own utilities, run one at a
//! time through the default shell ([`runner`]), behind lexical root-folder
//! guards ([`guard`]). [`platform`] selects the utilities per host family.

pub mod guard;
pub mod platform;
pub mod runner;

pub use platform::{detect_platform, shell_override, Platform, PosixPlatform, WindowsPlatform};
pub use runner::{ProcessRunner, ShellKind, ShellRunner};
