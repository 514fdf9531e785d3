use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use lingo_core::{LingoError, Result};
use lingo_runtime::{EXAMPLES_FD, Player, TerminalPlayer};

use super::CommonArgs;

/// Interactive listening practice on the terminal
///
/// Records are read from file descriptor 3 unless --file is given.
#[derive(Parser, Debug)]
#[command(name = "lang-listening-ui", version, about, long_about = None)]
pub struct ListenCli {
    #[command(flatten)]
    common: CommonArgs,

    /// Read records from this file instead of fd 3
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Extra arguments for the speech command
    #[arg(last = true)]
    speech_args: Vec<String>,
}

impl ListenCli {
    /// Check the record stream, then start the async runtime and play it.
    ///
    /// fd 3 is inspected first: once the runtime is up its own descriptors
    /// take the lowest free numbers, and an unused fd 3 would look open.
    pub fn run_blocking(self) -> Result<i32> {
        let path = self.stream_path(fd_is_open)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(path))
    }

    async fn run(self, path: PathBuf) -> Result<i32> {
        let config = self.common.init()?;
        debug!(?path, "playing example stream");
        TerminalPlayer::new(config.playback.speech_command)
            .play(&path, &self.speech_args)
            .await
    }

    fn stream_path(&self, fd_open: impl Fn(i32) -> bool) -> Result<PathBuf> {
        match &self.file {
            Some(file) if file.exists() => Ok(file.clone()),
            Some(file) => Err(LingoError::Usage(format!(
                "no example stream at {}",
                file.display()
            ))),
            None if fd_open(EXAMPLES_FD) => Ok(PathBuf::from(format!("/dev/fd/{EXAMPLES_FD}"))),
            None => Err(LingoError::Usage(format!(
                "fd {EXAMPLES_FD} is not open, pass --file or redirect it (e.g. {EXAMPLES_FD}< examples.jsonl)"
            ))),
        }
    }
}

/// Whether `fd` is an open descriptor of this process.
pub fn fd_is_open(fd: i32) -> bool {
    // SAFETY: F_GETFD only reads the descriptor flags.
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_speech_args() {
        let cli = ListenCli::try_parse_from(["lang-listening-ui", "--file", "ex.jsonl", "--", "-v", "id"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("ex.jsonl")));
        assert_eq!(cli.speech_args, vec!["-v", "id"]);
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        let cli = ListenCli::try_parse_from(["lang-listening-ui", "--file", "/nonexistent/ex.jsonl"]).unwrap();
        assert!(cli.stream_path(|_| true).unwrap_err().is_usage());
    }

    #[test]
    fn test_default_stream_is_fd3() {
        let cli = ListenCli::try_parse_from(["lang-listening-ui"]).unwrap();
        assert_eq!(cli.stream_path(|fd| fd == 3).unwrap(), PathBuf::from("/dev/fd/3"));
    }

    #[test]
    fn test_closed_fd3_is_usage_error() {
        let cli = ListenCli::try_parse_from(["lang-listening-ui"]).unwrap();
        let err = cli.stream_path(|_| false).unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains("fd 3 is not open"));
    }

    #[test]
    fn test_fd_is_open() {
        use std::os::fd::AsRawFd;

        let file = tempfile::tempfile().unwrap();
        assert!(fd_is_open(file.as_raw_fd()));
        assert!(!fd_is_open(-1));
    }

    #[test]
    fn test_existing_file_is_used() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().display().to_string();
        let cli = ListenCli::try_parse_from(["lang-listening-ui", "-f", &path]).unwrap();
        assert_eq!(cli.stream_path(|_| false).unwrap(), file.path());
    }
}
