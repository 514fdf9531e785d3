use async_trait::async_trait;
use std::path::Path;
use std::process::ExitStatus;
use tracing::debug;

use lingo_core::{LingoError, Result};

/// File descriptor an external player reads the record stream from.
pub const EXAMPLES_FD: i32 = 3;

/// Environment variable carrying the path of the record stream.
pub const EXAMPLES_FILE_ENV: &str = "LINGO_EXAMPLES_FILE";

/// Presents a stream of JSON Lines records to the user.
#[async_trait]
pub trait Player: Send + Sync {
    fn name(&self) -> &str;

    /// Play the records in `records` and return the exit status to forward.
    async fn play(&self, records: &Path, args: &[String]) -> Result<i32>;
}

/// Runs an external player as `<command...> <args...>` with the records on fd 3.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| LingoError::Config("playback command is empty".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Player for CommandPlayer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn play(&self, records: &Path, args: &[String]) -> Result<i32> {
        let file = std::fs::File::open(records)?;

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).args(args).env(EXAMPLES_FILE_ENV, records);
        #[cfg(unix)]
        attach_examples_fd(&mut cmd, &file);

        debug!(program = %self.program, ?records, "starting player");
        let status = cmd
            .spawn()
            .map_err(|e| LingoError::Playback(format!("cannot start {}: {}", self.program, e)))?
            .wait()
            .await?;
        // The child has its own copy of the descriptor; ours can go now.
        drop(file);

        debug!(%status, "player exited");
        Ok(exit_code(status))
    }
}

#[cfg(unix)]
fn attach_examples_fd(cmd: &mut tokio::process::Command, file: &std::fs::File) {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();
    // SAFETY: the closure only calls async-signal-safe libc functions on
    // descriptors, between fork and exec.
    unsafe {
        cmd.pre_exec(move || {
            if fd == EXAMPLES_FD {
                // dup2 onto itself keeps close-on-exec; clear it by hand.
                let flags = libc::fcntl(fd, libc::F_GETFD);
                if flags == -1 || libc::fcntl(fd, libc::F_SETFD, flags & !libc::FD_CLOEXEC) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
            } else if libc::dup2(fd, EXAMPLES_FD) == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Exit code to forward for a finished child: its own code, or 128 + signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
