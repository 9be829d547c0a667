use crate::keys::ByteSource;
use anyhow::{Context, Result};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::time::Duration;

/// Raw mode plus the alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Terminal size as `(rows, cols)`.
pub fn window_size() -> Result<(usize, usize)> {
    let (cols, rows) = terminal::size().context("Failed to query terminal size")?;
    Ok((usize::from(rows), usize::from(cols)))
}

/// Unbuffered stdin. Reading through `io::Stdin` would pull whole escape
/// sequences into its buffer where `poll` cannot see them.
pub struct TerminalInput {
    file: File,
    escape_timeout: Duration,
}

impl TerminalInput {
    pub fn new(escape_timeout: Duration) -> Result<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .context("Failed to duplicate stdin")?;
        Ok(Self {
            file: File::from(fd),
            escape_timeout,
        })
    }

    fn wait_readable(&self) -> io::Result<bool> {
        let millis = u16::try_from(self.escape_timeout.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(millis)) {
            Ok(ready) => Ok(ready > 0),
            Err(nix::errno::Errno::EINTR) => Ok(false),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }
}

impl ByteSource for TerminalInput {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.file.read(&mut byte) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn read_byte_timeout(&mut self) -> io::Result<Option<u8>> {
        if !self.wait_readable()? {
            return Ok(None);
        }
        self.read_byte().map(Some)
    }
}
