// ~/src/desktop.rs

use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

/// External wallpaper get/set collaborator. The OS side is fallible and
/// occasionally slow, so every call is bounded by a timeout.
pub trait Desktop {
    fn current_wallpaper(&self) -> Result<PathBuf, DesktopError>;
    fn set_wallpaper(&self, image: &Path) -> Result<(), DesktopError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    #[error("osascript process error: {0}")]
    Process(#[source] std::io::Error),
    #[error("osascript failed ({status}): {stderr}")]
    Command { status: String, stderr: String },
    #[error("osascript did not finish within {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("Finder reported no desktop picture")]
    EmptyReply,
}

/// Finder-backed implementation driven through `osascript`.
pub struct FinderDesktop {
    timeout: Duration,
}

impl FinderDesktop {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn run_script(&self, script: &str) -> Result<String, DesktopError> {
        let mut child = Command::new("osascript")
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(DesktopError::Process)?;

        let status = wait_bounded(&mut child, self.timeout)?;

        let mut stdout = String::new();
        if let Some(mut pipe) = child.stdout.take() {
            let _ = pipe.read_to_string(&mut stdout);
        }

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(DesktopError::Command {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout.trim().to_string())
    }
}

/// Poll the child in short steps so a wedged script cannot block the
/// caller past the deadline. Runs during shutdown too.
fn wait_bounded(child: &mut Child, timeout: Duration) -> Result<ExitStatus, DesktopError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => return Err(DesktopError::Process(e)),
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DesktopError::TimedOut {
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        thread::sleep(Duration::from_millis(25));
    }
}

impl Desktop for FinderDesktop {
    fn current_wallpaper(&self) -> Result<PathBuf, DesktopError> {
        let reply = self.run_script(
            "tell application \"Finder\" to get POSIX path of (get desktop picture as alias)",
        )?;
        if reply.is_empty() {
            return Err(DesktopError::EmptyReply);
        }
        Ok(PathBuf::from(reply))
    }

    fn set_wallpaper(&self, image: &Path) -> Result<(), DesktopError> {
        let script = format!(
            "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
            image.display()
        );
        self.run_script(&script).map(|_| ())
    }
}

#[cfg(test)]
pub mod testing {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;

    /// Records every `set_wallpaper` call; `current_wallpaper` replays a
    /// fixed answer or fails like an unavailable display server. The
    /// fail handle flips `set_wallpaper` into failure mode mid-test.
    pub struct RecordingDesktop {
        current: Option<PathBuf>,
        fail_set: Rc<Cell<bool>>,
        sets: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl RecordingDesktop {
        pub fn new(current: Option<PathBuf>) -> (Self, Rc<RefCell<Vec<PathBuf>>>) {
            let sets = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    current,
                    fail_set: Rc::new(Cell::new(false)),
                    sets: Rc::clone(&sets),
                },
                sets,
            )
        }

        pub fn fail_handle(&self) -> Rc<Cell<bool>> {
            Rc::clone(&self.fail_set)
        }
    }

    impl Desktop for RecordingDesktop {
        fn current_wallpaper(&self) -> Result<PathBuf, DesktopError> {
            self.current.clone().ok_or(DesktopError::EmptyReply)
        }

        fn set_wallpaper(&self, image: &Path) -> Result<(), DesktopError> {
            if self.fail_set.get() {
                return Err(DesktopError::Command {
                    status: "exit status: 1".to_string(),
                    stderr: "display server unavailable".to_string(),
                });
            }
            self.sets.borrow_mut().push(image.to_path_buf());
            Ok(())
        }
    }
}
