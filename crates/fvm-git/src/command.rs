use fvm_backend::BackendError;
use log::{debug, error, trace};
use std::process::Stdio;
use tokio::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Child processes never read from the terminal and never open a console
/// window of their own.
pub(crate) trait NonInteractive {
    fn non_interactive(&mut self) -> &mut Self;
}

impl NonInteractive for Command {
    #[cfg(windows)]
    fn non_interactive(&mut self) -> &mut Self {
        self.stdin(Stdio::null()).creation_flags(CREATE_NO_WINDOW)
    }

    #[cfg(not(windows))]
    fn non_interactive(&mut self) -> &mut Self {
        self.stdin(Stdio::null())
    }
}

/// Run `cmd` to completion and return its stdout. `label` is how the command
/// shows up in logs and errors.
pub(crate) async fn execute(mut cmd: Command, label: &str) -> Result<String, BackendError> {
    debug!("Executing {label}");

    let output = cmd.non_interactive().output().await?;

    debug!("{label} exit status: {:?}", output.status);
    trace!("{label} stdout: {}", String::from_utf8_lossy(&output.stdout));
    if !output.stderr.is_empty() {
        trace!("{label} stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!("{label} failed: {stderr}");
        Err(BackendError::command_failed(label, stderr))
    }
}
