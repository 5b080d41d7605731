use fs2::FileExt;
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::EngineError;

/// Advisory lock file inside the workspace root.
pub const LOCK_FILE: &str = ".fvm.lock";

/// Exclusive hold on a workspace. Mutating operations keep one alive for
/// their whole duration; dropping it releases the lock.
pub struct WorkspaceLock {
    file: File,
}

impl WorkspaceLock {
    /// Block until the workspace at `root` can be locked exclusively.
    pub async fn acquire(root: &Path) -> Result<Self, EngineError> {
        let path = root.join(LOCK_FILE);
        tokio::task::spawn_blocking(move || Self::acquire_blocking(&path))
            .await
            .map_err(|error| {
                EngineError::io("acquiring workspace lock", &std::io::Error::other(error))
            })?
    }

    fn acquire_blocking(path: &Path) -> Result<Self, EngineError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|error| EngineError::io("opening workspace lock", &error))?;

        if let Err(error) = file.try_lock_exclusive() {
            if error.kind() != std::io::ErrorKind::WouldBlock {
                return Err(EngineError::io("acquiring workspace lock", &error));
            }
            warn!(
                "Workspace is locked by another fvm process, waiting ({})",
                path.display()
            );
            file.lock_exclusive()
                .map_err(|error| EngineError::io("acquiring workspace lock", &error))?;
        }

        file.set_len(0)
            .and_then(|()| file.seek(SeekFrom::Start(0)).map(|_| ()))
            .and_then(|()| writeln!(file, "{}", std::process::id()))
            .map_err(|error| EngineError::io("writing workspace lock metadata", &error))?;

        debug!("Acquired workspace lock {}", path.display());
        Ok(Self { file })
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
