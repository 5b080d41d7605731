use log::debug;
use std::io;
use std::path::{Path, PathBuf};

fn staging_path(link: &Path) -> PathBuf {
    let mut name = link
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!(".fvm-staging-{}", std::process::id()));
    link.with_file_name(name)
}

fn not_a_link(link: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "{} is a real directory, not a link; move it aside first",
            link.display()
        ),
    )
}

#[cfg(unix)]
async fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink_dir(target, link).await
}

#[cfg(unix)]
async fn remove_dir_link(link: &Path) -> io::Result<()> {
    tokio::fs::remove_file(link).await
}

#[cfg(windows)]
async fn remove_dir_link(link: &Path) -> io::Result<()> {
    // Directory symlinks are directories to the Win32 API.
    match tokio::fs::remove_dir(link).await {
        Ok(()) => Ok(()),
        Err(_) => tokio::fs::remove_file(link).await,
    }
}

#[cfg(unix)]
async fn move_into_place(staging: &Path, link: &Path) -> io::Result<()> {
    // rename(2) swaps the link atomically.
    tokio::fs::rename(staging, link).await
}

#[cfg(windows)]
async fn move_into_place(staging: &Path, link: &Path) -> io::Result<()> {
    if tokio::fs::symlink_metadata(link).await.is_ok() {
        remove_dir_link(link).await?;
    }
    tokio::fs::rename(staging, link).await
}

/// Point `link` at `target`, replacing whatever link was there before.
///
/// The replacement is created next to `link` first and then moved over it.
/// A real directory at `link` is never deleted.
pub(crate) async fn replace_link(link: &Path, target: &Path) -> io::Result<()> {
    match tokio::fs::symlink_metadata(link).await {
        Ok(metadata) if metadata.is_dir() => return Err(not_a_link(link)),
        Ok(_) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }

    if let Some(parent) = link.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(link);
    if tokio::fs::symlink_metadata(&staging).await.is_ok() {
        remove_dir_link(&staging).await?;
    }

    debug!(
        "Linking {} -> {} via {}",
        link.display(),
        target.display(),
        staging.display()
    );
    create_dir_link(target, &staging).await?;

    if let Err(error) = move_into_place(&staging, link).await {
        let _ = remove_dir_link(&staging).await;
        return Err(error);
    }
    Ok(())
}

/// Remove `link` without touching what it points to. A missing link is fine.
pub(crate) async fn release_link(link: &Path) -> io::Result<()> {
    match tokio::fs::symlink_metadata(link).await {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            debug!("Releasing active link {}", link.display());
            remove_dir_link(link).await
        }
        Ok(metadata) if metadata.is_dir() => Err(not_a_link(link)),
        Ok(_) => tokio::fs::remove_file(link).await,
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error),
    }
}
