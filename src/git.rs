//! Git diff acquisition.
//!
//! The reviewer treats diff text as opaque, so this module only shells
//! out to `git show HEAD` and captures its output.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Git is not installed or not in the system's PATH.")]
    NotInstalled,

    #[error("Git command failed: {stderr}")]
    Command { stderr: String },

    #[error("failed to run git: {0}")]
    Io(std::io::Error),
}

/// Return the diff of the last recorded commit (`git show HEAD`).
///
/// Runs in `repo_dir` when given, otherwise in the current directory.
pub async fn show_head(repo_dir: Option<&Path>) -> Result<String, GitError> {
    let mut cmd = Command::new("git");
    cmd.args(["show", "HEAD"]);

    if let Some(dir) = repo_dir {
        cmd.current_dir(dir);
    }

    debug!("Running git show HEAD");

    let output = match cmd.output().await {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GitError::NotInstalled);
        }
        Err(e) => return Err(GitError::Io(e)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::Command { stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_head_outside_a_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = show_head(Some(dir.path())).await.unwrap_err();

        match err {
            // "fatal: not a git repository" on any machine with git,
            // NotInstalled on one without.
            GitError::Command { .. } | GitError::NotInstalled => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GitError::NotInstalled.to_string(),
            "Git is not installed or not in the system's PATH."
        );
        assert_eq!(
            GitError::Command {
                stderr: "fatal: bad revision".to_string()
            }
            .to_string(),
            "Git command failed: fatal: bad revision"
        );
    }
}
