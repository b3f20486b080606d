use std::path::{Path, PathBuf};

use crate::{error::CredentialError, types::Credential};

/// Reads and writes the credential file.
///
/// The whole file is one JSON document `{client_id, token}`; every write
/// replaces it completely.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the credential file.
    ///
    /// # Returns
    ///
    /// The stored credential. A file without a `token` field loads with
    /// `token: None`.
    ///
    /// # Errors
    ///
    /// [`CredentialError::Io`] when the file is missing or unreadable,
    /// [`CredentialError::Serde`] when it is not a valid credential document.
    pub async fn load(&self) -> Result<Credential, CredentialError> {
        let content = async_fs::read_to_string(&self.path).await?;
        let credential = serde_json::from_str(&content)?;
        Ok(credential)
    }

    /// Like [`load`](Self::load), but a missing or unreadable file yields an
    /// empty credential so the caller falls back to authorization.
    pub async fn load_or_default(&self) -> Credential {
        self.load().await.unwrap_or_default()
    }

    /// Writes `credential` as pretty JSON, creating missing parent
    /// directories. On Unix the file is restricted to mode 0600.
    pub async fn persist(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        async_fs::write(&self.path, json).await?;
        restrict_permissions(&self.path).await?;
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;

    async_fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}
