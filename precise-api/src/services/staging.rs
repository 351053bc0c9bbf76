use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::TaggableFile;
use crate::utils::ssh::{RemoteCopy, SshClientConfig};

pub const PRECISE_REMOTE_USER: &str = "precise";
pub const DEFAULT_REMOTE_USER: &str = "mycroft";
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Where audio files are staged and how the primary audio server is reached.
#[derive(Debug, Clone)]
pub struct StagingConfig {
    pub data_dir: PathBuf,
    pub precise_server: String,
    pub precise_ssh_port: u16,
    pub local_user: String,
}

impl StagingConfig {
    pub fn local_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn ssh_config_for(&self, remote_server: &str) -> SshClientConfig {
        let (remote_user, ssh_port) = if remote_server == self.precise_server {
            (PRECISE_REMOTE_USER, self.precise_ssh_port)
        } else {
            (DEFAULT_REMOTE_USER, DEFAULT_SSH_PORT)
        };

        SshClientConfig {
            local_user: self.local_user.clone(),
            remote_server: remote_server.to_string(),
            remote_user: remote_user.to_string(),
            ssh_port,
        }
    }
}

/// Copies audio files selected for tagging into the local data directory.
pub struct AudioFileStager<'a, C: RemoteCopy + ?Sized> {
    config: &'a StagingConfig,
    remote_copy: &'a C,
}

impl<'a, C: RemoteCopy + ?Sized> AudioFileStager<'a, C> {
    pub fn new(config: &'a StagingConfig, remote_copy: &'a C) -> Self {
        AudioFileStager {
            config,
            remote_copy,
        }
    }

    /// Ensures the file is present locally and returns its path.
    ///
    /// A file already on disk, or placed there by a concurrent request while
    /// this one was downloading, is left untouched.
    pub async fn stage(&self, file: &TaggableFile) -> AppResult<PathBuf> {
        let local_path = self.config.local_path(&file.name);
        if file_exists(&local_path).await? {
            tracing::debug!("Audio file {} already staged", local_path.display());
            return Ok(local_path);
        }

        let ssh_config = self.config.ssh_config_for(&file.location.server);
        let remote_path = file.remote_path();
        let partial_path = self
            .config
            .data_dir
            .join(format!(".{}.{}.part", file.name, Uuid::new_v4()));

        tracing::info!(
            "Copying {}@{}:{} to {}",
            ssh_config.remote_user,
            ssh_config.remote_server,
            remote_path.display(),
            local_path.display()
        );

        if let Err(e) = self
            .remote_copy
            .get_remote_file(&ssh_config, &remote_path, &partial_path)
            .await
        {
            remove_if_present(&partial_path).await;
            return Err(e);
        }

        if file_exists(&local_path).await? {
            // Another request finished first
            remove_if_present(&partial_path).await;
        } else {
            tokio::fs::rename(&partial_path, &local_path).await?;
        }

        Ok(local_path)
    }
}

async fn file_exists(path: &Path) -> AppResult<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

async fn remove_if_present(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::wake_word_file::FileLocation;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Writes a fixed payload and records every call.
    #[derive(Default)]
    struct RecordingCopy {
        calls: Mutex<Vec<(SshClientConfig, PathBuf)>>,
        race_target: Option<PathBuf>,
        fail: bool,
    }

    #[async_trait]
    impl RemoteCopy for RecordingCopy {
        async fn get_remote_file(
            &self,
            ssh_config: &SshClientConfig,
            remote_path: &Path,
            local_path: &Path,
        ) -> AppResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((ssh_config.clone(), remote_path.to_path_buf()));
            if self.fail {
                return Err(AppError::RemoteCopy("connection refused".to_string()));
            }
            tokio::fs::write(local_path, b"RIFF").await?;
            if let Some(target) = &self.race_target {
                tokio::fs::write(target, b"winner").await?;
            }
            Ok(())
        }
    }

    fn staging_config(data_dir: &Path) -> StagingConfig {
        StagingConfig {
            data_dir: data_dir.to_path_buf(),
            precise_server: "10.0.0.1".to_string(),
            precise_ssh_port: 2222,
            local_user: "selene".to_string(),
        }
    }

    fn file_on(server: &str) -> TaggableFile {
        TaggableFile {
            id: "file-1".to_string(),
            name: "hey-mycroft-1.wav".to_string(),
            location: FileLocation {
                server: server.to_string(),
                directory: "/opt/precise/wake-word".to_string(),
            },
            designations: vec![None],
        }
    }

    #[actix_web::test]
    async fn test_stage_twice_fetches_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = staging_config(dir.path());
        let remote_copy = RecordingCopy::default();
        let stager = AudioFileStager::new(&config, &remote_copy);
        let file = file_on("10.0.0.1");

        let first = stager.stage(&file).await.unwrap();
        let second = stager.stage(&file).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("hey-mycroft-1.wav"));
        assert_eq!(std::fs::read(&first).unwrap(), b"RIFF");
        assert_eq!(remote_copy.calls.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_primary_server_uses_precise_account() {
        let dir = tempfile::tempdir().unwrap();
        let config = staging_config(dir.path());
        let remote_copy = RecordingCopy::default();
        let stager = AudioFileStager::new(&config, &remote_copy);

        stager.stage(&file_on("10.0.0.1")).await.unwrap();

        let calls = remote_copy.calls.lock().unwrap();
        let (ssh_config, remote_path) = &calls[0];
        assert_eq!(ssh_config.remote_user, "precise");
        assert_eq!(ssh_config.ssh_port, 2222);
        assert_eq!(ssh_config.local_user, "selene");
        assert_eq!(
            remote_path,
            &PathBuf::from("/opt/precise/wake-word/hey-mycroft-1.wav")
        );
    }

    #[test]
    fn test_other_servers_use_fallback_account() {
        let config = staging_config(Path::new("/tmp"));
        let ssh_config = config.ssh_config_for("192.168.1.20");

        assert_eq!(ssh_config.remote_user, "mycroft");
        assert_eq!(ssh_config.ssh_port, 22);
        assert_eq!(ssh_config.remote_server, "192.168.1.20");
    }

    #[actix_web::test]
    async fn test_concurrently_staged_file_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = staging_config(dir.path());
        let target = dir.path().join("hey-mycroft-1.wav");
        let remote_copy = RecordingCopy {
            race_target: Some(target.clone()),
            ..Default::default()
        };
        let stager = AudioFileStager::new(&config, &remote_copy);

        let staged = stager.stage(&file_on("10.0.0.1")).await.unwrap();

        assert_eq!(staged, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"winner");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[actix_web::test]
    async fn test_remote_copy_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let config = staging_config(dir.path());
        let remote_copy = RecordingCopy {
            fail: true,
            ..Default::default()
        };
        let stager = AudioFileStager::new(&config, &remote_copy);

        let result = stager.stage(&file_on("10.0.0.1")).await;

        assert!(matches!(result, Err(AppError::RemoteCopy(_))));
        assert!(!dir.path().join("hey-mycroft-1.wav").exists());
    }
}
