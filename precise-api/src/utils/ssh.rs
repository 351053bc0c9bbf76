use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{AppError, AppResult};

/// Credentials for one secure-copy connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshClientConfig {
    pub local_user: String,
    pub remote_server: String,
    pub remote_user: String,
    pub ssh_port: u16,
}

impl SshClientConfig {
    fn identity_file(&self) -> PathBuf {
        let home = if self.local_user == "root" {
            PathBuf::from("/root")
        } else {
            PathBuf::from("/home").join(&self.local_user)
        };
        home.join(".ssh").join("id_rsa")
    }
}

/// Fetches a file from a remote host onto local disk.
#[async_trait]
pub trait RemoteCopy: Send + Sync {
    async fn get_remote_file(
        &self,
        ssh_config: &SshClientConfig,
        remote_path: &Path,
        local_path: &Path,
    ) -> AppResult<()>;
}

/// `RemoteCopy` backed by the system `scp` binary.
#[derive(Debug, Clone, Default)]
pub struct ScpClient;

impl ScpClient {
    fn build_command(
        ssh_config: &SshClientConfig,
        remote_path: &Path,
        local_path: &Path,
    ) -> Command {
        let mut command = Command::new("scp");
        command
            .arg("-q")
            .arg("-B") // never prompt for a password
            .arg("-P")
            .arg(ssh_config.ssh_port.to_string())
            .arg("-o")
            .arg("StrictHostKeyChecking=accept-new");

        let identity_file = ssh_config.identity_file();
        if identity_file.exists() {
            command.arg("-i").arg(identity_file);
        }

        command
            .arg(format!(
                "{}@{}:{}",
                ssh_config.remote_user,
                ssh_config.remote_server,
                remote_path.display()
            ))
            .arg(local_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        command
    }
}

#[async_trait]
impl RemoteCopy for ScpClient {
    async fn get_remote_file(
        &self,
        ssh_config: &SshClientConfig,
        remote_path: &Path,
        local_path: &Path,
    ) -> AppResult<()> {
        let mut command = Self::build_command(ssh_config, remote_path, local_path);
        tracing::debug!("scp command: {:?}", command);

        let output = command
            .output()
            .await
            .map_err(|e| AppError::RemoteCopy(format!("Failed to spawn scp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::RemoteCopy(format!(
                "scp {}@{}:{} exited with {}: {}",
                ssh_config.remote_user,
                ssh_config.remote_server,
                remote_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scp_command_arguments() {
        let ssh_config = SshClientConfig {
            local_user: "nobody-here".to_string(),
            remote_server: "10.0.0.5".to_string(),
            remote_user: "precise".to_string(),
            ssh_port: 2222,
        };
        let command = ScpClient::build_command(
            &ssh_config,
            Path::new("/opt/audio/sample.wav"),
            Path::new("/tmp/sample.wav"),
        );

        let args: Vec<String> = command
            .as_std()
            .get_args()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect();

        assert_eq!(command.as_std().get_program(), "scp");
        assert!(args.windows(2).any(|pair| pair == ["-P", "2222"]));
        assert!(!args.iter().any(|arg| arg == "-i"));
        assert_eq!(
            args[args.len() - 2],
            "precise@10.0.0.5:/opt/audio/sample.wav"
        );
        assert_eq!(args[args.len() - 1], "/tmp/sample.wav");
    }

    #[test]
    fn test_identity_file_location() {
        let mut ssh_config = SshClientConfig {
            local_user: "selene".to_string(),
            remote_server: "host".to_string(),
            remote_user: "mycroft".to_string(),
            ssh_port: 22,
        };
        assert_eq!(
            ssh_config.identity_file(),
            PathBuf::from("/home/selene/.ssh/id_rsa")
        );

        ssh_config.local_user = "root".to_string();
        assert_eq!(ssh_config.identity_file(), PathBuf::from("/root/.ssh/id_rsa"));
    }
}
