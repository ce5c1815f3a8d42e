//! ローカルファイルシステムを使った AssetStore 実装
//!
//! 保存先のファイル名は `<YYYYMMDD_HHMMSS.mmm>_<event-id>_<file-name>`。
//! クライアントから送られたファイル名は最後のパス要素だけを使うため、
//! ベースディレクトリの外に書き込まれることはない。
//! 同名のファイルが既にある場合は上書きせず、拡張子の前に `-1`, `-2`, ... を付ける。

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use lapcast_shared::time::{Clock, to_file_stamp};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::domain::{AssetStore, EventId, StorageError, StoredAsset, UploadedAsset};

/// 同名ファイルを避けるための連番の上限
const MAX_NAME_ATTEMPTS: usize = 100;

/// ローカルディレクトリに添付ファイルを保存する AssetStore
pub struct FileSystemAssetStore {
    base_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileSystemAssetStore {
    pub fn new(base_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_dir: base_dir.into(),
            clock,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 既存ファイルを上書きせずに `<prefix>_<name>` へ書き込み、実際に使ったパスを返す
    async fn write_new_file(
        &self,
        prefix: &str,
        name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let mut attempt = 0;
        loop {
            let path = self
                .base_dir
                .join(format!("{}_{}", prefix, numbered_file_name(name, attempt)));
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            let mut file = match opened {
                Ok(file) => file,
                Err(e)
                    if e.kind() == ErrorKind::AlreadyExists && attempt + 1 < MAX_NAME_ATTEMPTS =>
                {
                    attempt += 1;
                    continue;
                }
                Err(source) => return Err(StorageError::WriteAsset { path, source }),
            };

            let written = async {
                file.write_all(bytes).await?;
                file.flush().await
            }
            .await;
            return match written {
                Ok(()) => Ok(path),
                Err(source) => Err(StorageError::WriteAsset { path, source }),
            };
        }
    }
}

#[async_trait]
impl AssetStore for FileSystemAssetStore {
    async fn persist(
        &self,
        event_id: &EventId,
        assets: Vec<UploadedAsset>,
    ) -> Result<Vec<StoredAsset>, StorageError> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|source| StorageError::PrepareDirectory {
                path: self.base_dir.clone(),
                source,
            })?;

        let mut stored = Vec::with_capacity(assets.len());
        for asset in assets {
            let name = sanitize_file_name(&asset.file_name)?;
            let stamp = to_file_stamp(self.clock.now());
            let prefix = format!("{}_{}", stamp, event_id);
            let path = self.write_new_file(&prefix, &name, &asset.bytes).await?;
            tracing::info!("Saved file to {}", path.display());

            stored.push(StoredAsset {
                path,
                size: asset.bytes.len(),
            });
        }

        Ok(stored)
    }
}

/// クライアント指定のファイル名から最後のパス要素だけを取り出す
///
/// `/` と `\` のどちらも区切りとして扱う。
fn sanitize_file_name(raw: &str) -> Result<String, StorageError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." || name.chars().any(char::is_control) {
        return Err(StorageError::InvalidFileName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// `attempt` が 0 ならそのまま、それ以外は拡張子の前に `-<attempt>` を付ける
///
/// `.bashrc` のような先頭のドットは拡張子として扱わない。
fn numbered_file_name(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!(
            "{}-{}{}",
            &file_name[..dot],
            attempt,
            &file_name[dot..]
        ),
        _ => format!("{}-{}", file_name, attempt),
    }
}
