//! 添付ファイル保存の実装
//!
//! - `filesystem`: ローカルディレクトリへの保存

pub mod filesystem;

pub use filesystem::FileSystemAssetStore;
