//! 源码文件系统
//!
//! 宿主只需要读文件和判断文件是否存在两个操作：
//! - `MemoryFs`：内存实现，用于测试和嵌入场景
//! - `NativeFs`：包装 `std::fs`

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use circdep_core::path::lexical_clean;
use thiserror::Error;

/// 文件系统操作结果
pub type FsResult<T> = Result<T, FsError>;

/// 文件系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FsError {
    #[error("Path not found: {path}")]
    NotFound { path: String },

    #[error("Invalid UTF-8 in '{path}'")]
    InvalidUtf8 { path: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::Io {
            message: err.to_string(),
        }
    }
}

/// 源码文件系统
pub trait SourceFs: Send + Sync {
    /// 读取文件内容
    fn read_file(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// 路径是否是已存在的文件
    fn is_file(&self, path: &Path) -> bool;

    /// 以 UTF-8 文本读取文件
    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|_| FsError::InvalidUtf8 {
            path: path.display().to_string(),
        })
    }
}

/// 内存文件系统
///
/// 路径先做词法清理再以 `/` 分隔的字符串为键，克隆共享同一份数据。
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用 (路径, 内容) 预先填充
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.write_file(path.as_ref(), content.as_ref());
        }
        fs
    }

    /// 写入（或覆盖）文件
    pub fn write_file(&self, path: &Path, content: &[u8]) {
        let key = Self::key(path);
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        files.insert(key, content.to_vec());
    }

    /// 文件数
    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(path: &Path) -> String {
        lexical_clean(path).to_string_lossy().replace('\\', "/")
    }
}

impl SourceFs for MemoryFs {
    fn read_file(&self, path: &Path) -> FsResult<Vec<u8>> {
        let key = Self::key(path);
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        files.get(&key).cloned().ok_or(FsError::NotFound { path: key })
    }

    fn is_file(&self, path: &Path) -> bool {
        let key = Self::key(path);
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }
}

/// 本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    pub fn new() -> Self {
        Self
    }
}

impl SourceFs for NativeFs {
    fn read_file(&self, path: &Path) -> FsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FsError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                e.into()
            }
        })
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
