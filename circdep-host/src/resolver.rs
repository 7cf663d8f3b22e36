//! 模块说明符解析
//!
//! # 解析规则
//! - `./a`、`../lib/a`：相对请求方所在目录（入口相对项目根目录）
//! - `/abs/a`：原样使用
//! - `pkg`：依次查找 `<root>/<vendor_dir>/pkg`
//!
//! 每个基础路径先试字面路径，再依次试追加各扩展名后的路径，
//! 第一个存在的文件胜出。

use std::path::{Path, PathBuf};
use std::rc::Rc;

use circdep_config::DetectorConfig;
use circdep_core::path::{is_relative_specifier, lexical_clean};
use circdep_core::LoadError;
use tracing::trace;

use crate::fs::SourceFs;

const TARGET: &str = "circdep::host";

/// 说明符解析器
pub struct Resolver {
    fs: Rc<dyn SourceFs>,
    root: PathBuf,
    extensions: Vec<String>,
    vendor_dirs: Vec<String>,
}

impl Resolver {
    /// 创建解析器
    ///
    /// `config.root` 为空时使用进程工作目录。
    pub fn new(fs: Rc<dyn SourceFs>, config: &DetectorConfig) -> Self {
        Self {
            fs,
            root: lexical_clean(&config.effective_root()),
            extensions: config.extensions.clone(),
            vendor_dirs: config.vendor_dirs.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 解析说明符为绝对文件路径
    ///
    /// # Errors
    /// 所有候选都不存在时返回 `LoadError::NotFound`，附带尝试过的路径。
    pub fn resolve(&self, specifier: &str, requester: Option<&Path>) -> Result<PathBuf, LoadError> {
        let mut tried = Vec::new();
        for base in self.bases(specifier, requester) {
            for candidate in self.candidates(&base) {
                if self.fs.is_file(&candidate) {
                    trace!(target: TARGET, specifier, resolved = %candidate.display(), "resolved");
                    return Ok(candidate);
                }
                tried.push(candidate);
            }
        }
        Err(LoadError::NotFound {
            specifier: specifier.to_string(),
            tried,
        })
    }

    fn bases(&self, specifier: &str, requester: Option<&Path>) -> Vec<PathBuf> {
        if is_relative_specifier(specifier) {
            let dir = requester.and_then(Path::parent).unwrap_or(self.root.as_path());
            return vec![lexical_clean(&dir.join(specifier))];
        }
        if Path::new(specifier).is_absolute() {
            return vec![lexical_clean(Path::new(specifier))];
        }
        self.vendor_dirs
            .iter()
            .map(|dir| lexical_clean(&self.root.join(dir).join(specifier)))
            .collect()
    }

    fn candidates(&self, base: &Path) -> Vec<PathBuf> {
        let mut out = vec![base.to_path_buf()];
        for ext in &self.extensions {
            let mut with_ext = base.as_os_str().to_os_string();
            with_ext.push(ext);
            out.push(PathBuf::from(with_ext));
        }
        out
    }
}
