//! # Config 模块
//!
//! Host 侧的配置加载：文件缺失、无法解析或未通过校验时降级为默认配置。

use std::path::Path;

use tracing::{info, warn};

use page_runtime::PageConfig;

/// 加载页面配置，失败时记录警告并返回默认配置
pub fn load_page_config(path: &Path) -> PageConfig {
    let config = match PageConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "配置加载失败，使用默认配置");
            return PageConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        warn!(path = %path.display(), error = %e, "配置校验失败，使用默认配置");
        return PageConfig::default();
    }

    info!(path = %path.display(), "配置已加载");
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_page_config(&dir.path().join("page.json"));
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"{ "particles": { "count": 5, "seed": 9 } }"#).unwrap();

        let config = load_page_config(&path);
        assert_eq!(config.particles.count, 5);
        assert_eq!(config.particles.seed, Some(9));
        assert_eq!(config.particles.delay_ms, 1000);
        assert_eq!(config.navigation.anchor_offset, 80.0);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_page_config(&path), PageConfig::default());

        fs::write(&path, r#"{ "counter": { "speed": 0 } }"#).unwrap();
        assert_eq!(load_page_config(&path), PageConfig::default());
    }
}
