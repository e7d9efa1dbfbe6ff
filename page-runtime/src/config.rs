//! # Config 模块
//!
//! 页面交互参数，集中管理所有阈值、偏移和时序。
//!
//! ## 配置优先级
//!
//! 1. Host 显式传入（如 CLI 的 `--seed`）
//! 2. 配置文件 (page.json)
//! 3. 默认值（最低）
//!
//! 所有字段都有默认值，空 JSON 对象即为默认配置。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::ObserverOptions;

/// 定时器延迟上限（浏览器 `setTimeout` 可接受的最大值）
pub const MAX_TIMER_DELAY_MS: u64 = i32::MAX as u64;

/// 页面配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageConfig {
    /// 导航栏配置
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// 入场动画配置
    #[serde(default)]
    pub entrance: EntranceConfig,

    /// 计数器配置
    #[serde(default)]
    pub counter: CounterConfig,

    /// 视差配置
    #[serde(default)]
    pub parallax: ParallaxConfig,

    /// 粒子配置
    #[serde(default)]
    pub particles: ParticleConfig,

    /// Hero 依次显示配置
    #[serde(default)]
    pub reveal: RevealConfig,
}

/// 导航栏配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// 导航栏切换为不透明样式的滚动阈值（像素）
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,

    /// 平滑滚动时为固定导航栏预留的高度（像素）
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset: f64,
}

/// 入场动画配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    #[serde(default = "default_entrance_threshold")]
    pub threshold: f64,

    /// 根区域底边收缩量，使 section 在到达视口底边之前触发
    #[serde(default = "default_entrance_margin")]
    pub root_margin_bottom: f64,

    /// 隐藏状态的纵向偏移（像素）
    #[serde(default = "default_entrance_offset")]
    pub hidden_offset: f64,

    /// CSS transition 值
    #[serde(default = "default_entrance_transition")]
    pub transition: String,
}

/// 计数器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_threshold")]
    pub threshold: f64,

    /// 目标值被分成的步数，每步增量为 `ceil(target / speed)`
    #[serde(default = "default_counter_speed")]
    pub speed: u32,

    /// 相邻两步之间的定时器延迟（毫秒）
    #[serde(default = "default_counter_tick_ms")]
    pub tick_ms: u64,
}

/// 视差配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxConfig {
    /// 背景元素位移 = rate × 滚动偏移
    #[serde(default = "default_parallax_rate")]
    pub rate: f64,
}

/// 粒子配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    #[serde(default = "default_particle_count")]
    pub count: usize,

    /// 启动后延迟多久生成粒子（毫秒）
    #[serde(default = "default_particle_delay_ms")]
    pub delay_ms: u64,

    /// 随机种子，未设置时使用系统熵
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Hero 依次显示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 相邻两个 hero 元素之间的间隔（毫秒），第 n 个在 n × stagger 时显示
    #[serde(default = "default_reveal_stagger_ms")]
    pub stagger_ms: u64,
}

// 默认值函数
fn default_scroll_threshold() -> f64 {
    100.0
}

fn default_anchor_offset() -> f64 {
    80.0
}

fn default_entrance_threshold() -> f64 {
    0.1
}

fn default_entrance_margin() -> f64 {
    50.0
}

fn default_entrance_offset() -> f64 {
    30.0
}

fn default_entrance_transition() -> String {
    "all 0.6s ease-out".to_string()
}

fn default_counter_threshold() -> f64 {
    0.5
}

fn default_counter_speed() -> u32 {
    200
}

fn default_counter_tick_ms() -> u64 {
    1
}

fn default_parallax_rate() -> f64 {
    -0.5
}

fn default_particle_count() -> usize {
    20
}

fn default_particle_delay_ms() -> u64 {
    1000
}

fn default_reveal_stagger_ms() -> u64 {
    300
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: default_scroll_threshold(),
            anchor_offset: default_anchor_offset(),
        }
    }
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            threshold: default_entrance_threshold(),
            root_margin_bottom: default_entrance_margin(),
            hidden_offset: default_entrance_offset(),
            transition: default_entrance_transition(),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            threshold: default_counter_threshold(),
            speed: default_counter_speed(),
            tick_ms: default_counter_tick_ms(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            rate: default_parallax_rate(),
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: default_particle_count(),
            delay_ms: default_particle_delay_ms(),
            seed: None,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_reveal_stagger_ms(),
        }
    }
}

impl EntranceConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin_bottom: self.root_margin_bottom,
        }
    }
}

impl CounterConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin_bottom: 0.0,
        }
    }
}

impl PageConfig {
    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置；读取或解析失败返回错误，由 Host 决定是否降级。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, threshold) in [
            ("entrance.threshold", self.entrance.threshold),
            ("counter.threshold", self.counter.threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name} 必须在 0.0 - 1.0 之间"
                )));
            }
        }

        if self.counter.speed == 0 {
            return Err(ConfigError::ValidationFailed(
                "counter.speed 必须大于 0".to_string(),
            ));
        }

        if self.navigation.scroll_threshold < 0.0 || self.navigation.anchor_offset < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "navigation 的阈值和偏移不能为负数".to_string(),
            ));
        }

        for (name, delay) in [
            ("counter.tick_ms", self.counter.tick_ms),
            ("particles.delay_ms", self.particles.delay_ms),
            ("reveal.stagger_ms", self.reveal.stagger_ms),
        ] {
            if delay > MAX_TIMER_DELAY_MS {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name} 不能超过 {MAX_TIMER_DELAY_MS}ms"
                )));
            }
        }

        if self.entrance.root_margin_bottom < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "entrance.root_margin_bottom 不能为负数".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PageConfig::default();
        assert_eq!(config.navigation.scroll_threshold, 100.0);
        assert_eq!(config.navigation.anchor_offset, 80.0);
        assert_eq!(config.counter.speed, 200);
        assert_eq!(config.particles.count, 20);
        assert_eq!(config.particles.delay_ms, 1000);
        assert_eq!(config.reveal.stagger_ms, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = PageConfig::from_json(r#"{ "particles": { "seed": 7 } }"#).unwrap();
        assert_eq!(config.particles.seed, Some(7));
        assert_eq!(config.particles.count, 20);
    }

    #[test]
    fn test_config_validation() {
        let mut config = PageConfig::default();

        config.counter.threshold = 1.5;
        assert!(config.validate().is_err());

        config.counter.threshold = 0.5;
        config.counter.speed = 0;
        assert!(config.validate().is_err());

        config.counter.speed = 100;
        assert!(config.validate().is_ok());

        config.reveal.stagger_ms = u64::MAX;
        assert!(config.validate().is_err());

        config.reveal.stagger_ms = MAX_TIMER_DELAY_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_observer_options() {
        let config = PageConfig::default();
        let entrance = config.entrance.observer_options();
        assert_eq!(entrance.threshold, 0.1);
        assert_eq!(entrance.root_margin_bottom, 50.0);
        assert_eq!(config.counter.observer_options().root_margin_bottom, 0.0);
    }
}
