//! # 诊断模块
//!
//! 页面布局静态检查，不依赖 IO 或 DOM。
//!
//! 控制器对缺失元素采取"跳过"策略，不会在运行时报错；
//! 这里把这些会被静默跳过的情况提前报告出来。
//!
//! - Error：核心交互会失效（导航栏、菜单按钮、模态框）
//! - Warn：装饰效果缺失、链接指向不存在的 section、计数器目标无法解析
//! - Info：统计信息

use std::collections::HashSet;

use crate::catalog::ComponentCatalog;
use crate::controller::counter::parse_target;
use crate::controller::navigation::anchor_id;
use crate::layout::{Landmark, PageLayout};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// 相关元素（如 `section#about`），全局问题为 `None`
    pub element: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            element: None,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            element: None,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            element: None,
            message: message.into(),
        }
    }

    /// 设置相关元素
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(element) = &self.element {
            write!(f, " {element}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按最低级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 缺失时核心交互失效的固定元素
const REQUIRED_LANDMARKS: [Landmark; 5] = [
    Landmark::Navbar,
    Landmark::Hamburger,
    Landmark::NavMenu,
    Landmark::ModalOverlay,
    Landmark::ModalBody,
];

/// 分析页面布局
pub fn analyze_layout(layout: &PageLayout, catalog: &ComponentCatalog) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for landmark in Landmark::ALL {
        if layout.has(landmark) {
            continue;
        }
        let diag = if REQUIRED_LANDMARKS.contains(&landmark) {
            Diagnostic::error("页面缺少必需元素，相关交互将被跳过")
        } else {
            Diagnostic::warn("页面缺少元素，相关效果将被跳过")
        };
        result.push(diag.with_element(landmark.selector()));
    }

    let mut seen = HashSet::new();
    for section in &layout.sections {
        if !seen.insert(section.id.as_str()) {
            result.push(
                Diagnostic::warn("section id 重复，锚点只会解析到第一个")
                    .with_element(format!("section#{}", section.id)),
            );
        }
    }

    for (i, link) in layout.nav_links.iter().enumerate() {
        let id = anchor_id(&link.href);
        if layout.anchor(id).is_none() {
            result.push(
                Diagnostic::warn(format!("链接目标 '{}' 不存在，点击时不会滚动", link.href))
                    .with_element(format!(".nav-link[{i}]")),
            );
        }
    }

    for (i, counter) in layout.counters.iter().enumerate() {
        match parse_target(&counter.target) {
            None => result.push(
                Diagnostic::warn(format!("计数目标 '{}' 不是数字，不会播放动画", counter.target))
                    .with_element(format!(".stat-number[{i}]")),
            ),
            Some(t) if t <= 0 => result.push(
                Diagnostic::info(format!("计数目标 {t} 不大于 0，将直接显示"))
                    .with_element(format!(".stat-number[{i}]")),
            ),
            Some(_) => {}
        }
    }

    for (i, card) in layout.cards.iter().enumerate() {
        let element = format!(".component-card[{i}]");
        match &card.component {
            None => result.push(Diagnostic::info("卡片未绑定组件，点击无效果").with_element(element)),
            Some(key) if !catalog.contains(key) => result.push(
                Diagnostic::warn(format!("卡片绑定的组件 '{key}' 不在目录中")).with_element(element),
            ),
            Some(_) => {}
        }
    }

    result.push(Diagnostic::info(format!(
        "{} 个 section, {} 个导航链接, {} 个计数器, {} 张卡片",
        layout.sections.len(),
        layout.nav_links.len(),
        layout.counters.len(),
        layout.cards.len()
    )));

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showcase_has_no_problems() {
        let result = analyze_layout(&PageLayout::showcase(), &ComponentCatalog::builtin());
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warn_count(), 0);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_required_landmark() {
        let layout = PageLayout::showcase().without_landmark(Landmark::Hamburger);
        let result = analyze_layout(&layout, &ComponentCatalog::builtin());
        assert!(result.has_errors());
        assert_eq!(
            result.diagnostics[0].to_string(),
            "[ERROR] .hamburger: 页面缺少必需元素，相关交互将被跳过"
        );
    }

    #[test]
    fn test_missing_decoration_is_warning() {
        let layout = PageLayout::showcase().without_landmark(Landmark::ParticleContainer);
        let result = analyze_layout(&layout, &ComponentCatalog::builtin());
        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 1);
    }

    #[test]
    fn test_dangling_link_and_bad_counter() {
        let layout = PageLayout::showcase()
            .with_nav_link("#gallery")
            .with_counter("lots", 0.0, 10.0)
            .with_counter("0", 0.0, 10.0)
            .with_card(Some("lidar"))
            .with_card(None);
        let result = analyze_layout(&layout, &ComponentCatalog::builtin());
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warn_count(), 3);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Info).len(), 6);
    }

    #[test]
    fn test_duplicate_section_ids() {
        let layout = PageLayout::showcase().with_section("about", 4000.0, 100.0);
        let result = analyze_layout(&layout, &ComponentCatalog::builtin());
        assert_eq!(result.warn_count(), 1);
    }
}
