//! # DOM 模块
//!
//! 内存中的页面模型。只记录控制器能改变的东西：内联样式、class、文本、
//! 内部 HTML、注入的样式表、粒子和滚动位置。

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use page_runtime::{ElementRef, Particle, PageLayout};

/// 计数器元素的初始文本
pub const INITIAL_COUNTER_TEXT: &str = "0";

/// 单个元素的状态
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementState {
    /// 内联样式（CSS 属性名 -> 值）
    pub styles: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
}

impl ElementState {
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// 内存页面
#[derive(Debug, Clone, Default)]
pub struct DomState {
    elements: BTreeMap<ElementRef, ElementState>,
    /// 当前纵向滚动位置
    pub scroll_y: f64,
    /// 注入到 `<head>` 的样式表（按注入顺序）
    pub stylesheets: Vec<String>,
    /// 已生成的粒子（按下标）
    pub particles: Vec<Particle>,
}

impl DomState {
    /// 按布局建立页面上已存在的元素
    pub fn from_layout(layout: &PageLayout) -> Self {
        let mut elements = BTreeMap::new();
        elements.insert(ElementRef::Body, ElementState::default());
        for landmark in &layout.landmarks {
            elements.insert(ElementRef::Landmark(*landmark), ElementState::default());
        }
        for section in &layout.sections {
            elements.insert(ElementRef::section(&section.id), ElementState::default());
        }
        for index in 0..layout.nav_links.len() {
            elements.insert(ElementRef::NavLink(index), ElementState::default());
        }
        for index in 0..layout.counters.len() {
            elements.insert(
                ElementRef::Counter(index),
                ElementState {
                    text: Some(INITIAL_COUNTER_TEXT.to_string()),
                    ..ElementState::default()
                },
            );
        }
        for index in 0..layout.cards.len() {
            elements.insert(ElementRef::Card(index), ElementState::default());
        }

        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn element(&self, target: &ElementRef) -> Option<&ElementState> {
        self.elements.get(target)
    }

    pub fn element_mut(&mut self, target: &ElementRef) -> Option<&mut ElementState> {
        self.elements.get_mut(target)
    }

    /// 追加一个元素（粒子由 Runtime 动态创建）
    pub fn insert(&mut self, target: ElementRef, state: ElementState) {
        self.elements.insert(target, state);
    }

    /// 读取内联样式
    pub fn style(&self, target: &ElementRef, name: &str) -> Option<&str> {
        self.element(target).and_then(|e| e.style(name))
    }

    pub fn has_class(&self, target: &ElementRef, class: &str) -> bool {
        self.element(target).is_some_and(|e| e.has_class(class))
    }

    pub fn text(&self, target: &ElementRef) -> Option<&str> {
        self.element(target).and_then(|e| e.text.as_deref())
    }

    pub fn inner_html(&self, target: &ElementRef) -> Option<&str> {
        self.element(target).and_then(|e| e.inner_html.as_deref())
    }

    /// 可序列化的快照，元素按显示名索引
    pub fn snapshot(&self) -> DomSnapshot {
        DomSnapshot {
            scroll_y: self.scroll_y,
            elements: self
                .elements
                .iter()
                .filter(|(_, state)| **state != ElementState::default())
                .map(|(target, state)| (target.to_string(), state.clone()))
                .collect(),
            stylesheets: self.stylesheets.len(),
            particles: self.particles.len(),
        }
    }
}

/// DOM 快照（只包含被修改过或带初始文本的元素）
#[derive(Debug, Clone, Serialize)]
pub struct DomSnapshot {
    pub scroll_y: f64,
    pub elements: BTreeMap<String, ElementState>,
    pub stylesheets: usize,
    pub particles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_runtime::Landmark;

    #[test]
    fn test_from_layout() {
        let dom = DomState::from_layout(&PageLayout::showcase());
        assert!(dom.element(&ElementRef::Body).is_some());
        assert!(dom.element(&Landmark::ModalOverlay.into()).is_some());
        assert!(dom.element(&ElementRef::section("contact")).is_some());
        assert_eq!(dom.text(&ElementRef::Counter(3)), Some("0"));
        assert!(dom.element(&ElementRef::Card(4)).is_none());
        assert!(dom.element(&ElementRef::Particle(0)).is_none());
    }

    #[test]
    fn test_missing_landmark_has_no_element() {
        let layout = PageLayout::showcase().without_landmark(Landmark::Hamburger);
        let dom = DomState::from_layout(&layout);
        assert!(dom.element(&Landmark::Hamburger.into()).is_none());
        assert!(!dom.has_class(&Landmark::Hamburger.into(), "active"));
    }

    #[test]
    fn test_snapshot_skips_untouched_elements() {
        let mut dom = DomState::from_layout(&PageLayout::showcase());
        if let Some(body) = dom.element_mut(&ElementRef::Body) {
            body.classes.insert("loaded".to_string());
        }
        let snapshot = dom.snapshot();
        assert!(snapshot.elements.contains_key("body"));
        assert!(!snapshot.elements.contains_key(".navbar"));
        // 计数器带初始文本
        assert!(snapshot.elements.contains_key(".stat-number[0]"));
    }
}
