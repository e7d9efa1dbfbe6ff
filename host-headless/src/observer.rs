//! # 观察器模拟
//!
//! 模拟浏览器 `IntersectionObserver`：
//!
//! - 开始观察后的第一次检查总是产生条目（不论是否相交）
//! - 之后只在"是否达到阈值"发生变化时产生条目
//! - 同一观察器的条目合并为一个 [`PageEvent::Intersect`]

use std::collections::BTreeMap;

use page_runtime::{
    ElementRef, IntersectionEntry, ObserverKind, ObserverOptions, PageEvent, PageLayout,
    intersection_ratio, meets_threshold,
};

#[derive(Debug, Clone, Default)]
pub struct ObserverSimulator {
    options: BTreeMap<ObserverKind, ObserverOptions>,
    /// 被观察的元素 -> 上次报告的相交状态（尚未报告时为 `None`）
    observed: BTreeMap<(ObserverKind, ElementRef), Option<bool>>,
}

impl ObserverSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建（或替换）观察器
    pub fn create(&mut self, kind: ObserverKind, options: ObserverOptions) {
        self.options.insert(kind, options);
    }

    /// 开始观察，观察器不存在时返回 `false`
    pub fn observe(&mut self, kind: ObserverKind, target: ElementRef) -> bool {
        if !self.options.contains_key(&kind) {
            return false;
        }
        self.observed.entry((kind, target)).or_insert(None);
        true
    }

    pub fn unobserve(&mut self, kind: ObserverKind, target: &ElementRef) {
        self.observed.remove(&(kind, target.clone()));
    }

    /// 正在观察的元素数量
    pub fn observed_count(&self, kind: ObserverKind) -> usize {
        self.observed.keys().filter(|(k, _)| *k == kind).count()
    }

    /// 按当前滚动位置检查所有被观察元素，返回需要投递的事件
    pub fn collect(&mut self, layout: &PageLayout, scroll_y: f64) -> Vec<PageEvent> {
        let mut batches: BTreeMap<ObserverKind, Vec<IntersectionEntry>> = BTreeMap::new();

        for ((kind, target), last) in &mut self.observed {
            let (Some(options), Some(rect)) = (self.options.get(kind), layout.rect_of(target))
            else {
                continue;
            };
            let ratio = intersection_ratio(rect, scroll_y, layout.viewport, options);
            let intersecting = meets_threshold(ratio, options);
            if *last == Some(intersecting) {
                continue;
            }
            *last = Some(intersecting);
            batches.entry(*kind).or_default().push(IntersectionEntry {
                target: target.clone(),
                is_intersecting: intersecting,
                ratio: ratio.unwrap_or(0.0),
            });
        }

        batches
            .into_iter()
            .map(|(observer, entries)| PageEvent::Intersect { observer, entries })
            .collect()
    }
}
