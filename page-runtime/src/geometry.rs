//! # Geometry 模块
//!
//! 视口相交判定，与浏览器 `IntersectionObserver` 的语义保持一致：
//!
//! - 根区域是视口，按 `root_margin_bottom` 向内收缩底边
//! - 相交比例 = 可见高度 / 元素高度
//! - 只在比例跨越阈值时产生条目；首次观察总是产生一个条目
//!
//! 浏览器 Host 直接使用原生 observer，headless Host 用这里的函数模拟。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layout::{Rect, Viewport};

/// 观察器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverKind {
    /// section 入场动画
    Entrance,
    /// 统计数字计数动画
    Counter,
}

impl fmt::Display for ObserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entrance => write!(f, "entrance"),
            Self::Counter => write!(f, "counter"),
        }
    }
}

/// 观察器参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// 触发阈值 (0.0 - 1.0)
    pub threshold: f64,
    /// 根区域底边收缩量（像素，正数表示提前于视口底边触发之前收缩）
    #[serde(default)]
    pub root_margin_bottom: f64,
}

impl ObserverOptions {
    /// 浏览器 `rootMargin` 字符串形式
    pub fn root_margin_css(&self) -> String {
        if self.root_margin_bottom == 0.0 {
            "0px".to_string()
        } else {
            format!("0px 0px {}px 0px", -self.root_margin_bottom)
        }
    }
}

/// 计算元素与视口根区域的相交比例
///
/// 返回 `None` 表示不相交。零高度元素只要落在根区域内即视为完全可见。
pub fn intersection_ratio(
    rect: Rect,
    scroll_y: f64,
    viewport: Viewport,
    options: &ObserverOptions,
) -> Option<f64> {
    let root_top = scroll_y;
    let root_bottom = scroll_y + (viewport.height - options.root_margin_bottom).max(0.0);

    if rect.height <= 0.0 {
        return (rect.top >= root_top && rect.top <= root_bottom).then_some(1.0);
    }

    let visible = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    if visible < 0.0 {
        return None;
    }
    // 边缘相接（visible == 0）在浏览器中也算相交
    Some((visible / rect.height).clamp(0.0, 1.0))
}

/// 给定相交比例是否达到阈值
pub fn meets_threshold(ratio: Option<f64>, options: &ObserverOptions) -> bool {
    match ratio {
        Some(r) if options.threshold <= 0.0 => r >= 0.0,
        Some(r) => r >= options.threshold,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrance() -> ObserverOptions {
        ObserverOptions {
            threshold: 0.1,
            root_margin_bottom: 50.0,
        }
    }

    #[test]
    fn test_fully_visible() {
        let ratio = intersection_ratio(
            Rect::new(100.0, 200.0),
            0.0,
            Viewport::default(),
            &entrance(),
        );
        assert_eq!(ratio, Some(1.0));
    }

    #[test]
    fn test_root_margin_shrinks_bottom() {
        // 视口高 720，收缩 50 后根区域为 [0, 670]
        let rect = Rect::new(660.0, 100.0);
        let ratio = intersection_ratio(rect, 0.0, Viewport::default(), &entrance()).unwrap();
        assert!((ratio - 0.1).abs() < 1e-9);
        assert!(meets_threshold(Some(ratio), &entrance()));

        let rect = Rect::new(665.0, 100.0);
        let ratio = intersection_ratio(rect, 0.0, Viewport::default(), &entrance());
        assert!(!meets_threshold(ratio, &entrance()));
    }

    #[test]
    fn test_not_intersecting_below_viewport() {
        let ratio = intersection_ratio(
            Rect::new(2000.0, 100.0),
            0.0,
            Viewport::default(),
            &entrance(),
        );
        assert_eq!(ratio, None);
        assert!(!meets_threshold(ratio, &entrance()));
    }

    #[test]
    fn test_scrolled_into_view() {
        let ratio = intersection_ratio(
            Rect::new(2000.0, 100.0),
            1500.0,
            Viewport::default(),
            &entrance(),
        );
        assert_eq!(ratio, Some(1.0));
    }

    #[test]
    fn test_root_margin_css() {
        assert_eq!(entrance().root_margin_css(), "0px 0px -50px 0px");
        let counter = ObserverOptions {
            threshold: 0.5,
            root_margin_bottom: 0.0,
        };
        assert_eq!(counter.root_margin_css(), "0px");
    }
}
