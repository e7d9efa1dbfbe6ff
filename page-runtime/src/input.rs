//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的页面事件。
//!
//! ## 设计说明
//!
//! - Runtime 不直接监听 DOM，只处理 Host 翻译后的语义化事件
//! - 每个事件都有一个 [`EventKind`]，控制器按种类订阅
//! - 时间流逝由 Host 负责：Runtime 只会收到自己申请过的 `TimerFired`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::command::Timer;
use crate::geometry::ObserverKind;
use crate::layout::{ElementRef, PageLayout};

/// 视口相交条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementRef,
    pub is_intersecting: bool,
    /// 相交比例 (0.0 - 1.0)
    #[serde(default)]
    pub ratio: f64,
}

impl IntersectionEntry {
    /// 创建相交条目
    pub fn visible(target: ElementRef, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting: true,
            ratio,
        }
    }

    /// 创建不相交条目
    pub fn hidden(target: ElementRef) -> Self {
        Self {
            target,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// 事件种类，用于订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ready,
    Relayout,
    Load,
    Scroll,
    Click,
    KeyDown,
    PointerEnter,
    PointerLeave,
    Intersect,
    Timer,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Relayout => "relayout",
            Self::Load => "load",
            Self::Scroll => "scroll",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::Intersect => "intersect",
            Self::Timer => "timer",
        };
        f.write_str(name)
    }
}

/// Host 向 Runtime 传递的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// 页面结构可用（`DOMContentLoaded`）
    Ready { layout: PageLayout },

    /// 页面几何发生变化（图片/字体加载完成、窗口尺寸改变），携带重新测量的布局
    Relayout { layout: PageLayout },

    /// 所有资源加载完成（`window.load`）
    Load,

    /// 窗口滚动，`offset` 为纵向滚动位置
    Scroll { offset: f64 },

    /// 元素被点击
    Click { target: ElementRef },

    /// 按键
    KeyDown { key: String },

    /// 指针进入元素
    PointerEnter { target: ElementRef },

    /// 指针离开元素
    PointerLeave { target: ElementRef },

    /// 观察器回调
    Intersect {
        observer: ObserverKind,
        entries: Vec<IntersectionEntry>,
    },

    /// 定时器到期
    TimerFired { timer: Timer },
}

impl PageEvent {
    /// 事件种类
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready { .. } => EventKind::Ready,
            Self::Relayout { .. } => EventKind::Relayout,
            Self::Load => EventKind::Load,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::PointerEnter { .. } => EventKind::PointerEnter,
            Self::PointerLeave { .. } => EventKind::PointerLeave,
            Self::Intersect { .. } => EventKind::Intersect,
            Self::TimerFired { .. } => EventKind::Timer,
        }
    }

    /// 事件直接指向的元素（如果有）
    pub fn target(&self) -> Option<&ElementRef> {
        match self {
            Self::Click { target }
            | Self::PointerEnter { target }
            | Self::PointerLeave { target } => Some(target),
            _ => None,
        }
    }

    pub fn click(target: impl Into<ElementRef>) -> Self {
        Self::Click {
            target: target.into(),
        }
    }

    pub fn scroll(offset: f64) -> Self {
        Self::Scroll { offset }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    pub fn timer(timer: Timer) -> Self {
        Self::TimerFired { timer }
    }
}
