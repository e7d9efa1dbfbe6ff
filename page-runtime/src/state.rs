//! # State 模块
//!
//! 控制器状态的可序列化快照。
//!
//! ## 设计原则
//!
//! - 每个行为控制器只持有自己的状态，快照由 `PageController::state()` 汇总
//! - 所有状态都**显式建模**，不存在隐式全局状态
//! - 快照只用于观察（Host 调试输出、测试断言），不能反向写回控制器

use serde::{Deserialize, Serialize};

/// 导航栏外观
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavbarAppearance {
    /// 滚动位置低于阈值：半透明，无阴影
    Translucent,
    /// 滚动位置达到阈值：更不透明，带高亮阴影
    Solid,
}

/// 计数器阶段
///
/// ```text
/// Idle ──(首次进入视口)──► Running ──(到达目标)──► Done
///   │                                              ▲
///   ├──(目标 ≤ 0)──────────────────────────────────┘
///   └──(目标不是数字)──► Invalid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterPhase {
    Idle,
    Running,
    Done,
    Invalid,
}

/// 单个计数器状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// 解析后的目标值，无法解析时为 `None`
    pub target: Option<i64>,
    /// 当前显示值，动画开始前为 `None`
    pub displayed: Option<i64>,
    pub phase: CounterPhase,
}

/// 模态框状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        /// 当前展示的组件标识
        component: String,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// 当前展示的组件标识
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Open { component } => Some(component),
            Self::Closed => None,
        }
    }
}

/// 页面状态快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageState {
    /// `start()` 是否已调用
    pub started: bool,
    /// 页面结构是否就绪
    pub ready: bool,
    /// 资源是否加载完成
    pub loaded: bool,
    /// 移动端菜单是否展开
    pub menu_open: bool,
    /// 导航栏外观，首次滚动前为 `None`
    pub navbar: Option<NavbarAppearance>,
    /// 已显示的 section id（按显示顺序）
    pub revealed_sections: Vec<String>,
    pub counters: Vec<CounterState>,
    pub modal: ModalState,
    /// 已显示的 hero 元素下标（按显示顺序）
    pub hero_revealed: Vec<usize>,
    /// 已生成的粒子数量
    pub particles: usize,
}
