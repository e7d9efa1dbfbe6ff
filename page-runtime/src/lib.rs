//! # Page Runtime
//!
//! 机器人展示页交互控制器的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `page-runtime` 不接触真实 DOM、定时器或观察器。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                             Runtime
//!   │                                 │
//!   │──── start() ──────────────────►│ 脚本加载
//!   │◄─── Vec<Command> ──────────────│
//!   │                                 │
//!   │──── PageEvent ────────────────►│ dispatch()
//!   │◄─── Result<Vec<Command>> ──────│
//!   │                                 │
//! ```
//!
//! DOM 事件、观察器回调、定时器到期都被 Host 翻译成 [`PageEvent`]；
//! 样式修改、滚动、定时器申请都以 [`Command`] 的形式返回给 Host 执行。
//! 因此同一个控制器既能驱动浏览器页面，也能在无头环境里按虚拟时钟回放。
//!
//! ## 核心类型
//!
//! - [`PageController`]：事件分发与行为编排
//! - [`PageEvent`]：Host 向 Runtime 传递的事件
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`PageLayout`]：页面结构与几何快照
//! - [`ComponentCatalog`]：组件详情目录
//! - [`PageState`]：可序列化的状态快照
//!
//! ## 使用示例
//!
//! ```ignore
//! use page_runtime::{PageController, PageEvent, PageLayout};
//!
//! let mut controller = PageController::default();
//! host.execute_all(controller.start());
//! host.execute_all(controller.dispatch(PageEvent::Ready { layout })?);
//!
//! loop {
//!     let event = host.next_event();
//!     host.execute_all(controller.dispatch(event)?);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`layout`]：元素引用与页面布局
//! - [`geometry`]：视口相交计算
//! - [`command`]：Command 定义
//! - [`input`]：PageEvent 定义
//! - [`catalog`]：组件目录与详情渲染
//! - [`config`]：可调参数
//! - [`state`]：状态快照
//! - [`diagnostic`]：页面结构检查
//! - [`controller`]：控制器与各页面行为
//! - [`error`]：错误类型定义

pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
pub mod diagnostic;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod state;

// 重导出核心类型
pub use catalog::{Block, ComponentCatalog, ComponentInfo, Document, Inline, escape_html};
pub use command::{Command, Particle, ScrollBehavior, StyleProperty, Timer};
pub use config::{MAX_TIMER_DELAY_MS, PageConfig};
pub use controller::{Behavior, Context, PageController};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_layout};
pub use error::{CatalogError, ConfigError, PageError, PageResult};
pub use geometry::{ObserverKind, ObserverOptions, intersection_ratio, meets_threshold};
pub use input::{EventKind, IntersectionEntry, PageEvent};
pub use layout::{ElementRef, Landmark, PageLayout, Rect, Viewport, anonymous_section_id};
pub use state::{CounterPhase, CounterState, ModalState, NavbarAppearance, PageState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _cmd = Command::style(Landmark::Navbar, StyleProperty::Opacity, "1");

        let _event = PageEvent::click(ElementRef::Card(0));

        let _layout = PageLayout::showcase();

        let controller = PageController::default();
        assert_eq!(controller.state(), PageState::default());
    }
}
