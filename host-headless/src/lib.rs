//! # Headless Host
//!
//! 展示页的无头宿主实现，用于测试与命令行回放。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 按布局建立内存页面
//! - 执行 Runtime 发出的 Command
//! - 用虚拟时钟回答定时器申请
//! - 模拟视口观察器，在滚动后投递相交事件
//!
//! Host 层不包含页面交互逻辑，只负责执行 Runtime 发出的 Command。

pub mod clock;
pub mod command_executor;
pub mod config;
pub mod dom;
pub mod error;
pub mod harness;
pub mod observer;
pub mod scenario;

pub use clock::VirtualClock;
pub use command_executor::{CommandExecutor, CommandOutput, ExecuteResult, ExecuteTarget};
pub use config::load_page_config;
pub use dom::{DomSnapshot, DomState, ElementState};
pub use error::{HarnessError, HarnessResult};
pub use harness::{DispatchReport, PageHarness, TraceEntry};
pub use observer::ObserverSimulator;
pub use scenario::{Scenario, ScenarioReport, Step};
