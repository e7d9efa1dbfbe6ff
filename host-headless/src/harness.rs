//! # Harness 模块
//!
//! 把控制器、内存页面、虚拟时钟和观察器模拟连成一个可单步驱动的页面。
//!
//! ## 事件循环
//!
//! ```text
//! dispatch(event)
//!   └─ 队列: [event]
//!        ├─ controller.dispatch(event) -> commands
//!        ├─ executor.execute(command)   每条指令
//!        │    └─ ScrollTo -> 追加 Scroll 事件
//!        └─ observers.collect()         追加 Intersect 事件
//! ```
//!
//! 定时器只在 [`PageHarness::advance`] / [`PageHarness::run_until_idle`]
//! 中触发，时间不会自己流逝。

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use page_runtime::{
    Command, ComponentCatalog, ElementRef, PageConfig, PageController, PageEvent, PageLayout,
    PageState,
};

use crate::clock::VirtualClock;
use crate::command_executor::{CommandExecutor, ExecuteTarget};
use crate::dom::DomState;
use crate::error::{HarnessError, HarnessResult};
use crate::observer::ObserverSimulator;

/// `run_until_idle` 最多触发的定时器数量
pub const MAX_TIMER_FIRES: usize = 100_000;

/// 指令轨迹条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// 执行时的虚拟时间
    pub at_ms: u64,
    pub command: Command,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}ms] {}", self.at_ms, self.command)
    }
}

/// 单次事件分发的结果
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DispatchReport {
    /// 本次分发（含连带事件）执行的指令数
    pub commands: usize,
    /// 原始事件的默认行为是否被阻止
    pub default_prevented: bool,
}

/// 无头页面
pub struct PageHarness {
    controller: PageController,
    layout: PageLayout,
    dom: DomState,
    clock: VirtualClock,
    observers: ObserverSimulator,
    executor: CommandExecutor,
    trace: Vec<TraceEntry>,
}

impl PageHarness {
    /// 用给定控制器和布局创建页面，尚未启动
    pub fn new(controller: PageController, layout: PageLayout) -> Self {
        let dom = DomState::from_layout(&layout);
        Self {
            controller,
            layout,
            dom,
            clock: VirtualClock::new(),
            observers: ObserverSimulator::new(),
            executor: CommandExecutor::new(),
            trace: Vec::new(),
        }
    }

    /// 标准展示页布局 + 默认配置，粒子使用固定种子
    pub fn showcase(seed: u64) -> Self {
        let mut config = PageConfig::default();
        config.particles.seed = Some(seed);
        let controller = PageController::new(config, ComponentCatalog::builtin());
        Self::new(controller, PageLayout::showcase())
    }

    /// 脚本启动
    pub fn start(&mut self) {
        let commands = self.controller.start();
        // start 阶段只申请定时器和注入样式，不会产生连带事件
        self.apply(commands, &mut VecDeque::new());
    }

    /// 页面结构就绪（`DOMContentLoaded`）
    pub fn ready(&mut self) -> HarnessResult<DispatchReport> {
        info!(
            sections = self.layout.sections.len(),
            counters = self.layout.counters.len(),
            cards = self.layout.cards.len(),
            "页面结构就绪"
        );
        self.dispatch(PageEvent::Ready {
            layout: self.layout.clone(),
        })
    }

    /// 资源加载完成（`window.load`）
    pub fn load(&mut self) -> HarnessResult<DispatchReport> {
        info!(at_ms = self.clock.now_ms(), "资源加载完成");
        self.dispatch(PageEvent::Load)
    }

    /// 依次执行 start、ready、load
    pub fn boot(&mut self) -> HarnessResult<()> {
        self.start();
        self.ready()?;
        self.load()?;
        Ok(())
    }

    /// 分发一个事件，并处理它连带产生的滚动与观察器事件
    pub fn dispatch(&mut self, event: PageEvent) -> HarnessResult<DispatchReport> {
        let mut report = DispatchReport::default();
        let mut queue = VecDeque::from([event]);
        let mut first = true;

        while let Some(event) = queue.pop_front() {
            let measured = match &event {
                PageEvent::Relayout { layout } => Some(layout.clone()),
                _ => None,
            };
            if let PageEvent::Scroll { offset } = &event {
                self.dom.scroll_y = *offset;
            }
            let commands = self.controller.dispatch(event)?;
            if let Some(measured) = measured {
                self.layout.update_geometry(&measured);
            }
            let applied = self.apply(commands, &mut queue);
            report.commands += applied.commands;
            if first {
                report.default_prevented = applied.default_prevented;
                first = false;
            }
            queue.extend(self.observers.collect(&self.layout, self.dom.scroll_y));
        }
        Ok(report)
    }

    /// 页面几何变化后重新测量
    pub fn relayout(&mut self, measured: PageLayout) -> HarnessResult<DispatchReport> {
        self.dispatch(PageEvent::Relayout { layout: measured })
    }

    pub fn click(&mut self, target: impl Into<ElementRef>) -> HarnessResult<DispatchReport> {
        self.dispatch(PageEvent::click(target))
    }

    pub fn scroll(&mut self, offset: f64) -> HarnessResult<DispatchReport> {
        self.dispatch(PageEvent::scroll(offset))
    }

    pub fn key(&mut self, key: &str) -> HarnessResult<DispatchReport> {
        self.dispatch(PageEvent::key(key))
    }

    /// 指针进入 (`entered = true`) 或离开元素
    pub fn hover(&mut self, target: ElementRef, entered: bool) -> HarnessResult<DispatchReport> {
        let event = if entered {
            PageEvent::PointerEnter { target }
        } else {
            PageEvent::PointerLeave { target }
        };
        self.dispatch(event)
    }

    /// 推进虚拟时间，触发期间到期的所有定时器，返回触发数量
    pub fn advance(&mut self, ms: u64) -> HarnessResult<usize> {
        let deadline = self.clock.now_ms().saturating_add(ms);
        let mut fired = 0;
        while let Some((due, timer)) = self.clock.pop_due(deadline) {
            debug!(timer = %timer, at_ms = due, "定时器到期");
            self.dispatch(PageEvent::timer(timer))?;
            fired += 1;
        }
        self.clock.advance_to(deadline);
        Ok(fired)
    }

    /// 持续触发定时器直到队列为空，返回触发数量
    pub fn run_until_idle(&mut self) -> HarnessResult<usize> {
        let mut fired = 0;
        while let Some((due, timer)) = self.clock.pop_due(u64::MAX) {
            if fired >= MAX_TIMER_FIRES {
                return Err(HarnessError::TimerLimit {
                    limit: MAX_TIMER_FIRES,
                });
            }
            debug!(timer = %timer, at_ms = due, "定时器到期");
            self.dispatch(PageEvent::timer(timer))?;
            fired += 1;
        }
        Ok(fired)
    }

    /// 对应页面全局函数 `openModal`
    pub fn open_modal(&mut self, component: &str) -> HarnessResult<usize> {
        let commands = self.controller.open_modal(component)?;
        let mut queue = VecDeque::new();
        Ok(self.apply(commands, &mut queue).commands)
    }

    /// 对应页面全局函数 `closeModal`
    pub fn close_modal(&mut self) -> HarnessResult<usize> {
        let commands = self.controller.close_modal()?;
        let mut queue = VecDeque::new();
        Ok(self.apply(commands, &mut queue).commands)
    }

    /// 对应页面全局函数 `scrollToSection`
    pub fn scroll_to_section(&mut self, id: &str) -> HarnessResult<DispatchReport> {
        let commands = self.controller.scroll_to_section(id)?;
        let mut queue = VecDeque::new();
        let applied = self.apply(commands, &mut queue);
        let mut report = DispatchReport {
            commands: applied.commands,
            default_prevented: false,
        };
        while let Some(event) = queue.pop_front() {
            report.commands += self.dispatch(event)?.commands;
        }
        Ok(report)
    }

    pub fn dom(&self) -> &DomState {
        &self.dom
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    pub fn state(&self) -> PageState {
        self.controller.state()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// 尚未触发的定时器数量
    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }

    /// 被跳过的指令数量（目标元素不存在等）
    pub fn skipped_commands(&self) -> usize {
        self.executor.skipped
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// 取走并清空已记录的指令轨迹
    pub fn take_trace(&mut self) -> Vec<TraceEntry> {
        std::mem::take(&mut self.trace)
    }

    fn apply(&mut self, commands: Vec<Command>, queue: &mut VecDeque<PageEvent>) -> DispatchReport {
        let mut report = DispatchReport::default();
        for command in commands {
            self.executor.execute(
                &command,
                ExecuteTarget {
                    dom: &mut self.dom,
                    clock: &mut self.clock,
                    observers: &mut self.observers,
                },
            );
            let output = &self.executor.last_output;
            if let Some(top) = output.scrolled_to {
                queue.push_back(PageEvent::scroll(top));
            }
            report.default_prevented |= output.default_prevented;
            report.commands += 1;
            self.trace.push(TraceEntry {
                at_ms: self.clock.now_ms(),
                command,
            });
        }
        report
    }
}
