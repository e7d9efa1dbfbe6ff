//! # Command Executor 模块
//!
//! 把 Runtime 发出的 [`Command`] 应用到内存页面、虚拟时钟和观察器模拟上。
//!
//! ## 设计说明
//!
//! - 执行器只修改状态，不回调控制器
//! - 需要产生后续事件的副作用（滚动）通过 `last_output` 交给 Harness
//! - 目标元素不存在时跳过该指令并记录警告，与浏览器中 `querySelector`
//!   返回 `null` 后脚本跳过的效果一致

use tracing::{debug, warn};

use page_runtime::{Command, ElementRef};

use crate::clock::VirtualClock;
use crate::dom::{DomState, ElementState};
use crate::observer::ObserverSimulator;

/// Command 执行结果
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecuteResult {
    /// 执行成功
    #[default]
    Ok,
    /// 指令被跳过
    Skipped(String),
}

/// 单条指令的附带输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// 窗口滚动到的位置
    pub scrolled_to: Option<f64>,
    /// 指令阻止了当前事件的默认行为
    pub default_prevented: bool,
}

/// 执行目标
pub struct ExecuteTarget<'a> {
    pub dom: &'a mut DomState,
    pub clock: &'a mut VirtualClock,
    pub observers: &'a mut ObserverSimulator,
}

/// Command 执行器
#[derive(Debug, Default)]
pub struct CommandExecutor {
    /// 最近一次执行的输出
    pub last_output: CommandOutput,
    /// 累计执行的指令数
    pub executed: usize,
    /// 累计跳过的指令数
    pub skipped: usize,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行单个 Command
    pub fn execute(&mut self, command: &Command, target: ExecuteTarget<'_>) -> ExecuteResult {
        self.last_output = CommandOutput::default();
        debug!(command = %command, "执行指令");

        let result = match command {
            Command::SetStyle {
                target: element,
                property,
                value,
            } => with_element(target.dom, element, |e| {
                e.styles
                    .insert(property.css_name().to_string(), value.clone());
            }),
            Command::AddClass {
                target: element,
                class,
            } => with_element(target.dom, element, |e| {
                e.classes.insert(class.clone());
            }),
            Command::RemoveClass {
                target: element,
                class,
            } => with_element(target.dom, element, |e| {
                e.classes.remove(class);
            }),
            Command::ToggleClass {
                target: element,
                class,
            } => with_element(target.dom, element, |e| {
                if !e.classes.remove(class) {
                    e.classes.insert(class.clone());
                }
            }),
            Command::SetText {
                target: element,
                text,
            } => with_element(target.dom, element, |e| {
                e.text = Some(text.clone());
            }),
            Command::SetInnerHtml {
                target: element,
                html,
            } => with_element(target.dom, element, |e| {
                e.inner_html = Some(html.clone());
            }),
            Command::ScrollTo { top, .. } => {
                // 无头环境没有动画，平滑滚动直接到达终点
                target.dom.scroll_y = *top;
                self.last_output.scrolled_to = Some(*top);
                ExecuteResult::Ok
            }
            Command::PreventDefault => {
                self.last_output.default_prevented = true;
                ExecuteResult::Ok
            }
            Command::CreateObserver { observer, options } => {
                target.observers.create(*observer, *options);
                ExecuteResult::Ok
            }
            Command::Observe {
                observer,
                target: element,
            } => {
                if target.dom.element(element).is_none() {
                    ExecuteResult::Skipped(format!("元素 {element} 不存在"))
                } else if target.observers.observe(*observer, element.clone()) {
                    ExecuteResult::Ok
                } else {
                    ExecuteResult::Skipped(format!("观察器 {observer} 尚未创建"))
                }
            }
            Command::Unobserve {
                observer,
                target: element,
            } => {
                target.observers.unobserve(*observer, element);
                ExecuteResult::Ok
            }
            Command::SetTimer { timer, delay_ms } => {
                let due = target.clock.schedule(*timer, *delay_ms);
                debug!(timer = %timer, due_ms = due, "申请定时器");
                ExecuteResult::Ok
            }
            Command::SpawnParticle { index, particle } => {
                let state = ElementState {
                    styles: particle
                        .style_declarations()
                        .into_iter()
                        .map(|(name, value)| (name.to_string(), value))
                        .collect(),
                    ..ElementState::default()
                };
                target.dom.insert(ElementRef::Particle(*index), state);
                target.dom.particles.push(*particle);
                ExecuteResult::Ok
            }
            Command::InjectStylesheet { css } => {
                target.dom.stylesheets.push(css.clone());
                ExecuteResult::Ok
            }
        };

        match &result {
            ExecuteResult::Ok => self.executed += 1,
            ExecuteResult::Skipped(reason) => {
                warn!(command = %command, reason = %reason, "跳过指令");
                self.skipped += 1;
            }
        }
        result
    }
}

fn with_element(
    dom: &mut DomState,
    target: &ElementRef,
    apply: impl FnOnce(&mut ElementState),
) -> ExecuteResult {
    match dom.element_mut(target) {
        Some(element) => {
            apply(element);
            ExecuteResult::Ok
        }
        None => ExecuteResult::Skipped(format!("元素 {target} 不存在")),
    }
}
