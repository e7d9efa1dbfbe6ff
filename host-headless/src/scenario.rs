//! # Scenario 模块
//!
//! 可回放的用户操作序列。场景文件是步骤的 JSON 数组：
//!
//! ```json
//! [
//!   { "event": { "type": "load" } },
//!   { "advance_ms": 1200 },
//!   { "event": { "type": "click", "target": { "card": 2 } } },
//!   { "open_modal": "servo" },
//!   { "close_modal": null },
//!   { "run_until_idle": null }
//! ]
//! ```
//!
//! 回放前页面已完成 `start` 与 `Ready`，是否触发 `Load` 由场景决定。

use serde::{Deserialize, Serialize};
use tracing::info;

use page_runtime::{PageEvent, PageState};

use crate::dom::DomSnapshot;
use crate::error::{HarnessError, HarnessResult};
use crate::harness::{PageHarness, TraceEntry};

/// 场景步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// 分发一个页面事件
    Event(PageEvent),
    /// 推进虚拟时间
    AdvanceMs(u64),
    /// 调用 `openModal`
    OpenModal(String),
    /// 调用 `closeModal`
    CloseModal,
    /// 调用 `scrollToSection`
    ScrollToSection(String),
    /// 触发所有剩余定时器
    RunUntilIdle,
}

/// 场景
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// 回放结果
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// 回放结束时的虚拟时间
    pub elapsed_ms: u64,
    pub trace: Vec<TraceEntry>,
    pub state: PageState,
    pub dom: DomSnapshot,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn from_json(content: &str) -> HarnessResult<Self> {
        serde_json::from_str(content).map_err(|e| HarnessError::Scenario {
            message: e.to_string(),
        })
    }

    /// 在已就绪的页面上回放
    pub fn replay(&self, harness: &mut PageHarness) -> HarnessResult<()> {
        for (index, step) in self.steps.iter().enumerate() {
            info!(step = index, "回放步骤");
            match step {
                Step::Event(event) => {
                    harness.dispatch(event.clone())?;
                }
                Step::AdvanceMs(ms) => {
                    harness.advance(*ms)?;
                }
                Step::OpenModal(component) => {
                    harness.open_modal(component)?;
                }
                Step::CloseModal => {
                    harness.close_modal()?;
                }
                Step::ScrollToSection(id) => {
                    harness.scroll_to_section(id)?;
                }
                Step::RunUntilIdle => {
                    harness.run_until_idle()?;
                }
            }
        }
        Ok(())
    }

    /// 启动页面、回放场景并汇总结果
    pub fn run(&self, harness: &mut PageHarness) -> HarnessResult<ScenarioReport> {
        harness.start();
        harness.ready()?;
        self.replay(harness)?;
        Ok(ScenarioReport {
            elapsed_ms: harness.now_ms(),
            trace: harness.trace().to_vec(),
            state: harness.state(),
            dom: harness.dom().snapshot(),
        })
    }
}
