//! 无头宿主错误类型

use page_runtime::PageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// 控制器拒绝了事件
    #[error(transparent)]
    Page(#[from] PageError),

    /// `run_until_idle` 触发的定时器超过上限，可能存在无限重调度
    #[error("定时器触发次数超过上限 {limit}")]
    TimerLimit { limit: usize },

    /// 场景文件无法解析
    #[error("场景解析失败: {message}")]
    Scenario { message: String },
}

pub type HarnessResult<T> = Result<T, HarnessError>;
