//! # Error 模块
//!
//! 定义 page-runtime 中使用的错误类型。
//!
//! 查找失败（未知组件、不存在的滚动目标）不属于错误，按约定降级为空操作；
//! 这里只覆盖 Host 违反调用协议、或提供了非法目录/配置的情况。

use thiserror::Error;

use crate::layout::ElementRef;

/// 控制器调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// 页面结构尚未就绪
    #[error("页面结构尚未就绪，无法处理事件 '{event}'")]
    NotReady { event: String },

    /// 重复的 Ready 事件
    #[error("页面结构已经初始化过")]
    AlreadyReady,

    /// 事件指向布局中不存在的元素
    #[error("布局中不存在元素 {element}")]
    UnknownElement { element: ElementRef },
}

/// 组件目录错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// 组件标识为空
    #[error("组件标识不能为空")]
    EmptyKey,

    /// 组件标识重复
    #[error("组件 '{key}' 重复定义")]
    DuplicateKey { key: String },

    /// 目录 JSON 无法解析
    #[error("组件目录解析失败: {message}")]
    Parse { message: String },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 配置序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// 配置 IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),

    /// 配置验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// Result 类型别名
pub type PageResult<T> = Result<T, PageError>;
