//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"改成什么样"，不描述"怎么改 DOM"
//! - **无副作用**：Command 本身不执行任何操作
//! - **平台无关**：不包含任何 `web_sys` 类型，headless Host 同样可以执行

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{ObserverKind, ObserverOptions};
use crate::layout::ElementRef;

/// 指令可修改的内联样式属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Opacity,
    Transform,
    Transition,
    Background,
    BoxShadow,
    Display,
    Overflow,
}

impl StyleProperty {
    /// CSS 属性名
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Transform => "transform",
            Self::Transition => "transition",
            Self::Background => "background",
            Self::BoxShadow => "box-shadow",
            Self::Display => "display",
            Self::Overflow => "overflow",
        }
    }
}

/// 滚动方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

impl ScrollBehavior {
    /// `window.scrollTo` 的 `behavior` 取值
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Instant => "instant",
        }
    }
}

/// 定时器标识
///
/// Runtime 通过 [`Command::SetTimer`] 申请定时器，Host 到期后以
/// `PageEvent::TimerFired` 原样送回。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timer {
    /// 生成装饰粒子
    Particles,
    /// 第 n 个计数器的下一步
    CounterStep(usize),
    /// 第 n 个 hero 元素显示
    HeroReveal(usize),
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Particles => write!(f, "particles"),
            Self::CounterStep(i) => write!(f, "counter-step[{i}]"),
            Self::HeroReveal(i) => write!(f, "hero-reveal[{i}]"),
        }
    }
}

/// 装饰粒子
///
/// 创建后不再修改，也不会被移除。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// 直径（像素）
    pub diameter: f64,
    /// 水平位置（容器宽度百分比）
    pub left: f64,
    /// 垂直位置（容器高度百分比）
    pub top: f64,
    pub opacity: f64,
    /// 漂浮动画周期（秒）
    pub duration: f64,
    /// 动画开始延迟（秒）
    pub delay: f64,
}

impl Particle {
    /// 粒子的内联样式声明
    pub fn style_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("width", format!("{}px", self.diameter)),
            ("height", format!("{}px", self.diameter)),
            ("background", "#00ffff".to_string()),
            ("border-radius", "50%".to_string()),
            ("left", format!("{}%", self.left)),
            ("top", format!("{}%", self.top)),
            ("opacity", self.opacity.to_string()),
            (
                "animation",
                format!("particleFloat {}s ease-in-out infinite", self.duration),
            ),
            ("animation-delay", format!("{}s", self.delay)),
        ]
    }
}

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// 设置内联样式
    SetStyle {
        target: ElementRef,
        property: StyleProperty,
        value: String,
    },

    /// 添加 class
    AddClass { target: ElementRef, class: String },

    /// 移除 class
    RemoveClass { target: ElementRef, class: String },

    /// 切换 class
    ToggleClass { target: ElementRef, class: String },

    /// 替换文本内容
    SetText { target: ElementRef, text: String },

    /// 替换 HTML 内容
    SetInnerHtml { target: ElementRef, html: String },

    /// 滚动窗口
    ScrollTo { top: f64, behavior: ScrollBehavior },

    /// 阻止当前事件的默认行为
    ///
    /// 只在处理 DOM 事件的同一次 dispatch 中有意义。
    PreventDefault,

    /// 创建视口观察器
    CreateObserver {
        observer: ObserverKind,
        options: ObserverOptions,
    },

    /// 开始观察元素
    Observe {
        observer: ObserverKind,
        target: ElementRef,
    },

    /// 停止观察元素
    Unobserve {
        observer: ObserverKind,
        target: ElementRef,
    },

    /// 申请一次性定时器
    SetTimer { timer: Timer, delay_ms: u64 },

    /// 在粒子容器中追加一个粒子
    SpawnParticle { index: usize, particle: Particle },

    /// 向 `<head>` 注入样式表
    InjectStylesheet { css: String },
}

impl Command {
    /// 创建样式指令
    pub fn style(
        target: impl Into<ElementRef>,
        property: StyleProperty,
        value: impl Into<String>,
    ) -> Self {
        Self::SetStyle {
            target: target.into(),
            property,
            value: value.into(),
        }
    }

    /// 目标元素（如果有）
    pub fn target(&self) -> Option<&ElementRef> {
        match self {
            Self::SetStyle { target, .. }
            | Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::ToggleClass { target, .. }
            | Self::SetText { target, .. }
            | Self::SetInnerHtml { target, .. }
            | Self::Observe { target, .. }
            | Self::Unobserve { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetStyle {
                target,
                property,
                value,
            } => write!(f, "style {target} {}={value}", property.css_name()),
            Self::AddClass { target, class } => write!(f, "class+ {target} {class}"),
            Self::RemoveClass { target, class } => write!(f, "class- {target} {class}"),
            Self::ToggleClass { target, class } => write!(f, "class~ {target} {class}"),
            Self::SetText { target, text } => write!(f, "text {target} {text:?}"),
            Self::SetInnerHtml { target, html } => {
                write!(f, "html {target} ({} bytes)", html.len())
            }
            Self::ScrollTo { top, behavior } => {
                write!(f, "scroll-to {top} {}", behavior.as_str())
            }
            Self::PreventDefault => write!(f, "prevent-default"),
            Self::CreateObserver { observer, options } => write!(
                f,
                "observer {observer} threshold={} margin={}",
                options.threshold,
                options.root_margin_css()
            ),
            Self::Observe { observer, target } => write!(f, "observe {observer} {target}"),
            Self::Unobserve { observer, target } => write!(f, "unobserve {observer} {target}"),
            Self::SetTimer { timer, delay_ms } => write!(f, "timer {timer} +{delay_ms}ms"),
            Self::SpawnParticle { index, particle } => write!(
                f,
                "particle[{index}] {:.2}px at ({:.1}%, {:.1}%) opacity={:.2}",
                particle.diameter, particle.left, particle.top, particle.opacity
            ),
            Self::InjectStylesheet { css } => write!(f, "stylesheet ({} bytes)", css.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Landmark;

    #[test]
    fn test_command_display() {
        let cmd = Command::style(Landmark::ModalOverlay, StyleProperty::Display, "flex");
        assert_eq!(cmd.to_string(), "style #modal-overlay display=flex");

        let cmd = Command::ScrollTo {
            top: 420.0,
            behavior: ScrollBehavior::Smooth,
        };
        assert_eq!(cmd.to_string(), "scroll-to 420 smooth");

        let cmd = Command::SetTimer {
            timer: Timer::HeroReveal(2),
            delay_ms: 900,
        };
        assert_eq!(cmd.to_string(), "timer hero-reveal[2] +900ms");
    }

    #[test]
    fn test_command_target() {
        let cmd = Command::SetText {
            target: ElementRef::Counter(1),
            text: "3".to_string(),
        };
        assert_eq!(cmd.target(), Some(&ElementRef::Counter(1)));
        assert_eq!(Command::PreventDefault.target(), None);
    }

    #[test]
    fn test_command_serialization() {
        let cmd = Command::AddClass {
            target: ElementRef::Body,
            class: "loaded".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"op":"add_class","target":"body","class":"loaded"}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_particle_style() {
        let particle = Particle {
            diameter: 2.5,
            left: 10.0,
            top: 50.0,
            opacity: 0.3,
            duration: 12.0,
            delay: 1.5,
        };
        let styles = particle.style_declarations();
        assert!(styles.contains(&("width", "2.5px".to_string())));
        assert!(styles.contains(&("height", "2.5px".to_string())));
        assert!(styles.contains(&(
            "animation",
            "particleFloat 12s ease-in-out infinite".to_string()
        )));
        assert!(styles.contains(&("animation-delay", "1.5s".to_string())));
    }
}
