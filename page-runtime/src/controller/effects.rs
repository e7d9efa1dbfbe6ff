//! # 滚动与悬停效果
//!
//! 背景元素随滚动做视差位移；组件卡片悬停时加强阴影。纯装饰，不保存状态。

use super::{Behavior, Context};
use crate::command::{Command, StyleProperty};
use crate::input::{EventKind, PageEvent};
use crate::layout::{ElementRef, Landmark};

/// 参与视差的背景元素
const PARALLAX_LAYERS: [Landmark; 2] = [Landmark::RobotContainer, Landmark::ParticleContainer];

const CARD_GLOW_SHADOW: &str = "0 20px 40px rgba(0, 255, 255, 0.3)";
const CARD_REST_SHADOW: &str = "0 10px 30px rgba(0, 0, 0, 0.2)";

/// 视差位移的 transform 值
pub fn parallax_transform(offset: f64, rate: f64) -> String {
    let shift = offset * rate;
    // 避免输出 "-0px"
    let shift = if shift == 0.0 { 0.0 } else { shift };
    format!("translateY({shift}px)")
}

#[derive(Debug, Default)]
pub struct ScrollEffects;

impl ScrollEffects {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for ScrollEffects {
    fn name(&self) -> &'static str {
        "effects"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[
            EventKind::Scroll,
            EventKind::PointerEnter,
            EventKind::PointerLeave,
        ]
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Scroll { offset } => {
                let transform = parallax_transform(*offset, ctx.config.parallax.rate);
                for layer in PARALLAX_LAYERS {
                    if ctx.layout.has(layer) {
                        ctx.emit(Command::style(
                            layer,
                            StyleProperty::Transform,
                            transform.clone(),
                        ));
                    }
                }
            }
            PageEvent::PointerEnter {
                target: target @ ElementRef::Card(_),
            } => ctx.emit(Command::style(
                target.clone(),
                StyleProperty::BoxShadow,
                CARD_GLOW_SHADOW,
            )),
            PageEvent::PointerLeave {
                target: target @ ElementRef::Card(_),
            } => ctx.emit(Command::style(
                target.clone(),
                StyleProperty::BoxShadow,
                CARD_REST_SHADOW,
            )),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::config::PageConfig;
    use crate::layout::PageLayout;

    fn run(layout: &PageLayout, event: PageEvent) -> Vec<Command> {
        let config = PageConfig::default();
        let catalog = ComponentCatalog::builtin();
        let mut out = Vec::new();
        let mut ctx = Context::new(layout, &config, &catalog, &mut out);
        ScrollEffects::new().handle(&event, &mut ctx);
        out
    }

    #[test]
    fn test_parallax_transform() {
        assert_eq!(parallax_transform(500.0, -0.5), "translateY(-250px)");
        assert_eq!(parallax_transform(0.0, -0.5), "translateY(0px)");
        assert_eq!(parallax_transform(251.0, -0.5), "translateY(-125.5px)");
    }

    #[test]
    fn test_scroll_moves_both_layers() {
        let out = run(&PageLayout::showcase(), PageEvent::scroll(100.0));
        assert_eq!(
            out,
            vec![
                Command::style(
                    Landmark::RobotContainer,
                    StyleProperty::Transform,
                    "translateY(-50px)"
                ),
                Command::style(
                    Landmark::ParticleContainer,
                    StyleProperty::Transform,
                    "translateY(-50px)"
                ),
            ]
        );
    }

    #[test]
    fn test_missing_layer_skipped() {
        let layout = PageLayout::showcase().without_landmark(Landmark::RobotContainer);
        let out = run(&layout, PageEvent::scroll(100.0));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_card_hover() {
        let layout = PageLayout::showcase();
        let enter = run(
            &layout,
            PageEvent::PointerEnter {
                target: ElementRef::Card(1),
            },
        );
        assert_eq!(
            enter,
            vec![Command::style(
                ElementRef::Card(1),
                StyleProperty::BoxShadow,
                CARD_GLOW_SHADOW
            )]
        );

        let leave = run(
            &layout,
            PageEvent::PointerLeave {
                target: ElementRef::Card(1),
            },
        );
        assert_eq!(
            leave,
            vec![Command::style(
                ElementRef::Card(1),
                StyleProperty::BoxShadow,
                CARD_REST_SHADOW
            )]
        );
    }

    #[test]
    fn test_hover_on_non_card_ignored() {
        let out = run(
            &PageLayout::showcase(),
            PageEvent::PointerEnter {
                target: ElementRef::Landmark(Landmark::Navbar),
            },
        );
        assert!(out.is_empty());
    }
}
