//! # Hero 依次显示
//!
//! 脚本启动时注入样式表，把四个 hero 元素置为隐藏；
//! 资源加载完成后按固定间隔依次显示。顺序只由延迟大小保证。

use super::{Behavior, Context};
use crate::command::{Command, StyleProperty, Timer};
use crate::config::PageConfig;
use crate::input::{EventKind, PageEvent};
use crate::layout::{ElementRef, Landmark};

/// 显示顺序
pub const HERO_SEQUENCE: [Landmark; 4] = [
    Landmark::HeroTitle,
    Landmark::HeroDescription,
    Landmark::HeroButtons,
    Landmark::RobotContainer,
];

/// 页面加载完成后加在 body 上的 class
pub const LOADED_CLASS: &str = "loaded";

/// hero 元素的初始隐藏样式表
pub fn hero_stylesheet() -> String {
    let selectors: Vec<&str> = HERO_SEQUENCE.iter().map(|l| l.selector()).collect();
    format!(
        "{} {{\n    opacity: 0;\n    transform: translateY(30px);\n    transition: all 0.8s ease-out;\n}}\n",
        selectors.join(",\n")
    )
}

#[derive(Debug, Default)]
pub struct HeroReveal {
    loaded: bool,
    /// 已显示的 hero 下标（按显示顺序）
    revealed: Vec<usize>,
}

impl HeroReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    fn on_load(&mut self, ctx: &mut Context<'_>) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        ctx.emit(Command::AddClass {
            target: ElementRef::Body,
            class: LOADED_CLASS.to_string(),
        });
        let stagger = ctx.config.reveal.stagger_ms;
        for stage in 0..HERO_SEQUENCE.len() {
            ctx.emit(Command::SetTimer {
                timer: Timer::HeroReveal(stage),
                delay_ms: stagger.saturating_mul(stage as u64 + 1),
            });
        }
    }

    fn reveal(&mut self, stage: usize, ctx: &mut Context<'_>) {
        let Some(landmark) = HERO_SEQUENCE.get(stage).copied() else {
            return;
        };
        if self.revealed.contains(&stage) {
            return;
        }
        self.revealed.push(stage);
        if !ctx.layout.has(landmark) {
            return;
        }
        ctx.emit(Command::style(landmark, StyleProperty::Opacity, "1"));
        ctx.emit(Command::style(
            landmark,
            StyleProperty::Transform,
            "translateY(0)",
        ));
    }
}

impl Behavior for HeroReveal {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Load, EventKind::Timer]
    }

    fn start(&mut self, _config: &PageConfig, out: &mut Vec<Command>) {
        out.push(Command::InjectStylesheet {
            css: hero_stylesheet(),
        });
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Load => self.on_load(ctx),
            PageEvent::TimerFired {
                timer: Timer::HeroReveal(stage),
            } => self.reveal(*stage, ctx),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::layout::PageLayout;

    fn run(hero: &mut HeroReveal, layout: &PageLayout, event: PageEvent) -> Vec<Command> {
        let config = PageConfig::default();
        let catalog = ComponentCatalog::builtin();
        let mut out = Vec::new();
        let mut ctx = Context::new(layout, &config, &catalog, &mut out);
        hero.handle(&event, &mut ctx);
        out
    }

    #[test]
    fn test_stylesheet() {
        insta::assert_snapshot!(hero_stylesheet(), @r"
        .hero-title,
        .hero-description,
        .hero-buttons,
        .robot-container {
            opacity: 0;
            transform: translateY(30px);
            transition: all 0.8s ease-out;
        }
        ");
    }

    #[test]
    fn test_load_schedules_staggered_reveals() {
        let mut hero = HeroReveal::new();
        let out = run(&mut hero, &PageLayout::showcase(), PageEvent::Load);
        let trace: Vec<String> = out.iter().map(ToString::to_string).collect();
        assert_eq!(
            trace,
            vec![
                "class+ body loaded",
                "timer hero-reveal[0] +300ms",
                "timer hero-reveal[1] +600ms",
                "timer hero-reveal[2] +900ms",
                "timer hero-reveal[3] +1200ms",
            ]
        );
        assert!(hero.is_loaded());

        // 第二次 load 不重复调度
        assert!(run(&mut hero, &PageLayout::showcase(), PageEvent::Load).is_empty());
    }

    #[test]
    fn test_huge_stagger_saturates() {
        let mut config = PageConfig::default();
        config.reveal.stagger_ms = u64::MAX / 2;
        let mut hero = HeroReveal::new();
        let layout = PageLayout::showcase();
        let catalog = ComponentCatalog::builtin();
        let mut out = Vec::new();
        let mut ctx = Context::new(&layout, &config, &catalog, &mut out);
        hero.handle(&PageEvent::Load, &mut ctx);

        let delays: Vec<u64> = out
            .iter()
            .filter_map(|c| match c {
                Command::SetTimer { delay_ms, .. } => Some(*delay_ms),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![u64::MAX / 2, u64::MAX - 1, u64::MAX, u64::MAX]);
    }

    #[test]
    fn test_reveal_stage() {
        let mut hero = HeroReveal::new();
        let out = run(
            &mut hero,
            &PageLayout::showcase(),
            PageEvent::timer(Timer::HeroReveal(3)),
        );
        assert_eq!(
            out,
            vec![
                Command::style(Landmark::RobotContainer, StyleProperty::Opacity, "1"),
                Command::style(
                    Landmark::RobotContainer,
                    StyleProperty::Transform,
                    "translateY(0)"
                ),
            ]
        );
        assert_eq!(hero.revealed(), [3]);
    }

    #[test]
    fn test_missing_hero_element_skipped() {
        let layout = PageLayout::showcase().without_landmark(Landmark::HeroButtons);
        let mut hero = HeroReveal::new();
        assert!(run(&mut hero, &layout, PageEvent::timer(Timer::HeroReveal(2))).is_empty());
        assert!(run(&mut hero, &layout, PageEvent::timer(Timer::HeroReveal(9))).is_empty());
    }
}
