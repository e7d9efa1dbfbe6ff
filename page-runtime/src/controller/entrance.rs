//! # 入场动画
//!
//! 页面结构就绪时把所有 section 置为隐藏状态，首次进入视口后过渡到显示状态。
//! 显示是单向的：已显示的 section 再次相交不会产生任何指令。

use super::{Behavior, Context};
use crate::command::{Command, StyleProperty};
use crate::geometry::ObserverKind;
use crate::input::{EventKind, PageEvent};
use crate::layout::ElementRef;

/// section 入场动画
#[derive(Debug, Default)]
pub struct EntranceAnimator {
    /// 已显示的 section id（按显示顺序）
    revealed: Vec<String>,
}

impl EntranceAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed(&self) -> &[String] {
        &self.revealed
    }

    fn hide_all(&self, ctx: &mut Context<'_>) {
        if ctx.layout.sections.is_empty() {
            return;
        }
        let options = ctx.config.entrance.observer_options();
        ctx.emit(Command::CreateObserver {
            observer: ObserverKind::Entrance,
            options,
        });

        let hidden = format!("translateY({}px)", ctx.config.entrance.hidden_offset);
        let transition = ctx.config.entrance.transition.clone();
        let ids: Vec<String> = ctx.layout.sections.iter().map(|s| s.id.clone()).collect();
        for id in ids {
            let target = ElementRef::Section(id);
            ctx.emit(Command::style(target.clone(), StyleProperty::Opacity, "0"));
            ctx.emit(Command::style(
                target.clone(),
                StyleProperty::Transform,
                hidden.clone(),
            ));
            ctx.emit(Command::style(
                target.clone(),
                StyleProperty::Transition,
                transition.clone(),
            ));
            ctx.emit(Command::Observe {
                observer: ObserverKind::Entrance,
                target,
            });
        }
    }

    fn reveal(&mut self, id: &str, ctx: &mut Context<'_>) {
        if self.revealed.iter().any(|r| r == id) || ctx.layout.section(id).is_none() {
            return;
        }
        self.revealed.push(id.to_string());

        let target = ElementRef::section(id);
        ctx.emit(Command::style(target.clone(), StyleProperty::Opacity, "1"));
        ctx.emit(Command::style(
            target.clone(),
            StyleProperty::Transform,
            "translateY(0)",
        ));
        ctx.emit(Command::Unobserve {
            observer: ObserverKind::Entrance,
            target,
        });
    }
}

impl Behavior for EntranceAnimator {
    fn name(&self) -> &'static str {
        "entrance"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Ready, EventKind::Intersect]
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Ready { .. } => self.hide_all(ctx),
            PageEvent::Intersect {
                observer: ObserverKind::Entrance,
                entries,
            } => {
                for entry in entries {
                    if let ElementRef::Section(id) = &entry.target
                        && entry.is_intersecting
                    {
                        self.reveal(id, ctx);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;
    use crate::config::PageConfig;
    use crate::input::IntersectionEntry;
    use crate::layout::PageLayout;

    fn run(
        animator: &mut EntranceAnimator,
        layout: &PageLayout,
        event: &PageEvent,
    ) -> Vec<Command> {
        let config = PageConfig::default();
        let catalog = ComponentCatalog::builtin();
        let mut out = Vec::new();
        let mut ctx = Context::new(layout, &config, &catalog, &mut out);
        animator.handle(event, &mut ctx);
        out
    }

    fn intersect(entries: Vec<IntersectionEntry>) -> PageEvent {
        PageEvent::Intersect {
            observer: ObserverKind::Entrance,
            entries,
        }
    }

    #[test]
    fn test_ready_hides_every_section() {
        let layout = PageLayout::showcase();
        let mut animator = EntranceAnimator::new();
        let out = run(
            &mut animator,
            &layout,
            &PageEvent::Ready {
                layout: layout.clone(),
            },
        );
        // 1 个 observer + 每个 section 3 条样式 + 1 条 observe
        assert_eq!(out.len(), 1 + layout.sections.len() * 4);
        assert!(out.contains(&Command::style(
            ElementRef::section("about"),
            StyleProperty::Transform,
            "translateY(30px)"
        )));
        assert!(out.contains(&Command::style(
            ElementRef::section("about"),
            StyleProperty::Transition,
            "all 0.6s ease-out"
        )));
    }

    #[test]
    fn test_no_sections_no_observer() {
        let layout = PageLayout::default();
        let mut animator = EntranceAnimator::new();
        let out = run(
            &mut animator,
            &layout,
            &PageEvent::Ready {
                layout: layout.clone(),
            },
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_reveal_once() {
        let layout = PageLayout::showcase();
        let mut animator = EntranceAnimator::new();
        let event = intersect(vec![IntersectionEntry::visible(
            ElementRef::section("about"),
            0.2,
        )]);

        let out = run(&mut animator, &layout, &event);
        assert_eq!(
            out,
            vec![
                Command::style(ElementRef::section("about"), StyleProperty::Opacity, "1"),
                Command::style(
                    ElementRef::section("about"),
                    StyleProperty::Transform,
                    "translateY(0)"
                ),
                Command::Unobserve {
                    observer: ObserverKind::Entrance,
                    target: ElementRef::section("about"),
                },
            ]
        );

        // 再次相交不产生冲突样式
        assert!(run(&mut animator, &layout, &event).is_empty());
        assert_eq!(animator.revealed(), ["about".to_string()]);
    }

    #[test]
    fn test_leaving_viewport_does_not_hide() {
        let layout = PageLayout::showcase();
        let mut animator = EntranceAnimator::new();
        let out = run(
            &mut animator,
            &layout,
            &intersect(vec![IntersectionEntry::hidden(ElementRef::section("about"))]),
        );
        assert!(out.is_empty());
        assert!(animator.revealed().is_empty());
    }

    #[test]
    fn test_counter_observer_entries_ignored() {
        let layout = PageLayout::showcase();
        let mut animator = EntranceAnimator::new();
        let event = PageEvent::Intersect {
            observer: ObserverKind::Counter,
            entries: vec![IntersectionEntry::visible(ElementRef::section("about"), 1.0)],
        };
        assert!(run(&mut animator, &layout, &event).is_empty());
    }
}
