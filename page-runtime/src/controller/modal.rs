//! # 组件详情模态框
//!
//! 页面上只有一个模态框。打开时渲染目录条目、显示遮罩并锁定背景滚动；
//! 关闭时隐藏遮罩并恢复滚动。Escape 键总是触发关闭。

use super::{Behavior, Context};
use crate::command::{Command, StyleProperty};
use crate::input::{EventKind, PageEvent};
use crate::layout::{ElementRef, Landmark};
use crate::state::ModalState;

/// 组件详情模态框
#[derive(Debug, Default)]
pub struct ModalDialog {
    /// 当前展示的组件标识
    open: Option<String>,
}

impl ModalDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        match &self.open {
            Some(component) => ModalState::Open {
                component: component.clone(),
            },
            None => ModalState::Closed,
        }
    }

    /// 打开组件详情
    ///
    /// 未知组件是空操作。已打开时直接替换内容。
    pub fn open(&mut self, component: &str, ctx: &mut Context<'_>) {
        let Some(entry) = ctx.catalog.get(component) else {
            return;
        };
        let html = entry.content.render_html();

        if ctx.layout.has(Landmark::ModalBody) {
            ctx.emit(Command::SetInnerHtml {
                target: Landmark::ModalBody.into(),
                html,
            });
        }
        if ctx.layout.has(Landmark::ModalOverlay) {
            ctx.emit(Command::style(
                Landmark::ModalOverlay,
                StyleProperty::Display,
                "flex",
            ));
        }
        ctx.emit(Command::style(
            ElementRef::Body,
            StyleProperty::Overflow,
            "hidden",
        ));
        self.open = Some(component.to_string());
    }

    /// 关闭模态框（幂等）
    pub fn close(&mut self, ctx: &mut Context<'_>) {
        if ctx.layout.has(Landmark::ModalOverlay) {
            ctx.emit(Command::style(
                Landmark::ModalOverlay,
                StyleProperty::Display,
                "none",
            ));
        }
        ctx.emit(Command::style(
            ElementRef::Body,
            StyleProperty::Overflow,
            "auto",
        ));
        self.open = None;
    }
}

impl Behavior for ModalDialog {
    fn name(&self) -> &'static str {
        "modal"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Click, EventKind::KeyDown]
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Click {
                target: ElementRef::Card(index),
            } => {
                let component = ctx
                    .layout
                    .cards
                    .get(*index)
                    .and_then(|card| card.component.clone());
                if let Some(component) = component {
                    self.open(&component, ctx);
                }
            }
            PageEvent::Click {
                target: ElementRef::Landmark(Landmark::ModalClose),
            } => self.close(ctx),
            PageEvent::KeyDown { key } if key == "Escape" => self.close(ctx),
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

    struct Fixture {
        layout: PageLayout,
        config: PageConfig,
        catalog: ComponentCatalog,
        modal: ModalDialog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                layout: PageLayout::showcase(),
                config: PageConfig::default(),
                catalog: ComponentCatalog::builtin(),
                modal: ModalDialog::new(),
            }
        }

        fn open(&mut self, component: &str) -> Vec<Command> {
            let mut out = Vec::new();
            let mut ctx = Context::new(&self.layout, &self.config, &self.catalog, &mut out);
            self.modal.open(component, &mut ctx);
            out
        }

        fn send(&mut self, event: PageEvent) -> Vec<Command> {
            let mut out = Vec::new();
            let mut ctx = Context::new(&self.layout, &self.config, &self.catalog, &mut out);
            self.modal.handle(&event, &mut ctx);
            out
        }
    }

    #[test]
    fn test_open_known_component() {
        let mut fixture = Fixture::new();
        for key in ["raspberry-pi", "camera", "servo", "ultrasonic"] {
            let out = fixture.open(key);
            let expected = fixture.catalog.get(key).unwrap().content.render_html();
            assert_eq!(
                out[0],
                Command::SetInnerHtml {
                    target: Landmark::ModalBody.into(),
                    html: expected,
                }
            );
            assert_eq!(
                out[1],
                Command::style(Landmark::ModalOverlay, StyleProperty::Display, "flex")
            );
            assert_eq!(
                out[2],
                Command::style(ElementRef::Body, StyleProperty::Overflow, "hidden")
            );
            assert_eq!(fixture.modal.state().component(), Some(key));
        }
    }

    #[test]
    fn test_open_unknown_is_noop() {
        let mut fixture = Fixture::new();
        fixture.open("camera");
        assert!(fixture.open("flux-capacitor").is_empty());
        assert_eq!(fixture.modal.state().component(), Some("camera"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut fixture = Fixture::new();
        fixture.open("servo");
        let first = fixture.send(PageEvent::key("Escape"));
        let second = fixture.send(PageEvent::key("Escape"));
        assert_eq!(first, second);
        assert_eq!(fixture.modal.state(), ModalState::Closed);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut fixture = Fixture::new();
        fixture.open("servo");
        assert!(fixture.send(PageEvent::key("Enter")).is_empty());
        assert!(fixture.modal.state().is_open());
    }

    #[test]
    fn test_card_click_opens_bound_component() {
        let mut fixture = Fixture::new();
        let out = fixture.send(PageEvent::click(ElementRef::Card(2)));
        assert_eq!(out.len(), 3);
        assert_eq!(fixture.modal.state().component(), Some("servo"));

        fixture.send(PageEvent::click(Landmark::ModalClose));
        assert!(!fixture.modal.state().is_open());
    }

    #[test]
    fn test_missing_overlay_still_locks_scroll() {
        let mut fixture = Fixture::new();
        fixture.layout = PageLayout::showcase().without_landmark(Landmark::ModalOverlay);
        let out = fixture.open("servo");
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Command::SetInnerHtml { .. }));
    }
}
