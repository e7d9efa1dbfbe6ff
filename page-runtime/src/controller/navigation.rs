//! # 导航控制
//!
//! - 滚动：按滚动位置切换导航栏外观
//! - 菜单按钮：切换移动端菜单的 `active` 状态
//! - 导航链接：阻止默认跳转，平滑滚动到锚点 section，并收起菜单

use super::{Behavior, Context};
use crate::command::{Command, ScrollBehavior, StyleProperty};
use crate::config::PageConfig;
use crate::input::{EventKind, PageEvent};
use crate::layout::{ElementRef, Landmark, PageLayout};
use crate::state::NavbarAppearance;

const ACTIVE_CLASS: &str = "active";

const TRANSLUCENT_BACKGROUND: &str = "rgba(10, 10, 10, 0.95)";
const SOLID_BACKGROUND: &str = "rgba(10, 10, 10, 0.98)";
const SOLID_SHADOW: &str = "0 2px 20px rgba(0, 255, 255, 0.1)";

/// 从 `href` 取锚点 id：去掉开头的 `#`
pub fn anchor_id(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

/// 生成滚动到 section 的指令，目标顶部对齐到视口顶部下方 `anchor_offset` 处
///
/// 目标不存在时返回 `None`。
pub fn scroll_to_section(layout: &PageLayout, config: &PageConfig, id: &str) -> Option<Command> {
    let section = layout.anchor(id)?;
    let top = (section.rect.top - config.navigation.anchor_offset).max(0.0);
    Some(Command::ScrollTo {
        top,
        behavior: ScrollBehavior::Smooth,
    })
}

/// 导航控制器
#[derive(Debug, Default)]
pub struct NavigationController {
    menu_open: bool,
    /// 最近一次应用的外观，首次滚动前为 `None`
    appearance: Option<NavbarAppearance>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn appearance(&self) -> Option<NavbarAppearance> {
        self.appearance
    }

    fn on_scroll(&mut self, offset: f64, ctx: &mut Context<'_>) {
        if !ctx.layout.has(Landmark::Navbar) {
            return;
        }
        let next = if offset >= ctx.config.navigation.scroll_threshold {
            NavbarAppearance::Solid
        } else {
            NavbarAppearance::Translucent
        };
        // 外观不变时省略指令，最终样式与逐事件更新一致
        if self.appearance == Some(next) {
            return;
        }
        self.appearance = Some(next);

        let (background, shadow) = match next {
            NavbarAppearance::Solid => (SOLID_BACKGROUND, SOLID_SHADOW),
            NavbarAppearance::Translucent => (TRANSLUCENT_BACKGROUND, "none"),
        };
        ctx.emit(Command::style(
            Landmark::Navbar,
            StyleProperty::Background,
            background,
        ));
        ctx.emit(Command::style(
            Landmark::Navbar,
            StyleProperty::BoxShadow,
            shadow,
        ));
    }

    fn toggle_menu(&mut self, ctx: &mut Context<'_>) {
        self.menu_open = !self.menu_open;
        for landmark in [Landmark::Hamburger, Landmark::NavMenu] {
            if ctx.layout.has(landmark) {
                ctx.emit(Command::ToggleClass {
                    target: landmark.into(),
                    class: ACTIVE_CLASS.to_string(),
                });
            }
        }
    }

    fn collapse_menu(&mut self, ctx: &mut Context<'_>) {
        self.menu_open = false;
        for landmark in [Landmark::Hamburger, Landmark::NavMenu] {
            if ctx.layout.has(landmark) {
                ctx.emit(Command::RemoveClass {
                    target: landmark.into(),
                    class: ACTIVE_CLASS.to_string(),
                });
            }
        }
    }

    fn follow_link(&mut self, index: usize, ctx: &mut Context<'_>) {
        let layout = ctx.layout;
        let Some(link) = layout.nav_links.get(index) else {
            return;
        };
        ctx.emit(Command::PreventDefault);
        if let Some(scroll) = scroll_to_section(layout, ctx.config, anchor_id(&link.href)) {
            ctx.emit(scroll);
        }
        self.collapse_menu(ctx);
    }
}

impl Behavior for NavigationController {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Scroll, EventKind::Click]
    }

    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>) {
        match event {
            PageEvent::Scroll { offset } => self.on_scroll(*offset, ctx),
            PageEvent::Click {
                target: ElementRef::Landmark(Landmark::Hamburger),
            } => self.toggle_menu(ctx),
            PageEvent::Click {
                target: ElementRef::NavLink(index),
            } => self.follow_link(*index, ctx),
            _ => {}
        }
    }
}
