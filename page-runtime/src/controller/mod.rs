//! # Controller 模块
//!
//! 页面交互控制器。
//!
//! ## 执行模型
//!
//! ```text
//! start()            -> Vec<Command>              脚本启动时调用一次
//! dispatch(event)    -> Result<Vec<Command>, _>   每个 Host 事件调用一次
//! ```
//!
//! 每个行为（入场动画、导航、计数器……）实现 [`Behavior`]，声明自己订阅的
//! [`EventKind`]。控制器构造时建立订阅表，事件只会按注册顺序分发给订阅者。
//! 行为之间不直接通信，只通过各自产生的 [`Command`] 影响同一个页面。
//!
//! ## 模块结构
//!
//! - [`entrance`]：section 入场动画
//! - [`navigation`]：导航栏外观、移动端菜单、锚点平滑滚动
//! - [`counter`]：统计数字计数动画
//! - [`modal`]：组件详情模态框
//! - [`effects`]：视差与卡片悬停效果
//! - [`particles`]：装饰粒子
//! - [`reveal`]：加载完成后的 hero 依次显示

pub mod counter;
pub mod effects;
pub mod entrance;
pub mod modal;
pub mod navigation;
pub mod particles;
pub mod reveal;

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

use crate::catalog::ComponentCatalog;
use crate::command::Command;
use crate::config::PageConfig;
use crate::error::{PageError, PageResult};
use crate::input::{EventKind, PageEvent};
use crate::layout::PageLayout;
use crate::state::PageState;

use counter::CounterAnimator;
use effects::ScrollEffects;
use entrance::EntranceAnimator;
use modal::ModalDialog;
use navigation::NavigationController;
use particles::ParticleField;
use reveal::HeroReveal;

/// 行为处理事件时可用的上下文
///
/// 只读访问布局、配置和目录，只写访问本次 dispatch 的指令列表。
pub struct Context<'a> {
    pub layout: &'a PageLayout,
    pub config: &'a PageConfig,
    pub catalog: &'a ComponentCatalog,
    commands: &'a mut Vec<Command>,
}

impl<'a> Context<'a> {
    pub fn new(
        layout: &'a PageLayout,
        config: &'a PageConfig,
        catalog: &'a ComponentCatalog,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            layout,
            config,
            catalog,
            commands,
        }
    }

    /// 发出一条指令
    pub fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// 页面行为
pub trait Behavior {
    /// 行为名称（用于调试输出）
    fn name(&self) -> &'static str;

    /// 订阅的事件种类
    fn subscriptions(&self) -> &'static [EventKind];

    /// 脚本启动时调用，此时页面结构尚不可用
    fn start(&mut self, _config: &PageConfig, _out: &mut Vec<Command>) {}

    /// 处理订阅的事件
    fn handle(&mut self, event: &PageEvent, ctx: &mut Context<'_>);
}

/// 行为标识，决定注册顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum BehaviorId {
    Entrance,
    Navigation,
    Counters,
    Modal,
    Effects,
    Particles,
    Reveal,
}

impl BehaviorId {
    const ALL: [BehaviorId; 7] = [
        BehaviorId::Entrance,
        BehaviorId::Navigation,
        BehaviorId::Counters,
        BehaviorId::Modal,
        BehaviorId::Effects,
        BehaviorId::Particles,
        BehaviorId::Reveal,
    ];
}

/// 所有行为实例
struct Behaviors {
    entrance: EntranceAnimator,
    navigation: NavigationController,
    counters: CounterAnimator,
    modal: ModalDialog,
    effects: ScrollEffects,
    particles: ParticleField,
    reveal: HeroReveal,
}

impl Behaviors {
    fn get_mut(&mut self, id: BehaviorId) -> &mut dyn Behavior {
        match id {
            BehaviorId::Entrance => &mut self.entrance,
            BehaviorId::Navigation => &mut self.navigation,
            BehaviorId::Counters => &mut self.counters,
            BehaviorId::Modal => &mut self.modal,
            BehaviorId::Effects => &mut self.effects,
            BehaviorId::Particles => &mut self.particles,
            BehaviorId::Reveal => &mut self.reveal,
        }
    }
}

/// 页面交互控制器
///
/// # 使用示例
///
/// ```ignore
/// let mut controller = PageController::new(PageConfig::default(), ComponentCatalog::builtin());
/// host.execute_all(controller.start());
///
/// // DOMContentLoaded
/// host.execute_all(controller.dispatch(PageEvent::Ready { layout })?);
///
/// // 之后每个 DOM 事件 / 定时器回调
/// host.execute_all(controller.dispatch(event)?);
/// ```
pub struct PageController {
    config: PageConfig,
    catalog: ComponentCatalog,
    layout: Option<PageLayout>,
    started: bool,
    behaviors: Behaviors,
    /// 事件种类 -> 订阅者（按注册顺序）
    subscriptions: BTreeMap<EventKind, Vec<BehaviorId>>,
}

impl PageController {
    /// 创建控制器
    ///
    /// 粒子随机数使用 `config.particles.seed`，未设置时取系统熵。
    pub fn new(config: PageConfig, catalog: ComponentCatalog) -> Self {
        let rng = match config.particles.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, catalog, rng)
    }

    /// 使用指定随机数生成器创建控制器
    pub fn with_rng(config: PageConfig, catalog: ComponentCatalog, rng: StdRng) -> Self {
        let mut behaviors = Behaviors {
            entrance: EntranceAnimator::new(),
            navigation: NavigationController::new(),
            counters: CounterAnimator::new(),
            modal: ModalDialog::new(),
            effects: ScrollEffects::new(),
            particles: ParticleField::new(rng),
            reveal: HeroReveal::new(),
        };

        let mut subscriptions: BTreeMap<EventKind, Vec<BehaviorId>> = BTreeMap::new();
        for id in BehaviorId::ALL {
            for kind in behaviors.get_mut(id).subscriptions() {
                subscriptions.entry(*kind).or_default().push(id);
            }
        }

        Self {
            config,
            catalog,
            layout: None,
            started: false,
            behaviors,
            subscriptions,
        }
    }

    /// 脚本启动
    ///
    /// 申请粒子定时器、注入 hero 初始隐藏样式。重复调用返回空列表。
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.started {
            return commands;
        }
        self.started = true;
        for id in BehaviorId::ALL {
            self.behaviors
                .get_mut(id)
                .start(&self.config, &mut commands);
        }
        commands
    }

    /// 分发一个页面事件
    ///
    /// # 错误
    ///
    /// - 页面结构就绪前收到非 `Ready` 事件：[`PageError::NotReady`]
    /// - 重复的 `Ready`：[`PageError::AlreadyReady`]
    ///
    /// `Relayout` 只刷新控制器持有的几何信息，不产生指令。
    /// - 事件指向布局中不存在的元素：[`PageError::UnknownElement`]
    pub fn dispatch(&mut self, event: PageEvent) -> PageResult<Vec<Command>> {
        let kind = event.kind();

        if let PageEvent::Ready { layout } = &event {
            if self.layout.is_some() {
                return Err(PageError::AlreadyReady);
            }
            self.layout = Some(layout.clone());
        }

        if let PageEvent::Relayout { layout: measured } = &event {
            let layout = self.layout.as_mut().ok_or_else(|| PageError::NotReady {
                event: kind.to_string(),
            })?;
            layout.update_geometry(measured);
            return Ok(Vec::new());
        }

        let Some(layout) = self.layout.as_ref() else {
            return Err(PageError::NotReady {
                event: kind.to_string(),
            });
        };

        if let Some(target) = event.target()
            && !layout.contains(target)
        {
            return Err(PageError::UnknownElement {
                element: target.clone(),
            });
        }

        let mut commands = Vec::new();
        let mut ctx = Context::new(layout, &self.config, &self.catalog, &mut commands);
        if let Some(ids) = self.subscriptions.get(&kind) {
            for id in ids {
                self.behaviors.get_mut(*id).handle(&event, &mut ctx);
            }
        }
        Ok(commands)
    }

    /// 打开组件详情模态框
    ///
    /// 未知组件不产生任何指令，模态框状态保持不变。
    pub fn open_modal(&mut self, component: &str) -> PageResult<Vec<Command>> {
        let mut commands = Vec::new();
        let layout = ready_layout(&self.layout, "open_modal")?;
        let mut ctx = Context::new(layout, &self.config, &self.catalog, &mut commands);
        self.behaviors.modal.open(component, &mut ctx);
        Ok(commands)
    }

    /// 关闭模态框（幂等）
    pub fn close_modal(&mut self) -> PageResult<Vec<Command>> {
        let mut commands = Vec::new();
        let layout = ready_layout(&self.layout, "close_modal")?;
        let mut ctx = Context::new(layout, &self.config, &self.catalog, &mut commands);
        self.behaviors.modal.close(&mut ctx);
        Ok(commands)
    }

    /// 平滑滚动到指定 section，目标不存在时不产生指令
    pub fn scroll_to_section(&self, id: &str) -> PageResult<Vec<Command>> {
        let layout = ready_layout(&self.layout, "scroll_to_section")?;
        Ok(navigation::scroll_to_section(layout, &self.config, id)
            .into_iter()
            .collect())
    }

    /// 页面结构是否就绪
    pub fn is_ready(&self) -> bool {
        self.layout.is_some()
    }

    pub fn layout(&self) -> Option<&PageLayout> {
        self.layout.as_ref()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// 订阅了某类事件的行为名称（按分发顺序）
    pub fn subscribers(&mut self, kind: EventKind) -> Vec<&'static str> {
        let ids = self.subscriptions.get(&kind).cloned().unwrap_or_default();
        ids.into_iter()
            .map(|id| self.behaviors.get_mut(id).name())
            .collect()
    }

    /// 汇总当前状态快照
    pub fn state(&self) -> PageState {
        let b = &self.behaviors;
        PageState {
            started: self.started,
            ready: self.layout.is_some(),
            loaded: b.reveal.is_loaded(),
            menu_open: b.navigation.menu_open(),
            navbar: b.navigation.appearance(),
            revealed_sections: b.entrance.revealed().to_vec(),
            counters: b.counters.states(),
            modal: b.modal.state(),
            hero_revealed: b.reveal.revealed().to_vec(),
            particles: b.particles.spawned(),
        }
    }
}

fn ready_layout<'a>(layout: &'a Option<PageLayout>, operation: &str) -> PageResult<&'a PageLayout> {
    layout.as_ref().ok_or_else(|| PageError::NotReady {
        event: operation.to_string(),
    })
}

impl Default for PageController {
    fn default() -> Self {
        Self::new(PageConfig::default(), ComponentCatalog::builtin())
    }
}
