//! # Layout 模块
//!
//! 描述 Host 在页面结构就绪时交给 Runtime 的页面布局。
//!
//! ## 设计说明
//!
//! - Runtime 不访问 DOM，只通过 [`PageLayout`] 了解页面上有哪些元素
//! - 事件和指令都通过 [`ElementRef`] 引用元素，Host 负责映射到真实节点
//! - 布局中缺失的元素不会导致初始化失败，相关行为直接跳过（见 `diagnostic`）

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 页面上固定存在（至多一个）的结构元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    /// 顶部导航栏
    Navbar,
    /// 移动端菜单按钮
    Hamburger,
    /// 导航菜单面板
    NavMenu,
    /// 模态框遮罩层
    ModalOverlay,
    /// 模态框内容容器
    ModalBody,
    /// 模态框关闭按钮
    ModalClose,
    /// 粒子背景容器
    ParticleContainer,
    /// 机器人插画容器
    RobotContainer,
    /// Hero 标题
    HeroTitle,
    /// Hero 描述
    HeroDescription,
    /// Hero 按钮组
    HeroButtons,
}

impl Landmark {
    /// 所有固定元素
    pub const ALL: [Landmark; 11] = [
        Landmark::Navbar,
        Landmark::Hamburger,
        Landmark::NavMenu,
        Landmark::ModalOverlay,
        Landmark::ModalBody,
        Landmark::ModalClose,
        Landmark::ParticleContainer,
        Landmark::RobotContainer,
        Landmark::HeroTitle,
        Landmark::HeroDescription,
        Landmark::HeroButtons,
    ];

    /// 页面标记中对应的 CSS 选择器
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Navbar => ".navbar",
            Self::Hamburger => ".hamburger",
            Self::NavMenu => ".nav-menu",
            Self::ModalOverlay => "#modal-overlay",
            Self::ModalBody => "#modal-body",
            Self::ModalClose => ".modal-close",
            Self::ParticleContainer => ".floating-particles",
            Self::RobotContainer => ".robot-container",
            Self::HeroTitle => ".hero-title",
            Self::HeroDescription => ".hero-description",
            Self::HeroButtons => ".hero-buttons",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// 元素引用
///
/// 事件与指令共用的元素句柄。列表类元素（导航链接、计数器、卡片、粒子）
/// 以其在 [`PageLayout`] 中的下标引用。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRef {
    /// `document.body`
    Body,
    /// 固定结构元素
    Landmark(Landmark),
    /// 按 id 引用的 section
    Section(String),
    /// 第 n 个导航链接
    NavLink(usize),
    /// 第 n 个计数器
    Counter(usize),
    /// 第 n 张组件卡片
    Card(usize),
    /// 第 n 个装饰粒子
    Particle(usize),
}

impl ElementRef {
    /// 按 id 引用 section
    pub fn section(id: impl Into<String>) -> Self {
        Self::Section(id.into())
    }
}

impl From<Landmark> for ElementRef {
    fn from(landmark: Landmark) -> Self {
        Self::Landmark(landmark)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Landmark(l) => write!(f, "{l}"),
            Self::Section(id) => write!(f, "section#{id}"),
            Self::NavLink(i) => write!(f, ".nav-link[{i}]"),
            Self::Counter(i) => write!(f, ".stat-number[{i}]"),
            Self::Card(i) => write!(f, ".component-card[{i}]"),
            Self::Particle(i) => write!(f, "particle[{i}]"),
        }
    }
}

/// 视口尺寸（CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// 元素的纵向几何信息（相对文档顶部）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// section 信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// 元素 id（导航链接的锚点）；匿名 section 为 [`anonymous_section_id`] 合成的键
    pub id: String,
    #[serde(flatten)]
    pub rect: Rect,
    /// 页面上没有 id，不能作为锚点
    #[serde(default)]
    pub anonymous: bool,
}

/// 匿名 section 的合成键
///
/// 包含空白字符，不可能与合法的 HTML id 重名。
pub fn anonymous_section_id(index: usize) -> String {
    format!("section {index}")
}

/// 导航链接信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLinkInfo {
    /// 原始 `href` 属性，如 `#about`
    pub href: String,
}

/// 计数器信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterInfo {
    /// 原始 `data-target` 属性
    pub target: String,
    #[serde(flatten)]
    pub rect: Rect,
}

/// 组件卡片信息
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardInfo {
    /// 点击卡片时打开的组件标识
    #[serde(default)]
    pub component: Option<String>,
}

/// 页面布局
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub viewport: Viewport,
    /// 页面上存在的固定元素
    #[serde(default)]
    pub landmarks: BTreeSet<Landmark>,
    /// 按文档顺序排列的 section
    #[serde(default)]
    pub sections: Vec<SectionInfo>,
    #[serde(default)]
    pub nav_links: Vec<NavLinkInfo>,
    #[serde(default)]
    pub counters: Vec<CounterInfo>,
    #[serde(default)]
    pub cards: Vec<CardInfo>,
}

impl PageLayout {
    /// 创建空布局
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// 机器人展示页的标准布局
    ///
    /// 包含全部固定元素、四个 section、对应的导航链接、四个统计计数器和四张组件卡片。
    pub fn showcase() -> Self {
        Self::new(Viewport::default())
            .with_landmarks(Landmark::ALL)
            .with_section("home", 0.0, 720.0)
            .with_section("about", 800.0, 600.0)
            .with_section("components", 1500.0, 1200.0)
            .with_section("contact", 2800.0, 500.0)
            .with_nav_link("#home")
            .with_nav_link("#about")
            .with_nav_link("#components")
            .with_nav_link("#contact")
            .with_counter("4", 1100.0, 60.0)
            .with_counter("1500", 1100.0, 60.0)
            .with_counter("360", 1100.0, 60.0)
            .with_counter("24", 1100.0, 60.0)
            .with_card(Some("raspberry-pi"))
            .with_card(Some("camera"))
            .with_card(Some("servo"))
            .with_card(Some("ultrasonic"))
    }

    pub fn with_landmarks(mut self, landmarks: impl IntoIterator<Item = Landmark>) -> Self {
        self.landmarks.extend(landmarks);
        self
    }

    pub fn without_landmark(mut self, landmark: Landmark) -> Self {
        self.landmarks.remove(&landmark);
        self
    }

    pub fn with_section(mut self, id: impl Into<String>, top: f64, height: f64) -> Self {
        self.sections.push(SectionInfo {
            id: id.into(),
            rect: Rect::new(top, height),
            anonymous: false,
        });
        self
    }

    /// 追加没有 id 的 section，键按文档位置合成
    pub fn with_anonymous_section(mut self, top: f64, height: f64) -> Self {
        self.sections.push(SectionInfo {
            id: anonymous_section_id(self.sections.len()),
            rect: Rect::new(top, height),
            anonymous: true,
        });
        self
    }

    pub fn with_nav_link(mut self, href: impl Into<String>) -> Self {
        self.nav_links.push(NavLinkInfo { href: href.into() });
        self
    }

    pub fn with_counter(mut self, target: impl Into<String>, top: f64, height: f64) -> Self {
        self.counters.push(CounterInfo {
            target: target.into(),
            rect: Rect::new(top, height),
        });
        self
    }

    pub fn with_card(mut self, component: Option<&str>) -> Self {
        self.cards.push(CardInfo {
            component: component.map(str::to_string),
        });
        self
    }

    /// 页面上是否存在该固定元素
    pub fn has(&self, landmark: Landmark) -> bool {
        self.landmarks.contains(&landmark)
    }

    /// 按 id 查找 section
    pub fn section(&self, id: &str) -> Option<&SectionInfo> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// 按锚点 id 查找 section，匿名 section 不参与
    pub fn anchor(&self, id: &str) -> Option<&SectionInfo> {
        self.sections.iter().find(|s| !s.anonymous && s.id == id)
    }

    /// 用重新测量的布局刷新几何信息
    ///
    /// 只更新视口、section 与计数器的位置；元素集合以 `Ready` 时为准，
    /// 测量结果中多出或缺少的元素被忽略。
    pub fn update_geometry(&mut self, measured: &PageLayout) {
        self.viewport = measured.viewport;
        for section in &mut self.sections {
            if let Some(m) = measured.section(&section.id) {
                section.rect = m.rect;
            }
        }
        for (counter, m) in self.counters.iter_mut().zip(&measured.counters) {
            counter.rect = m.rect;
        }
    }

    /// 布局中是否存在该元素
    ///
    /// 粒子由 Runtime 自己创建，不在布局中，总是返回 `false`。
    pub fn contains(&self, element: &ElementRef) -> bool {
        match element {
            ElementRef::Body => true,
            ElementRef::Landmark(l) => self.has(*l),
            ElementRef::Section(id) => self.section(id).is_some(),
            ElementRef::NavLink(i) => *i < self.nav_links.len(),
            ElementRef::Counter(i) => *i < self.counters.len(),
            ElementRef::Card(i) => *i < self.cards.len(),
            ElementRef::Particle(_) => false,
        }
    }

    /// 可被观察元素的几何信息
    pub fn rect_of(&self, element: &ElementRef) -> Option<Rect> {
        match element {
            ElementRef::Section(id) => self.section(id).map(|s| s.rect),
            ElementRef::Counter(i) => self.counters.get(*i).map(|c| c.rect),
            _ => None,
        }
    }
}
