//! # Web Host
//!
//! 展示页的浏览器宿主。
//!
//! ## 架构说明
//!
//! 浏览器事件经由 [`dispatch`] 转换为 [`PageEvent`] 交给 Runtime，
//! 返回的 Command 由 [`apply`] 模块在真实 DOM 上执行。
//!
//! 页面全局函数 `openModal`、`closeModal`、`scrollToSection` 启动时挂到 `window` 上，
//! 可以直接写在 HTML 的 `onclick` 属性中。
//!
//! 图片、字体加载完成和窗口尺寸变化都会重新测量布局并发送 `Relayout`。

pub mod apply;
pub mod console;
pub mod scan;

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentReadyState, Event, IntersectionObserver, KeyboardEvent, Window};

use page_runtime::{
    Command, ComponentCatalog, ElementRef, Landmark, ObserverKind, PageConfig, PageController,
    PageError, PageEvent, PageLayout, PageResult,
};

use scan::ElementTable;

/// 页面运行时与 DOM 句柄
pub struct WebPage {
    pub window: Window,
    pub document: Document,
    pub controller: PageController,
    pub elements: ElementTable,
    pub observers: BTreeMap<ObserverKind, IntersectionObserver>,
}

thread_local! {
    static PAGE: RefCell<Option<WebPage>> = const { RefCell::new(None) };
}

/// 访问页面；未启动或正在被借用时返回 `None`
pub(crate) fn with_page<R>(f: impl FnOnce(&mut WebPage) -> R) -> Option<R> {
    PAGE.with(|cell| {
        let mut page = cell.try_borrow_mut().ok()?;
        page.as_mut().map(f)
    })
}

/// 分发事件并执行返回的指令
///
/// 返回值表示是否需要阻止浏览器默认行为。
pub(crate) fn dispatch(event: PageEvent) -> bool {
    let kind = event.kind();
    run(|controller| controller.dispatch(event)).unwrap_or_else(|e| {
        warn!(event = ?kind, error = %e, "事件被拒绝");
        false
    })
}

fn run(
    f: impl FnOnce(&mut PageController) -> PageResult<Vec<Command>>,
) -> PageResult<bool> {
    let Some(commands) = with_page(|page| f(&mut page.controller)) else {
        return Ok(false);
    };
    Ok(apply_all(commands?))
}

fn apply_all(commands: Vec<Command>) -> bool {
    let mut prevented = false;
    for command in &commands {
        if matches!(command, Command::PreventDefault) {
            prevented = true;
            continue;
        }
        if let Some(Err(e)) = with_page(|page| apply::execute(command, page)) {
            warn!(command = ?command, error = ?e, "指令执行失败");
        }
    }
    prevented
}

//=============================================================================
// 启动
//=============================================================================

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::init(Level::INFO);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("没有 window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("没有 document"))?;

    let mut controller = PageController::new(PageConfig::default(), ComponentCatalog::builtin());
    let commands = controller.start();
    PAGE.with(|cell| {
        *cell.borrow_mut() = Some(WebPage {
            window: window.clone(),
            document: document.clone(),
            controller,
            elements: ElementTable::default(),
            observers: BTreeMap::new(),
        });
    });
    apply_all(commands);
    expose_globals(&window)?;
    info!("页面运行时已启动");

    match document.ready_state() {
        DocumentReadyState::Loading => {
            listen(&document, "DOMContentLoaded", |_| on_ready())?;
        }
        _ => on_ready(),
    }
    match document.ready_state() {
        DocumentReadyState::Complete => on_load(),
        _ => listen(&window, "load", |_| on_load())?,
    }
    Ok(())
}

/// 页面结构就绪：扫描布局、挂接监听器、通知 Runtime
fn on_ready() {
    let Some((layout, handles)) = with_page(|page| {
        let (layout, table) = scan::scan_page(&page.window, &page.document);
        let handles: Vec<_> = table
            .iter()
            .map(|(element, handle)| (element.clone(), handle.clone()))
            .collect();
        page.elements = table;
        (layout, handles)
    }) else {
        return;
    };

    if let Err(e) = attach_listeners(&handles) {
        warn!(error = ?e, "事件监听挂接失败");
    }
    info!(
        sections = layout.sections.len(),
        counters = layout.counters.len(),
        cards = layout.cards.len(),
        "页面布局已扫描"
    );
    dispatch(PageEvent::Ready { layout });
}

/// 资源加载完成：图片和字体改变了高度，先刷新几何再通知加载
fn on_load() {
    relayout();
    dispatch(PageEvent::Load);
}

/// 重新测量布局并交给 Runtime
fn relayout() {
    if let Some(layout) = measure() {
        debug!(sections = layout.sections.len(), "布局已重新测量");
        dispatch(PageEvent::Relayout { layout });
    }
}

fn measure() -> Option<PageLayout> {
    with_page(|page| scan::scan_page(&page.window, &page.document).0)
}

fn attach_listeners(handles: &[(ElementRef, web_sys::HtmlElement)]) -> Result<(), JsValue> {
    for (element, handle) in handles {
        let clickable = matches!(
            element,
            ElementRef::NavLink(_)
                | ElementRef::Card(_)
                | ElementRef::Landmark(Landmark::Hamburger | Landmark::ModalClose)
        );
        if clickable {
            let target = element.clone();
            listen(handle, "click", move |event| {
                if dispatch(PageEvent::click(target.clone())) {
                    event.prevent_default();
                }
            })?;
        }
        if let ElementRef::Card(_) = element {
            let target = element.clone();
            listen(handle, "mouseenter", move |_| {
                dispatch(PageEvent::PointerEnter {
                    target: target.clone(),
                });
            })?;
            let target = element.clone();
            listen(handle, "mouseleave", move |_| {
                dispatch(PageEvent::PointerLeave {
                    target: target.clone(),
                });
            })?;
        }
    }

    let Some((window, document)) = with_page(|page| (page.window.clone(), page.document.clone()))
    else {
        return Ok(());
    };
    let scroll_source = window.clone();
    listen(&window, "scroll", move |_| {
        dispatch(PageEvent::scroll(scroll_source.scroll_y().unwrap_or(0.0)));
    })?;
    listen(&window, "resize", |_| relayout())?;
    listen(&document, "keydown", |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            dispatch(PageEvent::key(key.key()));
        }
    })?;
    Ok(())
}

/// 挂接与页面同生命周期的监听器
fn listen(
    target: &web_sys::EventTarget,
    name: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

//=============================================================================
// 页面全局函数
//=============================================================================

/// 把页面全局函数挂到 `window` 上
fn expose_globals(window: &Window) -> Result<(), JsValue> {
    let open = Closure::<dyn Fn(String)>::new(|component: String| {
        if let Err(e) = open_modal(&component) {
            warn!(component = %component, error = ?e, "openModal 失败");
        }
    });
    let close = Closure::<dyn Fn()>::new(|| {
        if let Err(e) = close_modal() {
            warn!(error = ?e, "closeModal 失败");
        }
    });
    let scroll = Closure::<dyn Fn(String)>::new(|id: String| {
        if let Err(e) = scroll_to_section(&id) {
            warn!(section = %id, error = ?e, "scrollToSection 失败");
        }
    });

    for (name, function) in [
        (GLOBAL_OPEN_MODAL, open.as_ref()),
        (GLOBAL_CLOSE_MODAL, close.as_ref()),
        (GLOBAL_SCROLL_TO_SECTION, scroll.as_ref()),
    ] {
        js_sys::Reflect::set(window.as_ref(), &JsValue::from_str(name), function)?;
    }
    open.forget();
    close.forget();
    scroll.forget();
    Ok(())
}

const GLOBAL_OPEN_MODAL: &str = "openModal";
const GLOBAL_CLOSE_MODAL: &str = "closeModal";
const GLOBAL_SCROLL_TO_SECTION: &str = "scrollToSection";

/// 打开组件详情弹窗
#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(component: &str) -> Result<(), JsValue> {
    run(|controller| controller.open_modal(component))
        .map(|_| ())
        .map_err(to_js)
}

/// 关闭组件详情弹窗
#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal() -> Result<(), JsValue> {
    run(|controller| controller.close_modal())
        .map(|_| ())
        .map_err(to_js)
}

/// 平滑滚动到指定 section
#[wasm_bindgen(js_name = scrollToSection)]
pub fn scroll_to_section(id: &str) -> Result<(), JsValue> {
    run(|controller| controller.scroll_to_section(id))
        .map(|_| ())
        .map_err(to_js)
}

fn to_js(error: PageError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_page_nothing_runs() {
        // 未启动时全局函数不报错也不产生指令
        assert!(with_page(|_| ()).is_none());
        assert!(!dispatch(PageEvent::Load));
        assert!(open_modal("button").is_ok());
        assert!(close_modal().is_ok());
    }

    #[test]
    fn test_apply_all_collects_prevent_default() {
        assert!(apply_all(vec![Command::PreventDefault]));
        assert!(!apply_all(Vec::new()));
    }
}
