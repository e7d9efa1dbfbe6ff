//! # Apply 模块
//!
//! 在真实 DOM 上执行 Runtime 发出的 Command。
//!
//! 目标元素不存在时跳过指令并记录日志，与无头宿主的行为一致。

use js_sys::{Array, Function};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    ScrollToOptions,
};

use page_runtime::{
    Command, ElementRef, IntersectionEntry, Landmark, ObserverKind, ObserverOptions, PageEvent,
    ScrollBehavior,
};

use crate::WebPage;

/// 执行单条指令
///
/// `PreventDefault` 由事件回调自行处理，这里忽略。
pub fn execute(command: &Command, page: &mut WebPage) -> Result<(), JsValue> {
    debug!(command = ?command, "执行指令");
    match command {
        Command::SetStyle {
            target,
            property,
            value,
        } => {
            if let Some(element) = lookup(page, target) {
                element.style().set_property(property.css_name(), value)?;
            }
        }
        Command::AddClass { target, class } => {
            if let Some(element) = lookup(page, target) {
                element.class_list().add_1(class)?;
            }
        }
        Command::RemoveClass { target, class } => {
            if let Some(element) = lookup(page, target) {
                element.class_list().remove_1(class)?;
            }
        }
        Command::ToggleClass { target, class } => {
            if let Some(element) = lookup(page, target) {
                element.class_list().toggle(class)?;
            }
        }
        Command::SetText { target, text } => {
            if let Some(element) = lookup(page, target) {
                element.set_text_content(Some(text));
            }
        }
        Command::SetInnerHtml { target, html } => {
            if let Some(element) = lookup(page, target) {
                element.set_inner_html(html);
            }
        }
        Command::ScrollTo { top, behavior } => {
            let options = ScrollToOptions::new();
            options.set_top(*top);
            options.set_behavior(web_behavior(*behavior));
            page.window.scroll_to_with_scroll_to_options(&options);
        }
        Command::PreventDefault => {}
        Command::CreateObserver { observer, options } => {
            let handle = create_observer(*observer, options)?;
            if let Some(previous) = page.observers.insert(*observer, handle) {
                previous.disconnect();
            }
        }
        Command::Observe { observer, target } => {
            let element = lookup(page, target).cloned();
            match (page.observers.get(observer), element) {
                (Some(handle), Some(element)) => handle.observe(&element),
                (None, _) => warn!(observer = %observer, "观察器尚未创建"),
                (_, None) => {}
            }
        }
        Command::Unobserve { observer, target } => {
            let element = lookup(page, target).cloned();
            if let (Some(handle), Some(element)) = (page.observers.get(observer), element) {
                handle.unobserve(&element);
            }
        }
        Command::SetTimer { timer, delay_ms } => {
            let timer = *timer;
            let callback = Closure::once_into_js(move || {
                crate::dispatch(PageEvent::timer(timer));
            });
            page.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref::<Function>(),
                    timer_delay(*delay_ms),
                )?;
        }
        Command::SpawnParticle { index, particle } => {
            let Some(container) =
                lookup(page, &ElementRef::Landmark(Landmark::ParticleContainer)).cloned()
            else {
                return Ok(());
            };
            let element = page
                .document
                .create_element("div")?
                .dyn_into::<HtmlElement>()?;
            element.set_class_name("particle");
            let style = element.style();
            for (name, value) in particle.style_declarations() {
                style.set_property(name, &value)?;
            }
            container.append_child(&element)?;
            page.elements.insert(ElementRef::Particle(*index), element);
        }
        Command::InjectStylesheet { css } => {
            let style = page.document.create_element("style")?;
            style.set_text_content(Some(css));
            match page.document.head() {
                Some(head) => {
                    head.append_child(&style)?;
                }
                None => warn!("文档没有 <head>，样式表未注入"),
            }
        }
    }
    Ok(())
}

fn lookup<'a>(page: &'a WebPage, target: &ElementRef) -> Option<&'a HtmlElement> {
    let element = page.elements.get(target);
    if element.is_none() {
        debug!(target = %target, "目标元素不存在，跳过");
    }
    element
}

/// `setTimeout` 只接受 i32 毫秒，超出部分截断到上限
fn timer_delay(delay_ms: u64) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

fn web_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
    }
}

/// 创建观察器，回调把条目转换为 `Intersect` 事件
fn create_observer(
    kind: ObserverKind,
    options: &ObserverOptions,
) -> Result<IntersectionObserver, JsValue> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let entries: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target = crate::with_page(|page| page.elements.find(&entry.target()))
                        .flatten()?;
                    Some(IntersectionEntry {
                        target,
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                })
                .collect();
            if !entries.is_empty() {
                crate::dispatch(PageEvent::Intersect {
                    observer: kind,
                    entries,
                });
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin_css());
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    // 观察器与页面同生命周期
    callback.forget();
    Ok(observer)
}
