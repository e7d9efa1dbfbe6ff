//! # Scan 模块
//!
//! 从真实 DOM 读出 [`PageLayout`]，同时记录每个 [`ElementRef`] 对应的元素句柄。

use std::collections::BTreeMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use page_runtime::{ElementRef, Landmark, PageLayout, Rect, Viewport};

/// 元素句柄表
#[derive(Debug, Default)]
pub struct ElementTable {
    elements: BTreeMap<ElementRef, HtmlElement>,
}

impl ElementTable {
    pub fn get(&self, element: &ElementRef) -> Option<&HtmlElement> {
        self.elements.get(element)
    }

    pub fn insert(&mut self, element: ElementRef, handle: HtmlElement) {
        self.elements.insert(element, handle);
    }

    /// 由 DOM 元素反查引用（观察器回调只给出元素本身）
    pub fn find(&self, target: &Element) -> Option<ElementRef> {
        self.elements
            .iter()
            .find(|(_, handle)| AsRef::<Element>::as_ref(*handle) == target)
            .map(|(element, _)| element.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementRef, &HtmlElement)> {
        self.elements.iter()
    }
}

/// 扫描当前文档
pub fn scan_page(window: &Window, document: &Document) -> (PageLayout, ElementTable) {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport = Viewport {
        width: window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        height: window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
    };

    let mut layout = PageLayout::new(viewport);
    let mut table = ElementTable::default();

    if let Some(body) = document.body() {
        table.insert(ElementRef::Body, body);
    }

    for landmark in Landmark::ALL {
        if let Some(handle) = query(document, landmark.selector()).into_iter().next() {
            layout.landmarks.insert(landmark);
            table.insert(ElementRef::Landmark(landmark), handle);
        }
    }

    for handle in query(document, "section") {
        let rect = page_rect(&handle, scroll_y);
        let (next, element) = push_section(layout, &handle.id(), rect);
        layout = next;
        table.insert(element, handle);
    }

    for (index, handle) in query(document, ".nav-link").into_iter().enumerate() {
        layout = layout.with_nav_link(handle.get_attribute("href").unwrap_or_default());
        table.insert(ElementRef::NavLink(index), handle);
    }

    for (index, handle) in query(document, ".stat-number").into_iter().enumerate() {
        let rect = page_rect(&handle, scroll_y);
        let target = handle.get_attribute("data-target").unwrap_or_default();
        layout = layout.with_counter(target, rect.top, rect.height);
        table.insert(ElementRef::Counter(index), handle);
    }

    for (index, handle) in query(document, ".component-card").into_iter().enumerate() {
        let component = handle.get_attribute("data-component");
        layout = layout.with_card(component.as_deref());
        table.insert(ElementRef::Card(index), handle);
    }

    (layout, table)
}

/// 追加一个 section；没有 id 的 section 按文档位置合成键，不作为锚点
fn push_section(layout: PageLayout, id: &str, rect: Rect) -> (PageLayout, ElementRef) {
    let layout = if id.is_empty() {
        layout.with_anonymous_section(rect.top, rect.height)
    } else {
        layout.with_section(id, rect.top, rect.height)
    };
    let key = layout
        .sections
        .last()
        .map(|section| section.id.clone())
        .unwrap_or_default();
    (layout, ElementRef::Section(key))
}

/// 文档坐标系下的元素矩形
fn page_rect(element: &HtmlElement, scroll_y: f64) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top() + scroll_y, rect.height())
}

fn query(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_runtime::anonymous_section_id;

    #[test]
    fn test_push_section() {
        let layout = PageLayout::default();
        let (layout, home) = push_section(layout, "home", Rect::new(0.0, 720.0));
        let (layout, unnamed) = push_section(layout, "", Rect::new(720.0, 400.0));

        assert_eq!(home, ElementRef::section("home"));
        assert_eq!(unnamed, ElementRef::section(anonymous_section_id(1)));
        assert!(layout.anchor("home").is_some());
        assert!(layout.sections[1].anonymous);
        assert_eq!(layout.sections[1].rect, Rect::new(720.0, 400.0));
    }
}
