//! Small DOM helpers shared by the popup and options pages.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlButtonElement, HtmlInputElement};

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Create `<tag class="class">text</tag>`.
pub fn element(document: &Document, tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    if !text.is_empty() {
        element.set_text_content(Some(text));
    }
    Ok(element)
}

pub fn button(document: &Document, class: &str, label: &str) -> Result<HtmlButtonElement, JsValue> {
    element(document, "button", class, label)?
        .dyn_into::<HtmlButtonElement>()
        .map_err(|_| JsValue::from_str("not a button"))
}

pub fn input(document: &Document, kind: &str) -> Result<HtmlInputElement, JsValue> {
    let input = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str("not an input"))?;
    input.set_type(kind);
    Ok(input)
}

/// Event listeners owned by a page render.
///
/// Closures stay alive while attached and are detached on [`clear`](Self::clear)
/// or drop. Pages clear before redrawing, so no listener outlives its node.
/// Handlers must not trigger a redraw synchronously; they spawn a task.
#[derive(Default)]
pub struct Listeners {
    attached: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    pub fn on(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.attached.push((target.clone(), event, callback));
        Ok(())
    }

    pub fn clear(&mut self) {
        for (target, event, callback) in self.attached.drain(..) {
            let _ = target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Replace the page with a single error line. Used when a page cannot start.
pub fn show_fatal(message: &str) {
    let Ok(document) = document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    body.set_inner_html("");
    if let Ok(line) = element(&document, "p", "status", message) {
        let _ = body.append_child(&line);
    }
}
