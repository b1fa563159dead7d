//! Canvas listeners: each one turns a DOM event into a [`ViewEvent`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::render::App;
use crate::view::{ViewEvent, RESET_KEY};

pub fn attach(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Key events only reach a focusable element.
    canvas.set_tab_index(1000);
    canvas.focus()?;

    listen(canvas, "wheel", app.clone(), |_, e: &WheelEvent| {
        Some(ViewEvent::Wheel { delta_y: e.delta_y() })
    })?;
    listen(canvas, "keydown", app.clone(), |_, e: &KeyboardEvent| {
        let key = e.key();
        if key == RESET_KEY {
            // Keep space from scrolling the page.
            e.prevent_default();
        }
        Some(ViewEvent::Key(key))
    })?;
    listen(canvas, "mousedown", app.clone(), |c, e: &MouseEvent| {
        let (x, y) = relative(c, e);
        Some(ViewEvent::PointerDown { button: e.button(), x, y })
    })?;
    listen(canvas, "mousemove", app.clone(), |c, e: &MouseEvent| {
        let (x, y) = relative(c, e);
        Some(ViewEvent::PointerMove { x, y })
    })?;
    listen(canvas, "mouseup", app.clone(), |_, _: &MouseEvent| Some(ViewEvent::PointerUp))?;
    listen(canvas, "mouseleave", app, |_, _: &MouseEvent| Some(ViewEvent::PointerLeave))?;
    Ok(())
}

/// Pointer position relative to the canvas' bounding box.
fn relative(canvas: &HtmlCanvasElement, e: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        f64::from(e.client_x()) - rect.left(),
        f64::from(e.client_y()) - rect.top(),
    )
}

fn listen<E, F>(
    canvas: &HtmlCanvasElement,
    kind: &str,
    app: Rc<RefCell<App>>,
    translate: F,
) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: Fn(&HtmlCanvasElement, &E) -> Option<ViewEvent> + 'static,
{
    let target = canvas.clone();
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Some(event) = event.dyn_ref::<E>() else {
            return;
        };
        if let Some(view_event) = translate(&target, event) {
            app.borrow_mut().handle(&view_event);
        }
    }) as Box<dyn FnMut(Event)>);
    canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
