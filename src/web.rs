//! Browser bindings for the button controller, the menu and the query form.
//!
//! Everything here is a thin layer over the platform-agnostic state in the
//! rest of the crate: DOM events are forwarded to the state machines and
//! their output is written back as inline styles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, KeyboardEvent, Window,
};

use crate::config::{ControllerConfig, MenuConfig, SiteConfig};
use crate::controller::{ClickOutcome, DebounceController};
use crate::glyph::Glyph;
use crate::menu::{MenuLayout, NavMenu};
use crate::scheduler::{Millis, Scheduler, Task};

/// Element ids and selectors used by the front page markup.
pub mod ids {
    pub const RANDOM_BUTTON: &str = "random-button";
    pub const RANDOM_LABEL_SPANS: &str = ".rand-text span";
    pub const TEXTAREAS: &str = "textarea";
    pub const CALCULATE_BUTTON: &str = "calculate-button";
    pub const ERROR: &str = "error";
    pub const MENU_BAR: &str = "menu-bar";
    pub const MENU_ITEMS: &str = ".menu-items a";
    /// Icon shown while the overlay is open
    pub const MENU_CLOSE_ICON: &str = "menu-button-open-img";
    /// Icon shown while the overlay is closed
    pub const MENU_OPEN_ICON: &str = "menu-button-closed-img";
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, f: F) -> Result<Self, String>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| format!("Failed to listen for {event}"))?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self.target.remove_event_listener_with_callback(self.event, callback);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Interval,
    Timeout,
}

/// Live browser timer owned by a controller.
///
/// Dropping the handle clears the timer, so a dropped controller can never
/// leave the browser calling into a freed closure.
/// A fired commit timeout is dropped from inside its own callback;
/// wasm-bindgen defers freeing the closure until that call returns.
pub struct WebTimer {
    window: Window,
    id: i32,
    kind: TimerKind,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for WebTimer {
    fn drop(&mut self) {
        match self.kind {
            TimerKind::Interval => self.window.clear_interval_with_handle(self.id),
            // Harmless when the timeout already fired.
            TimerKind::Timeout => self.window.clear_timeout_with_handle(self.id),
        }
    }
}

/// [`Scheduler`] backed by `window.setInterval` / `window.setTimeout`.
///
/// Fired tasks go to the `on_tick` / `on_commit` callbacks given at
/// construction.
pub struct WebScheduler {
    window: Window,
    on_tick: Rc<dyn Fn()>,
    on_commit: Rc<dyn Fn()>,
}

impl WebScheduler {
    pub fn new(window: Window, on_tick: Rc<dyn Fn()>, on_commit: Rc<dyn Fn()>) -> Self {
        Self { window, on_tick, on_commit }
    }

    fn dispatcher(&self, task: Task) -> Rc<dyn Fn()> {
        match task {
            Task::Tick => self.on_tick.clone(),
            Task::Commit => self.on_commit.clone(),
        }
    }

    fn start(&self, kind: TimerKind, ms: Millis, task: Task) -> WebTimer {
        let dispatch = self.dispatcher(task);
        let callback = Closure::<dyn FnMut()>::new(move || dispatch());
        let handler = callback.as_ref().unchecked_ref();
        let started = match kind {
            TimerKind::Interval => self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(handler, timeout_ms(ms)),
            TimerKind::Timeout => self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(handler, timeout_ms(ms)),
        };
        let id = started.unwrap_or_else(|err| {
            log::warn!("starting {kind:?} timer failed: {err:?}");
            0
        });
        WebTimer { window: self.window.clone(), id, kind, _callback: callback }
    }
}

fn timeout_ms(ms: Millis) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

impl Scheduler for WebScheduler {
    type Handle = WebTimer;

    fn now(&self) -> Millis {
        js_sys::Date::now() as Millis
    }

    fn every(&mut self, interval: Millis, task: Task) -> WebTimer {
        self.start(TimerKind::Interval, interval.max(1), task)
    }

    fn after(&mut self, delay: Millis, task: Task) -> WebTimer {
        self.start(TimerKind::Timeout, delay, task)
    }

    fn cancel(&mut self, handle: WebTimer) {
        drop(handle);
    }
}

/// The label spans that get scrambled on each tick.
#[derive(Clone, Debug)]
pub struct LabelSpans {
    spans: Vec<HtmlElement>,
}

impl LabelSpans {
    pub fn new(spans: Vec<HtmlElement>) -> Self {
        Self { spans }
    }

    /// Re-randomize every span's character and color.
    pub fn scramble(&self) {
        let mut rng = rand::thread_rng();
        for span in &self.spans {
            let Some(ch) = span.inner_text().chars().next() else {
                continue;
            };
            let mut glyph = Glyph::new(ch);
            glyph.scramble(&mut rng);
            if let Some(color) = glyph.color {
                if span.style().set_property("color", &color.css()).is_err() {
                    log::warn!("failed to set label color");
                }
            }
            span.set_inner_text(&glyph.ch.to_string());
        }
    }
}

type SharedController = Rc<RefCell<DebounceController<WebScheduler>>>;

/// The "feeling random" button wired to a [`DebounceController`].
///
/// Native clicks never run the button's default action. The action runs
/// through `on_commit`, either right away (animation already played long
/// enough) or when the deferred commit fires. `on_commit` returns whether
/// the action got under way; when it did not, the button is released so
/// the next click starts a fresh interaction.
pub struct RandomButton {
    controller: SharedController,
    _listeners: Vec<Listener>,
}

impl RandomButton {
    pub fn attach(
        window: &Window,
        button: &HtmlElement,
        label: LabelSpans,
        config: ControllerConfig,
        on_commit: Rc<dyn Fn() -> bool>,
    ) -> Result<Self, String> {
        config.validate().map_err(|err| err.to_string())?;

        let on_tick: Rc<dyn Fn()> = Rc::new(move || label.scramble());
        let commit_action = on_commit.clone();
        let controller: SharedController = Rc::new_cyclic(|weak: &Weak<RefCell<DebounceController<WebScheduler>>>| {
            let weak = weak.clone();
            let on_commit_due: Rc<dyn Fn()> = Rc::new(move || {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                let fire = controller.borrow_mut().on_commit_due();
                if fire && !commit_action() {
                    controller.borrow_mut().release();
                }
            });
            RefCell::new(DebounceController::new(
                WebScheduler::new(window.clone(), on_tick, on_commit_due),
                config,
            ))
        });

        let mut listeners = Vec::with_capacity(4);

        let ctrl = controller.clone();
        listeners.push(Listener::new(button, "click", move |event: Event| {
            event.prevent_default();
            let outcome = ctrl.borrow_mut().on_click();
            if outcome == ClickOutcome::Proceed && !on_commit() {
                ctrl.borrow_mut().release();
            }
        })?);

        let ctrl = controller.clone();
        listeners.push(Listener::new(button, "mouseover", move |_| {
            ctrl.borrow_mut().on_hover_enter();
        })?);

        let ctrl = controller.clone();
        listeners.push(Listener::new(button, "mouseleave", move |_| {
            ctrl.borrow_mut().on_hover_leave();
        })?);

        // Don't keep animating after the back button restores the page.
        let ctrl = controller.clone();
        listeners.push(Listener::new(window, "pagehide", move |_| {
            ctrl.borrow_mut().on_page_hide();
        })?);

        Ok(Self { controller, _listeners: listeners })
    }

    /// End the current interaction: clear the latch, cancel a pending
    /// commit and stop the animation.
    ///
    /// For hosts whose commit action stays on the page (a cancelled submit
    /// handler, a form targeting another window).
    pub fn release(&self) {
        self.controller.borrow_mut().release();
    }

    /// Whether the label is currently animating.
    pub fn is_running(&self) -> bool {
        self.controller.borrow().is_running()
    }

    pub fn is_latched(&self) -> bool {
        self.controller.borrow().is_latched()
    }
}

impl Drop for RandomButton {
    fn drop(&mut self) {
        // Tear down like a page hide: no timer outlives the binding.
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.on_page_hide();
        }
    }
}

/// DOM elements the navigation menu styles.
#[derive(Clone, Debug)]
pub struct MenuElements {
    pub body: HtmlElement,
    pub bar: HtmlElement,
    pub items: Vec<HtmlElement>,
    pub close_icon: HtmlElement,
    pub open_icon: HtmlElement,
}

impl MenuElements {
    /// Look up the menu elements by their page ids.
    pub fn lookup(document: &Document) -> Result<Self, String> {
        Ok(Self {
            body: document.body().ok_or("No body element")?,
            bar: element_by_id(document, ids::MENU_BAR)?,
            items: select_all(document, ids::MENU_ITEMS)?,
            close_icon: element_by_id(document, ids::MENU_CLOSE_ICON)?,
            open_icon: element_by_id(document, ids::MENU_OPEN_ICON)?,
        })
    }

    /// Write a computed layout to inline styles.
    pub fn apply(&self, layout: &MenuLayout) -> Result<(), String> {
        set_style(&self.body, "padding-top", layout.body_padding_top)?;
        for item in &self.items {
            set_style(item, "display", layout.items.display())?;
            set_style(item, "text-align", layout.items.text_align())?;
        }

        let bar = &layout.bar;
        set_style(&self.bar, "display", display(bar.visible))?;
        if bar.visible {
            set_style(&self.bar, "height", bar.height)?;
            set_style(&self.bar, "padding-top", bar.padding_top)?;
        }
        if let Some(align) = bar.text_align {
            set_style(&self.bar, "text-align", align)?;
        }
        if let Some(background) = bar.background {
            set_style(&self.bar, "background-color", background)?;
        }

        set_style(&self.close_icon, "display", display(layout.close_icon_visible))?;
        set_style(&self.open_icon, "display", display(layout.open_icon_visible))?;
        Ok(())
    }
}

/// The responsive menu wired to window resizes, its icons and Escape.
pub struct NavMenuBinding {
    menu: Rc<RefCell<NavMenu>>,
    _listeners: Vec<Listener>,
}

impl NavMenuBinding {
    pub fn attach(
        window: &Window,
        document: &Document,
        elements: MenuElements,
        config: MenuConfig,
    ) -> Result<Self, String> {
        config.validate().map_err(|err| err.to_string())?;
        let menu = Rc::new(RefCell::new(NavMenu::new(config)));
        let elements = Rc::new(elements);

        let relayout: Rc<dyn Fn()> = {
            let menu = menu.clone();
            let elements = elements.clone();
            let window = window.clone();
            Rc::new(move || {
                let width = viewport_width(&window);
                let layout = menu.borrow_mut().layout(width);
                if let Err(err) = elements.apply(&layout) {
                    log::warn!("menu layout failed: {err}");
                }
            })
        };

        let mut listeners = Vec::with_capacity(4);

        let f = relayout.clone();
        listeners.push(Listener::new(window, "resize", move |_| f())?);

        let (m, f) = (menu.clone(), relayout.clone());
        listeners.push(Listener::new(&elements.close_icon, "click", move |_| {
            m.borrow_mut().close();
            f();
        })?);

        let (m, f) = (menu.clone(), relayout.clone());
        listeners.push(Listener::new(&elements.open_icon, "click", move |_| {
            m.borrow_mut().open();
            f();
        })?);

        let (m, f) = (menu.clone(), relayout.clone());
        listeners.push(Listener::new(document, "keydown", move |event: Event| {
            let is_escape = event
                .dyn_ref::<KeyboardEvent>()
                .map(|key| key.key() == "Escape")
                .unwrap_or(false);
            if is_escape && m.borrow_mut().on_escape() {
                event.prevent_default();
                f();
            }
        })?);

        relayout();
        Ok(Self { menu, _listeners: listeners })
    }

    pub fn is_open(&self) -> bool {
        self.menu.borrow().is_open()
    }
}

/// Make Enter in any of `textareas` click `submit` instead of adding a line.
pub fn submit_on_enter(
    textareas: &[HtmlElement],
    submit: &HtmlElement,
) -> Result<Vec<Listener>, String> {
    textareas
        .iter()
        .map(|textarea| {
            let submit = submit.clone();
            Listener::new(textarea, "keydown", move |event: Event| {
                let is_enter = event
                    .dyn_ref::<KeyboardEvent>()
                    .map(|key| key.key() == "Enter")
                    .unwrap_or(false);
                if is_enter {
                    event.prevent_default();
                    submit.click();
                }
            })
        })
        .collect()
}

/// Scroll a non-empty error message into view.
pub fn scroll_to_error(error: &HtmlElement) {
    if !error.inner_text().is_empty() {
        error.scroll_into_view_with_bool(false);
    }
}

/// All bindings of the front page, kept alive together.
pub struct FrontPage {
    pub random_button: RandomButton,
    pub menu: NavMenuBinding,
    _form_listeners: Vec<Listener>,
}

impl FrontPage {
    /// Bind the standard front page markup.
    ///
    /// A committed random-button click submits the button's form with the
    /// button as submitter. If the form is missing or fails validation the
    /// button is released instead of staying latched.
    pub fn bind(config: SiteConfig) -> Result<Self, String> {
        let window = web_sys::window().ok_or("No window available")?;
        let document = window.document().ok_or("No document available")?;

        let button: HtmlElement = element_by_id(&document, ids::RANDOM_BUTTON)?;
        let label = LabelSpans::new(select_all(&document, ids::RANDOM_LABEL_SPANS)?);
        let on_commit: Rc<dyn Fn() -> bool> = {
            let button = button.clone();
            Rc::new(move || submit_form_of(&button))
        };
        let random_button =
            RandomButton::attach(&window, &button, label, config.button, on_commit)?;

        let menu_elements = MenuElements::lookup(&document)?;
        let menu = NavMenuBinding::attach(&window, &document, menu_elements, config.menu)?;

        let calculate: HtmlElement = element_by_id(&document, ids::CALCULATE_BUTTON)?;
        let textareas = select_all(&document, ids::TEXTAREAS)?;
        let form_listeners = submit_on_enter(&textareas, &calculate)?;

        if let Ok(error) = element_by_id::<HtmlElement>(&document, ids::ERROR) {
            scroll_to_error(&error);
        }

        log::debug!("front page bound");
        Ok(Self { random_button, menu, _form_listeners: form_listeners })
    }
}

/// Returns `false` when no submission got under way.
fn submit_form_of(button: &HtmlElement) -> bool {
    let Some(form) = button.dyn_ref::<HtmlButtonElement>().and_then(|b| b.form()) else {
        log::warn!("random button has no form to submit");
        return false;
    };
    // requestSubmit silently does nothing on an invalid form.
    if !form.report_validity() {
        log::debug!("random button form failed validation");
        return false;
    }
    if form.request_submit_with_submitter(Some(button)).is_err() {
        log::warn!("form submit failed");
        return false;
    }
    true
}

fn viewport_width(window: &Window) -> u32 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map(|w| w.max(0.0) as u32)
        .unwrap_or(0)
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), String> {
    element
        .style()
        .set_property(property, value)
        .map_err(|_| format!("Failed to set {property}"))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, String> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("No element #{id}"))?
        .dyn_into::<T>()
        .map_err(|_| format!("Element #{id} has the wrong type"))
}

fn select_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, String> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|_| format!("Invalid selector {selector}"))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect())
}
