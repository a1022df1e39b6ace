//! Options page: home city, auto-overlay switch, and Save.

use std::rc::Rc;

use cityweather_extension::{OptionsPage, SAVE_COOLDOWN};
use cityweather_store::Store;
use futures::lock::Mutex;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{self, Listeners};
use crate::error::GlueError;
use crate::storage::ChromeStorage;

type Shared = Rc<Mutex<OptionsApp>>;

struct OptionsApp {
    page: OptionsPage<ChromeStorage>,
    root: Element,
    listeners: Listeners,
    status: Option<&'static str>,
}

impl OptionsApp {
    fn draw(&mut self, app: &Shared) -> Result<(), GlueError> {
        let document = dom::document()?;
        self.listeners.clear();
        self.root.set_inner_html("");

        let disabled = self.page.is_disabled();
        let options = self.page.options();

        self.root
            .append_child(&dom::element(&document, "h1", "", "Weather Extension Options")?)?;

        let home_label = dom::element(&document, "label", "field", "Home city name")?;
        let home_city = dom::input(&document, "text")?;
        home_city.set_placeholder("Enter a home city name");
        home_city.set_value(&options.home_city);
        home_city.set_disabled(disabled);
        {
            let app = app.clone();
            // Edits are dropped while a save holds the state.
            self.listeners.on(&home_city, "input", move |event| {
                let Some(value) = input_of(&event).map(|input| input.value()) else {
                    return;
                };
                if let Some(mut state) = app.try_lock() {
                    state.page.set_home_city(value);
                }
            })?;
        }
        home_label.append_child(&home_city)?;
        self.root.append_child(&home_label)?;

        let overlay_label = dom::element(&document, "label", "field", "Auto toggle overlay on webpage load")?;
        let overlay = dom::input(&document, "checkbox")?;
        overlay.set_checked(options.has_auto_overlay);
        overlay.set_disabled(disabled);
        {
            let app = app.clone();
            self.listeners.on(&overlay, "change", move |event| {
                let Some(checked) = input_of(&event).map(|input| input.checked()) else {
                    return;
                };
                if let Some(mut state) = app.try_lock() {
                    state.page.set_auto_overlay(checked);
                }
            })?;
        }
        overlay_label.append_child(&overlay)?;
        self.root.append_child(&overlay_label)?;

        let save = dom::button(&document, "save", self.page.save_button_label())?;
        save.set_disabled(disabled);
        {
            let app = app.clone();
            self.listeners.on(&save, "click", move |_| {
                let app = app.clone();
                spawn_local(async move { save_options(&app).await });
            })?;
        }
        self.root.append_child(&save)?;

        if let Some(status) = self.status {
            self.root
                .append_child(&dom::element(&document, "p", "status", status)?)?;
        }

        Ok(())
    }
}

fn input_of(event: &web_sys::Event) -> Option<HtmlInputElement> {
    event.target()?.dyn_into::<HtmlInputElement>().ok()
}

fn redraw(state: &mut OptionsApp, app: &Shared) {
    if let Err(e) = state.draw(app) {
        tracing::error!("Options render failed: {}", e);
    }
}

async fn save_options(app: &Shared) {
    let saving = {
        let mut state = app.lock().await;
        state.status = match state.page.begin_save().await {
            Ok(()) => None,
            Err(e) => Some(e.user_message()),
        };
        redraw(&mut state, app);
        state.page.is_disabled()
    };

    if !saving {
        return;
    }

    let millis = u32::try_from(SAVE_COOLDOWN.as_millis()).unwrap_or(u32::MAX);
    TimeoutFuture::new(millis).await;

    let mut state = app.lock().await;
    state.page.finish_save();
    redraw(&mut state, app);
}

async fn start() -> Result<(), GlueError> {
    let document = dom::document()?;
    let root = dom::element(&document, "div", "options", "")?;
    document
        .body()
        .ok_or_else(|| GlueError::Dom("no body".to_string()))?
        .append_child(&root)?;

    let page = OptionsPage::load(Store::new(ChromeStorage)).await?;
    let app = Rc::new(Mutex::new(OptionsApp {
        page,
        root,
        listeners: Listeners::default(),
        status: None,
    }));

    let mut state = app.lock().await;
    state.draw(&app)?;
    Ok(())
}

#[wasm_bindgen]
pub fn options_main() {
    spawn_local(async {
        if let Err(e) = start().await {
            tracing::error!("Options page failed to start: {}", e);
            dom::show_fatal(e.user_message());
        }
    });
}
