//! Popup page.
//!
//! A toolbar (city input, add, scale, overlay) above one card per city.
//! The toolbar is built once; redraws only replace the status line and the
//! cards, so text being typed is never touched. State lives behind an async
//! mutex; event handlers only spawn tasks, and each task redraws once it is
//! done.

use std::rc::Rc;

use cityweather_extension::{CardList, Popup};
use cityweather_store::Store;
use cityweather_weather::WeatherClient;
use futures::lock::Mutex;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement};

use crate::dom::{self, Listeners};
use crate::error::GlueError;
use crate::storage::ChromeStorage;
use crate::tabs::ChromeTabs;
use crate::API_KEY;

type Shared = Rc<Mutex<PopupApp>>;

/// Nodes built once in [`start`].
struct Toolbar {
    input: HtmlInputElement,
    scale: HtmlButtonElement,
    /// Held for the page's lifetime.
    _listeners: Listeners,
}

struct PopupApp {
    popup: Popup<ChromeStorage>,
    cards: CardList,
    client: Rc<WeatherClient>,
    toolbar: Toolbar,
    status_root: Element,
    cards_root: Element,
    /// Delete buttons of the current render.
    card_listeners: Listeners,
    status: Option<&'static str>,
}

impl PopupApp {
    fn draw(&mut self, app: &Shared) -> Result<(), GlueError> {
        let document = dom::document()?;

        self.toolbar
            .scale
            .set_text_content(Some(self.popup.scale_button_label()));

        self.status_root.set_inner_html("");
        if let Some(status) = self.status {
            self.status_root
                .append_child(&dom::element(&document, "p", "status", status)?)?;
        }

        self.card_listeners.clear();
        self.cards_root.set_inner_html("");

        let specs = self.popup.cards();
        for (spec, card) in specs.iter().zip(self.cards.cards()) {
            let view = card.view();
            let class = if card.is_loading() { "card loading" } else { "card" };
            let node = dom::element(&document, "div", class, "")?;
            node.append_child(&dom::element(&document, "h2", "city", &view.title)?)?;
            for line in &view.lines {
                node.append_child(&dom::element(&document, "p", "reading", line)?)?;
            }

            if let Some(index) = spec.delete_index {
                let delete = dom::button(&document, "delete", "Delete")?;
                let app = app.clone();
                self.card_listeners.on(&delete, "click", move |_| {
                    let app = app.clone();
                    spawn_local(async move { delete_city(&app, index).await });
                })?;
                node.append_child(&delete)?;
            }

            self.cards_root.append_child(&node)?;
        }

        Ok(())
    }
}

fn redraw(state: &mut PopupApp, app: &Shared) {
    if let Err(e) = state.draw(app) {
        tracing::error!("Popup render failed: {}", e);
    }
}

/// Sync cards, redraw, and start any fetches the sync asked for.
async fn refresh(app: &Shared) {
    let mut state = app.lock().await;
    let specs = state.popup.cards();
    let tickets = state.cards.sync(&specs);
    redraw(&mut state, app);
    let client = state.client.clone();
    drop(state);

    for (index, ticket) in tickets {
        let app = app.clone();
        let client = client.clone();
        spawn_local(async move {
            let result = client.fetch_weather(ticket.city(), ticket.scale()).await;

            let mut state = app.lock().await;
            if state.cards.complete(index, ticket, result) {
                redraw(&mut state, &app);
            }
        });
    }
}

async fn add_city(app: &Shared) {
    {
        let mut state = app.lock().await;
        // The input handler can miss keystrokes while the state is locked.
        let typed = state.toolbar.input.value();
        state.popup.set_city_input(typed);
        match state.popup.add_city().await {
            Ok(added) => {
                if added {
                    state.toolbar.input.set_value("");
                }
                state.status = None;
            }
            Err(e) => {
                tracing::warn!("Could not add city: {}", e);
                state.status = Some(e.user_message());
            }
        }
    }
    refresh(app).await;
}

async fn delete_city(app: &Shared, index: usize) {
    {
        let mut state = app.lock().await;
        state.status = match state.popup.delete_city(index).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Could not delete city: {}", e);
                Some(e.user_message())
            }
        };
    }
    refresh(app).await;
}

async fn toggle_scale(app: &Shared) {
    {
        let mut state = app.lock().await;
        state.status = match state.popup.toggle_temp_scale(&ChromeTabs).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Could not change scale: {}", e);
                Some(e.user_message())
            }
        };
    }
    refresh(app).await;
}

async fn toggle_overlay(app: &Shared) {
    let state = app.lock().await;
    let delivery = state.popup.toggle_overlay(&ChromeTabs).await;
    tracing::debug!("Overlay toggle: {:?}", delivery);
}

fn input_of(event: &web_sys::Event) -> Option<HtmlInputElement> {
    event.target()?.dyn_into::<HtmlInputElement>().ok()
}

/// Wire up the toolbar's handlers. They live as long as the page.
fn attach_toolbar(
    app: &Shared,
    toolbar: &Toolbar,
    add: &HtmlButtonElement,
    overlay: &HtmlButtonElement,
) -> Result<Listeners, GlueError> {
    let mut listeners = Listeners::default();
    {
        let app = app.clone();
        listeners.on(&toolbar.input, "input", move |event| {
            let Some(value) = input_of(&event).map(|input| input.value()) else {
                return;
            };
            if let Some(mut state) = app.try_lock() {
                state.popup.set_city_input(value);
            }
        })?;
    }
    {
        let app = app.clone();
        listeners.on(add, "click", move |_| {
            let app = app.clone();
            spawn_local(async move { add_city(&app).await });
        })?;
    }
    {
        let app = app.clone();
        listeners.on(&toolbar.scale, "click", move |_| {
            let app = app.clone();
            spawn_local(async move { toggle_scale(&app).await });
        })?;
    }
    {
        let app = app.clone();
        listeners.on(overlay, "click", move |_| {
            let app = app.clone();
            spawn_local(async move { toggle_overlay(&app).await });
        })?;
    }
    Ok(listeners)
}

async fn start() -> Result<(), GlueError> {
    let document = dom::document()?;
    let root = dom::element(&document, "div", "popup", "")?;

    let bar = dom::element(&document, "div", "toolbar", "")?;
    let input = dom::input(&document, "text")?;
    input.set_placeholder("Add a city name");
    bar.append_child(&input)?;
    let add = dom::button(&document, "add", "+")?;
    bar.append_child(&add)?;
    let scale = dom::button(&document, "scale", "")?;
    bar.append_child(&scale)?;
    let overlay = dom::button(&document, "overlay", "Overlay")?;
    bar.append_child(&overlay)?;
    root.append_child(&bar)?;

    let status_root = dom::element(&document, "div", "", "")?;
    root.append_child(&status_root)?;
    let cards_root = dom::element(&document, "div", "cards", "")?;
    root.append_child(&cards_root)?;

    document
        .body()
        .ok_or_else(|| GlueError::Dom("no body".to_string()))?
        .append_child(&root)?;

    let popup = Popup::load(Store::new(ChromeStorage)).await?;
    let client = Rc::new(WeatherClient::new(API_KEY)?);

    let app = Rc::new(Mutex::new(PopupApp {
        popup,
        cards: CardList::new(),
        client,
        toolbar: Toolbar {
            input,
            scale,
            _listeners: Listeners::default(),
        },
        status_root,
        cards_root,
        card_listeners: Listeners::default(),
        status: None,
    }));

    {
        let mut state = app.lock().await;
        let listeners = attach_toolbar(&app, &state.toolbar, &add, &overlay)?;
        state.toolbar._listeners = listeners;
    }

    refresh(&app).await;
    Ok(())
}

#[wasm_bindgen]
pub fn popup_main() {
    spawn_local(async {
        if let Err(e) = start().await {
            tracing::error!("Popup failed to start: {}", e);
            dom::show_fatal(e.user_message());
        }
    });
}
