//! Weather card state.
//!
//! A card starts `Loading`, moves to `Ready` or `Error` when its fetch
//! completes, and only goes back to `Loading` when its `(city, scale)` input
//! changes. There is no retry.
//!
//! In-flight fetches are not cancelled. Each fetch carries a [`FetchTicket`]
//! naming the input it was started for, and [`WeatherCard::complete`] drops
//! results whose ticket no longer matches the card, or that arrive after the
//! card was torn down.
//!
//! [`CardList`] keeps one card per [`CardSpec`] in display order.

use cityweather_weather::{
    TempScale, WeatherError, WeatherSnapshot, WeatherSource, FETCH_FAILED_MESSAGE,
};

pub const LOADING_TEXT: &str = "Loading...";

/// The input pair a card fetches for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub city: String,
    pub scale: TempScale,
}

impl CardKey {
    pub fn new(city: impl Into<String>, scale: TempScale) -> Self {
        Self {
            city: city.into(),
            scale,
        }
    }
}

/// Issued when a fetch starts; handed back with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: CardKey,
}

impl FetchTicket {
    pub fn city(&self) -> &str {
        &self.key.city
    }

    pub fn scale(&self) -> TempScale {
        self.key.scale
    }
}

#[derive(Debug, Clone)]
pub enum CardState {
    Loading,
    Ready(WeatherSnapshot),
    Error,
}

/// What a card displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherCard {
    key: CardKey,
    state: CardState,
    mounted: bool,
}

impl WeatherCard {
    pub fn new(city: impl Into<String>, scale: TempScale) -> Self {
        Self {
            key: CardKey::new(city, scale),
            state: CardState::Loading,
            mounted: true,
        }
    }

    pub fn key(&self) -> &CardKey {
        &self.key
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CardState::Loading)
    }

    /// Ticket for a fetch of the card's current input.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            key: self.key.clone(),
        }
    }

    /// Update the card's input. Returns a ticket for the fetch to start when
    /// the pair actually changed, `None` when it is the same pair.
    pub fn set_input(&mut self, city: impl Into<String>, scale: TempScale) -> Option<FetchTicket> {
        let key = CardKey::new(city, scale);
        if key == self.key {
            return None;
        }
        self.key = key;
        self.state = CardState::Loading;
        Some(self.begin_fetch())
    }

    /// Apply a fetch result. Returns false when the result was stale and
    /// discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        if !self.mounted {
            tracing::debug!("Dropping weather for '{}': card removed", ticket.key.city);
            return false;
        }
        if ticket.key != self.key {
            tracing::debug!(
                "Dropping stale weather for '{}' ({}), card now shows '{}' ({})",
                ticket.key.city,
                ticket.key.scale,
                self.key.city,
                self.key.scale
            );
            return false;
        }

        self.state = match result {
            Ok(snapshot) => CardState::Ready(snapshot),
            Err(e) => {
                tracing::warn!("Weather for '{}' unavailable: {}", self.key.city, e);
                CardState::Error
            }
        };
        true
    }

    /// Tear down the card; late results are ignored from now on.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn view(&self) -> CardView {
        match &self.state {
            CardState::Loading => CardView {
                title: self.key.city.clone(),
                lines: vec![LOADING_TEXT.to_string()],
            },
            CardState::Error => CardView {
                title: self.key.city.clone(),
                lines: vec![FETCH_FAILED_MESSAGE.to_string()],
            },
            CardState::Ready(snapshot) => {
                let symbol = snapshot.scale.symbol();
                CardView {
                    title: snapshot.name.clone(),
                    lines: vec![
                        format!("{} {}", snapshot.rounded_temp(), symbol),
                        format!("Feels like {} {}", snapshot.rounded_feels_like(), symbol),
                    ],
                }
            }
        }
    }
}

/// One card the popup should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSpec {
    pub city: String,
    pub scale: TempScale,
    /// Position in the city list; `None` for the home-city card, which
    /// cannot be deleted from the popup.
    pub delete_index: Option<usize>,
}

/// The cards on screen, positionally matched to a list of [`CardSpec`]s.
///
/// Card `i` always shows spec `i`. When the list shifts (a delete, a home
/// city appearing) the affected positions take their new input and reload;
/// positions past the end are unmounted and dropped.
#[derive(Debug, Default)]
pub struct CardList {
    cards: Vec<WeatherCard>,
}

impl CardList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[WeatherCard] {
        &self.cards
    }

    /// Line the cards up with `specs`. Returns the fetches to start, by
    /// position.
    pub fn sync(&mut self, specs: &[CardSpec]) -> Vec<(usize, FetchTicket)> {
        let mut tickets = Vec::new();

        for (index, spec) in specs.iter().enumerate() {
            match self.cards.get_mut(index) {
                Some(card) => {
                    if let Some(ticket) = card.set_input(spec.city.clone(), spec.scale) {
                        tickets.push((index, ticket));
                    }
                }
                None => {
                    let card = WeatherCard::new(spec.city.clone(), spec.scale);
                    tickets.push((index, card.begin_fetch()));
                    self.cards.push(card);
                }
            }
        }

        for card in self.cards.iter_mut().skip(specs.len()) {
            card.unmount();
        }
        self.cards.truncate(specs.len());

        tickets
    }

    /// Hand a result to the card at `index`. False when the card is gone or
    /// the result is stale.
    pub fn complete(
        &mut self,
        index: usize,
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => card.complete(ticket, result),
            None => {
                tracing::debug!("Dropping weather for '{}': no card at {}", ticket.city(), index);
                false
            }
        }
    }

    /// Sync, then run every fetch the sync asked for concurrently and apply
    /// the results. Returns how many were applied.
    pub async fn refresh<S: WeatherSource + ?Sized>(
        &mut self,
        specs: &[CardSpec],
        source: &S,
    ) -> usize {
        let tickets = self.sync(specs);
        let results = futures::future::join_all(
            tickets
                .iter()
                .map(|(_, ticket)| source.fetch_weather(ticket.city(), ticket.scale())),
        )
        .await;

        let mut applied = 0;
        for ((index, ticket), result) in tickets.into_iter().zip(results) {
            if self.complete(index, ticket, result) {
                applied += 1;
            }
        }
        applied
    }
}
