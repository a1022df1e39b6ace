//! Popup controller.
//!
//! Holds the popup's in-memory copy of the city list and options. Every
//! mutation writes the whole slot back and only updates the in-memory copy
//! once the write has succeeded.
//!
//! The copy is loaded once, when the popup opens. A city added through the
//! context menu while the popup is open is overwritten by the popup's next
//! write to the `cities` slot.

use cityweather_store::{Options, StorageArea, Store, StoreError};
use cityweather_weather::TempScale;
use thiserror::Error;

use crate::card::CardSpec;
use crate::messages::Message;
use crate::tabs::{notify_active_tab, Delivery, TabMessenger};

#[derive(Debug, Error)]
pub enum PopupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No city at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl PopupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Store(e) => e.user_message(),
            Self::IndexOutOfRange { .. } => "That city is no longer in the list.",
        }
    }
}

#[derive(Debug)]
pub struct Popup<A> {
    store: Store<A>,
    cities: Vec<String>,
    city_input: String,
    options: Options,
}

impl<A: StorageArea> Popup<A> {
    /// Load both slots concurrently. The popup has nothing to render until
    /// this resolves.
    ///
    /// Slots that were never written load as an empty list and default
    /// options.
    pub async fn load(store: Store<A>) -> Result<Self, PopupError> {
        let (cities, options) = futures::join!(store.get_cities(), store.get_options());
        let cities = cities?.unwrap_or_default();
        let options = options?.unwrap_or_default();

        tracing::debug!(
            "Popup loaded {} cities, scale {}",
            cities.len(),
            options.temp_scale
        );

        Ok(Self {
            store,
            cities,
            city_input: String::new(),
            options,
        })
    }

    #[cfg(test)]
    fn store(&self) -> &Store<A> {
        &self.store
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    pub fn set_city_input(&mut self, text: impl Into<String>) {
        self.city_input = text.into();
    }

    /// Append the input to the list and persist. Returns false (and writes
    /// nothing) when the input is empty.
    pub async fn add_city(&mut self) -> Result<bool, PopupError> {
        if self.city_input.is_empty() {
            return Ok(false);
        }

        let mut updated = self.cities.clone();
        updated.push(self.city_input.clone());
        self.store.set_cities(&updated).await?;

        tracing::info!("Added city '{}'", self.city_input);
        self.cities = updated;
        self.city_input.clear();
        Ok(true)
    }

    /// Remove the city at `index` and persist. Returns the removed name.
    pub async fn delete_city(&mut self, index: usize) -> Result<String, PopupError> {
        if index >= self.cities.len() {
            return Err(PopupError::IndexOutOfRange {
                index,
                len: self.cities.len(),
            });
        }

        let mut updated = self.cities.clone();
        let removed = updated.remove(index);
        self.store.set_cities(&updated).await?;

        tracing::info!("Removed city '{}'", removed);
        self.cities = updated;
        Ok(removed)
    }

    /// Flip the temperature scale, persist it, then tell the active tab.
    pub async fn toggle_temp_scale<T: TabMessenger + ?Sized>(
        &mut self,
        tabs: &T,
    ) -> Result<TempScale, PopupError> {
        let mut updated = self.options.clone();
        updated.toggle_temp_scale();
        self.store.set_options(&updated).await?;

        notify_active_tab(tabs, Message::ToggleScale).await;

        tracing::info!("Temperature scale now {}", updated.temp_scale);
        self.options = updated;
        Ok(self.options.temp_scale)
    }

    /// Ask the active tab to show or hide its overlay. Touches no stored state.
    pub async fn toggle_overlay<T: TabMessenger + ?Sized>(&self, tabs: &T) -> Delivery {
        notify_active_tab(tabs, Message::ToggleOverlay).await
    }

    /// Cards in display order: the home city first, then the list.
    pub fn cards(&self) -> Vec<CardSpec> {
        let scale = self.options.temp_scale;
        let home = self.options.home_city().map(|city| CardSpec {
            city: city.to_string(),
            scale,
            delete_index: None,
        });

        home.into_iter()
            .chain(self.cities.iter().enumerate().map(|(i, city)| CardSpec {
                city: city.clone(),
                scale,
                delete_index: Some(i),
            }))
            .collect()
    }

    /// Label of the scale toggle button
    pub fn scale_button_label(&self) -> &'static str {
        self.options.temp_scale.symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::NoBrowserTabs;
    use cityweather_store::{MemoryStorage, StorageError};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn popup_with(cities: &[&str], options: Options) -> Popup<MemoryStorage> {
        let store = Store::new(MemoryStorage::new());
        store.set_cities(&names(cities)).await.unwrap();
        store.set_options(&options).await.unwrap();
        Popup::load(store).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_slots_uses_defaults() {
        let popup = Popup::load(Store::new(MemoryStorage::new())).await.unwrap();
        assert!(popup.cities().is_empty());
        assert_eq!(popup.options(), &Options::default());
    }

    #[tokio::test]
    async fn test_load_fails_on_corrupt_slot() {
        let area = MemoryStorage::new();
        area.set("options", serde_json::json!(42)).await.unwrap();
        let result = Popup::load(Store::new(area)).await;
        assert!(matches!(
            result,
            Err(PopupError::Store(StoreError::Decode { key: "options", .. }))
        ));
    }

    #[tokio::test]
    async fn test_add_and_delete_scenario() {
        let mut popup = popup_with(&["Paris"], Options::default()).await;

        popup.set_city_input("Tokyo");
        assert!(popup.add_city().await.unwrap());
        assert_eq!(popup.cities(), names(&["Paris", "Tokyo"]));
        assert_eq!(popup.city_input(), "");
        assert_eq!(
            popup.store().get_cities().await.unwrap(),
            Some(names(&["Paris", "Tokyo"]))
        );

        assert_eq!(popup.delete_city(0).await.unwrap(), "Paris");
        assert_eq!(popup.cities(), names(&["Tokyo"]));
        assert_eq!(
            popup.store().get_cities().await.unwrap(),
            Some(names(&["Tokyo"]))
        );
    }

    #[tokio::test]
    async fn test_add_preserves_order_of_additions() {
        let mut popup = popup_with(&[], Options::default()).await;
        let added = ["Lagos", "Hanoi", "Lagos", "Quito", "Perth"];
        for city in added {
            popup.set_city_input(city);
            popup.add_city().await.unwrap();
        }
        assert_eq!(popup.store().get_cities().await.unwrap(), Some(names(&added)));
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let mut popup = popup_with(&["Paris"], Options::default()).await;
        popup.set_city_input("");
        assert!(!popup.add_city().await.unwrap());
        assert_eq!(popup.cities(), names(&["Paris"]));
    }

    #[tokio::test]
    async fn test_delete_keeps_relative_order() {
        let list = ["A", "B", "C", "D", "E"];
        for i in 0..list.len() {
            let mut popup = popup_with(&list, Options::default()).await;
            popup.delete_city(i).await.unwrap();

            let expected: Vec<String> = list
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, s)| s.to_string())
                .collect();
            assert_eq!(popup.cities().len(), list.len() - 1);
            assert_eq!(popup.store().get_cities().await.unwrap(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_delete_out_of_range_writes_nothing() {
        let mut popup = popup_with(&["Paris"], Options::default()).await;
        let err = popup.delete_city(3).await.unwrap_err();
        assert!(matches!(err, PopupError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(popup.store().get_cities().await.unwrap(), Some(names(&["Paris"])));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        // Enough for the seeded list, too small for one more city
        let store = Store::new(MemoryStorage::with_quota(20));
        store.set_cities(&names(&["Paris"])).await.unwrap();
        let mut popup = Popup::load(store).await.unwrap();

        popup.set_city_input("Saint Petersburg");
        let err = popup.add_city().await.unwrap_err();
        assert!(matches!(
            err,
            PopupError::Store(StoreError::Backend(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(popup.cities(), names(&["Paris"]));
        assert_eq!(popup.city_input(), "Saint Petersburg");
    }

    #[tokio::test]
    async fn test_cards_home_city_first() {
        let options = Options {
            home_city: "Denver".to_string(),
            temp_scale: TempScale::Metric,
            ..Default::default()
        };
        let popup = popup_with(&["Paris", "Tokyo"], options).await;

        assert_eq!(
            popup.cards(),
            vec![
                CardSpec {
                    city: "Denver".to_string(),
                    scale: TempScale::Metric,
                    delete_index: None,
                },
                CardSpec {
                    city: "Paris".to_string(),
                    scale: TempScale::Metric,
                    delete_index: Some(0),
                },
                CardSpec {
                    city: "Tokyo".to_string(),
                    scale: TempScale::Metric,
                    delete_index: Some(1),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_cards_without_home_city() {
        let popup = popup_with(&["Paris"], Options::default()).await;
        let cards = popup.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].delete_index, Some(0));
        assert_eq!(popup.scale_button_label(), "℉");
    }

    #[tokio::test]
    async fn test_typed_input_survives_other_actions() {
        let mut popup = popup_with(&["Paris", "Tokyo"], Options::default()).await;
        popup.set_city_input("Lis");

        popup.toggle_temp_scale(&NoBrowserTabs).await.unwrap();
        popup.delete_city(0).await.unwrap();
        assert_eq!(popup.city_input(), "Lis");

        popup.set_city_input("Lisbon");
        assert!(popup.add_city().await.unwrap());
        assert_eq!(popup.city_input(), "");
        assert_eq!(popup.cities(), names(&["Tokyo", "Lisbon"]));
    }
}
