//! Options page controller.
//!
//! Edits live in local form state and reach the store only on Save. After a
//! save the form stays disabled for a fixed cooldown.

use std::future::Future;
use std::time::Duration;

use cityweather_store::{Options, StorageArea, Store, StoreError};

/// How long the form stays disabled after a save
pub const SAVE_COOLDOWN: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Ready,
    Saving,
}

#[derive(Debug)]
pub struct OptionsPage<A> {
    store: Store<A>,
    options: Options,
    form_state: FormState,
}

impl<A: StorageArea> OptionsPage<A> {
    /// Load the `options` slot; defaults if it was never written.
    pub async fn load(store: Store<A>) -> Result<Self, StoreError> {
        let options = store.get_options().await?.unwrap_or_default();
        Ok(Self {
            store,
            options,
            form_state: FormState::Ready,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn form_state(&self) -> FormState {
        self.form_state
    }

    pub fn is_disabled(&self) -> bool {
        self.form_state == FormState::Saving
    }

    pub fn save_button_label(&self) -> &'static str {
        match self.form_state {
            FormState::Ready => "Save",
            FormState::Saving => "Saving...",
        }
    }

    /// Edit the home city. Ignored while the form is disabled.
    pub fn set_home_city(&mut self, home_city: impl Into<String>) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.options.home_city = home_city.into();
        true
    }

    /// Edit the auto-overlay switch. Ignored while the form is disabled.
    pub fn set_auto_overlay(&mut self, has_auto_overlay: bool) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.options.has_auto_overlay = has_auto_overlay;
        true
    }

    /// Disable the form and write the edited options.
    ///
    /// On failure the form is re-enabled at once. On success it stays
    /// disabled until [`finish_save`](Self::finish_save).
    pub async fn begin_save(&mut self) -> Result<(), StoreError> {
        if self.is_disabled() {
            tracing::debug!("Save already in progress");
            return Ok(());
        }

        self.form_state = FormState::Saving;
        if let Err(e) = self.store.set_options(&self.options).await {
            tracing::warn!("Failed to save options: {}", e);
            self.form_state = FormState::Ready;
            return Err(e);
        }

        tracing::info!("Options saved");
        Ok(())
    }

    /// Re-enable the form after the cooldown.
    pub fn finish_save(&mut self) {
        self.form_state = FormState::Ready;
    }

    /// Save, wait out `cooldown`, then re-enable the form.
    ///
    /// The host supplies the timer (`tokio::time::sleep`, a `setTimeout`
    /// promise) so this stays executor-agnostic.
    pub async fn save<F: Future<Output = ()>>(&mut self, cooldown: F) -> Result<(), StoreError> {
        self.begin_save().await?;
        cooldown.await;
        self.finish_save();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_store::MemoryStorage;
    use cityweather_weather::TempScale;

    #[tokio::test]
    async fn test_load_defaults_when_unset() {
        let page = OptionsPage::load(Store::new(MemoryStorage::new())).await.unwrap();
        assert_eq!(page.options(), &Options::default());
        assert_eq!(page.form_state(), FormState::Ready);
        assert_eq!(page.save_button_label(), "Save");
    }

    #[tokio::test]
    async fn test_edits_are_local_until_save() {
        let store = Store::new(MemoryStorage::new());
        store.set_options(&Options::default()).await.unwrap();
        let mut page = OptionsPage::load(store).await.unwrap();

        page.set_home_city("Toronto");
        page.set_auto_overlay(true);
        assert_eq!(
            page.store.get_options().await.unwrap(),
            Some(Options::default())
        );

        page.save(std::future::ready(())).await.unwrap();
        assert_eq!(
            page.store.get_options().await.unwrap(),
            Some(Options {
                has_auto_overlay: true,
                home_city: "Toronto".to_string(),
                temp_scale: TempScale::Imperial,
            })
        );
        assert_eq!(page.form_state(), FormState::Ready);
    }

    #[tokio::test]
    async fn test_form_disabled_between_write_and_cooldown() {
        let mut page = OptionsPage::load(Store::new(MemoryStorage::new())).await.unwrap();
        page.set_home_city("Oslo");

        page.begin_save().await.unwrap();
        assert!(page.is_disabled());
        assert_eq!(page.save_button_label(), "Saving...");
        assert!(!page.set_home_city("Bergen"));
        assert!(!page.set_auto_overlay(true));
        assert_eq!(page.options().home_city, "Oslo");

        page.finish_save();
        assert!(!page.is_disabled());
        assert!(page.set_home_city("Bergen"));
    }

    #[tokio::test]
    async fn test_save_keeps_stored_scale_from_load() {
        let store = Store::new(MemoryStorage::new());
        store
            .set_options(&Options {
                temp_scale: TempScale::Metric,
                ..Default::default()
            })
            .await
            .unwrap();
        let mut page = OptionsPage::load(store).await.unwrap();

        page.set_auto_overlay(true);
        page.save(std::future::ready(())).await.unwrap();

        let saved = page.store.get_options().await.unwrap().unwrap();
        assert_eq!(saved.temp_scale, TempScale::Metric);
        assert!(saved.has_auto_overlay);
    }

    #[tokio::test]
    async fn test_failed_save_reenables_form() {
        let mut page = OptionsPage::load(Store::new(MemoryStorage::with_quota(8)))
            .await
            .unwrap();
        page.set_home_city("Ouagadougou");

        assert!(page.save(std::future::ready(())).await.is_err());
        assert_eq!(page.form_state(), FormState::Ready);
    }

    #[tokio::test]
    async fn test_cooldown_is_awaited() {
        let mut page = OptionsPage::load(Store::new(MemoryStorage::new())).await.unwrap();
        let started = tokio::time::Instant::now();
        page.save(tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(page.form_state(), FormState::Ready);
    }
}
