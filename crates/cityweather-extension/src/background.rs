//! Background worker: install-time reset and the context-menu handler.

use cityweather_store::{Options, StorageArea, Store, StoreError};
use thiserror::Error;

use crate::menus::{ContextMenus, MenuClick, MenuItem, ADD_CITY_MENU_ID};
use crate::messages::MessagingError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to reset storage: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to register context menu: {0}")]
    Menu(#[from] MessagingError),
}

/// Runs on every install and update.
///
/// Resets both slots to their defaults, discarding whatever the user had
/// stored, then registers the "add city" menu entry. Every step is attempted
/// even if an earlier one fails; the first failure is returned.
pub async fn on_installed<A, M>(store: &Store<A>, menus: &M) -> Result<(), BootstrapError>
where
    A: StorageArea,
    M: ContextMenus + ?Sized,
{
    let cities = store.set_cities(&[]).await;
    let options = store.set_options(&Options::default()).await;
    let menu = menus.create(&MenuItem::add_city()).await;

    tracing::info!("Extension installed, storage reset to defaults");

    cities?;
    options?;
    menu?;
    Ok(())
}

/// Appends the selected text to the city list.
///
/// The text is stored verbatim: no validation, no de-duplication. Returns the
/// city that was added, or `None` when the click carried no selection or was
/// for another menu entry.
pub async fn on_context_menu_clicked<A: StorageArea>(
    store: &Store<A>,
    click: &MenuClick,
) -> Result<Option<String>, StoreError> {
    if click.menu_item_id != ADD_CITY_MENU_ID {
        tracing::debug!("Ignoring click on menu item '{}'", click.menu_item_id);
        return Ok(None);
    }

    let Some(city) = click.selection_text.clone() else {
        tracing::debug!("Context menu click without selection text");
        return Ok(None);
    };

    let mut cities = store.get_cities().await?.unwrap_or_default();
    cities.push(city.clone());
    store.set_cities(&cities).await?;

    tracing::info!("Added '{}' from context menu ({} cities)", city, cities.len());
    Ok(Some(city))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_store::MemoryStorage;
    use cityweather_weather::TempScale;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingMenus {
        created: Mutex<Vec<MenuItem>>,
        fail: bool,
    }

    impl ContextMenus for RecordingMenus {
        async fn create(&self, item: &MenuItem) -> Result<(), MessagingError> {
            if self.fail {
                return Err(MessagingError::browser("duplicate id"));
            }
            self.created.lock().push(item.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_install_resets_existing_data() {
        let store = Store::new(MemoryStorage::new());
        store
            .set_cities(&["Paris".to_string(), "Tokyo".to_string()])
            .await
            .unwrap();
        store
            .set_options(&Options {
                has_auto_overlay: true,
                home_city: "Berlin".to_string(),
                temp_scale: TempScale::Metric,
            })
            .await
            .unwrap();

        let menus = RecordingMenus::default();
        on_installed(&store, &menus).await.unwrap();

        assert_eq!(store.get_cities().await.unwrap(), Some(vec![]));
        assert_eq!(store.get_options().await.unwrap(), Some(Options::default()));
        assert_eq!(*menus.created.lock(), vec![MenuItem::add_city()]);
    }

    #[tokio::test]
    async fn test_install_on_empty_store() {
        let store = Store::new(MemoryStorage::new());
        on_installed(&store, &RecordingMenus::default()).await.unwrap();
        assert_eq!(store.get_cities().await.unwrap(), Some(vec![]));
        assert_eq!(store.get_options().await.unwrap(), Some(Options::default()));
    }

    #[tokio::test]
    async fn test_install_menu_failure_still_resets_storage() {
        let store = Store::new(MemoryStorage::new());
        store.set_cities(&["Paris".to_string()]).await.unwrap();
        let menus = RecordingMenus {
            fail: true,
            ..Default::default()
        };

        let err = on_installed(&store, &menus).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Menu(_)));
        assert_eq!(store.get_cities().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_menu_click_appends_verbatim_with_duplicates() {
        let store = Store::new(MemoryStorage::new());
        store.set_cities(&["Paris".to_string()]).await.unwrap();

        on_context_menu_clicked(&store, &MenuClick::selection("Paris"))
            .await
            .unwrap();
        let added = on_context_menu_clicked(&store, &MenuClick::selection(" not a city! "))
            .await
            .unwrap();

        assert_eq!(added.as_deref(), Some(" not a city! "));
        assert_eq!(
            store.get_cities().await.unwrap().unwrap(),
            vec!["Paris", "Paris", " not a city! "]
        );
    }

    #[tokio::test]
    async fn test_menu_click_before_install_starts_a_list() {
        let store = Store::new(MemoryStorage::new());
        on_context_menu_clicked(&store, &MenuClick::selection("Quito"))
            .await
            .unwrap();
        assert_eq!(store.get_cities().await.unwrap().unwrap(), vec!["Quito"]);
    }

    #[tokio::test]
    async fn test_menu_click_without_selection_is_ignored() {
        let store = Store::new(MemoryStorage::new());
        let click = MenuClick {
            menu_item_id: ADD_CITY_MENU_ID.to_string(),
            selection_text: None,
        };
        assert!(on_context_menu_clicked(&store, &click).await.unwrap().is_none());
        assert!(store.get_cities().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_click_on_other_menu_is_ignored() {
        let store = Store::new(MemoryStorage::new());
        let click = MenuClick {
            menu_item_id: "somethingElse".to_string(),
            selection_text: Some("Rome".to_string()),
        };
        assert!(on_context_menu_clicked(&store, &click).await.unwrap().is_none());
        assert!(store.get_cities().await.unwrap().is_none());
    }
}
