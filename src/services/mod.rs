use crate::db::{AssetOperations, StoreError};
use crate::traits::ImageKey;
use futures::future::join_all;

pub mod analytics;
pub mod data_models;
pub mod documentation;
pub mod restaurants;
pub mod tracking;
pub mod users;

pub use analytics::AnalyticsOperations;
pub use data_models::DataModelOperations;
pub use documentation::DocumentationOperations;
pub use restaurants::RestaurantOperations;
pub use tracking::DriverSimulator;
pub use users::UserOperations;

/// `Ok(false)` when the target document did not exist.
pub(crate) fn existed(result: Result<(), StoreError>) -> Result<bool, StoreError> {
    match result {
        Ok(()) => Ok(true),
        Err(StoreError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Replaces stored image URLs with fresh presigned ones for every item that
/// has an uploaded image. Presign failures leave the stored URL in place.
pub(crate) async fn populate_image_urls<T: ImageKey>(items: &mut [T], assets: &AssetOperations) {
    let futures = items
        .iter_mut()
        .filter(|item| item.has_image())
        .map(|item| async move {
            let key = item.image_key();
            match assets.presign_download(&key).await {
                Ok(url) => item.set_image_url(Some(url)),
                Err(e) => debug!("populate_image_urls: presign failed for '{}': {}", key, e),
            }
        });
    join_all(futures).await;
}
