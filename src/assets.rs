use std::sync::Arc;

use crate::api::{ApiError, AssetBackend, CloudinaryImage};

/// The hosted image list behind the manage screen: fetch, select, delete one
/// or delete every selected asset in bulk.
pub struct AssetManager<B: AssetBackend> {
    api: Arc<B>,
    images: Vec<CloudinaryImage>,
    selected: Vec<String>,
}

impl<B: AssetBackend> AssetManager<B> {
    pub fn new(api: Arc<B>) -> Self {
        Self {
            api,
            images: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// Fetch the hosted image list, dropping any stale selection.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        self.images = self.api.fetch_assets().await?;
        self.selected.clear();
        log::info!("loaded {} hosted images", self.images.len());
        Ok(self.images.len())
    }

    pub fn images(&self) -> &[CloudinaryImage] {
        &self.images
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, public_id: &str) -> bool {
        self.selected.iter().any(|id| id == public_id)
    }

    pub fn toggle_select(&mut self, public_id: &str) {
        if let Some(pos) = self.selected.iter().position(|id| id == public_id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(public_id.to_string());
        }
    }

    /// Select every image, or clear the selection when everything is
    /// already selected.
    pub fn toggle_select_all(&mut self) {
        if self.selected.len() == self.images.len() {
            self.selected.clear();
        } else {
            self.selected = self
                .images
                .iter()
                .map(|img| img.public_id.clone())
                .collect();
        }
    }

    /// Delete one hosted image; its row and selection entry go with it.
    pub async fn delete(&mut self, public_id: &str) -> Result<(), ApiError> {
        self.api.delete_asset(public_id).await?;
        self.images.retain(|img| img.public_id != public_id);
        self.selected.retain(|id| id != public_id);
        Ok(())
    }

    /// Delete every selected image in one bulk request. Returns how many
    /// were deleted; the selection is cleared on success.
    pub async fn delete_selected(&mut self) -> Result<usize, ApiError> {
        if self.selected.is_empty() {
            return Ok(0);
        }
        self.api.delete_assets(&self.selected).await?;
        let count = self.selected.len();
        self.images
            .retain(|img| !self.selected.contains(&img.public_id));
        self.selected.clear();
        log::info!("deleted {} hosted images", count);
        Ok(count)
    }
}
