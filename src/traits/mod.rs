use crate::models::restaurant::Restaurant;
use crate::models::user::UserProfile;

/// Entities whose image lives in the object store under a derived key.
pub trait ImageKey {
    fn has_image(&self) -> bool;
    fn image_key(&self) -> String;
    fn set_image_url(&mut self, url: Option<String>);
}

pub fn restaurant_image_key(id: &str) -> String {
    format!("restaurants/{id}")
}

pub fn avatar_key(id: &str) -> String {
    format!("avatars/{id}")
}

impl ImageKey for Restaurant {
    fn has_image(&self) -> bool {
        self.has_image
    }
    fn image_key(&self) -> String {
        restaurant_image_key(&self.id)
    }
    fn set_image_url(&mut self, url: Option<String>) {
        self.image_url = url;
    }
}

impl ImageKey for UserProfile {
    fn has_image(&self) -> bool {
        self.has_avatar
    }
    fn image_key(&self) -> String {
        avatar_key(&self.id)
    }
    fn set_image_url(&mut self, url: Option<String>) {
        self.avatar_url = url;
    }
}
