// src/application/gallery.rs
use crate::application::{CollectionPath, RemoteStore, Workspace};
use crate::domain::{DomainError, Image};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, instrument};

/// Raw image file handed to the gallery
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Encode an image file as a `data:<mime>;base64,...` URL.
///
/// The MIME type is guessed from the file name; anything that is not an
/// image is rejected.
pub fn encode_data_url(source: &ImageSource) -> Result<String, DomainError> {
    let mime = mime_guess::from_path(&source.file_name)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(|| DomainError::UnsupportedFormat(source.file_name.clone()))?;

    Ok(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        STANDARD.encode(&source.bytes)
    ))
}

impl<S: RemoteStore> Workspace<S> {
    /// Encode and prepend an image to the gallery
    #[instrument(level = "debug", skip(self, source), fields(file = %source.file_name))]
    pub fn upload_image(&mut self, source: &ImageSource) -> Result<Image, DomainError> {
        let url = encode_data_url(source)?;
        let image = Image {
            id: self.next_id(),
            url,
            timestamp: self.now_millis(),
        };

        self.images.insert(0, image.clone());
        self.persist(CollectionPath::Images);
        info!(image_id = image.id, bytes = source.bytes.len(), "Image uploaded");
        Ok(image)
    }

    pub fn delete_image(&mut self, id: i64) -> bool {
        let before = self.images.len();
        self.images.retain(|i| i.id != id);
        if self.images.len() == before {
            debug!(image_id = id, "Delete of unknown image ignored");
            return false;
        }
        self.persist(CollectionPath::Images);
        true
    }

    pub fn image(&self, id: i64) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryMode {
    #[default]
    Browse,
    /// Picking an image for a definition
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryAction {
    /// Show the image full size
    Expand(String),
    /// Hand the image back to the caller
    Select(Image),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GalleryView {
    mode: GalleryMode,
}

impl GalleryView {
    pub fn browse() -> Self {
        Self {
            mode: GalleryMode::Browse,
        }
    }

    pub fn select() -> Self {
        Self {
            mode: GalleryMode::Select,
        }
    }

    pub fn mode(&self) -> GalleryMode {
        self.mode
    }

    pub fn click(&self, image: &Image) -> GalleryAction {
        match self.mode {
            GalleryMode::Browse => GalleryAction::Expand(image.url.clone()),
            GalleryMode::Select => GalleryAction::Select(image.clone()),
        }
    }

    /// Delete controls are hidden while selecting
    pub fn can_delete(&self) -> bool {
        self.mode == GalleryMode::Browse
    }
}
