//! Shared thumbnail cache for the home and gallery grids.

use image::{imageops::FilterType, DynamicImage};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use crate::config::ImageProtocol;
use crate::ingest;

/// Decodes photo data URIs off-thread and keeps one terminal graphics
/// protocol per photo id. Cover entries reuse the same cache under a
/// prefixed key.
pub struct ThumbCache {
    protocol_setting: ImageProtocol,
    pixel_size: u32,
    // Created on first use so constructing the app never touches stdio
    picker: Option<Option<Picker>>,
    cache: HashMap<String, StatefulProtocol>,
    loading: HashSet<String>,
    receiver: mpsc::Receiver<(String, DynamicImage)>,
    sender: mpsc::Sender<(String, DynamicImage)>,
}

impl ThumbCache {
    pub fn new(protocol_setting: ImageProtocol, pixel_size: u32) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            protocol_setting,
            pixel_size,
            picker: None,
            cache: HashMap::new(),
            loading: HashSet::new(),
            receiver,
            sender,
        }
    }

    fn picker(&mut self) -> Option<&mut Picker> {
        if self.picker.is_none() {
            let picker = match self.protocol_setting {
                ImageProtocol::None => None,
                _ => Picker::from_query_stdio().ok(),
            };
            self.picker = Some(picker);
        }
        self.picker.as_mut().and_then(|p| p.as_mut())
    }

    /// Drain finished decodes. Call once per frame, before any `get`.
    pub fn poll(&mut self) {
        loop {
            let (key, img) = match self.receiver.try_recv() {
                Ok(pair) => pair,
                Err(_) => break,
            };
            self.loading.remove(&key);
            if let Some(picker) = self.picker() {
                let protocol = picker.new_resize_protocol(img);
                self.cache.insert(key, protocol);
            }
        }
    }

    /// Cached protocol for a photo, kicking off a background decode on the
    /// first request.
    pub fn get(&mut self, key: &str, data_uri: &str) -> Option<&mut StatefulProtocol> {
        if self.cache.contains_key(key) {
            return self.cache.get_mut(key);
        }

        if !self.loading.contains(key) && self.picker().is_some() {
            self.loading.insert(key.to_string());
            let key = key.to_string();
            let uri = data_uri.to_string();
            let sender = self.sender.clone();
            let size = self.pixel_size;

            std::thread::spawn(move || {
                let decoded = ingest::decode_data_uri(&uri)
                    .and_then(|bytes| image::load_from_memory(&bytes).ok());
                if let Some(img) = decoded {
                    let resized = img.resize(size, size, FilterType::Triangle);
                    let _ = sender.send((key, resized));
                }
            });
        }

        None
    }

    /// Protocol for an image produced locally (the maker preview).
    pub fn protocol_from(&mut self, img: DynamicImage) -> Option<StatefulProtocol> {
        self.picker().map(|picker| picker.new_resize_protocol(img))
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.contains(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.cache.remove(key);
        self.loading.remove(key);
    }

    // Headless tests have no picker, so they observe invalidation through
    // the loading set.
    #[cfg(test)]
    pub(crate) fn mark_loading(&mut self, key: &str) {
        self.loading.insert(key.to_string());
    }
}
