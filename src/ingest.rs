//! Photo ingestion: turn image files into inline data URIs, off-thread.
//!
//! Each file is decoded on its own worker thread and delivered over an mpsc
//! channel, so completion order across files is not guaranteed. A file that
//! fails to decode is dropped silently (with a debug log); every file that
//! decodes yields exactly one photo. The target category is captured at
//! request time, so navigating away while decodes are in flight does not
//! redirect them.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::debug;

/// One successfully decoded photo, ready for the store.
#[derive(Debug, Clone)]
pub struct IngestedPhoto {
    pub data_uri: String,
}

/// An import request in flight. Poll from the event loop until `is_done`.
pub struct PendingIngest {
    /// Category the photos were requested into, fixed at request time.
    pub category_id: String,
    receiver: mpsc::Receiver<IngestedPhoto>,
    expected: usize,
    finished: usize,
}

impl PendingIngest {
    /// Decode the given files in the background, one worker per file.
    pub fn start(files: Vec<PathBuf>, category_id: String) -> Self {
        let expected = files.len();
        let (tx, rx) = mpsc::channel();

        for path in files {
            let tx = tx.clone();
            std::thread::spawn(move || match read_as_data_uri(&path) {
                Some(data_uri) => {
                    let _ = tx.send(IngestedPhoto { data_uri });
                }
                None => {
                    debug!(path = %path.display(), "skipping file that did not decode as an image");
                }
            });
        }

        Self {
            category_id,
            receiver: rx,
            expected,
            finished: 0,
        }
    }

    /// Drain completed decodes without blocking.
    pub fn poll(&mut self) -> Vec<IngestedPhoto> {
        let mut done = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(photo) => {
                    self.finished += 1;
                    done.push(photo);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // Failed decodes never send, so a disconnected channel
                    // means everything is accounted for.
                    self.finished = self.expected;
                    break;
                }
            }
        }
        done
    }

    pub fn is_done(&self) -> bool {
        self.finished >= self.expected
    }
}

/// List image files in a directory, non-recursive, sorted by name.
pub fn list_image_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(read_dir) = std::fs::read_dir(dir) {
        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Read a file and re-encode it as an inline data URI. Returns `None` when
/// the bytes do not decode as an image.
pub fn read_as_data_uri(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    // Validate before encoding; corrupt files are dropped, not ingested.
    image::load_from_memory(&bytes).ok()?;
    let mime = mime_for_extension(
        &path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default(),
    );
    Some(encode_data_uri(&bytes, mime))
}

pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Recover the raw bytes from an inline data URI.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let (_, payload) = uri.split_once(";base64,")?;
    BASE64.decode(payload).ok()
}

pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/png",
    }
}
