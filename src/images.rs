//! Reward icon cache
//!
//! Labels made only of digits are reward amounts and get an icon loaded from
//! `<asset_dir>/<label>.<ext>`. Loads are fire-and-forget: a loader accepts
//! requests and later reports [`LoadEvent`]s, which the host feeds into the
//! [`ImageCache`] between frames. The renderer only ever reads the cache.
//!
//! Entries are never evicted and failed labels are never retried.

use std::collections::{HashMap, HashSet};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{Receiver, Sender, channel};

use image::RgbaImage;
use thiserror::Error;

use crate::settings::WheelSettings;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image unavailable: {0}")]
    Unavailable(String),
}

/// Completion of a single load request
#[derive(Debug)]
pub enum LoadEvent<I> {
    Loaded { label: String, image: I },
    Failed { label: String, error: ImageLoadError },
}

/// Asynchronous `request(label) -> eventually(image | absent)` capability
pub trait ImageLoader {
    type Image;

    /// Start loading `path` for `label`. Must not block on the load itself.
    fn request(&mut self, label: &str, path: &str);

    /// Drain loads that finished since the last poll
    fn poll(&mut self) -> Vec<LoadEvent<Self::Image>>;
}

/// Reward amount convention: non-empty and ASCII digits only
pub fn is_reward_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

/// Relative asset path for a reward label, e.g. `diamonds/99.webp`
pub fn asset_path(settings: &WheelSettings, label: &str) -> String {
    format!(
        "{}/{}.{}",
        settings.asset_dir.trim_end_matches('/'),
        label,
        settings.asset_extension
    )
}

/// Label → loaded icon
#[derive(Debug, Clone)]
pub struct ImageCache<I> {
    images: HashMap<String, I>,
    /// Labels already requested (loaded, in flight or failed)
    requested: HashSet<String>,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            requested: HashSet::new(),
        }
    }
}

impl<I> ImageCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request icons for reward labels not seen before. Returns the number of
    /// new requests.
    pub fn preload<T, L>(&mut self, items: &[T], loader: &mut L, settings: &WheelSettings) -> usize
    where
        T: AsRef<str>,
        L: ImageLoader<Image = I>,
    {
        if !settings.icons {
            return 0;
        }
        let mut started = 0;
        for item in items {
            let label = item.as_ref();
            if !is_reward_label(label) || self.requested.contains(label) {
                continue;
            }
            self.requested.insert(label.to_string());
            loader.request(label, &asset_path(settings, label));
            started += 1;
        }
        if started > 0 {
            log::debug!("Requested {} reward icons", started);
        }
        started
    }

    /// Fold finished loads into the cache. Returns true if a redraw is due.
    pub fn apply(&mut self, events: Vec<LoadEvent<I>>) -> bool {
        let mut redraw = false;
        for event in events {
            match event {
                LoadEvent::Loaded { label, image } => {
                    self.images.insert(label, image);
                    redraw = true;
                }
                LoadEvent::Failed { label, error } => {
                    log::warn!("No icon for {:?}: {}", label, error);
                }
            }
        }
        redraw
    }

    pub fn get(&self, label: &str) -> Option<&I> {
        self.images.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.images.contains_key(label)
    }

    pub fn was_requested(&self, label: &str) -> bool {
        self.requested.contains(label)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decoded icon shared between the cache and snapshots
pub type Icon = Arc<RgbaImage>;

/// Native loader: reads and decodes each icon on a background thread
#[cfg(not(target_arch = "wasm32"))]
pub struct FsImageLoader {
    root: PathBuf,
    tx: Sender<LoadEvent<Icon>>,
    rx: Receiver<LoadEvent<Icon>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FsImageLoader {
    /// Resolve asset paths relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = channel();
        Self {
            root: root.into(),
            tx,
            rx,
        }
    }

    fn load(path: &Path) -> Result<Icon, ImageLoadError> {
        let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| ImageLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Arc::new(decoded.to_rgba8()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ImageLoader for FsImageLoader {
    type Image = Icon;

    fn request(&mut self, label: &str, path: &str) {
        let full = self.root.join(path);
        let label = label.to_string();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let event = match Self::load(&full) {
                Ok(image) => LoadEvent::Loaded { label, image },
                Err(error) => LoadEvent::Failed { label, error },
            };
            // Receiver gone means the loader was dropped; nothing to report to
            let _ = tx.send(event);
        });
    }

    fn poll(&mut self) -> Vec<LoadEvent<Icon>> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Loader that completes requests only when told to
    #[derive(Default)]
    struct StubLoader {
        requests: Vec<(String, String)>,
        ready: Vec<LoadEvent<u32>>,
    }

    impl ImageLoader for StubLoader {
        type Image = u32;

        fn request(&mut self, label: &str, path: &str) {
            self.requests.push((label.to_string(), path.to_string()));
        }

        fn poll(&mut self) -> Vec<LoadEvent<u32>> {
            std::mem::take(&mut self.ready)
        }
    }

    fn poll_until(loader: &mut FsImageLoader, count: usize) -> Vec<LoadEvent<Icon>> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while events.len() < count && Instant::now() < deadline {
            events.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_reward_label() {
        assert!(is_reward_label("99"));
        assert!(is_reward_label("0"));
        assert!(!is_reward_label(""));
        assert!(!is_reward_label("9a"));
        assert!(!is_reward_label("-5"));
        assert!(!is_reward_label("１２")); // full-width digits
    }

    #[test]
    fn test_asset_path() {
        let settings = WheelSettings::default();
        assert_eq!(asset_path(&settings, "199"), "diamonds/199.webp");
    }

    #[test]
    fn test_preload_only_reward_labels_once() {
        let settings = WheelSettings::default();
        let mut cache = ImageCache::new();
        let mut loader = StubLoader::default();

        let n = cache.preload(&["Ana", "99", "199", "99"], &mut loader, &settings);
        assert_eq!(n, 2);
        assert_eq!(loader.requests.len(), 2);
        assert_eq!(loader.requests[0], ("99".to_string(), "diamonds/99.webp".to_string()));

        // Second pass requests nothing new
        assert_eq!(cache.preload(&["99", "199"], &mut loader, &settings), 0);
    }

    #[test]
    fn test_failed_load_not_retried() {
        let settings = WheelSettings::default();
        let mut cache = ImageCache::new();
        let mut loader = StubLoader::default();
        cache.preload(&["5"], &mut loader, &settings);

        loader.ready.push(LoadEvent::Failed {
            label: "5".into(),
            error: ImageLoadError::Unavailable("gone".into()),
        });
        assert!(!cache.apply(loader.poll()));
        assert!(!cache.contains("5"));
        assert!(cache.was_requested("5"));
        assert_eq!(cache.preload(&["5"], &mut loader, &settings), 0);
    }

    #[test]
    fn test_loaded_event_requests_redraw() {
        let mut cache = ImageCache::new();
        let redraw = cache.apply(vec![LoadEvent::Loaded {
            label: "299".into(),
            image: 7u32,
        }]);
        assert!(redraw);
        assert_eq!(cache.get("299"), Some(&7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_icons_disabled() {
        let settings = WheelSettings {
            icons: false,
            ..Default::default()
        };
        let mut cache: ImageCache<u32> = ImageCache::new();
        let mut loader = StubLoader::default();
        assert_eq!(cache.preload(&["99"], &mut loader, &settings), 0);
        assert!(loader.requests.is_empty());
    }

    #[test]
    fn test_fs_loader_decodes_png() {
        let root = std::env::temp_dir().join(format!("spin-wheel-icons-{}", std::process::id()));
        std::fs::create_dir_all(root.join("diamonds")).unwrap();
        let mut png = RgbaImage::new(3, 2);
        png.put_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        png.save(root.join("diamonds/42.png")).unwrap();

        let settings = WheelSettings {
            asset_extension: "png".into(),
            ..Default::default()
        };
        let mut loader = FsImageLoader::new(&root);
        let mut cache = ImageCache::new();
        cache.preload(&["42", "43"], &mut loader, &settings);

        let events = poll_until(&mut loader, 2);
        assert_eq!(events.len(), 2);
        assert!(cache.apply(events));
        let icon = cache.get("42").expect("icon loaded");
        assert_eq!(icon.dimensions(), (3, 2));
        assert_eq!(icon.get_pixel(1, 1).0, [10, 20, 30, 255]);
        // Missing file leaves the label without an icon
        assert!(!cache.contains("43"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
