use std::collections::HashMap;

use egui::{Context, TextureHandle, TextureId, TextureOptions};
use uuid::Uuid;

use crate::image::SourceImage;

/// GPU texture cache for source bitmaps (the screenshot and any AI
/// background), keyed by bitmap id.
///
/// Bitmaps are immutable, so a cached texture never goes stale; entries are
/// pruned least-recently-used once the cache grows past its limit (a crop
/// session can churn through many short-lived bitmaps).
pub struct TextureCache {
    textures: HashMap<Uuid, CacheEntry>,
    current_frame: u64,
    max_entries: usize,
}

struct CacheEntry {
    handle: TextureHandle,
    last_used: u64,
}

impl TextureCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            textures: HashMap::new(),
            current_frame: 0,
            max_entries,
        }
    }

    /// Advance the frame counter used for LRU bookkeeping; call once per
    /// painted frame.
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Fetch the texture for a bitmap, uploading it on first use.
    pub fn get_or_upload(&mut self, image: &SourceImage, ctx: &Context) -> TextureId {
        let frame = self.current_frame;
        if let Some(entry) = self.textures.get_mut(&image.id()) {
            entry.last_used = frame;
            return entry.handle.id();
        }

        self.prune_if_needed();

        let name = format!("bitmap_{}", image.id());
        let handle = ctx.load_texture(&name, image.to_color_image(), TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(
            image.id(),
            CacheEntry {
                handle,
                last_used: frame,
            },
        );
        id
    }

    /// Drop the cached texture for a bitmap that is gone (e.g. replaced by
    /// a crop commit).
    pub fn forget(&mut self, id: Uuid) {
        self.textures.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn prune_if_needed(&mut self) {
        if self.textures.len() < self.max_entries {
            return;
        }
        let mut entries: Vec<(Uuid, u64)> = self
            .textures
            .iter()
            .map(|(id, e)| (*id, e.last_used))
            .collect();
        entries.sort_by_key(|(_, last_used)| *last_used);

        let to_remove = self.textures.len() + 1 - self.max_entries;
        for (id, _) in entries.into_iter().take(to_remove) {
            self.textures.remove(&id);
        }
    }

    #[cfg(test)]
    fn contains(&self, id: Uuid) -> bool {
        self.textures.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap() -> SourceImage {
        SourceImage::from_rgba(2, 2, vec![255; 16], "test")
    }

    #[test]
    fn upload_is_cached() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(8);
        let image = bitmap();

        let first = cache.get_or_upload(&image, &ctx);
        let second = cache.get_or_upload(&image, &ctx);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn forget_removes_entry() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(8);
        let image = bitmap();
        cache.get_or_upload(&image, &ctx);

        cache.forget(image.id());
        assert!(cache.is_empty());
    }

    #[test]
    fn oldest_entry_is_evicted_first() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(2);
        let a = bitmap();
        let b = bitmap();
        let c = bitmap();

        cache.get_or_upload(&a, &ctx);
        cache.begin_frame();
        cache.get_or_upload(&b, &ctx);
        cache.begin_frame();
        cache.get_or_upload(&c, &ctx);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(a.id()));
        assert!(cache.contains(b.id()));
        assert!(cache.contains(c.id()));
    }
}
