//! Media segment deck.
//!
//! The ordered list of media segments the cut effect switches between.
//! Segments are image files in a configurable directory, loaded as GPU
//! textures; the directory is rescanned periodically so files dropped in or
//! deleted show up as added or removed segments without a restart.

use nannou::prelude::*;
use nannou::wgpu;
use std::path::{Path, PathBuf};

const MEDIA_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

struct Segment {
    path: PathBuf,
    texture: wgpu::Texture,
}

pub struct SegmentDeck {
    dir: PathBuf,
    segments: Vec<Segment>,
    /// Paths that failed to decode; skipped until they disappear from disk.
    failed: Vec<PathBuf>,
}

impl SegmentDeck {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            segments: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn texture(&self, index: usize) -> Option<&wgpu::Texture> {
        self.segments.get(index).map(|s| &s.texture)
    }

    /// Re-list the media directory, loading new files and dropping segments
    /// whose file is gone. Returns true when the segment list changed.
    pub fn rescan(&mut self, app: &App) -> bool {
        let found = list_media_files(&self.dir);

        let before = self.segments.len();
        self.segments.retain(|s| found.contains(&s.path));
        self.failed.retain(|p| found.contains(p));
        let mut changed = self.segments.len() != before;

        for path in found {
            let known = self.segments.iter().any(|s| s.path == path);
            if known || self.failed.contains(&path) {
                continue;
            }
            match wgpu::Texture::from_path(app, &path) {
                Ok(texture) => {
                    println!("Loaded segment: {}", path.display());
                    self.segments.push(Segment { path, texture });
                    changed = true;
                }
                Err(e) => {
                    eprintln!("Failed to load {}: {}", path.display(), e);
                    self.failed.push(path);
                }
            }
        }

        if changed {
            // Directory order is the sequence the cut effect advances through.
            self.segments.sort_by(|a, b| a.path.cmp(&b.path));
        }
        changed
    }
}

fn list_media_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
