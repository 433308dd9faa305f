use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::scryfall_client::ScryfallClient;

/// Downloads kept in a directory, each resource is fetched at most once.
pub struct FileCache {
    dir: PathBuf,
    download_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<FileCache> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("using cache directory {}", dir.display());
        Ok(FileCache {
            dir,
            download_lock: Mutex::new(()),
        })
    }

    /// `<platform cache dir>/mtgproxies`, or a relative `.cache/mtgproxies` if there is none.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("mtgproxies")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// The local copy of `url`, downloaded first if it isn't cached yet.
    pub fn get_file(&self, client: &ScryfallClient, file_name: &str, url: &str) -> Result<PathBuf> {
        let path = self.path(file_name);
        let _guard = match self.download_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if path.is_file() {
            debug!("{} is cached", file_name);
            return Ok(path);
        }

        info!("downloading {} to {}", url, path.display());
        let tmp_path = self.path(&format!("{}.part", file_name));
        let result = (|| -> Result<()> {
            let mut response = client.call(url)?;
            let mut file = fs::File::create(&tmp_path)?;
            response.copy_to(&mut file)?;
            file.flush()?;
            fs::rename(&tmp_path, &path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result.map(|_| path)
    }

    /// Scans from the scryfall CDN, named to stay unique across the faces of a card.
    pub fn get_image(&self, client: &ScryfallClient, image_uri: &str) -> Result<PathBuf> {
        self.get_file(client, &image_file_name(image_uri), image_uri)
    }
}

/// `.../png/front/a/b/<id>.png?123` becomes `png_front_<id>.png`.
pub fn image_file_name(image_uri: &str) -> String {
    let segments: Vec<&str> = image_uri.split('/').collect();
    let last = segments
        .last()
        .map(|s| s.split('?').next().unwrap_or_default())
        .unwrap_or_default();
    match segments.len() {
        n if n >= 5 => format!("{}_{}_{}", segments[n - 5], segments[n - 4], last),
        _ => last.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_names() {
        assert_eq!(
            image_file_name(
                "https://cards.scryfall.io/png/front/6/7/67f4c93b-080c-4196-b095-6a120a221988.png?1562404626"
            ),
            "png_front_67f4c93b-080c-4196-b095-6a120a221988.png"
        );
        assert_eq!(
            image_file_name("https://cards.scryfall.io/png/back/6/7/67f4.png"),
            "png_back_67f4.png"
        );
        assert_eq!(image_file_name("card.png?1"), "card.png");
    }

    #[test]
    fn cached_files_are_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested")).unwrap();
        std::fs::write(cache.path("default-cards.json"), "[]").unwrap();
        let client = ScryfallClient::new().unwrap();
        // an unreachable url would fail if it was requested
        let path = cache
            .get_file(&client, "default-cards.json", "http://127.0.0.1:9/default-cards.json")
            .unwrap();
        assert_eq!(path, dir.path().join("nested").join("default-cards.json"));
    }

    #[test]
    fn failed_download_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        let client = ScryfallClient::new().unwrap();
        assert!(cache.get_file(&client, "x.png", "http://127.0.0.1:9/x.png").is_err());
        assert!(!cache.path("x.png").exists());
        assert!(!cache.path("x.png.part").exists());
    }
}
