//! Country names, flag glyphs and the remote shape/flag images.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use isocountry::CountryCode;
use parking_lot::Mutex;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::WorldClockError;

/// English country name for an ISO alpha-2 code, case-insensitive.
pub fn country_name(code: &str) -> Option<&'static str> {
    let upper = code.trim().to_uppercase();
    CountryCode::for_alpha2(&upper).ok().map(|c| display_name(c.name()))
}

/// Shorten official names that read badly on a clock label.
pub fn display_name(official: &str) -> &str {
    match official {
        "Taiwan, Province of China" => "Taiwan",
        other => other,
    }
}

/// Regional-indicator flag for a two-letter code, e.g. "jp" → 🇯🇵.
pub fn flag_emoji(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Raw SVG documents for one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryImages {
    pub code: String,
    pub shape_svg: Vec<u8>,
    pub flag_svg: Vec<u8>,
}

impl CountryImages {
    /// Write `{code}-shape.svg` and `{code}-flag.svg` into `dir`.
    pub fn save_to(&self, dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let shape = dir.join(format!("{}-shape.svg", self.code));
        let flag = dir.join(format!("{}-flag.svg", self.code));
        fs::write(&shape, &self.shape_svg)?;
        fs::write(&flag, &self.flag_svg)?;
        Ok((shape, flag))
    }
}

/// Fetches country shapes and flags, remembering each country once fetched.
#[derive(Debug)]
pub struct CountryAssets {
    shapes_base: String,
    flags_base: String,
    http: Client,
    cache: Mutex<HashMap<String, Arc<CountryImages>>>,
}

impl CountryAssets {
    pub fn new(shapes_base: impl Into<String>, flags_base: impl Into<String>, http: Client) -> Self {
        Self {
            shapes_base: shapes_base.into().trim_end_matches('/').to_string(),
            flags_base: flags_base.into().trim_end_matches('/').to_string(),
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached(&self, code: &str) -> Option<Arc<CountryImages>> {
        self.cache.lock().get(&code.to_lowercase()).cloned()
    }

    /// Both images must download for the country to count as fetched.
    #[instrument(skip(self))]
    pub async fn fetch(&self, code: &str) -> Result<Arc<CountryImages>, WorldClockError> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return Err(WorldClockError::ImageFetchFailure {
                code,
                reason: "no country code".to_string(),
            });
        }
        if let Some(hit) = self.cached(&code) {
            debug!("country images served from cache");
            return Ok(hit);
        }

        let shape_svg = self.download(&format!("{}/{code}.svg", self.shapes_base), &code).await?;
        let flag_svg = self.download(&format!("{}/{code}.svg", self.flags_base), &code).await?;

        let images = Arc::new(CountryImages { code: code.clone(), shape_svg, flag_svg });
        self.cache.lock().insert(code, Arc::clone(&images));
        Ok(images)
    }

    async fn download(&self, url: &str, code: &str) -> Result<Vec<u8>, WorldClockError> {
        let failure = |reason: String| WorldClockError::ImageFetchFailure {
            code: code.to_string(),
            reason,
        };

        let res = self.http.get(url).send().await.map_err(|e| failure(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(failure(format!("{url} returned {status}")));
        }
        let bytes = res.bytes().await.map_err(|e| failure(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_name_is_case_insensitive() {
        assert_eq!(country_name("jp"), Some("Japan"));
        assert_eq!(country_name("JP"), Some("Japan"));
        assert!(country_name("gb").is_some_and(|n| n.contains("United Kingdom")));
    }

    #[test]
    fn unknown_codes_have_no_name() {
        assert_eq!(country_name(""), None);
        assert_eq!(country_name("zz"), None);
    }

    #[test]
    fn taiwan_is_shortened() {
        assert_eq!(display_name("Taiwan, Province of China"), "Taiwan");
        assert_eq!(display_name("France"), "France");
    }

    #[test]
    fn flag_emoji_from_code() {
        assert_eq!(flag_emoji("jp").as_deref(), Some("🇯🇵"));
        assert_eq!(flag_emoji("GB").as_deref(), Some("🇬🇧"));
        assert_eq!(flag_emoji("g1"), None);
        assert_eq!(flag_emoji(""), None);
    }

    #[test]
    fn images_are_saved_under_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let images = CountryImages {
            code: "fr".into(),
            shape_svg: b"<svg/>".to_vec(),
            flag_svg: b"<svg></svg>".to_vec(),
        };

        let (shape, flag) = images.save_to(dir.path()).expect("save");
        assert!(shape.ends_with("fr-shape.svg"));
        assert_eq!(fs::read(flag).expect("read"), b"<svg></svg>");
    }
}
