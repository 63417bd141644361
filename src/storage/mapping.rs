//! Mapping from the public access URL onto the physical upload root
//!
//! When the local backend is active, the URLs it hands out point back at
//! this same server. The mapping derived here binds the path component of
//! the configured access URL to the physical upload directory, so the HTTP
//! layer can serve stored files statically instead of through a download
//! handler.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::LocalStorageConfig;

use super::StorageError;

/// A computed-once binding between a URL path prefix and a physical root.
///
/// Both sides are normalized to end with exactly one separator, so the
/// wildcard pattern and directory root compose without ambiguity.
#[derive(Debug, Clone)]
pub struct UrlMapping {
    url_prefix: String,
    physical_root: PathBuf,
}

impl UrlMapping {
    /// Derive the mapping from the local storage configuration.
    ///
    /// The access URL must be absolute and carry a path component beyond
    /// the authority. A bare authority, or a path of nothing but
    /// separators, would map the entire URL space onto the upload
    /// directory, so both are rejected as configuration errors.
    pub fn from_config(config: &LocalStorageConfig) -> Result<Self, StorageError> {
        let url = Url::parse(&config.access_url).map_err(|e| {
            StorageError::Configuration(format!(
                "Local access URL {:?} is not an absolute URL: {}",
                config.access_url, e
            ))
        })?;

        let path = url.path();
        if !path.starts_with('/') || path.trim_matches('/').is_empty() {
            return Err(StorageError::Configuration(format!(
                "Local access URL {:?} has no path component after the authority \
                 (expected something like http://host/upload/)",
                config.access_url
            )));
        }

        let mut url_prefix = path.trim_end_matches('/').to_string();
        url_prefix.push('/');

        let mut root = config.upload_path.trim_end_matches('/').to_string();
        root.push('/');

        Ok(Self {
            url_prefix,
            physical_root: PathBuf::from(root),
        })
    }

    /// URL path prefix, always ending with exactly one `/`.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Physical directory the prefix is served from, always ending with a
    /// separator.
    pub fn physical_root(&self) -> &Path {
        &self.physical_root
    }

    /// Prefix in the form the router mounts the static service at. Router
    /// nest paths reject trailing separators, hence the trim.
    pub fn serve_path(&self) -> &str {
        self.url_prefix.trim_end_matches('/')
    }

    /// Wildcard pattern covering everything under the prefix, for logging.
    pub fn pattern(&self) -> String {
        format!("{}**", self.url_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(upload_path: &str, access_url: &str) -> LocalStorageConfig {
        LocalStorageConfig {
            upload_path: upload_path.to_string(),
            access_url: access_url.to_string(),
        }
    }

    #[test]
    fn derives_prefix_and_root_when_separators_are_missing() {
        let mapping = UrlMapping::from_config(&local_config("/data/up", "http://h/u")).unwrap();
        assert_eq!(mapping.url_prefix(), "/u/");
        assert_eq!(mapping.pattern(), "/u/**");
        assert_eq!(mapping.physical_root(), Path::new("/data/up/"));
    }

    #[test]
    fn keeps_single_trailing_separator_when_already_present() {
        let mapping =
            UrlMapping::from_config(&local_config("/data/up/", "http://h:8080/upload/images/"))
                .unwrap();
        assert_eq!(mapping.url_prefix(), "/upload/images/");
        assert_eq!(mapping.pattern(), "/upload/images/**");
        assert_eq!(mapping.physical_root(), Path::new("/data/up/"));
    }

    #[test]
    fn serve_path_carries_no_trailing_separator() {
        let mapping = UrlMapping::from_config(&local_config("/data/up", "http://h/u/")).unwrap();
        assert_eq!(mapping.serve_path(), "/u");
    }

    #[test]
    fn rejects_access_url_without_path_component() {
        let err = UrlMapping::from_config(&local_config("/data/up", "http://h")).unwrap_err();
        assert!(err.to_string().contains("no path component"));
    }

    #[test]
    fn rejects_access_url_with_bare_root_path() {
        let err = UrlMapping::from_config(&local_config("/data/up", "http://h:8080/")).unwrap_err();
        assert!(err.to_string().contains("no path component"));
    }

    // A separators-only path would collapse to the whole-URL-space prefix
    #[test]
    fn rejects_access_url_with_all_slash_path() {
        let err = UrlMapping::from_config(&local_config("/data/up", "http://localhost:8000//"))
            .unwrap_err();
        assert!(err.to_string().contains("no path component"));
    }

    #[test]
    fn rejects_relative_access_url() {
        let err = UrlMapping::from_config(&local_config("/data/up", "/upload/")).unwrap_err();
        assert!(err.to_string().contains("not an absolute URL"));
    }
}
