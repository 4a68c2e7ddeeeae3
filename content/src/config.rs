//! Runtime configuration for the content pipeline.

pub const DEFAULT_FILES_BASE_URL: &str =
    "https://scp-wiki.wdfiles.com/local--files";
pub const DEFAULT_TRUSTED_HOST_SUFFIXES: &[&str] =
    &["wikidot.com", "wdfiles.com"];
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Bare image filenames resolve to `{files_base_url}/{slug}/{file}`.
    pub files_base_url: String,
    /// Absolute image URLs are only kept when their host is one of these
    /// domains or a subdomain of one.
    pub trusted_host_suffixes: Vec<String>,
    /// Articles whose content plus source exceed this are rejected.
    pub max_document_bytes: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            files_base_url: DEFAULT_FILES_BASE_URL.to_string(),
            trusted_host_suffixes: DEFAULT_TRUSTED_HOST_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl ContentConfig {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset or unparseable.
    ///
    /// - CONTENT_FILES_BASE_URL: base of the per-article file area
    /// - CONTENT_TRUSTED_HOSTS: comma-separated trusted host suffixes
    /// - CONTENT_MAX_DOCUMENT_BYTES: size limit for a single article
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let files_base_url = lookup("CONTENT_FILES_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.files_base_url);

        let trusted_host_suffixes = lookup("CONTENT_TRUSTED_HOSTS")
            .map(|hosts| {
                hosts
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|hosts| !hosts.is_empty())
            .unwrap_or(defaults.trusted_host_suffixes);

        let max_document_bytes = lookup("CONTENT_MAX_DOCUMENT_BYTES")
            .and_then(|bytes| bytes.trim().parse().ok())
            .unwrap_or(defaults.max_document_bytes);

        Self {
            files_base_url,
            trusted_host_suffixes,
            max_document_bytes,
        }
    }

    /// True when `host` equals a trusted suffix or is a subdomain of one.
    pub fn trusts_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.trusted_host_suffixes.iter().any(|suffix| {
            host == *suffix
                || host
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}
