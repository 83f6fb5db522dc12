//! Resolved include/exclude rules for a single organize run.
//!
//! A [`FilterSet`] is built once from the merged command-line and config-file
//! values and is read-only afterwards. Format tokens are stored uppercased so
//! they compare directly against extension tokens; folder names are kept
//! exactly as supplied.

use std::collections::HashSet;

/// Membership queries over the exclude formats, exclude folders and include formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    exclude_formats: HashSet<String>,
    exclude_folders: HashSet<String>,
    include_formats: HashSet<String>,
}

impl FilterSet {
    /// Builds a filter set, normalizing format tokens and dropping empty entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use ftorg::FilterSet;
    ///
    /// let filters = FilterSet::new(["tmp", " Bak "], ["node_modules"], Vec::<String>::new());
    /// assert!(filters.is_format_excluded("BAK"));
    /// assert!(filters.is_folder_excluded("node_modules"));
    /// assert!(filters.is_format_includable("PDF"));
    /// ```
    pub fn new<F, D, I>(exclude_formats: F, exclude_folders: D, include_formats: I) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            exclude_formats: normalize_formats(exclude_formats),
            exclude_folders: exclude_folders
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            include_formats: normalize_formats(include_formats),
        }
    }

    /// True when the walker must not descend into a folder with this name.
    ///
    /// Besides explicit folder names, any folder whose name is itself a known
    /// format token is skipped so already-sorted folders are not rescanned.
    pub fn is_folder_excluded(&self, name: &str) -> bool {
        if self.exclude_folders.contains(name) {
            return true;
        }
        let token = name.to_uppercase();
        self.exclude_formats.contains(&token) || self.include_formats.contains(&token)
    }

    pub fn is_format_excluded(&self, ext: &str) -> bool {
        self.exclude_formats.contains(ext)
    }

    /// True when no include list is set or the extension is on it.
    pub fn is_format_includable(&self, ext: &str) -> bool {
        self.include_formats.is_empty() || self.include_formats.contains(ext)
    }

    pub fn exclude_formats(&self) -> &HashSet<String> {
        &self.exclude_formats
    }

    pub fn exclude_folders(&self) -> &HashSet<String> {
        &self.exclude_folders
    }

    pub fn include_formats(&self) -> &HashSet<String> {
        &self.include_formats
    }
}

/// Trims and uppercases format tokens, dropping blanks.
fn normalize_formats<T>(tokens: T) -> HashSet<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| token.as_ref().trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Vec<&'static str> {
        Vec::new()
    }

    #[test]
    fn test_formats_are_uppercased_and_trimmed() {
        let filters = FilterSet::new([" jpg", "Png "], empty(), ["docx"]);
        assert!(filters.is_format_excluded("JPG"));
        assert!(filters.is_format_excluded("PNG"));
        assert!(!filters.is_format_excluded("jpg"));
        assert!(filters.include_formats().contains("DOCX"));
    }

    #[test]
    fn test_blank_tokens_are_dropped() {
        let filters = FilterSet::new(["", "  "], [""], empty());
        assert!(filters.exclude_formats().is_empty());
        assert!(filters.exclude_folders().is_empty());
        assert!(!filters.is_format_excluded(""));
    }

    #[test]
    fn test_empty_include_allows_everything() {
        let filters = FilterSet::default();
        assert!(filters.is_format_includable("ANYTHING"));
        assert!(filters.is_format_includable(""));
    }

    #[test]
    fn test_include_list_restricts() {
        let filters = FilterSet::new(empty(), empty(), ["pdf"]);
        assert!(filters.is_format_includable("PDF"));
        assert!(!filters.is_format_includable("TXT"));
    }

    #[test]
    fn test_folder_names_are_case_sensitive() {
        let filters = FilterSet::new(empty(), ["Backup"], empty());
        assert!(filters.is_folder_excluded("Backup"));
        assert!(!filters.is_folder_excluded("backup"));
    }

    #[test]
    fn test_folder_matching_format_token_is_excluded() {
        let filters = FilterSet::new(["tmp"], empty(), ["jpg"]);
        assert!(filters.is_folder_excluded("TMP"));
        assert!(filters.is_folder_excluded("tmp"));
        assert!(filters.is_folder_excluded("Jpg"));
        assert!(!filters.is_folder_excluded("PNG"));
    }
}
