/// Container formats accepted when no format is selected explicitly.
pub const SUPPORTED_FORMATS: [&str; 2] = ["flac", "mp3"];

/// The single name/title filter in effect for a run.
///
/// Only one kind can be active, so conflicting filters are rejected while the
/// configuration is resolved and never reach the walker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameFilter {
    #[default]
    Off,
    Prefix(String),
    /// Matched against the full file name, extension included.
    Suffix(String),
    Contains(String),
    TitleContains(String),
}

impl NameFilter {
    /// Checks that need nothing but the file name. Runs before probing.
    pub fn accepts_name(&self, file_name: &str) -> bool {
        match self {
            NameFilter::Prefix(prefix) => file_name.starts_with(prefix.as_str()),
            NameFilter::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
            NameFilter::Contains(needle) => file_name.contains(needle.as_str()),
            NameFilter::Off | NameFilter::TitleContains(_) => true,
        }
    }

    /// Checks against the resolved title. Runs after probing.
    pub fn accepts_title(&self, title: &str) -> bool {
        match self {
            NameFilter::TitleContains(needle) => title.contains(needle.as_str()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatFilter {
    /// Any entry of [`SUPPORTED_FORMATS`].
    #[default]
    Supported,
    /// Lower-cased selected format.
    Only(String),
}

impl FormatFilter {
    /// `format_name` is the probed identifier, possibly a comma-separated
    /// alias list such as `mov,mp4,m4a`.
    pub fn accepts(&self, format_name: &str) -> bool {
        format_name
            .split(',')
            .map(|alias| alias.trim().to_lowercase())
            .any(|alias| match self {
                FormatFilter::Supported => SUPPORTED_FORMATS.contains(&alias.as_str()),
                FormatFilter::Only(selected) => alias == *selected,
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    pub name: NameFilter,
    pub format: FormatFilter,
}

impl FilterChain {
    pub fn passes_name(&self, file_name: &str) -> bool {
        self.name.accepts_name(file_name)
    }

    pub fn passes_metadata(&self, format_name: &str, title: &str) -> bool {
        self.format.accepts(format_name) && self.name.accepts_title(title)
    }
}
