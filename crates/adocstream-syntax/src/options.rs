/// Knobs for the structural parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Inline macro names treated as URL schemes: `https://host[text]`
    /// becomes a link instead of a generic inline macro.
    pub url_schemes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            url_schemes: DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub const DEFAULT_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "irc", "mailto"];

impl ParseOptions {
    pub fn with_url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_url_scheme(&self, name: &str) -> bool {
        self.url_schemes.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_https() {
        assert!(ParseOptions::default().is_url_scheme("https"));
        assert!(!ParseOptions::default().is_url_scheme("kbd"));
    }

    #[test]
    fn schemes_can_be_replaced() {
        let options = ParseOptions::default().with_url_schemes(["gopher"]);
        assert!(options.is_url_scheme("gopher"));
        assert!(!options.is_url_scheme("https"));
    }
}
