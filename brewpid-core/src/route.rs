use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Settings,
    Chart,
}

impl Route {
    /// Accepts `#chart` as well as `chart`.
    pub fn from_hash(hash: &str) -> Option<Self> {
        match hash.trim().trim_start_matches('#') {
            "home" => Some(Route::Home),
            "settings" => Some(Route::Settings),
            "chart" => Some(Route::Chart),
            _ => None,
        }
    }

    /// Unknown or empty hashes redirect home.
    pub fn resolve(hash: &str) -> Self {
        Self::from_hash(hash).unwrap_or_else(|| {
            log::debug!("Unknown route {hash:?}, redirecting to #home");
            Route::Home
        })
    }

    pub fn hash(self) -> &'static str {
        match self {
            Route::Home => "#home",
            Route::Settings => "#settings",
            Route::Chart => "#chart",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hash())
    }
}
