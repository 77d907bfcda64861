//! Whether charts are indexed by block number or by time.
//!
//! The mode is persisted in a single cookie so that it survives page reloads.
//! The cookie holds the label of the toggle button, which names the mode the
//! user would switch *to*: "Choose Dates" while blocks are shown and
//! "Choose Blocks" while dates are shown.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// The name of the cookie slot that holds the display mode.
pub const DISPLAY_MODE_COOKIE: &str = "chart_value";

/// Which series field drives the charts and which backend call fetches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayMode {
    /// Charts are keyed by block number.
    #[default]
    Block,
    /// Charts are keyed by timestamp.
    Time,
}

impl DisplayMode {
    /// The label shown on the toggle button and stored in the cookie.
    pub fn toggle_label(self) -> &'static str {
        match self {
            DisplayMode::Block => "Choose Dates",
            DisplayMode::Time => "Choose Blocks",
        }
    }

    pub fn from_toggle_label(label: &str) -> Option<Self> {
        match label {
            "Choose Dates" => Some(DisplayMode::Block),
            "Choose Blocks" => Some(DisplayMode::Time),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Block => DisplayMode::Time,
            DisplayMode::Time => DisplayMode::Block,
        }
    }

    /// The name of the x axis for charts in this mode.
    pub fn axis_name(self) -> &'static str {
        match self {
            DisplayMode::Block => "Block",
            DisplayMode::Time => "Time",
        }
    }

    /// Read the mode from the request cookies, falling back to the default mode
    /// if the cookie is missing or holds an unknown label.
    pub fn from_cookies(jar: &CookieJar) -> Self {
        jar.get(DISPLAY_MODE_COOKIE)
            .and_then(|cookie| Self::from_toggle_label(cookie.value()))
            .unwrap_or_default()
    }

    pub fn to_cookie(self) -> Cookie<'static> {
        Cookie::build((DISPLAY_MODE_COOKIE, self.toggle_label()))
            .path("/")
            .same_site(SameSite::Strict)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::{Cookie, CookieJar};

    use super::{DISPLAY_MODE_COOKIE, DisplayMode};

    #[test]
    fn toggling_twice_is_identity() {
        for mode in [DisplayMode::Block, DisplayMode::Time] {
            assert_eq!(mode.toggled().toggled(), mode);
            assert_ne!(mode.toggled(), mode);
        }
    }

    #[test]
    fn block_mode_is_stored_as_choose_dates() {
        assert_eq!(DisplayMode::Block.to_cookie().value(), "Choose Dates");
        assert_eq!(DisplayMode::Time.to_cookie().value(), "Choose Blocks");
    }

    #[test]
    fn reads_mode_from_cookie() {
        let jar = CookieJar::new().add(Cookie::new(DISPLAY_MODE_COOKIE, "Choose Blocks"));

        assert_eq!(DisplayMode::from_cookies(&jar), DisplayMode::Time);
    }

    #[test]
    fn missing_or_garbage_cookie_falls_back_to_blocks() {
        assert_eq!(DisplayMode::from_cookies(&CookieJar::new()), DisplayMode::Block);

        let jar = CookieJar::new().add(Cookie::new(DISPLAY_MODE_COOKIE, "sideways"));
        assert_eq!(DisplayMode::from_cookies(&jar), DisplayMode::Block);
    }
}
