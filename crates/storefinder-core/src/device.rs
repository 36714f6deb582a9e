//! Platform heuristics for the client that issued a request.

use serde::Serialize;

/// Viewport width below which the layout switches to its compact variant.
pub const COMPACT_VIEWPORT_WIDTH: u32 = 640;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
    Mac,
    Linux,
    Web,
    Unknown,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Web => "web",
            Platform::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceInfo {
    pub platform: Platform,
    pub is_ios: bool,
    pub is_android: bool,
    pub is_windows: bool,
    pub is_mac: bool,
    pub is_linux: bool,
    pub is_mobile: bool,
    pub is_desktop: bool,
}

impl DeviceInfo {
    /// The answer when there is no client information at all.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            platform: Platform::Unknown,
            is_ios: false,
            is_android: false,
            is_windows: false,
            is_mac: false,
            is_linux: false,
            is_mobile: false,
            is_desktop: true,
        }
    }

    /// Classify a client from its user agent and platform strings.
    ///
    /// iPadOS reports itself as `MacIntel`; a touch-capable `MacIntel` is
    /// treated as iOS.
    #[must_use]
    pub fn detect(user_agent: &str, platform: &str, max_touch_points: u32) -> Self {
        let is_ios = ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|needle| user_agent.contains(needle))
            || (platform == "MacIntel" && max_touch_points > 1);
        let is_android = user_agent.to_ascii_lowercase().contains("android");
        let is_windows = platform.contains("Win");
        let is_mac = platform.contains("Mac") && !is_ios;
        let is_linux = platform.contains("Linux") && !is_android;
        let is_mobile = is_ios || is_android;

        let platform = if is_ios {
            Platform::Ios
        } else if is_android {
            Platform::Android
        } else if is_windows {
            Platform::Windows
        } else if is_mac {
            Platform::Mac
        } else if is_linux {
            Platform::Linux
        } else {
            Platform::Web
        };

        Self {
            platform,
            is_ios,
            is_android,
            is_windows,
            is_mac,
            is_linux,
            is_mobile,
            is_desktop: !is_mobile,
        }
    }

    /// Classify from a user agent alone, as seen by an HTTP server.
    ///
    /// Browser UAs embed the OS token (`Windows NT`, `Macintosh`, `Linux`), so
    /// the UA doubles as the platform string.
    #[must_use]
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if !ua.trim().is_empty() => Self::detect(ua, ua, 0),
            _ => Self::unknown(),
        }
    }
}

/// Whether the compact (mobile) layout applies. An unknown width only
/// counts for mobile devices.
#[must_use]
pub fn is_compact_viewport(info: &DeviceInfo, viewport_width: Option<u32>) -> bool {
    info.is_mobile || viewport_width.is_some_and(|w| w < COMPACT_VIEWPORT_WIDTH)
}
