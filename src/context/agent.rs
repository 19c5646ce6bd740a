//! User-Agent parsing.
//!
//! Extracts device, browser and operating system descriptors from a raw
//! User-Agent string. Detection uses ordered regex rules: the first matching
//! rule wins, so more specific products (Edge, Opera) are listed before the
//! engines they embed (Chrome, Safari).

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_DEVICE_LABEL;

/// A product name with an optional version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedVersion {
    /// Product name
    pub name: Option<String>,
    /// Product version
    pub version: Option<String>,
}

impl NamedVersion {
    fn new(name: &str, version: Option<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            version,
        }
    }

    /// Joins name and version with a space, skipping whichever is missing.
    ///
    /// Returns `None` when both are missing.
    pub fn label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.name.as_deref(), self.version.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Hardware descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Manufacturer, e.g. "Apple"
    pub vendor: Option<String>,
    /// Model, e.g. "iPhone"
    pub model: Option<String>,
    /// Generic device class, e.g. "mobile" or "tablet"
    pub kind: Option<String>,
}

impl DeviceInfo {
    /// Human-readable device label.
    ///
    /// `"{vendor} {model}"` when both are known, else the device class, else "Desktop".
    pub fn label(&self) -> String {
        match (self.vendor.as_deref(), self.model.as_deref(), self.kind.as_deref()) {
            (Some(vendor), Some(model), _) if !vendor.is_empty() && !model.is_empty() => {
                format!("{} {}", vendor, model)
            }
            (_, _, Some(kind)) if !kind.is_empty() => kind.to_string(),
            _ => DEFAULT_DEVICE_LABEL.to_string(),
        }
    }
}

/// Result of parsing a User-Agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentInfo {
    /// Hardware descriptor
    pub device: DeviceInfo,
    /// Browser name and version
    pub browser: NamedVersion,
    /// Operating system name and version
    pub os: NamedVersion,
}

/// Turns a raw User-Agent string into device/browser/OS descriptors.
///
/// Implementations must be total: unknown input yields empty descriptors.
pub trait AgentParser: Send + Sync {
    /// Classifies one User-Agent string.
    fn parse(&self, user_agent: &str) -> AgentInfo;
}

/// Compiles a pattern known to be valid at build time.
fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid user-agent pattern {}: {}", pattern, e))
}

static BROWSER_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("Edge", rule(r"Edg(?:e|A|iOS)?/([\d.]+)")),
        ("Opera", rule(r"(?:OPR|Opera)/([\d.]+)")),
        ("Samsung Internet", rule(r"SamsungBrowser/([\d.]+)")),
        ("Firefox", rule(r"(?:Firefox|FxiOS)/([\d.]+)")),
        ("Chrome", rule(r"(?:Chrome|CriOS)/([\d.]+)")),
        ("Safari", rule(r"Version/([\d.]+).*Safari/")),
    ]
});

static IOS_RE: LazyLock<Regex> =
    LazyLock::new(|| rule(r"(?:iPhone|iPad|iPod).*?OS (\d+(?:_\d+)*)"));
static MACOS_RE: LazyLock<Regex> = LazyLock::new(|| rule(r"Mac OS X (\d+(?:[_.]\d+)*)"));
static WINDOWS_RE: LazyLock<Regex> = LazyLock::new(|| rule(r"Windows NT (\d+\.\d+)"));
static ANDROID_RE: LazyLock<Regex> = LazyLock::new(|| rule(r"Android (\d+(?:\.\d+)*)"));
static ANDROID_MODEL_RE: LazyLock<Regex> =
    LazyLock::new(|| rule(r"Android [\d.]+;(?:\s*[a-z]{2}[-_][A-Za-z]{2};)?\s*([^;)]+?)(?:\s+Build/[^;)]*)?\)"));

/// Model prefixes mapped to their vendor.
const ANDROID_VENDORS: &[(&str, &str)] = &[
    ("SM-", "Samsung"),
    ("GT-", "Samsung"),
    ("Pixel", "Google"),
    ("Redmi", "Xiaomi"),
    ("POCO", "Xiaomi"),
    ("moto", "Motorola"),
    ("ONEPLUS", "OnePlus"),
    ("Nokia", "Nokia"),
    ("HUAWEI", "Huawei"),
];

/// Default parser based on ordered regex rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexAgentParser;

impl RegexAgentParser {
    fn browser(user_agent: &str) -> NamedVersion {
        BROWSER_RULES
            .iter()
            .find_map(|(name, re)| {
                re.captures(user_agent)
                    .map(|caps| NamedVersion::new(name, caps.get(1).map(|m| m.as_str().to_string())))
            })
            .unwrap_or_default()
    }

    fn os(user_agent: &str) -> NamedVersion {
        let version_of = |re: &Regex| {
            re.captures(user_agent)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().replace('_', "."))
        };

        // iOS first: iPad and iPhone agents also claim "like Mac OS X"
        if let Some(version) = version_of(&IOS_RE) {
            return NamedVersion::new("iOS", Some(version));
        }
        if let Some(version) = version_of(&WINDOWS_RE) {
            return NamedVersion::new("Windows", Some(windows_release(&version)));
        }
        if user_agent.contains("Windows") {
            return NamedVersion::new("Windows", None);
        }
        if let Some(version) = version_of(&MACOS_RE) {
            return NamedVersion::new("macOS", Some(version));
        }
        if user_agent.contains("Android") {
            return NamedVersion::new("Android", version_of(&ANDROID_RE));
        }
        if user_agent.contains("CrOS") {
            return NamedVersion::new("Chrome OS", None);
        }
        if user_agent.contains("Linux") {
            return NamedVersion::new("Linux", None);
        }
        NamedVersion::default()
    }

    fn device(user_agent: &str) -> DeviceInfo {
        let apple = |model: &str, kind: &str| DeviceInfo {
            vendor: Some("Apple".to_string()),
            model: Some(model.to_string()),
            kind: Some(kind.to_string()),
        };
        if user_agent.contains("iPhone") {
            return apple("iPhone", "mobile");
        }
        if user_agent.contains("iPad") {
            return apple("iPad", "tablet");
        }
        if user_agent.contains("iPod") {
            return apple("iPod", "mobile");
        }

        let kind = if user_agent.contains("Tablet") {
            Some("tablet")
        } else if user_agent.contains("Mobi") {
            Some("mobile")
        } else if user_agent.contains("Android") {
            // Android agents without "Mobile" are tablets
            Some("tablet")
        } else {
            None
        };

        let model = ANDROID_MODEL_RE
            .captures(user_agent)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            // Reduced user-agents replace the model with a single letter
            .filter(|model| model.len() > 1);
        let vendor = model.as_deref().and_then(|model| {
            ANDROID_VENDORS
                .iter()
                .find(|(prefix, _)| model.starts_with(prefix))
                .map(|(_, vendor)| vendor.to_string())
        });

        DeviceInfo {
            vendor,
            model,
            kind: kind.map(str::to_string),
        }
    }
}

impl AgentParser for RegexAgentParser {
    fn parse(&self, user_agent: &str) -> AgentInfo {
        AgentInfo {
            device: Self::device(user_agent),
            browser: Self::browser(user_agent),
            os: Self::os(user_agent),
        }
    }
}

/// Maps a Windows NT kernel version to its marketing release.
fn windows_release(nt_version: &str) -> String {
    match nt_version {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.1" => "XP",
        other => other,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const SAMSUNG_ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/23.0 Chrome/115.0.0.0 Mobile Safari/537.36";
    const REDUCED_ANDROID: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
    const EDGE_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.51";

    #[test]
    fn test_chrome_on_windows_desktop() {
        let info = RegexAgentParser.parse(CHROME_WINDOWS);
        assert_eq!(info.browser.label().as_deref(), Some("Chrome 131.0.0.0"));
        assert_eq!(info.os.label().as_deref(), Some("Windows 10"));
        assert_eq!(info.device.label(), "Desktop");
    }

    #[test]
    fn test_safari_on_iphone() {
        let info = RegexAgentParser.parse(SAFARI_IPHONE);
        assert_eq!(info.browser.label().as_deref(), Some("Safari 17.4"));
        assert_eq!(info.os.label().as_deref(), Some("iOS 17.4"));
        assert_eq!(info.device.label(), "Apple iPhone");
    }

    #[test]
    fn test_samsung_browser_on_galaxy() {
        let info = RegexAgentParser.parse(SAMSUNG_ANDROID);
        assert_eq!(
            info.browser.label().as_deref(),
            Some("Samsung Internet 23.0")
        );
        assert_eq!(info.os.label().as_deref(), Some("Android 13"));
        assert_eq!(info.device.label(), "Samsung SM-S918B");
    }

    #[test]
    fn test_reduced_android_falls_back_to_device_kind() {
        let info = RegexAgentParser.parse(REDUCED_ANDROID);
        assert_eq!(info.device.model, None);
        assert_eq!(info.device.label(), "mobile");
    }

    #[test]
    fn test_firefox_on_linux() {
        let info = RegexAgentParser.parse(FIREFOX_LINUX);
        assert_eq!(info.browser.label().as_deref(), Some("Firefox 125.0"));
        assert_eq!(info.os.label().as_deref(), Some("Linux"));
        assert_eq!(info.device.label(), "Desktop");
    }

    #[test]
    fn test_edge_wins_over_chrome() {
        let info = RegexAgentParser.parse(EDGE_MAC);
        assert_eq!(info.browser.label().as_deref(), Some("Edge 124.0.2478.51"));
        assert_eq!(info.os.label().as_deref(), Some("macOS 10.15.7"));
    }

    #[test]
    fn test_unknown_agent_is_empty() {
        let info = RegexAgentParser.parse("curl/8.5.0");
        assert_eq!(info.browser.label(), None);
        assert_eq!(info.os.label(), None);
        assert_eq!(info.device.label(), "Desktop");

        let info = RegexAgentParser.parse("");
        assert_eq!(info, AgentInfo::default());
    }

    #[test]
    fn test_device_label_requires_vendor_and_model() {
        let device = DeviceInfo {
            vendor: Some("Acme".to_string()),
            model: None,
            kind: Some("tablet".to_string()),
        };
        assert_eq!(device.label(), "tablet");

        let device = DeviceInfo {
            vendor: Some("Acme".to_string()),
            model: Some("One".to_string()),
            kind: None,
        };
        assert_eq!(device.label(), "Acme One");
    }
}
