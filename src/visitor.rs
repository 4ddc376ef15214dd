//! Website visitor reports and the notification text built from them.

use serde::Deserialize;

/// Visitor report as posted by the website. Every field is optional here so
/// that a missing field becomes a 400 listing it instead of a generic decode error.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorReport {
    /// Visitor IP address.
    #[serde(default)]
    pub ip: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Device description; accepted in place of `userAgent`.
    #[serde(default)]
    pub device: Option<String>,
    /// Browser name.
    #[serde(default)]
    pub browser: Option<String>,
    /// Visit time as reported by the browser.
    #[serde(default)]
    pub time: Option<String>,
}

/// Which fields a route insists on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// `ip`, `userAgent` (or `device`) and `time`.
    Basic,
    /// The basic fields plus `browser`.
    WithBrowser,
}

/// A report that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Visitor IP address.
    pub ip: String,
    /// User agent or device description.
    pub device: String,
    /// Browser name, when reported.
    pub browser: Option<String>,
    /// Visit time.
    pub time: String,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VisitorReport {
    /// Validate the report, returning the names of any missing fields.
    pub fn validate(self, requirement: Requirement) -> Result<Visit, Vec<&'static str>> {
        let ip = present(self.ip);
        let device = present(self.user_agent).or_else(|| present(self.device));
        let browser = present(self.browser);
        let time = present(self.time);

        let mut missing = Vec::new();
        if ip.is_none() {
            missing.push("ip");
        }
        if device.is_none() {
            missing.push("userAgent");
        }
        if time.is_none() {
            missing.push("time");
        }
        if requirement == Requirement::WithBrowser && browser.is_none() {
            missing.push("browser");
        }

        match (ip, device, time) {
            (Some(ip), Some(device), Some(time)) if missing.is_empty() => Ok(Visit {
                ip,
                device,
                browser,
                time,
            }),
            _ => Err(missing),
        }
    }
}

impl Visit {
    /// Human-readable notification text.
    pub fn message(&self) -> String {
        let mut text = format!("🚨 New website visitor!\n📍 IP: {}\n💻 Device: {}", self.ip, self.device);
        if let Some(browser) = &self.browser {
            text.push_str(&format!("\n🌐 Browser: {}", browser));
        }
        text.push_str(&format!("\n🕒 Time: {}", self.time));
        text
    }
}
