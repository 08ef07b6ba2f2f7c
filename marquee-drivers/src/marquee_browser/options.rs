use serde_json::json;
use webdriver::capabilities::Capabilities;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.5993.90 Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
/// User agent and window size presented by the browser session.
pub struct BrowserProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: (1920, 1080),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything needed to open a session against a WebDriver endpoint.
pub struct DriverOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub profile: BrowserProfile,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            profile: BrowserProfile::default(),
        }
    }
}

/// Construct Chrome command-line arguments for a profile.
pub fn build_chrome_arguments(profile: &BrowserProfile, headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        format!("--window-size={},{}", profile.viewport.0, profile.viewport.1),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        format!("--user-agent={}", profile.user_agent),
    ];
    if headless {
        args.push("--headless=new".to_string());
    }
    args
}

/// Build the `goog:chromeOptions` capabilities for a new session.
pub fn chrome_capabilities(options: &DriverOptions) -> Capabilities {
    let mut caps = Capabilities::new();
    let args = build_chrome_arguments(&options.profile, options.headless);
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-automation"],
            "useAutomationExtension": false,
        }),
    );
    caps
}

/// JavaScript applied after navigation to hide the automation flag.
pub struct EvasionScripts;

impl EvasionScripts {
    pub fn hide_webdriver_flag() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }
}
