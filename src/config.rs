use std::env;

#[derive(Clone)]
pub struct Config {
    pub webdriver_endpoint: String,
    pub connect_timeout_ms: u64,
    pub preferred_browser: Option<String>,
    pub headless: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            webdriver_endpoint: env::var("WEBDRIVER_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4444".to_string()),
            connect_timeout_ms: env::var("WEBDRIVER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2000),
            preferred_browser: env::var("WEBDRIVER_PREFERRED_BROWSER").ok(),
            headless: env::var("WEBDRIVER_HEADLESS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.webdriver_endpoint.starts_with("http://")
            && !self.webdriver_endpoint.starts_with("https://")
        {
            return Err(format!(
                "Invalid WebDriver endpoint '{}'. Must start with http:// or https://",
                self.webdriver_endpoint
            ));
        }

        if self.connect_timeout_ms == 0 {
            return Err("WebDriver connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn setup_guidance() -> &'static str {
        r#"
WebDriver setup:

1. Install a WebDriver (choose one):

   GeckoDriver (Firefox):
   - macOS: brew install geckodriver
   - Ubuntu: sudo apt-get install firefox-geckodriver
   - Manual: https://github.com/mozilla/geckodriver/releases

   ChromeDriver:
   - macOS: brew install chromedriver
   - Ubuntu: sudo apt-get install chromium-chromedriver
   - Manual: https://chromedriver.chromium.org/

2. Start it:
   - Firefox: geckodriver --port 4444
   - Chrome: chromedriver --port=9515

3. Environment variables (all optional):
   - WEBDRIVER_ENDPOINT: WebDriver URL (default: http://localhost:4444)
   - WEBDRIVER_PREFERRED_BROWSER: chrome or firefox
   - WEBDRIVER_TIMEOUT_MS: Connection timeout in ms (default: 2000)
   - WEBDRIVER_HEADLESS: true (default) or false for GUI mode
"#
    }
}
