use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::dom::DomTree;
use crate::error::{MatrixError, Result};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Some documentation sites refuse automated browsers
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        launch_opts.idle_browser_timeout = Duration::from_secs(10 * 60);
        launch_opts.headless = options.headless;
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;
        launch_opts.sandbox = options.sandbox;

        log::debug!("Launching browser (headless: {})", options.headless);
        let browser = Browser::new(launch_opts).map_err(|e| MatrixError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| MatrixError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            navigation_timeout: Duration::from_millis(options.navigation_timeout),
        })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        log::debug!("Connecting to browser at {}", options.ws_url);
        let browser =
            Browser::connect(options.ws_url).map_err(|e| MatrixError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            browser,
            navigation_timeout: Duration::from_millis(options.timeout),
        })
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| MatrixError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// The visible tab, or the first one when visibility cannot be told
    pub fn tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        for tab in &tabs {
            match tab.evaluate("document.visibilityState === 'visible'", false) {
                Ok(remote_object) => {
                    if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                        return Ok(tab.clone());
                    }
                }
                Err(e) => log::debug!("Failed to check tab status: {}", e),
            }
        }

        tabs.into_iter()
            .next()
            .ok_or_else(|| MatrixError::TabOperationFailed("No open tab".to_string()))
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.set_default_timeout(self.navigation_timeout);
        tab.navigate_to(url)
            .map_err(|e| MatrixError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| MatrixError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Extract the DOM tree from the active tab
    pub fn extract_dom(&self) -> Result<DomTree> {
        DomTree::from_tab(&self.tab()?)
    }

    /// Navigate, wait for the page and snapshot its DOM
    pub fn load(&self, url: &str) -> Result<DomTree> {
        log::info!("Loading {}", url);
        self.navigate(url)?;
        self.wait_for_navigation()?;
        let tree = self.extract_dom()?;
        log::debug!("Extracted {} elements", tree.count_elements());
        Ok(tree)
    }
}
