//! Browser control over the Chrome `DevTools` Protocol.
//!
//! `BrowserConfig` is always available so front ends can build it from flags.
//! `ChromiumDriver`, the real `PanierDriver`, needs the `browser` feature.

/// Default viewport width
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Default viewport height
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            chromium_path: None,
            user_agent: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;

#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::significant_drop_tightening)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{Actionability, ForcedClick, PanierDriver};
    use crate::locator::{ClickOptions, Selector};
    use crate::result::{PanierError, PanierResult};
    use crate::script;

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::handler::viewport::Viewport;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::{DeserializeOwned, Error as _};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Chromium page driven over CDP
    #[derive(Debug)]
    pub struct ChromiumDriver {
        config: BrowserConfig,
        browser: Arc<Mutex<CdpBrowser>>,
        page: CdpPage,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumDriver {
        /// Launch Chromium and open a blank page
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched or the page cannot be created
        pub async fn launch(config: BrowserConfig) -> PanierResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .viewport(Viewport {
                    width: config.viewport_width,
                    height: config.viewport_height,
                    device_scale_factor: None,
                    emulating_mobile: false,
                    is_landscape: false,
                    has_touch: false,
                });

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| PanierError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| PanierError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        tracing::debug!(error = %e, "CDP handler stopped");
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| PanierError::Page {
                    message: e.to_string(),
                })?;

            if let Some(ref ua) = config.user_agent {
                page.set_user_agent(ua.as_str())
                    .await
                    .map_err(|e| PanierError::Page {
                        message: e.to_string(),
                    })?;
            }

            tracing::info!(
                headless = config.headless,
                width = config.viewport_width,
                height = config.viewport_height,
                "chromium launched"
            );

            Ok(Self {
                config,
                browser: Arc::new(Mutex::new(browser)),
                page,
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Evaluate a page script and decode its JSON result.
        ///
        /// Results go through `JSON.stringify` so that `null` survives the
        /// trip back from `Runtime.evaluate`. A failed evaluation is a
        /// `Script` error (auto-wait polls past it); an undecodable result is
        /// a `Json` error.
        async fn eval<T: DeserializeOwned>(&self, script: &str) -> PanierResult<T> {
            let expression = format!("JSON.stringify({script})");
            let json: String = self
                .page
                .evaluate_expression(expression)
                .await
                .map_err(|e| PanierError::Script {
                    message: e.to_string(),
                })?
                .into_value()
                .map_err(|e| PanierError::Json(serde_json::Error::custom(e)))?;
            Ok(serde_json::from_str(&json)?)
        }

        /// Move, press and release the left button at `(x, y)`
        async fn mouse_click(&self, x: f64, y: f64) -> PanierResult<()> {
            for kind in [
                DispatchMouseEventType::MouseMoved,
                DispatchMouseEventType::MousePressed,
                DispatchMouseEventType::MouseReleased,
            ] {
                self.dispatch_mouse(kind, x, y).await?;
            }
            Ok(())
        }

        async fn dispatch_mouse(
            &self,
            kind: DispatchMouseEventType,
            x: f64,
            y: f64,
        ) -> PanierResult<()> {
            let params = DispatchMouseEventParams::builder()
                .r#type(kind)
                .x(x)
                .y(y)
                .button(MouseButton::Left)
                .click_count(1)
                .build()
                .map_err(|message| PanierError::Input { message })?;

            self.page
                .execute(params)
                .await
                .map_err(|e| PanierError::Input {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    #[async_trait]
    impl PanierDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> PanierResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| PanierError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> PanierResult<String> {
            let url = self.page.url().await.map_err(|e| PanierError::Page {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_else(|| "about:blank".to_string()))
        }

        async fn count(&self, selector: &Selector) -> PanierResult<usize> {
            self.eval(&script::count_script(selector)).await
        }

        async fn text_content(
            &self,
            selector: &Selector,
            index: usize,
        ) -> PanierResult<Option<String>> {
            self.eval(&script::text_script(selector, index)).await
        }

        async fn actionability(
            &self,
            selector: &Selector,
            index: usize,
        ) -> PanierResult<Option<Actionability>> {
            self.eval(&script::actionability_script(selector, index))
                .await
        }

        async fn click(
            &mut self,
            selector: &Selector,
            index: usize,
            options: &ClickOptions,
        ) -> PanierResult<()> {
            let missing = || PanierError::Input {
                message: format!("no element at index {index} for {selector}"),
            };

            let target: Option<Actionability> = self
                .eval(&script::actionability_script(selector, index))
                .await?;
            let target = target.ok_or_else(missing)?;

            if !options.force {
                return self.mouse_click(target.x, target.y).await;
            }
            match target.forced_click() {
                ForcedClick::Mouse { x, y } => self.mouse_click(x, y).await,
                ForcedClick::Dom => {
                    tracing::debug!(%selector, index, "no layout box, dispatching click event");
                    let clicked: bool = self
                        .eval(&script::force_click_script(selector, index))
                        .await?;
                    if clicked {
                        Ok(())
                    } else {
                        Err(missing())
                    }
                }
            }
        }

        async fn screenshot(&self) -> PanierResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                self.page
                    .execute(params)
                    .await
                    .map_err(|e| PanierError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| PanierError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&mut self) -> PanierResult<()> {
            let result = {
                let mut browser = self.browser.lock().await;
                match browser.close().await {
                    Ok(_) => browser.wait().await.map(|_| ()).map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            };
            self.handle.abort();
            result.map_err(|message| PanierError::BrowserClose { message })
        }
    }
}
