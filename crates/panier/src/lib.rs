//! Panier: cart scenario check for mon-marche.fr
//!
//! A small Playwright-style automation layer over the Chrome `DevTools`
//! Protocol, and the one scenario it exists for: add "La Tomate grappe
//! sélection HVE" to the cart, open the cart, and check the cart dialog lists
//! the product.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │ CartScenario │───►│   Page<D>    │───►│ PanierDriver         │
//! │ (4 steps)    │    │ auto-wait,   │    │  ChromiumDriver (CDP)│
//! │              │    │ strictness,  │    │  MockDriver (tests)  │
//! │              │    │ expect()     │    │                      │
//! └──────────────┘    └──────────────┘    └──────────────────────┘
//! ```
//!
//! Locators are plain data. The page resolves them through the driver, which
//! runs a generated script in Chromium or walks an in-memory tree in tests.

#![warn(missing_docs)]

pub mod browser;
pub mod driver;
pub mod expect;
pub mod locator;
pub mod mock;
pub mod page;
mod result;
pub mod scenario;
pub mod script;
pub mod session;
pub mod text;
pub mod wait;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use browser::BrowserConfig;
pub use driver::{Actionability, ForcedClick, PanierDriver};
pub use expect::Expect;
pub use locator::{AriaRole, ClickOptions, Locator, RoleOptions, Selector};
pub use mock::{MockDriver, MockNode};
pub use page::{Page, Timeouts};
pub use result::{PanierError, PanierResult};
pub use scenario::{
    CartScenario, ScenarioFailure, ScenarioReport, Step, StepObserver, StepRecord, StepStatus,
    ADD_TO_CART_LABEL, CART_BUTTON_NAME, MON_MARCHE_URL, PRODUCT_NAME,
};
#[cfg(feature = "browser")]
pub use session::launch_chromium;
pub use session::{run_in_session, SessionOptions, SessionOutcome};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::browser::*;
    pub use super::driver::*;
    pub use super::locator::*;
    pub use super::mock::*;
    pub use super::page::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::session::*;
}
