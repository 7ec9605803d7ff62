//! The cart scenario for mon-marche.fr.
//!
//! Four steps, strictly in order, each awaited before the next starts:
//!
//! 1. open the store
//! 2. force-click "Ajouter le produit" inside the article naming the product
//! 3. force-click the "Mon panier" button
//! 4. expect the first dialog to contain the product name
//!
//! The first failing step aborts the run; later steps are reported as skipped.
//! Running the scenario adds one unit to the remote cart, so it is not
//! idempotent, and only the presence of the product is checked.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;

use crate::driver::PanierDriver;
use crate::locator::{AriaRole, ClickOptions, Locator, RoleOptions};
use crate::page::Page;
use crate::result::{PanierError, PanierResult};

/// Store under test
pub const MON_MARCHE_URL: &str = "https://www.mon-marche.fr";

/// Product added to the cart
pub const PRODUCT_NAME: &str = "La Tomate grappe sélection HVE";

/// Visible text of the add-to-cart button inside a product article
pub const ADD_TO_CART_LABEL: &str = "Ajouter le produit";

/// Accessible name of the cart button
pub const CART_BUTTON_NAME: &str = "Mon panier";

/// Known gap carried in every report
pub const QUANTITY_NOTE: &str =
    "cart quantity is not verified: each run adds one more unit and only presence is checked";

/// One step of the scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Open the store
    Navigate,
    /// Add the product from its article
    AddToCart,
    /// Open the cart summary
    OpenCart,
    /// Check the cart dialog lists the product
    AssertCart,
}

impl Step {
    /// Steps in execution order
    pub const ALL: [Self; 4] = [
        Self::Navigate,
        Self::AddToCart,
        Self::OpenCart,
        Self::AssertCart,
    ];

    /// One-based position
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Navigate => 1,
            Self::AddToCart => 2,
            Self::OpenCart => 3,
            Self::AssertCart => 4,
        }
    }

    /// Short machine name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::AddToCart => "add_to_cart",
            Self::OpenCart => "open_cart",
            Self::AssertCart => "assert_cart",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index(), self.name())
    }
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Completed
    Passed,
    /// Raised an error
    Failed,
    /// Not run because an earlier step failed
    Skipped,
}

/// Record of one step in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Which step
    pub step: Step,
    /// What happened
    pub status: StepStatus,
    /// Wall time spent, 0 for skipped steps
    pub duration_ms: u64,
    /// Error text for a failed step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    fn skipped(step: Step) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            duration_ms: 0,
            error: None,
        }
    }
}

/// Result of a scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Store URL
    pub url: String,
    /// Product looked for
    pub product: String,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// One record per step, in order
    pub steps: Vec<StepRecord>,
    /// Total wall time
    pub duration_ms: u64,
    /// Every step passed
    pub passed: bool,
    /// Known limitations of the check
    pub notes: Vec<String>,
}

impl ScenarioReport {
    /// The step that failed, if any
    #[must_use]
    pub fn failed_step(&self) -> Option<Step> {
        self.steps
            .iter()
            .find(|r| r.status == StepStatus::Failed)
            .map(|r| r.step)
    }

    /// Record of a given step
    #[must_use]
    pub fn record(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == step)
    }
}

/// A scenario run that stopped at a failing step
#[derive(Debug, Error)]
#[error("step {step} failed: {error}")]
pub struct ScenarioFailure {
    /// Step that failed
    pub step: Step,
    /// Cause
    #[source]
    pub error: PanierError,
    /// Report with the failing and skipped steps
    pub report: ScenarioReport,
}

/// Hooks called around each step, used for progress output
pub trait StepObserver {
    /// A step is about to run
    fn step_started(&mut self, _step: Step) {}

    /// A step finished, failed or was skipped
    fn step_finished(&mut self, _record: &StepRecord) {}
}

impl StepObserver for () {}

fn millis_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// The add-to-cart check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartScenario {
    url: String,
    product: String,
}

impl Default for CartScenario {
    fn default() -> Self {
        Self {
            url: MON_MARCHE_URL.to_string(),
            product: PRODUCT_NAME.to_string(),
        }
    }
}

impl CartScenario {
    /// Scenario against the live store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run against another URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Look for another product
    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Store URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Product name
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// First "Ajouter le produit" button inside an article naming the product
    #[must_use]
    pub fn add_to_cart_locator(&self) -> Locator {
        Locator::new("article")
            .with_text(self.product.as_str())
            .locator("button")
            .with_text(ADD_TO_CART_LABEL)
            .first()
    }

    /// The cart button; strict, so two such buttons are an error
    #[must_use]
    pub fn cart_button_locator(&self) -> Locator {
        Locator::by_role(AriaRole::Button, RoleOptions::name(CART_BUTTON_NAME))
    }

    /// First dialog on the page
    #[must_use]
    pub fn dialog_locator(&self) -> Locator {
        Locator::by_role(AriaRole::Dialog, RoleOptions::default()).first()
    }

    /// Human-readable plan, one line per step
    #[must_use]
    pub fn plan(&self) -> Vec<(Step, String)> {
        Step::ALL
            .into_iter()
            .map(|step| {
                let line = match step {
                    Step::Navigate => format!("open {}", self.url),
                    Step::AddToCart => format!(
                        "force-click {ADD_TO_CART_LABEL:?} on {}",
                        self.add_to_cart_locator()
                    ),
                    Step::OpenCart => {
                        format!("force-click {}", self.cart_button_locator())
                    }
                    Step::AssertCart => format!(
                        "expect {} to contain {:?}",
                        self.dialog_locator(),
                        self.product
                    ),
                };
                (step, line)
            })
            .collect()
    }

    async fn execute<D: PanierDriver>(&self, step: Step, page: &mut Page<D>) -> PanierResult<()> {
        match step {
            Step::Navigate => page.goto(&self.url).await,
            Step::AddToCart => {
                page.click(&self.add_to_cart_locator(), ClickOptions::forced())
                    .await
            }
            Step::OpenCart => {
                page.click(&self.cart_button_locator(), ClickOptions::forced())
                    .await
            }
            Step::AssertCart => {
                page.expect(self.dialog_locator())
                    .to_contain_text(&self.product)
                    .await
            }
        }
    }

    /// Run all steps on `page`
    ///
    /// # Errors
    ///
    /// Returns `ScenarioFailure` naming the first step that failed
    pub async fn run<D: PanierDriver>(
        &self,
        page: &mut Page<D>,
    ) -> Result<ScenarioReport, ScenarioFailure> {
        self.run_observed(page, &mut ()).await
    }

    /// Run all steps on `page`, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// Returns `ScenarioFailure` naming the first step that failed
    pub async fn run_observed<D: PanierDriver, O: StepObserver + ?Sized>(
        &self,
        page: &mut Page<D>,
        observer: &mut O,
    ) -> Result<ScenarioReport, ScenarioFailure> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut steps = Vec::with_capacity(Step::ALL.len());
        let mut failure: Option<(Step, PanierError)> = None;

        tracing::info!(url = %self.url, product = %self.product, "scenario started");

        for step in Step::ALL {
            if failure.is_some() {
                let record = StepRecord::skipped(step);
                observer.step_finished(&record);
                steps.push(record);
                continue;
            }

            observer.step_started(step);
            let span = tracing::info_span!("step", index = step.index(), name = step.name());
            let step_start = Instant::now();
            let outcome = self.execute(step, page).instrument(span).await;
            let duration_ms = millis_since(step_start);

            let record = match outcome {
                Ok(()) => {
                    tracing::info!(step = step.name(), duration_ms, "step passed");
                    StepRecord {
                        step,
                        status: StepStatus::Passed,
                        duration_ms,
                        error: None,
                    }
                }
                Err(error) => {
                    tracing::error!(step = step.name(), %error, "step failed");
                    let record = StepRecord {
                        step,
                        status: StepStatus::Failed,
                        duration_ms,
                        error: Some(error.to_string()),
                    };
                    failure = Some((step, error));
                    record
                }
            };
            observer.step_finished(&record);
            steps.push(record);
        }

        let report = ScenarioReport {
            url: self.url.clone(),
            product: self.product.clone(),
            started_at,
            steps,
            duration_ms: millis_since(start),
            passed: failure.is_none(),
            notes: vec![QUANTITY_NOTE.to_string()],
        };

        match failure {
            None => {
                tracing::info!(duration_ms = report.duration_ms, "scenario passed");
                Ok(report)
            }
            Some((step, error)) => Err(ScenarioFailure {
                step,
                error,
                report,
            }),
        }
    }
}
