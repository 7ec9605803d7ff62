//! Scenario runner for the `run` and `steps` commands

use crate::config::{CliConfig, RunConfig, StepsConfig};
use crate::error::{CliError, CliResult};
use crate::output::{write_plan, write_report, ProgressReporter};
use panier::{run_in_session, PanierDriver, ScenarioReport, SessionOptions, StepObserver, StepStatus};
use std::io::Write;

/// Run the scenario over `driver` and write the report to `out`
///
/// Returns the report whether or not the scenario passed. The failure
/// screenshot, when requested and captured, is saved after the report; a
/// screenshot that cannot be saved is logged and does not change the result.
///
/// # Errors
///
/// Returns an error when the report cannot be written
pub async fn run_scenario<D, O>(
    driver: D,
    config: &RunConfig,
    observer: &mut O,
    out: &mut impl Write,
) -> CliResult<ScenarioReport>
where
    D: PanierDriver,
    O: StepObserver + ?Sized,
{
    let mut options = SessionOptions::default().with_timeouts(config.timeouts);
    if config.screenshot_on_failure.is_some() {
        options = options.with_screenshot_on_failure();
    }

    let outcome = run_in_session(driver, options, &config.scenario, observer).await;
    let report = match outcome.result {
        Ok(report) => report,
        Err(failure) => {
            tracing::error!(step = %failure.step, error = %failure.error, "scenario failed");
            failure.report
        }
    };

    write_report(out, &report, config.format)?;

    if let (Some(path), Some(png)) = (&config.screenshot_on_failure, outcome.failure_screenshot) {
        match tokio::fs::write(path, &png).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = png.len(), "failure screenshot saved");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failure screenshot not saved");
            }
        }
    }
    Ok(report)
}

/// Turn a finished report into the process outcome
///
/// # Errors
///
/// Returns `CliError::ScenarioFailed` naming the first failed step
pub fn check_passed(report: &ScenarioReport) -> CliResult<()> {
    match report
        .steps
        .iter()
        .find(|r| r.status == StepStatus::Failed)
    {
        Some(record) => Err(CliError::scenario_failed(
            record.step,
            record.error.clone().unwrap_or_default(),
        )),
        None => Ok(()),
    }
}

/// Launch Chromium and run the scenario
///
/// # Errors
///
/// Returns an error when Chromium cannot start or the scenario fails
pub fn run(cli: &CliConfig, config: &RunConfig) -> CliResult<()> {
    let mut reporter = ProgressReporter::new(cli.color.should_color(), cli.verbosity.is_quiet());
    reporter.header(&format!(
        "{} on {}",
        config.scenario.product(),
        config.scenario.url()
    ));

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(async {
        let driver = launch(config).await?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_scenario(driver, config, &mut reporter, &mut out).await
    })?;

    reporter.summary(&report);
    if let Some(path) = &config.screenshot_on_failure {
        if !report.passed && path.exists() {
            reporter.info(&format!("screenshot saved to {}", path.display()));
        }
    }
    check_passed(&report)
}

#[cfg(feature = "browser")]
async fn launch(config: &RunConfig) -> CliResult<panier::ChromiumDriver> {
    panier::launch_chromium(config.browser.clone())
        .await
        .map_err(launch_error)
}

/// Only a failed launch means the browser is unavailable; anything else
/// (opening the first page, say) is reported as the library error it is.
#[cfg(any(feature = "browser", test))]
fn launch_error(e: panier::PanierError) -> CliError {
    match e {
        panier::PanierError::BrowserLaunch { message } => CliError::browser_unavailable(message),
        other => CliError::from(other),
    }
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn launch(_config: &RunConfig) -> CliResult<panier::MockDriver> {
    Err(CliError::browser_unavailable(
        "panier was built without the browser feature",
    ))
}

/// Print the scenario steps without running them
///
/// # Errors
///
/// Returns an error when stdout cannot be written
pub fn print_steps(config: &StepsConfig) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_plan(&mut out, &config.scenario.plan(), config.format)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use panier::{
        BrowserConfig, CartScenario, MockDriver, MockNode, PanierError, Step, Timeouts,
        ADD_TO_CART_LABEL, CART_BUTTON_NAME, PRODUCT_NAME,
    };
    use std::path::PathBuf;
    use std::time::Duration;

    const STORE: &str = "https://store.test";

    fn run_config(screenshot: Option<PathBuf>, format: OutputFormat) -> RunConfig {
        RunConfig {
            scenario: CartScenario::new().with_url(STORE),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default()
                .with_action(Duration::from_millis(60))
                .with_expect(Duration::from_millis(60))
                .with_poll_interval(Duration::from_millis(5)),
            screenshot_on_failure: screenshot,
            format,
        }
    }

    fn store(product: &str) -> MockDriver {
        let line = PRODUCT_NAME.to_string();
        MockDriver::new()
            .with_page(
                STORE,
                vec![
                    MockNode::new("button")
                        .aria_label(CART_BUTTON_NAME)
                        .key("cart"),
                    MockNode::new("article")
                        .child(MockNode::new("h3").text(product))
                        .child(MockNode::new("button").text(ADD_TO_CART_LABEL)),
                    MockNode::new("div")
                        .role("dialog")
                        .hidden()
                        .key("dialog"),
                ],
            )
            .on_click("cart", move |doc| {
                if let Some(dialog) = doc.find_mut("dialog") {
                    dialog.hidden = false;
                    dialog.text.clone_from(&line);
                }
            })
    }

    mod launch_error_tests {
        use super::*;

        #[test]
        fn test_launch_failure_is_browser_unavailable() {
            let err = launch_error(PanierError::BrowserLaunch {
                message: "no chromium found".to_string(),
            });
            match err {
                CliError::BrowserUnavailable { message } => {
                    assert_eq!(message, "no chromium found");
                }
                other => panic!("unexpected error {other}"),
            }
        }

        #[test]
        fn test_page_failure_stays_a_library_error() {
            let err = launch_error(PanierError::Page {
                message: "target closed".to_string(),
            });
            assert!(matches!(err, CliError::Panier(PanierError::Page { .. })));
            assert!(err.to_string().contains("target closed"));
        }
    }

    mod run_scenario_tests {
        use super::*;

        #[tokio::test]
        async fn test_passing_run_writes_text_report() {
            let config = run_config(None, OutputFormat::Text);
            let mut out = Vec::new();

            let report = run_scenario(store(PRODUCT_NAME), &config, &mut (), &mut out)
                .await
                .unwrap();

            assert!(report.passed);
            assert!(check_passed(&report).is_ok());
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("PASS 4. assert_cart"));
            assert!(text.contains("PASSED 4 steps"));
        }

        #[tokio::test]
        async fn test_failing_run_saves_screenshot_and_reports_step() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("failure.png");
            let config = run_config(Some(path.clone()), OutputFormat::Json);
            let mut out = Vec::new();

            let report = run_scenario(store("Poivron"), &config, &mut (), &mut out)
                .await
                .unwrap();

            assert!(!report.passed);
            let png = std::fs::read(&path).unwrap();
            assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

            let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(json["passed"], false);
            assert_eq!(json["steps"][1]["status"], "failed");

            match check_passed(&report).unwrap_err() {
                CliError::ScenarioFailed { step, message } => {
                    assert_eq!(step, Step::AddToCart);
                    assert!(message.contains("No element matching"));
                }
                other => panic!("unexpected error {other}"),
            }
        }

        #[tokio::test]
        async fn test_unwritable_screenshot_path_keeps_report() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing").join("failure.png");
            let config = run_config(Some(path.clone()), OutputFormat::Text);
            let mut out = Vec::new();

            let report = run_scenario(store("Poivron"), &config, &mut (), &mut out)
                .await
                .unwrap();

            assert!(!report.passed);
            assert!(!path.exists());
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("FAIL 2. add_to_cart"));
            assert!(matches!(
                check_passed(&report),
                Err(CliError::ScenarioFailed {
                    step: Step::AddToCart,
                    ..
                })
            ));
        }

        #[tokio::test]
        async fn test_no_screenshot_without_path() {
            let dir = tempfile::tempdir().unwrap();
            let config = run_config(None, OutputFormat::Text);
            let mut out = Vec::new();

            let report = run_scenario(store("Poivron"), &config, &mut (), &mut out)
                .await
                .unwrap();

            assert!(!report.passed);
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        }
    }
}
