//! Declarative scenarios run against the in-memory page

use std::path::PathBuf;

use probekit_common::TextBoxInput;
use probekit_e2e::page::TEXT_BOX_URL;
use probekit_e2e::runner::{RunnerConfig, TestSuiteResult};
use probekit_e2e::{TestRunner, TestSpec, TestStep, TextBoxDoubleFactory};

fn bundled_specs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/scenarios")
}

fn runner(specs_dir: PathBuf, output_dir: PathBuf) -> TestRunner<TextBoxDoubleFactory> {
    TestRunner::with_config(
        TextBoxDoubleFactory::new(),
        RunnerConfig {
            specs_dir,
            output_dir,
            base_url: None,
        },
    )
}

#[tokio::test]
async fn bundled_scenarios_pass() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().to_path_buf());

    let results = runner.run_all().await.unwrap();

    assert_eq!(results.total, 2);
    assert!(results.success(), "{:#?}", results);
    assert_eq!(runner.factory().opened(), 2);
    assert_eq!(runner.factory().closed(), 2);
}

#[tokio::test]
async fn run_by_tag_and_name() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().to_path_buf());

    let smoke = runner.run_tagged("smoke").await.unwrap();
    assert_eq!(smoke.total, 1);
    assert_eq!(smoke.results[0].name, "text-box-form");

    let single = runner.run_test("text-box-name-only").await.unwrap();
    assert!(single.success);
    assert_eq!(single.steps.len(), 4);

    assert!(runner.run_test("no-such-test").await.is_err());
}

#[tokio::test]
async fn built_in_text_box_scenario() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().to_path_buf());
    let input = TextBoxInput::new(
        "Donald Duck",
        "donald.duck@example.com",
        "56 Main St",
        "379 Apple Rd",
    );

    let result = runner.run_spec(&TestSpec::text_box(TEXT_BOX_URL, &input)).await;

    assert!(result.success, "{:?}", result.error);
    assert!(result.steps.iter().all(|s| s.success));
}

#[tokio::test]
async fn failing_step_stops_scenario_and_still_closes() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().to_path_buf());
    let spec = TestSpec {
        name: "wrong-label".to_string(),
        description: String::new(),
        tags: vec![],
        steps: vec![
            TestStep::Navigate {
                url: TEXT_BOX_URL.to_string(),
            },
            TestStep::Fill {
                selector: "#userName".to_string(),
                value: "Donald Duck".to_string(),
            },
            TestStep::Click {
                selector: "#submit".to_string(),
            },
            TestStep::AssertText {
                selector: "#name".to_string(),
                contains: Some("Name: Donald Duck".to_string()),
                equals: None,
            },
            TestStep::Log {
                message: "never reached".to_string(),
            },
        ],
    };

    let results = runner.run_specs(&[spec]).await;

    assert_eq!(results.failed, 1);
    let result = &results.results[0];
    assert_eq!(result.steps.len(), 4);
    assert!(result.error.as_deref().unwrap().contains("Assertion failed"));
    assert_eq!(runner.factory().closed(), 1);
}

#[tokio::test]
async fn missing_element_fails_scenario() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().to_path_buf());
    let spec = TestSpec {
        name: "missing".to_string(),
        description: String::new(),
        tags: vec![],
        steps: vec![
            TestStep::Navigate {
                url: TEXT_BOX_URL.to_string(),
            },
            TestStep::Click {
                selector: "#doesNotExist".to_string(),
            },
        ],
    };

    let result = runner.run_spec(&spec).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("#doesNotExist"));
}

#[tokio::test]
async fn results_written_as_json() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(bundled_specs(), out.path().join("results"));

    let results = runner.run_all().await.unwrap();
    let path = runner.write_results(&results).unwrap();

    let written: TestSuiteResult =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written.total, results.total);
    assert_eq!(written.passed, 2);
}

#[tokio::test]
async fn unparsable_spec_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "name: broken\nsteps: 12\n").unwrap();
    let runner = runner(dir.path().to_path_buf(), dir.path().join("out"));

    let err = runner.run_all().await.unwrap_err();
    assert!(err.to_string().contains("broken.yaml"));
}
