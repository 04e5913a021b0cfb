//! End-to-end workflow tests over scripted doubles

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use figgen_core::{WorkflowConfig, WorkflowError, WorkflowManager};
use figgen_model::ModelConfig;
use figgen_test_utils::{canned_api_error, FakeRenderer, ScriptedBackend};

const NO_ICONS: &str = "[]";

fn manager(
    backend: &Arc<ScriptedBackend>,
    renderer: FakeRenderer,
    config: WorkflowConfig,
) -> WorkflowManager<ScriptedBackend, FakeRenderer> {
    WorkflowManager::new(Arc::clone(backend), renderer, ModelConfig::default(), config)
}

fn assert_file(dir: &Path, name: &str) {
    assert!(dir.join(name).exists(), "missing artifact {name}");
}

#[tokio::test]
async fn full_run_revises_every_round_even_on_clean_critique() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    let code0 = "from tools import *\n# two-box pipeline A to B\nprs.save('temp_render.pptx')";
    let code1 = format!("{code0}\n# round 1");
    let code2 = format!("{code0}\n# round 2");

    backend.push_image(vec![0x89, 0x50, 0x4e, 0x47]);
    backend.push_chat(NO_ICONS);
    backend.push_chat(code0);
    backend.push_chat("NO ISSUES FOUND");
    backend.push_chat(code1.clone());
    backend.push_chat("NO ISSUES FOUND");
    backend.push_chat(code2.clone());
    for _ in 0..3 {
        renderer.push_ok();
    }

    let run_dir = tmp.path().join("run");
    let summary = manager(&backend, renderer, WorkflowConfig::default())
        .run("A two-box pipeline from A to B", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.rounds_completed, 2);
    assert_eq!(summary.final_raster, run_dir.join("03_code_iter_2_try_0.png"));

    // A clean critique still triggers a fresh revision each round.
    assert_eq!(backend.chat_calls(), 6);
    assert_file(&run_dir, "requirement.txt");
    assert_file(&run_dir, "00_reference.png");
    assert_file(&run_dir, "01_code_iter_0_draft.py");
    assert_file(&run_dir, "01_code_iter_0_final.py");
    assert_file(&run_dir, "01_critique_iter_1.txt");
    assert_file(&run_dir, "02_code_iter_1_final.py");
    assert_file(&run_dir, "02_critique_iter_2.txt");
    assert_file(&run_dir, "03_code_iter_2_final.py");

    let final_code = std::fs::read_to_string(run_dir.join("03_code_iter_2_final.py")).unwrap();
    assert_eq!(final_code, code2);

    // Exactly one image was generated: the reference. No icon sheet.
    assert_eq!(backend.image_requests().len(), 1);
    assert_eq!(backend.image_requests()[0].aspect_ratio, "16:9");
}

#[tokio::test]
async fn runtime_failure_is_repaired_within_the_budget() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    let broken = "prs.save('temp_render.pptx')\nundefined_helper()";
    let fixed = "prs.save('temp_render.pptx')";

    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat(broken);
    backend.push_chat(fixed);
    renderer.push_script_error("NameError: name 'undefined_helper' is not defined");
    renderer.push_ok();

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default().with_max_iterations(0);
    let summary = manager(&backend, renderer, config)
        .run("one box", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.final_raster, run_dir.join("01_code_iter_0_try_1.png"));
    let log =
        std::fs::read_to_string(run_dir.join("01_code_iter_0_error_log_try_0.txt")).unwrap();
    assert!(log.contains("NameError"));
    let fix = std::fs::read_to_string(run_dir.join("01_code_iter_0_fix_1.py")).unwrap();
    assert_eq!(fix, fixed);
    let final_code = std::fs::read_to_string(run_dir.join("01_code_iter_0_final.py")).unwrap();
    assert_eq!(final_code, fixed);
}

#[tokio::test]
async fn exhausted_initial_budget_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat("broken");
    renderer.push_script_error("SyntaxError");

    let config = WorkflowConfig::default()
        .with_max_iterations(0)
        .with_max_retries(0);
    let err = manager(&backend, renderer, config)
        .run("one box", Some(&tmp.path().join("run")))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::InitialCodeFailed { attempts: 1 }));
    // The draft and its error log survive the failed run.
    assert_file(&tmp.path().join("run"), "01_code_iter_0_draft.py");
    assert_file(&tmp.path().join("run"), "01_code_iter_0_error_log_try_0.txt");
}

#[tokio::test]
async fn missing_reference_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_image_err(canned_api_error());

    let err = manager(&backend, FakeRenderer::new(), WorkflowConfig::default())
        .run("one box", Some(&tmp.path().join("run")))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Reference));
}

#[tokio::test]
async fn failed_round_keeps_the_previous_state() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat("good code");
    backend.push_chat("1. [BOUNDARY] Issue: box clipped -> Fix: move left");
    backend.push_chat("revised but broken");
    renderer.push_ok();
    renderer.push_script_error("TypeError");

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default()
        .with_max_iterations(1)
        .with_max_retries(0);
    let summary = manager(&backend, renderer, config)
        .run("one box", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.rounds_completed, 0);
    assert_eq!(summary.final_raster, run_dir.join("01_code_iter_0_try_0.png"));
    assert_file(&run_dir, "01_critique_iter_1.txt");
}

#[tokio::test]
async fn failed_critique_skips_the_round() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat("good code");
    backend.push_chat_err(canned_api_error());
    renderer.push_ok();

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default().with_max_iterations(1);
    let summary = manager(&backend, renderer, config)
        .run("one box", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.rounds_completed, 0);
    assert!(!run_dir.join("01_critique_iter_1.txt").exists());
    assert_eq!(summary.final_raster, run_dir.join("01_code_iter_0_try_0.png"));
}

#[tokio::test]
async fn icon_sheet_failure_degrades_to_a_run_without_assets() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    backend.push_image(vec![1]);
    backend.push_chat(r#"["gear", "pump"]"#);
    backend.push_chat(r#"{"gear": "a cog wheel", "pump": "a piston pump"}"#);
    backend.push_image_err(canned_api_error());
    backend.push_chat("code without assets");
    renderer.push_ok();

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default().with_max_iterations(0);
    let summary = manager(&backend, renderer, config)
        .run("a pump system", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.rounds_completed, 0);
    // Reference plus the failed sheet request.
    assert_eq!(backend.image_requests().len(), 2);
    // Synthesis went ahead with an empty registry.
    let synth = &backend.chat_requests()[2];
    assert!(!synth.prompt.contains("AVAILABLE ICON ASSETS"));
}

#[tokio::test]
async fn retrieval_biases_the_reference_prompt() {
    use figgen_retrieval::index::{ReferenceMeta, VectorIndex};
    use figgen_retrieval::{RetrievalConfig, VisualResearcher};
    use ndarray::array;

    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();

    // One corpus hit whose image is gone: extraction degrades to the
    // default style guide, which still biases the reference prompt.
    let index = VectorIndex::from_parts(array![[1.0_f32, 0.0]], vec![ReferenceMeta::default()]);
    let researcher = VisualResearcher::with_index(
        Arc::clone(&backend),
        ModelConfig::default(),
        RetrievalConfig::default(),
        index,
    );

    backend.push_embed(vec![1.0, 0.0]);
    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat("code");
    renderer.push_ok();

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default()
        .with_max_iterations(0)
        .with_retrieval(true);
    let summary = manager(&backend, renderer, config)
        .with_researcher(researcher)
        .run("a pipeline", Some(&run_dir))
        .await
        .unwrap();

    assert_eq!(summary.rounds_completed, 0);
    assert_file(&run_dir, "style_guide.json");
    let reference_prompt = &backend.image_requests()[0].prompt;
    assert!(reference_prompt.contains("design style guide"));
    assert!(reference_prompt.contains("layout_engine"));
}

#[tokio::test]
async fn toolkit_is_staged_into_the_run_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let toolkit = tmp.path().join("tools.py");
    std::fs::write(&toolkit, "def add_block(*a, **k): ...").unwrap();

    let backend = Arc::new(ScriptedBackend::new());
    let renderer = FakeRenderer::new();
    backend.push_image(vec![1]);
    backend.push_chat(NO_ICONS);
    backend.push_chat("code");
    renderer.push_ok();

    let run_dir = tmp.path().join("run");
    let config = WorkflowConfig::default()
        .with_max_iterations(0)
        .with_toolkit(&toolkit);
    manager(&backend, renderer, config)
        .run("one box", Some(&run_dir))
        .await
        .unwrap();

    assert_file(&run_dir, "tools.py");
}
