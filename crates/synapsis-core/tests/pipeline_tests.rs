//! End-to-end pipeline tests with stub generators

use pretty_assertions::assert_eq;
use std::fs;
use synapsis_core::{generate, GenerateOptions, MindMapBuilder, PipelineError, ValidationError};
use synapsis_render::embedded_payload;
use synapsis_test_utils::{
    FailingGenerator, RecordingGenerator, StubGenerator, TopicEchoGenerator, FENCED_TREE,
    INVALID_CHILDREN_TYPE, INVALID_NO_TITLE, VALID_COMPLEX, VALID_SIMPLE,
};

#[test]
fn test_expand_validate_render_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("go.html");
    let mut builder = MindMapBuilder::new(StubGenerator::new(VALID_SIMPLE));

    let path = builder
        .expand("Go", "")
        .unwrap()
        .validate()
        .unwrap()
        .render(Some(output.as_path()))
        .unwrap();

    assert_eq!(path, output);
    let document = fs::read_to_string(&path).unwrap();
    let payload = embedded_payload(&document).unwrap();
    assert_eq!(payload["title"], "Go");
    assert_eq!(payload["children"][1]["title"], "Channels");
}

#[test]
fn test_missing_title_fails_with_schema_violation() {
    let mut builder = MindMapBuilder::new(StubGenerator::new(INVALID_NO_TITLE));

    let err = builder.expand("Go", "").unwrap().validate().unwrap_err();

    match &err {
        PipelineError::Validation(ValidationError::Schema { violations }) => {
            assert_eq!(
                violations,
                &vec![
                    "root: field 'title' required".to_string(),
                    "root.children[1]: field 'title' required".to_string(),
                ]
            );
        }
        other => panic!("expected schema violation, got {other:?}"),
    }
    assert!(err.to_string().contains("title"));
}

#[test]
fn test_children_scalar_reports_path() {
    let mut builder = MindMapBuilder::new(StubGenerator::new(INVALID_CHILDREN_TYPE));
    let err = builder.expand("Go", "").unwrap().validate().unwrap_err();
    assert_eq!(err.violations(), vec!["root: 'children' must be a sequence"]);
}

#[test]
fn test_unparsable_output_is_syntax_error() {
    let generator = StubGenerator::new("Sure! Here is your map:\ntitle: [oops");
    let mut builder = MindMapBuilder::new(generator);
    let err = builder.expand("Go", "").unwrap().validate().unwrap_err();
    assert!(matches!(err, PipelineError::Validation(ValidationError::Syntax { .. })));
}

#[test]
fn test_fenced_output_is_repaired() {
    let mut builder = MindMapBuilder::new(StubGenerator::new(FENCED_TREE));
    builder.expand("Go", "").unwrap().validate().unwrap();
    assert_eq!(builder.text(), "title: Go\nchildren:\n  - title: Goroutines");
}

#[test]
fn test_plan_and_expand_matches_manual_stages() {
    let mut combined = MindMapBuilder::new(StubGenerator::new(VALID_COMPLEX));
    let text = combined.plan_and_expand("Machine Learning", "technical").unwrap();

    let mut manual = MindMapBuilder::new(StubGenerator::new(VALID_COMPLEX));
    manual.expand("Machine Learning", "technical").unwrap().validate().unwrap();

    assert_eq!(text, manual.text());
    assert_eq!(text, combined.text());
}

#[test]
fn test_plan_then_expand_sends_plan_as_base() {
    let outline = "title: Outline\nchildren:\n  - title: Core";
    let generator = RecordingGenerator::new([outline, VALID_SIMPLE]);
    let mut builder = MindMapBuilder::new(&generator);

    builder.plan("Go").unwrap().expand("Go", "concise").unwrap().validate().unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("TOPIC: Go"));
    assert!(prompts[0].contains("2-3 levels deep"));
    assert!(prompts[1].contains("BASE PLAN:\ntitle: Outline"));
    assert!(prompts[1].contains("STYLE: concise"));
    assert_eq!(builder.text(), VALID_SIMPLE.trim());
}

#[test]
fn test_expand_with_explicit_plan() {
    let generator = RecordingGenerator::new([VALID_SIMPLE]);
    let mut builder = MindMapBuilder::new(&generator);

    builder.expand_with_plan("Go", "title: Go basics", "").unwrap();

    assert_eq!(generator.call_count(), 1);
    assert!(generator.prompts()[0].contains("BASE PLAN:\ntitle: Go basics"));
}

#[test]
fn test_generator_error_propagates_unchanged() {
    let mut builder = MindMapBuilder::new(FailingGenerator::new("rate limited"));

    let err = builder.expand("Go", "").unwrap_err();

    assert!(matches!(err, PipelineError::Generation(_)));
    assert_eq!(err.generation_source().unwrap().to_string(), "rate limited");
    assert_eq!(builder.text(), "");
}

#[test]
fn test_render_before_any_stage_is_invalid_state() {
    let builder = MindMapBuilder::new(StubGenerator::new(VALID_SIMPLE));
    assert!(matches!(builder.render(None), Err(PipelineError::InvalidState(_))));
}

#[test]
fn test_generate_one_shot() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("maps/ml.html");

    let path = generate(
        "Machine Learning",
        TopicEchoGenerator,
        &GenerateOptions::new().with_output(&output).with_style("visual"),
    )
    .unwrap();

    assert_eq!(path, output);
    let payload = embedded_payload(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(payload["title"], "Machine Learning");
}

#[test]
fn test_generate_with_plan_calls_twice() {
    let dir = tempfile::tempdir().unwrap();
    let generator = RecordingGenerator::new(["title: Plan", VALID_SIMPLE]);

    generate(
        "Go",
        &generator,
        &GenerateOptions::new().with_output(dir.path().join("go.html")).with_plan(),
    )
    .unwrap();

    assert_eq!(generator.call_count(), 2);
}

#[test]
fn test_generate_without_validation_renders_raw() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("raw.html");

    let path = generate(
        "Go",
        StubGenerator::new(INVALID_NO_TITLE),
        &GenerateOptions::new().with_output(&output).without_validation(),
    )
    .unwrap();

    let payload = embedded_payload(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(payload["icon"], "x");
}

#[test]
fn test_generate_rejects_invalid_tree() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.html");

    let options = GenerateOptions::new().with_output(&output);
    let err = generate("Go", StubGenerator::new(INVALID_NO_TITLE), &options).unwrap_err();

    assert_eq!(err.violations().len(), 2);
    assert!(!output.exists());
}
