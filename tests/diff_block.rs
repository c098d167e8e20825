
use edit_stream::{
    ApplyOutcome, DiffBlockRenderer, EditBlock, EditStatus, NavigationEvent, PendingEdit,
};
use pretty_assertions::assert_eq;

fn math_block() -> EditBlock {
    EditBlock {
        file_path: "src/math.rs".into(),
        edit_lines: "fn sum(a: i32, b: i32) -> i32 {\n    let total = a + b;\n    total\n}".into(),
        repl_lines: "fn sum(a: i32, b: i32) -> i32 {\n    let total = a * b;\n    total\n}".into(),
        start_index: 0,
        end_index: 11,
        status: EditStatus::Pending,
        estimated_line: None,
        reason: None,
    }
}

#[test]
fn applied_block_golden() {
    let mut block = math_block();
    block.apply_outcome(&ApplyOutcome {
        file_path: "src/math.rs".into(),
        status: EditStatus::Applied,
        reason: None,
        estimated_line: Some(3),
    });

    let html = DiffBlockRenderer::default().render(&block);
    assert_eq!(html, fixture::read_fixture("edit_block_refined.html"));
}

#[test]
fn outcomes_decode_from_host_json() {
    let outcomes: Vec<ApplyOutcome> =
        serde_json::from_str(&fixture::read_fixture("apply_outcomes.json")).expect("json");
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, EditStatus::Applied);
    assert_eq!(outcomes[0].estimated_line, Some(1));
    assert_eq!(outcomes[1].status, EditStatus::Failed);
    assert_eq!(outcomes[1].reason.as_deref(), Some("search text not found"));
    assert_eq!(outcomes[1].estimated_line, None);
}

#[test]
fn navigation_event_serializes_for_the_host() {
    let mut block = math_block();
    block.status = EditStatus::Failed;
    block.estimated_line = Some(7);

    let value = serde_json::to_value(NavigationEvent::for_block(&block)).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "path": "src/math.rs",
            "estimatedLine": 7,
            "status": "failed",
            "searchContext": "fn sum(a: i32, b: i32) -> i32 {",
        })
    );
}

#[test]
fn in_progress_block_never_touches_the_diff_cache() {
    let renderer = DiffBlockRenderer::default();
    let pending = PendingEdit {
        file_path: "src/math.rs".into(),
        search: "fn sum() {\n    1\n}".into(),
        replacement: Some("fn sum() {\n    2".into()),
        start_index: 0,
    };
    let html = renderer.render_pending(&pending);
    assert!(html.contains("edit-block--writing"));
    assert!(html.contains("<span class=\"diff-line__sign\">-</span>    1</span>"));
    assert!(html.contains("<span class=\"diff-line__sign\">+</span>    2</span>"));
    assert_eq!(renderer.cache_stats().misses, 0);
}
