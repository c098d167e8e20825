
use edit_stream::{ApplyOutcome, EngineConfig, MessageRenderer, RenderError, SplitPolicy};
use fixture::Xorshift;
use pretty_assertions::assert_eq;

const STREAM_RUNS: usize = 20;

fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[test]
fn character_streaming_never_fails_and_converges() {
    let text = fixture::read_fixture("streamed_message.md");
    let outcomes: Vec<ApplyOutcome> =
        serde_json::from_str(&fixture::read_fixture("apply_outcomes.json")).expect("json");

    let mut streaming = MessageRenderer::default();
    for end in char_boundaries(&text) {
        streaming
            .render_streaming(&text[..end])
            .unwrap_or_else(|err| panic!("frame ending at byte {end} failed: {err}"));
    }
    assert!(streaming.streaming_state().committed_offset > 0);

    let finalized = streaming.finalize(&text, &outcomes).expect("finalize");
    let direct = MessageRenderer::default()
        .render_full(&text, &outcomes)
        .expect("direct render");
    assert_eq!(finalized, direct);
}

#[test]
fn random_prefix_sequences_converge() {
    let text = fixture::read_fixture("streamed_message.md");
    let boundaries = char_boundaries(&text);
    let expected = MessageRenderer::default()
        .render_full(&text, &[])
        .expect("direct render");

    let mut rng = Xorshift::new(7);
    for run in 0..STREAM_RUNS {
        let mut renderer = MessageRenderer::default();
        let mut cursor = 0usize;
        while cursor < boundaries.len() - 1 {
            cursor = (cursor + 1 + rng.below(40)).min(boundaries.len() - 1);
            renderer
                .render_streaming(&text[..boundaries[cursor]])
                .unwrap_or_else(|err| panic!("run {run}: frame failed: {err}"));
        }
        assert_eq!(renderer.finalize(&text, &[]).expect("finalize"), expected);
    }
}

#[test]
fn committed_markup_only_grows_within_a_message() {
    let text = fixture::read_fixture("streamed_message.md");
    let mut renderer = MessageRenderer::default();
    let mut previous = String::new();
    let mut previous_offset = 0usize;
    for end in char_boundaries(&text) {
        let frame = renderer.render_streaming(&text[..end]).expect("frame");
        let state = renderer.streaming_state();
        assert!(state.committed_offset >= previous_offset);
        assert!(state.committed_markup.starts_with(&previous));
        assert!(frame.starts_with(&state.committed_markup));
        previous = state.committed_markup.clone();
        previous_offset = state.committed_offset;
    }
}

#[test]
fn unterminated_block_shows_placeholder_and_no_finalized_block() {
    let text = "Let me change it.\n\nsrc/app.py\n««« EDIT\nline1\nline2";
    let mut renderer = MessageRenderer::default();

    let frame = renderer.render_streaming(text).expect("frame");
    assert!(frame.contains("edit-block--writing"));
    assert!(frame.contains("<span class=\"edit-block__path\">src/app.py</span>"));
    assert!(frame.contains("line1"));

    assert_eq!(renderer.parse(text).edit_blocks().count(), 0);
    let finalized = renderer.finalize(text, &[]).expect("finalize");
    assert!(!finalized.contains("edit-block"));
}

#[test]
fn new_message_resets_streaming_state() {
    let mut renderer = MessageRenderer::default();
    renderer
        .render_streaming("First answer.\n\nMore")
        .expect("frame");
    assert!(renderer.streaming_state().committed_offset > 0);

    let frame = renderer.render_streaming("Second").expect("frame");
    assert_eq!(renderer.streaming_state().committed_offset, 0);
    assert!(!frame.contains("First"));
}

#[test]
fn full_render_is_idempotent() {
    let text = fixture::read_fixture("streamed_message.md");
    let mut renderer = MessageRenderer::default();
    let first = renderer.render_full(&text, &[]).expect("render");
    let second = renderer.render_full(&text, &[]).expect("render");
    assert_eq!(first, second);
    assert!(renderer.cache_stats().hits >= 2);
}

#[test]
fn final_render_uses_diff_blocks_for_edit_spans() {
    let text = fixture::read_fixture("streamed_message.md");
    let outcomes: Vec<ApplyOutcome> =
        serde_json::from_str(&fixture::read_fixture("apply_outcomes.json")).expect("json");
    let html = MessageRenderer::default()
        .render_full(&text, &outcomes)
        .expect("render");

    assert!(html.contains("<h1>Fixing the sum helper</h1>"));
    assert!(html.contains("<table>"));
    assert!(html.contains("edit-block--applied"));
    assert!(html.contains("edit-block--failed"));
    assert!(html.contains("search text not found"));
    assert!(!html.contains("««« EDIT"));
    assert!(html.contains("&lt;done&gt;"));
}

#[test]
fn never_policy_still_converges() {
    let text = fixture::read_fixture("streamed_message.md");
    let config = EngineConfig::default().with_split_policy(SplitPolicy::Never);
    let mut renderer = MessageRenderer::new(&config);
    for end in char_boundaries(&text).into_iter().step_by(17) {
        renderer.render_streaming(&text[..end]).expect("frame");
        assert_eq!(renderer.streaming_state().committed_offset, 0);
    }
    assert_eq!(
        renderer.finalize(&text, &[]).expect("finalize"),
        MessageRenderer::new(&config).render_full(&text, &[]).expect("direct")
    );
}

#[test]
fn failing_markdown_primitive_surfaces_on_every_path() {
    let failing = |_: &str| -> Result<String, RenderError> {
        Err(RenderError::Markdown {
            bytes: 0,
            message: "no parser loaded".into(),
        })
    };
    let mut renderer = MessageRenderer::with_markdown(&EngineConfig::default(), failing);

    // The tail path never calls the primitive, so an uncommitted frame still renders.
    assert!(renderer.render_streaming("partial").is_ok());
    let err = renderer
        .render_streaming("partial\n\nnext")
        .expect_err("commit calls the primitive");
    assert!(err.to_string().contains("no parser loaded"));
    assert!(renderer.finalize("partial\n\nnext", &[]).is_err());
}
