use std::env;
use std::fs;
use std::process::ExitCode;

use edit_stream::{ApplyOutcome, EditStatus, EngineConfig, MessageRenderer};

const SAMPLE_MESSAGE: &str = include_str!("../tests/fixtures/streamed_message.md");

const DEFAULT_CHUNK: usize = 24;

fn sample_outcomes() -> Vec<ApplyOutcome> {
    vec![
        ApplyOutcome {
            file_path: "src/math.rs".into(),
            status: EditStatus::Applied,
            reason: None,
            estimated_line: Some(1),
        },
        ApplyOutcome {
            file_path: "src/main.rs".into(),
            status: EditStatus::Failed,
            reason: Some("search text not found".into()),
            estimated_line: None,
        },
    ]
}

/// Replays a message in fixed-size chunks and prints each frame's size and commit offset,
/// then the final markup.
///
/// Usage: `cargo run --example stream_replay [message.md] [chunk-bytes]`
fn main() -> ExitCode {
    let config = EngineConfig::from_env();
    if let Err(err) = edit_stream::logging::init(&config) {
        eprintln!("logging disabled: {err}");
    }

    let mut args = env::args().skip(1);
    let text = match args.next() {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("failed to read {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => SAMPLE_MESSAGE.to_string(),
    };
    let chunk = args
        .next()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_CHUNK);

    let mut renderer = MessageRenderer::new(&config);
    let mut end = 0usize;
    let mut frame_no = 0usize;
    while end < text.len() {
        end = (end + chunk).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        frame_no += 1;
        match renderer.render_streaming(&text[..end]) {
            Ok(frame) => println!(
                "frame {frame_no:>3}: {:>5} bytes in, {:>6} bytes markup, committed through {}",
                end,
                frame.len(),
                renderer.streaming_state().committed_offset
            ),
            Err(err) => {
                eprintln!("frame {frame_no} failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    match renderer.finalize(&text, &sample_outcomes()) {
        Ok(markup) => {
            println!("\n{markup}");
            let stats = renderer.cache_stats();
            println!(
                "diff cache: {} hits, {} misses, {} evictions",
                stats.hits, stats.misses, stats.evictions
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("final render failed: {err}");
            ExitCode::FAILURE
        }
    }
}
