use serde_json::{json, Value};

use crate::backend::stream_core::{StreamDecoder, THINKING_CLOSE, THINKING_OPEN};
use crate::bridge_types::chat::StreamEvent;

fn decode<S: AsRef<[u8]>>(chunks: &[S]) -> (Vec<StreamEvent>, StreamDecoder) {
    let mut decoder = StreamDecoder::new();
    let mut events = Vec::new();
    for chunk in chunks {
        decoder.push(chunk.as_ref(), &mut |event| events.push(event));
    }
    (events, decoder)
}

fn parts_event(parts: Value) -> String {
    format!(
        "data: {}\n",
        json!({"response": {"candidates": [{"content": {"parts": parts}}]}})
    )
}

fn finish_event(reason: &str) -> String {
    format!(
        "data: {}\n",
        json!({"response": {"candidates": [{"finishReason": reason}]}})
    )
}

#[test]
fn plain_text_part_emits_exactly_one_text_event() {
    let chunk = r#"data: {"response":{"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}}
"#;
    let (events, decoder) = decode(&[chunk]);
    assert_eq!(
        events,
        vec![StreamEvent::Text {
            content: "hi".into()
        }]
    );
    assert_eq!(decoder.discarded_lines(), 0);
}

#[test]
fn thought_run_is_bracketed_by_markers() {
    let chunks = [
        parts_event(json!([{"thought": true, "text": "t1"}])),
        parts_event(json!([{"thought": true, "text": "t2"}])),
        parts_event(json!([{"text": "answer"}])),
    ];
    let (events, _) = decode(&[&chunks[0], &chunks[1], &chunks[2]]);
    assert_eq!(
        events,
        vec![
            StreamEvent::Thinking {
                content: THINKING_OPEN.into()
            },
            StreamEvent::Thinking {
                content: "t1".into()
            },
            StreamEvent::Thinking {
                content: "t2".into()
            },
            StreamEvent::Thinking {
                content: THINKING_CLOSE.into()
            },
            StreamEvent::Text {
                content: "answer".into()
            },
        ]
    );
}

#[test]
fn thought_part_without_text_emits_an_empty_delta() {
    let chunk = parts_event(json!([{"thought": true}]));
    let (events, _) = decode(&[&chunk]);
    assert_eq!(
        events,
        vec![
            StreamEvent::Thinking {
                content: THINKING_OPEN.into()
            },
            StreamEvent::Thinking { content: "".into() },
        ]
    );
}

#[test]
fn whitespace_only_text_parts_are_skipped_entirely() {
    let chunks = [
        parts_event(json!([{"thought": true, "text": "t"}])),
        parts_event(json!([{"text": "   "}])),
        parts_event(json!([{"thought": true, "text": "still thinking"}])),
    ];
    let (events, _) = decode(&[&chunks[0], &chunks[1], &chunks[2]]);
    // the blank text neither emits nor closes the thinking run
    assert_eq!(
        events,
        vec![
            StreamEvent::Thinking {
                content: THINKING_OPEN.into()
            },
            StreamEvent::Thinking { content: "t".into() },
            StreamEvent::Thinking {
                content: "still thinking".into()
            },
        ]
    );
}

#[test]
fn function_calls_buffer_until_the_finish_signal() {
    let call_event = parts_event(json!([{
        "functionCall": {"id": "c1", "name": "lookup", "args": {"q": "x"}}
    }]));
    let (events, decoder) = decode(&[&call_event]);
    assert!(events.is_empty());
    assert_eq!(decoder.pending_tool_calls(), 1);

    let finish = finish_event("STOP");
    let (events, decoder) = decode(&[&call_event, &finish]);
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::ToolCalls { tool_calls } => {
            assert_eq!(tool_calls.len(), 1);
            assert_eq!(tool_calls[0].id, "c1");
            assert_eq!(tool_calls[0].kind, "function");
            assert_eq!(tool_calls[0].function.name, "lookup");
        }
        other => panic!("expected tool calls, got {other:?}"),
    }
    assert_eq!(decoder.pending_tool_calls(), 0);
}

#[test]
fn tool_call_arguments_round_trip_through_json() {
    let args = json!({"a": [1, 2], "b": {"nested": true}});
    let call_event = parts_event(json!([{
        "functionCall": {"id": "c1", "name": "f", "args": args}
    }]));
    let finish = finish_event("STOP");
    let (events, _) = decode(&[&call_event, &finish]);
    match &events[0] {
        StreamEvent::ToolCalls { tool_calls } => {
            let decoded: Value =
                serde_json::from_str(&tool_calls[0].function.arguments).expect("valid JSON");
            assert_eq!(decoded, args);
        }
        other => panic!("expected tool calls, got {other:?}"),
    }
}

#[test]
fn finish_closes_open_thinking_before_the_flush() {
    let chunk = parts_event(json!([
        {"thought": true, "text": "planning"},
        {"functionCall": {"id": "c1", "name": "f", "args": {}}}
    ]));
    let finish = finish_event("STOP");
    let (events, _) = decode(&[&chunk, &finish]);
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[2],
        StreamEvent::Thinking {
            content: THINKING_CLOSE.into()
        }
    );
    assert!(matches!(events[3], StreamEvent::ToolCalls { .. }));
}

#[test]
fn finish_without_buffered_calls_emits_nothing() {
    let finish = finish_event("STOP");
    let (events, _) = decode(&[&finish]);
    assert!(events.is_empty());
}

#[test]
fn empty_finish_reason_does_not_flush() {
    let call_event = parts_event(json!([{
        "functionCall": {"id": "c1", "name": "f", "args": {}}
    }]));
    let finish = finish_event("");
    let (events, decoder) = decode(&[&call_event, &finish]);
    assert!(events.is_empty());
    assert_eq!(decoder.pending_tool_calls(), 1);
}

#[test]
fn stream_end_without_finish_drops_the_buffer() {
    let call_event = parts_event(json!([{
        "functionCall": {"id": "c1", "name": "f", "args": {}}
    }]));
    let (events, decoder) = decode(&[&call_event]);
    // no forced flush: the buffered batch is reported, never emitted
    assert!(events.is_empty());
    assert_eq!(decoder.pending_tool_calls(), 1);
}

#[test]
fn malformed_lines_are_counted_not_fatal() {
    let good = parts_event(json!([{"text": "kept"}]));
    let (events, decoder) = decode(&["data: {broken\n", good.as_str()]);
    assert_eq!(
        events,
        vec![StreamEvent::Text {
            content: "kept".into()
        }]
    );
    assert_eq!(decoder.discarded_lines(), 1);
}

#[test]
fn non_data_lines_are_ignored_silently() {
    let (events, decoder) = decode(&["event: ping\n: comment\n\n"]);
    assert!(events.is_empty());
    assert_eq!(decoder.discarded_lines(), 0);
}

#[test]
fn lines_split_across_chunks_are_dropped() {
    // the head fragment fails to parse and is counted; the tail fragment
    // has no data prefix and is ignored
    let (events, decoder) = decode(&["data: {\"response\"", ":{}}\n"]);
    assert!(events.is_empty());
    assert_eq!(decoder.discarded_lines(), 1);
}

#[test]
fn multiple_events_in_one_chunk_decode_in_order() {
    let chunk = format!(
        "{}{}",
        parts_event(json!([{"text": "one"}])),
        parts_event(json!([{"text": "two"}]))
    );
    let (events, _) = decode(&[&chunk]);
    assert_eq!(
        events,
        vec![
            StreamEvent::Text {
                content: "one".into()
            },
            StreamEvent::Text {
                content: "two".into()
            },
        ]
    );
}
