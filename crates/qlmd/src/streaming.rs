//! SSE chunking for streaming chat completions.
//!
//! The whole reply is known before the first byte goes out, so the stream is
//! a finite iterator of precomputed events: role delta, one content delta
//! per word, a finish chunk, the optional usage chunk, then `[DONE]`.

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use chrono::Utc;
use qlm_common::envelope::{completion_id, ChatCompletionChunk, Usage};
use serde::Serialize;
use tokio_stream::Stream;

/// Splits a reply into streamable pieces. Single-line replies stream word by
/// word with their separating spaces; multi-line replies go out as one piece
/// so their layout survives.
pub fn reply_pieces(reply: &str) -> Vec<String> {
    if reply.contains('\n') {
        return vec![reply.to_string()];
    }
    let words: Vec<&str> = reply.split_whitespace().collect();
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i + 1 == words.len() {
                (*word).to_string()
            } else {
                format!("{} ", word)
            }
        })
        .collect()
}

fn json_event<T: Serialize>(payload: &T) -> Event {
    match serde_json::to_string(payload) {
        Ok(json) => Event::default().data(json),
        Err(_) => Event::default().data("{}"),
    }
}

/// Builds the SSE response for one chat completion.
pub fn chat_completion_stream(
    model: &str,
    prompt: &str,
    reply: &str,
    include_usage: bool,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = completion_id("chatcmpl");
    let created = Utc::now().timestamp();

    let mut events: Vec<Result<Event, Infallible>> = Vec::new();
    events.push(Ok(json_event(&ChatCompletionChunk::role(
        &id, created, model,
    ))));
    for piece in reply_pieces(reply) {
        events.push(Ok(json_event(&ChatCompletionChunk::content(
            &id, created, model, &piece,
        ))));
    }
    events.push(Ok(json_event(&ChatCompletionChunk::finish(
        &id, created, model,
    ))));
    if include_usage {
        events.push(Ok(json_event(&ChatCompletionChunk::usage(
            &id,
            created,
            model,
            Usage::count(prompt, reply),
        ))));
    }
    events.push(Ok(Event::default().data("[DONE]")));

    Sse::new(tokio_stream::iter(events))
}
