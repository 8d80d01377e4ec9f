//! Chain ordering and outcome tests

use super::*;
use crate::fallback::{EXHAUSTED_HEADER, FallbackEventKind, SoftErrorPolicy};
use crate::llm::response::FinishReason;

#[tokio::test]
async fn test_primary_success_never_touches_fallbacks() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", ok("from a"));
    transport.on("http://b", ok("from b"));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "model-a", "http://a"),
            backend("custom", "model-b", "http://b"),
        ],
    );

    let reply = relay.chat(request()).await;
    assert_eq!(reply.content_str(), "from a");
    assert_eq!(reply.finish_reason, FinishReason::Stop);
    assert_eq!(transport.call_order(), vec!["http://a"]);
    assert!(relay.history().is_empty());
}

#[tokio::test]
async fn test_request_without_messages_is_rejected_up_front() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", ok("from a"));

    let relay = orchestrator(transport.clone(), vec![backend("custom", "model-a", "http://a")]);

    let token = tokio_util::sync::CancellationToken::new();
    let err = relay
        .chat_with_cancellation(ChatRequest::default(), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::InvalidInput { .. }));

    let reply = relay.chat(ChatRequest::default()).await;
    assert_eq!(reply.finish_reason, FinishReason::Error);
    assert!(reply.content_str().contains("no messages"));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_recovers_at_third_backend() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", refused());
    transport.on("http://b", || {
        Err(RelayError::backend_with_status("status 503: overloaded", 503))
    });
    transport.on("http://c", ok("from c"));
    transport.on("http://d", ok("from d"));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "m", "http://a"),
            backend("custom", "m", "http://b"),
            backend("custom", "m", "http://c"),
            backend("custom", "m", "http://d"),
        ],
    );

    let reply = relay.chat(request()).await;
    assert_eq!(reply.content_str(), "from c");
    assert_eq!(transport.call_order(), vec!["http://a", "http://b", "http://c"]);

    let history = relay.history();
    assert_eq!(history.len(), 3);
    assert!(history[2].is_recovery());
    match &history[2].kind {
        FallbackEventKind::Recovered { index, label } => {
            assert_eq!(*index, 2);
            assert_eq!(label, "Fallback 2 (custom/m)");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_all_hard_errors_aggregate() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", refused());
    transport.on("http://b", || Err(RelayError::timeout("after 120s")));
    transport.on("http://c", || Err(RelayError::backend("Malformed completion payload")));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "m-a", "http://a"),
            backend("custom", "m-b", "http://b"),
            backend("custom", "m-c", "http://c"),
        ],
    );

    let reply = relay.chat(request()).await;
    assert_eq!(reply.finish_reason, FinishReason::Error);

    let lines: Vec<&str> = reply.content_str().lines().collect();
    assert_eq!(lines[0], EXHAUSTED_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("  - Primary (custom/m-a): "));
    assert!(lines[1].contains("connection refused"));
    assert!(lines[2].starts_with("  - Fallback 1 (custom/m-b): "));
    assert!(lines[2].contains("after 120s"));
    assert!(lines[3].starts_with("  - Fallback 2 (custom/m-c): "));

    assert!(matches!(
        relay.history().last().map(|e| &e.kind),
        Some(FallbackEventKind::Exhausted { failures }) if failures.len() == 3
    ));
}

#[tokio::test]
async fn test_soft_error_triggers_fallback() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", || {
        Ok(RawCompletion::from_text("Error calling LLM: quota exceeded", "stop"))
    });
    transport.on("http://b", ok("fine"));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "m", "http://a"),
            backend("custom", "m", "http://b"),
        ],
    );

    let reply = relay.chat(request()).await;
    assert_eq!(reply.content_str(), "fine");
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_sentinel_detection_can_be_disabled() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", || {
        Ok(RawCompletion::from_text("Error calling LLM: is a fine title", "stop"))
    });

    let relay = FallbackOrchestrator::builder()
        .transport(transport.clone())
        .backend(backend("custom", "m", "http://a"))
        .backend(backend("custom", "m", "http://b"))
        .soft_errors(SoftErrorPolicy::finish_reason_only())
        .build()
        .unwrap();

    let reply = relay.chat(request()).await;
    assert_eq!(reply.finish_reason, FinishReason::Stop);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_last_soft_error_returned_verbatim() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", refused());
    transport.on("http://b", || {
        Ok(RawCompletion::from_text("upstream said no", "error").with_usage(5, 0))
    });

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "m", "http://a"),
            backend("custom", "m", "http://b"),
        ],
    );

    let reply = relay.chat(request()).await;
    assert_eq!(reply.finish_reason, FinishReason::Error);
    assert_eq!(reply.content_str(), "upstream said no");
    assert_eq!(reply.usage.map(|u| u.prompt_tokens), Some(5));
}

#[tokio::test]
async fn test_single_backend_hard_error() {
    let transport = ScriptedTransport::new();
    let relay = orchestrator(transport.clone(), vec![backend("custom", "m", "http://a")]);

    let reply = relay.chat(request()).await;
    assert!(reply.finish_reason.is_error());
    assert!(reply.content_str().contains("Primary (custom/m): HTTP error: no route to http://a"));
}

#[tokio::test]
async fn test_model_override_applies_to_primary_only() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", refused());
    transport.on("http://b", ok("ok"));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "configured-a", "http://a"),
            backend("custom", "configured-b", "http://b"),
        ],
    );
    assert_eq!(relay.default_model(), "configured-a");

    relay.chat(request().with_model("requested")).await;
    let calls = transport.calls();
    assert_eq!(calls[0].model, "requested");
    assert_eq!(calls[1].model, "configured-b");
}

#[tokio::test]
async fn test_parameters_per_slot() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", refused());
    transport.on("http://b", ok("ok"));

    let relay = orchestrator(
        transport.clone(),
        vec![
            backend("custom", "m", "http://a").with_header("x-title", "relay"),
            backend("custom", "m", "http://b")
                .with_max_tokens(256)
                .with_temperature(0.1),
        ],
    );

    let tools = vec![crate::llm::ToolDefinition::function(
        "lookup",
        "Look something up",
        serde_json::json!({"type": "object"}),
    )];
    relay
        .chat(request().with_max_tokens(0).with_temperature(0.5).with_tools(tools))
        .await;

    let calls = transport.calls();
    assert_eq!(calls[0].max_tokens, 1);
    assert_eq!(calls[0].temperature, Some(0.5));
    assert_eq!(calls[0].headers.get("x-title").map(String::as_str), Some("relay"));
    assert_eq!(calls[0].tool_choice.as_deref(), Some("auto"));
    assert_eq!(calls[1].max_tokens, 256);
    assert_eq!(calls[1].temperature, Some(0.1));
    assert!(calls[1].headers.is_empty());
}

#[tokio::test]
async fn test_defaults_when_unset() {
    let transport = ScriptedTransport::new();
    transport.on("http://a", ok("ok"));

    let relay = FallbackOrchestrator::builder()
        .transport(transport.clone())
        .backend(backend("custom", "m", "http://a"))
        .default_max_tokens(2048)
        .default_temperature(0.3)
        .build()
        .unwrap();
    relay.chat(request()).await;

    let calls = transport.calls();
    assert_eq!(calls[0].max_tokens, 2048);
    assert_eq!(calls[0].temperature, Some(0.3));
}

#[tokio::test]
async fn test_history_is_bounded() {
    let transport = ScriptedTransport::new();
    let relay = FallbackOrchestrator::builder()
        .transport(transport.clone())
        .backend(backend("custom", "m", "http://a"))
        .backend(backend("custom", "m", "http://b"))
        .max_history(3)
        .build()
        .unwrap();

    for _ in 0..3 {
        relay.chat(request()).await;
    }
    // Each call records one failed attempt and one exhaustion
    assert_eq!(relay.history().len(), 3);

    relay.clear_history();
    assert!(relay.history().is_empty());
}

#[test]
fn test_empty_chain_rejected_at_build() {
    let err = FallbackOrchestrator::builder()
        .transport(ScriptedTransport::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, RelayError::Config { .. }));
}

#[test]
fn test_invalid_backend_rejected_at_build() {
    let err = FallbackOrchestrator::builder()
        .transport(ScriptedTransport::new())
        .backend(backend("custom", "m", "http://a").with_max_tokens(0))
        .build()
        .unwrap_err();
    assert!(matches!(err, RelayError::Config { .. }));
}
