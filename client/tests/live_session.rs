//! End-to-end tests against a scripted stand-in for the analyzer.
//!
//! The stand-in is a shell one-liner that prints canned notifications on
//! stdout, which exercises the real spawn/frame/route path.

#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use impart_client::{
    AnalyzerClient, AnalyzerConfig, ClientError, ClientEvent, SessionState, StopReason,
};

const TEXT_DIAGNOSTIC: &str = r#"{"method":"textDocument/publishDiagnostics","params":{"diagnostics":[{"range":{"start":{"line":0,"character":7},"end":{"line":0,"character":11}},"severity":1,"message":"Text is not defined"}]}}"#;

const STATE_DIAGNOSTIC: &str = r#"{"method":"textDocument/publishDiagnostics","params":{"diagnostics":[{"range":{"start":{"line":3,"character":0},"end":{"line":3,"character":5}},"severity":1,"message":"State is not defined"}]}}"#;

fn scripted_analyzer(script: &str) -> AnalyzerConfig {
    let mut config = AnalyzerConfig::new("sh");
    config.args = vec![String::from("-c"), script.to_string()];
    config
}

async fn wait_for_events(client: &mut AnalyzerClient, want: usize) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while events.len() < want && tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_millis(200), client.next_event()).await {
            Ok(Some(event)) => events.push(event),
            Ok(None) => break,
            Err(_) => {}
        }
    }
    events
}

#[tokio::test]
async fn scripted_analyzer_drives_the_full_event_chain() {
    let script = format!("printf '%s\\n' '{TEXT_DIAGNOSTIC}'; sleep 2");
    let mut client = AnalyzerClient::start(scripted_analyzer(&script)).unwrap();
    assert_eq!(client.state(), SessionState::Running);

    client
        .analyze_file(Path::new("/tmp/widget.dart"))
        .await
        .unwrap();

    let events = wait_for_events(&mut client, 2).await;
    assert_eq!(
        events,
        vec![
            ClientEvent::UnresolvedSymbols { count: 1 },
            ClientEvent::ImportChoices {
                paths: vec![String::from("package:flutter/material.dart")]
            },
        ]
    );

    client.stop().await;
    client.stop().await; // idempotent

    let err = client
        .analyze_file(Path::new("/tmp/widget.dart"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Write), "send after stop must fail");
}

#[tokio::test]
async fn burst_of_notifications_is_routed_in_order() {
    let script =
        format!("printf '%s\\n%s\\n' '{TEXT_DIAGNOSTIC}' '{STATE_DIAGNOSTIC}'; sleep 2");
    let mut client = AnalyzerClient::start(scripted_analyzer(&script)).unwrap();

    let events = wait_for_events(&mut client, 4).await;
    assert_eq!(
        events,
        vec![
            ClientEvent::UnresolvedSymbols { count: 1 },
            ClientEvent::ImportChoices {
                paths: vec![String::from("package:flutter/material.dart")]
            },
            ClientEvent::UnresolvedSymbols { count: 1 },
            ClientEvent::ImportChoices {
                paths: vec![String::from("package:flutter/widgets.dart")]
            },
        ]
    );

    client.stop().await;
}

#[tokio::test]
async fn clean_diagnostics_produce_no_events() {
    let script = concat!(
        r#"printf '%s\n' '{"method":"textDocument/publishDiagnostics","params":{"diagnostics":[]}}'"#,
        "; sleep 2"
    );
    let mut client = AnalyzerClient::start(scripted_analyzer(script)).unwrap();

    // The batch is empty, so nothing may surface while the analyzer lives.
    let outcome =
        tokio::time::timeout(Duration::from_millis(500), client.next_event()).await;
    assert!(outcome.is_err(), "expected silence, got {outcome:?}");

    client.stop().await;
}

#[tokio::test]
async fn analyzer_exit_is_reported() {
    let mut client = AnalyzerClient::start(scripted_analyzer("true")).unwrap();

    let events = wait_for_events(&mut client, 1).await;
    assert_eq!(
        events,
        vec![ClientEvent::SessionStopped {
            reason: StopReason::Exited
        }]
    );
    assert_eq!(client.state(), SessionState::Stopped);
}

#[tokio::test]
async fn stderr_output_does_not_disturb_the_stream() {
    let script = format!(
        "echo 'analyzer warming up' >&2; printf '%s\\n' '{TEXT_DIAGNOSTIC}'; sleep 2"
    );
    let mut client = AnalyzerClient::start(scripted_analyzer(&script)).unwrap();

    let events = wait_for_events(&mut client, 2).await;
    assert_eq!(events[0], ClientEvent::UnresolvedSymbols { count: 1 });

    client.stop().await;
}
