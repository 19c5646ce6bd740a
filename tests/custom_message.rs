//! Tests for caller-supplied message formatters.

mod helpers;

use std::sync::{Arc, Mutex};

use helpers::{stub_collaborators, visitor_page, RecordingSender, StubIdentity};
use notigram::{DispatchState, Field, Notifier, NotifierConfig, NotifyError, ParseMode};

#[tokio::test]
async fn test_custom_formatter_replaces_fields_and_keeps_parse_mode() {
    let identity = Arc::new(StubIdentity::succeeding());
    let sender = Arc::new(RecordingSender::default());
    let config = NotifierConfig {
        fields: vec![Field::Ip],
        parse_mode: ParseMode::MarkdownV2,
        ..NotifierConfig::new("123:abc", "42")
    };

    let notifier = Notifier::builder(config, visitor_page())
        .collaborators(stub_collaborators(&identity, &sender))
        .custom_message(|record| {
            Ok(format!(
                "*{}* from {}",
                record.page.as_deref().unwrap_or("?"),
                record.country.as_deref().unwrap_or("?")
            ))
        })
        .build()
        .unwrap();

    assert!(notifier.collect_and_notify().await.is_dispatched());
    assert_eq!(
        sender.last(),
        Some(("*/pricing* from Wakanda".to_string(), ParseMode::MarkdownV2))
    );
}

#[tokio::test]
async fn test_built_in_formatter_always_sends_html() {
    let identity = Arc::new(StubIdentity::succeeding());
    let sender = Arc::new(RecordingSender::default());
    let config = NotifierConfig {
        parse_mode: ParseMode::Markdown,
        ..NotifierConfig::new("123:abc", "42")
    };

    let notifier = Notifier::builder(config, visitor_page())
        .collaborators(stub_collaborators(&identity, &sender))
        .build()
        .unwrap();
    notifier.collect_and_notify().await;

    let (text, mode) = sender.last().expect("message should be sent");
    assert_eq!(mode, ParseMode::Html);
    assert!(text.contains("<b>Country:</b> Wakanda"));
}

#[tokio::test]
async fn test_formatter_error_is_reported_and_nothing_sent() {
    let identity = Arc::new(StubIdentity::succeeding());
    let sender = Arc::new(RecordingSender::default());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let e = Arc::clone(&errors);

    let notifier = Notifier::builder(NotifierConfig::new("123:abc", "42"), visitor_page())
        .collaborators(stub_collaborators(&identity, &sender))
        .custom_message(|_| Err(anyhow::anyhow!("template missing")))
        .on_error(move |err| e.lock().unwrap().push(err.clone()))
        .build()
        .unwrap();

    let outcome = notifier.collect_and_notify().await;

    let expected = NotifyError::Formatter("template missing".to_string());
    assert_eq!(outcome.error(), Some(&expected));
    assert_eq!(*errors.lock().unwrap(), vec![expected]);
    assert_eq!(sender.count(), 0);
    assert_eq!(notifier.state(), DispatchState::Failed);
}

#[tokio::test]
async fn test_formatter_panic_is_contained() {
    let identity = Arc::new(StubIdentity::succeeding());
    let sender = Arc::new(RecordingSender::default());

    let notifier = Notifier::builder(NotifierConfig::new("123:abc", "42"), visitor_page())
        .collaborators(stub_collaborators(&identity, &sender))
        .custom_message(|_| panic!("formatter bug"))
        .build()
        .unwrap();

    let outcome = notifier.collect_and_notify().await;

    assert_eq!(
        outcome.error(),
        Some(&NotifyError::Formatter("panicked: formatter bug".to_string()))
    );
    assert_eq!(sender.count(), 0);
}
