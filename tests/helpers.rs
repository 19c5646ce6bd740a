// Shared test helpers: stub collaborators and stubbed remote services.
//
// Included by the integration test files with `mod helpers;`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use notigram::context::RegexAgentParser;
use notigram::delivery::MessageSender;
use notigram::identity::{GeoProfile, IdentityResolver};
use notigram::initialization::Collaborators;
use notigram::{NotifierBuilder, NotifierConfig, NotifyError, PageContext, ParseMode};

pub const VISITOR_IP: &str = "203.0.113.7";

pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";

/// A visit to /pricing from an iPhone, referred by a search engine.
#[allow(dead_code)]
pub fn visitor_page() -> PageContext {
    PageContext::from_url(
        "https://shop.example/pricing?plan=pro",
        Some("https://search.example/?q=shop".to_string()),
        IPHONE_UA,
    )
}

/// A successful ipwho.is style profile.
#[allow(dead_code)]
pub fn wakanda_profile() -> serde_json::Value {
    json!({
        "ip": VISITOR_IP,
        "success": true,
        "type": "IPv4",
        "continent": "Africa",
        "continent_code": "AF",
        "country": "Wakanda",
        "country_code": "WK",
        "region": "Golden City",
        "city": "Birnin Zana",
        "latitude": -1.28,
        "longitude": 36.82,
        "flag": { "emoji": "🏳️" },
        "connection": { "asn": 64500, "isp": "Vibranium Net" },
        "timezone": { "id": "Africa/Nairobi", "utc": "+03:00" }
    })
}

/// Configuration pointing all three services at `server`.
#[allow(dead_code)]
pub fn config_for(server: &Server) -> NotifierConfig {
    NotifierConfig {
        ip_endpoint: server.url_str("/ip"),
        geo_endpoint: server.url_str("/geo"),
        bot_api_base: server.url_str(""),
        request_timeout: Duration::from_secs(2),
        ..NotifierConfig::new("123:abc", "42")
    }
}

/// Expects one IP lookup and one geolocation lookup answering `profile`.
#[allow(dead_code)]
pub fn expect_lookups(server: &Server, profile: serde_json::Value) {
    server.expect(
        Expectation::matching(request::method_path("GET", "/ip"))
            .respond_with(json_encoded(json!({ "ip": VISITOR_IP }))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/geo/203.0.113.7"))
            .respond_with(json_encoded(profile)),
    );
}

/// Identity resolver answering from memory and counting calls.
pub struct StubIdentity {
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub result: Result<GeoProfile, NotifyError>,
}

impl StubIdentity {
    #[allow(dead_code)]
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            result: Ok(GeoProfile {
                ip: Some(VISITOR_IP.to_string()),
                country: Some("Wakanda".to_string()),
                city: Some("Birnin Zana".to_string()),
                ..Default::default()
            }),
        }
    }

    #[allow(dead_code)]
    pub fn failing(error: NotifyError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for StubIdentity {
    async fn resolve_ip(&self) -> Result<String, NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(VISITOR_IP.to_string())
    }

    async fn resolve_geo(&self, _ip: &str) -> Result<GeoProfile, NotifyError> {
        self.result.clone()
    }
}

/// Sender that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, ParseMode)>>,
}

impl RecordingSender {
    #[allow(dead_code)]
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<(String, ParseMode)> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, text: &str, parse_mode: ParseMode) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((text.to_string(), parse_mode));
        Ok(())
    }
}

#[allow(dead_code)]
pub fn stub_collaborators(
    identity: &Arc<StubIdentity>,
    sender: &Arc<RecordingSender>,
) -> Collaborators {
    Collaborators {
        identity: Arc::clone(identity) as Arc<dyn IdentityResolver>,
        agent_parser: Arc::new(RegexAgentParser),
        sender: Arc::clone(sender) as Arc<dyn MessageSender>,
    }
}

/// Counts success and error callback invocations.
#[derive(Default)]
pub struct CallbackCounts {
    pub successes: AtomicUsize,
    pub errors: AtomicUsize,
}

impl CallbackCounts {
    #[allow(dead_code)]
    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

/// Registers counting `on_success` / `on_error` callbacks on `builder`.
#[allow(dead_code)]
pub fn with_counting_callbacks(builder: NotifierBuilder) -> (NotifierBuilder, Arc<CallbackCounts>) {
    let counts = Arc::new(CallbackCounts::default());
    let (s, e) = (Arc::clone(&counts), Arc::clone(&counts));
    let builder = builder
        .on_success(move |_| {
            s.successes.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(move |_| {
            e.errors.fetch_add(1, Ordering::SeqCst);
        });
    (builder, counts)
}
