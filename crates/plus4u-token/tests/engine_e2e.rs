//! End-to-end tests: engine and interceptor against a mock OIDC server.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plus4u_token::{
    AccessCodePair, AccessCodeVault, AuthHeaderValue, CredentialPrompt, EngineConfig, EngineError,
    PromptRequest, RequestHeaders, RequestInterceptor, TokenEngine, TokenPlaceholder,
    AUTHORIZATION,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test doubles for the host capabilities
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    calls: AtomicU32,
}

impl ScriptedPrompt {
    fn new(answers: Vec<Option<&str>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(str::to_string)).collect()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn prompt(&self, _request: PromptRequest) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

struct MapVault {
    password: String,
    contents: HashMap<String, AccessCodePair>,
}

#[async_trait]
impl AccessCodeVault for MapVault {
    async fn exists(&self) -> bool {
        true
    }

    async fn read(&self, password: &str) -> plus4u_token::Result<HashMap<String, AccessCodePair>> {
        if password == self.password {
            Ok(self.contents.clone())
        } else {
            Err(EngineError::Vault("decryption failed".to_string()))
        }
    }
}

#[derive(Debug, Default)]
struct FakeRequest {
    headers: HashMap<String, String>,
}

impl RequestHeaders for FakeRequest {
    fn get_header(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    fn set_header(&mut self, name: &str, value: String) {
        self.headers.insert(name.to_string(), value);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock OIDC server
// ─────────────────────────────────────────────────────────────────────────────

/// Mounts discovery plus a token endpoint issuing `token` for the
/// given codes, with `expected_logins` as the allowed POST count.
async fn mount_oidc(server: &MockServer, codes: (&str, &str), token: &str, expected_logins: u64) {
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_endpoint": format!("{}/grantToken", server.uri()),
            "uuAppErrorMap": {}
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/grantToken"))
        .and(body_partial_json(serde_json::json!({
            "accessCode1": codes.0,
            "accessCode2": codes.1,
            "grant_type": "password"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id_token": token,
            "uuAppErrorMap": {}
        })))
        .expect(expected_logins)
        .mount(server)
        .await;
}

fn test_engine() -> TokenEngine {
    TokenEngine::builder()
        .config(EngineConfig::default().with_sweeper(false))
        .build()
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn raw_mode_login_and_cache() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("a", "b"), "abc", 1).await;

    let engine = test_engine();
    let codes = AccessCodePair::new("a", "b");

    let first = engine.token_for_codes(&codes, &server.uri()).await.unwrap();
    assert_eq!(first, "abc");

    // Second call is served from cache; the expect(1) on the token
    // endpoint verifies no second login happened.
    let second = engine.token_for_codes(&codes, &server.uri()).await.unwrap();
    assert_eq!(second, "abc");
}

#[tokio::test]
async fn identity_mode_prompts_once_per_session() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("pa", "pb"), "tok-1", 1).await;

    let prompt = Arc::new(ScriptedPrompt::new(vec![Some("pa"), Some("pb")]));
    let engine = TokenEngine::builder()
        .prompt(Arc::clone(&prompt) as Arc<dyn CredentialPrompt>)
        .config(EngineConfig::default().with_sweeper(false))
        .build();

    let first = engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    assert_eq!(first, "tok-1");
    assert_eq!(prompt.calls(), 2);

    // Cached token: neither the prompts nor the login run again.
    let second = engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    assert_eq!(second, "tok-1");
    assert_eq!(prompt.calls(), 2);
}

#[tokio::test]
async fn expired_identity_token_reuses_stored_codes_without_prompting() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("pa", "pb"), "tok", 2).await;

    let prompt = Arc::new(ScriptedPrompt::new(vec![Some("pa"), Some("pb")]));
    let engine = TokenEngine::builder()
        .prompt(Arc::clone(&prompt) as Arc<dyn CredentialPrompt>)
        .config(
            EngineConfig::default()
                .with_token_ttl(Duration::from_millis(30))
                .with_sweeper(false),
        )
        .build();

    engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Token expired: a fresh login runs, but the codes come from the
    // access-code store, not a second round of prompting.
    engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    assert_eq!(prompt.calls(), 2);
}

#[tokio::test]
async fn vault_with_wrong_password_falls_through_to_prompting() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("pa", "pb"), "tok", 1).await;

    let mut contents = HashMap::new();
    contents.insert("u1".to_string(), AccessCodePair::new("va", "vb"));
    let vault = Arc::new(MapVault {
        password: "right".to_string(),
        contents,
    });

    // Vault password answered wrong, then the two access codes.
    let prompt = Arc::new(ScriptedPrompt::new(vec![Some("wrong"), Some("pa"), Some("pb")]));
    let engine = TokenEngine::builder()
        .prompt(Arc::clone(&prompt) as Arc<dyn CredentialPrompt>)
        .vault(vault as Arc<dyn AccessCodeVault>)
        .config(EngineConfig::default().with_sweeper(false))
        .build();

    let token = engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    assert_eq!(token, "tok");
    assert_eq!(prompt.calls(), 3);
}

#[tokio::test]
async fn vault_unlocks_once_and_serves_codes() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("va", "vb"), "tok", 1).await;

    let mut contents = HashMap::new();
    contents.insert("u1".to_string(), AccessCodePair::new("va", "vb"));
    let vault = Arc::new(MapVault {
        password: "pw".to_string(),
        contents,
    });

    let prompt = Arc::new(ScriptedPrompt::new(vec![Some("pw")]));
    let engine = TokenEngine::builder()
        .prompt(Arc::clone(&prompt) as Arc<dyn CredentialPrompt>)
        .vault(vault as Arc<dyn AccessCodeVault>)
        .config(EngineConfig::default().with_sweeper(false))
        .build();

    let token = engine.token_for_identity("u1", &server.uri(), true).await.unwrap();
    assert_eq!(token, "tok");
    // One prompt: the vault password. The codes came from the vault.
    assert_eq!(prompt.calls(), 1);
}

#[tokio::test]
async fn interceptor_rewrites_placeholder_header() {
    let server = MockServer::start().await;
    mount_oidc(&server, ("a", "b"), "abc", 1).await;

    let interceptor = RequestInterceptor::new(test_engine());
    let placeholder = TokenPlaceholder {
        access_code1: "a".to_string(),
        access_code2: "b".to_string(),
        prompt: false,
        identification: String::new(),
        oidc_server: server.uri(),
    };

    let mut request = FakeRequest::default();
    request.set_header(AUTHORIZATION, format!("Bearer {}", placeholder.encode()));

    interceptor.intercept(&mut request).await.unwrap();
    assert_eq!(request.get_header(AUTHORIZATION).as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn interceptor_leaves_plain_bearer_untouched() {
    let interceptor = RequestInterceptor::new(test_engine());

    let mut request = FakeRequest::default();
    request.set_header(AUTHORIZATION, "Bearer abc123".to_string());

    interceptor.intercept(&mut request).await.unwrap();
    assert_eq!(request.get_header(AUTHORIZATION).as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn interceptor_aborts_on_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_endpoint": format!("{}/grantToken", server.uri()),
            "uuAppErrorMap": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/grantToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuAppErrorMap": {"uu-oidc/invalidCredentials": "bad creds"}
        })))
        .mount(&server)
        .await;

    let interceptor = RequestInterceptor::new(test_engine());
    let placeholder = TokenPlaceholder {
        access_code1: "a".to_string(),
        access_code2: "bad".to_string(),
        prompt: false,
        identification: String::new(),
        oidc_server: server.uri(),
    };

    let mut request = FakeRequest::default();
    request.set_header(AUTHORIZATION, placeholder.encode());

    let err = interceptor.intercept(&mut request).await.unwrap_err();
    assert!(matches!(err, EngineError::Unresolved(_)));
}

#[tokio::test]
async fn placeholder_round_trips_through_header_parse() {
    let placeholder = TokenPlaceholder {
        access_code1: "a".to_string(),
        access_code2: "b".to_string(),
        prompt: true,
        identification: "u1".to_string(),
        oidc_server: "https://x".to_string(),
    };
    match AuthHeaderValue::parse(&placeholder.encode()).unwrap() {
        AuthHeaderValue::Deferred(decoded) => assert_eq!(decoded, placeholder),
        other => panic!("expected Deferred, got {:?}", other),
    }
}
