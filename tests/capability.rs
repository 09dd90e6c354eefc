//! Token capability contract tests.
//!
//! Service responses are mocked, so these tests check that capability is
//! sent in canonical form and that issued capability and rejections are
//! surfaced to the caller.

use ably::{
    dx::auth::{Capability, Operation, TokenParams},
    AblyClient, AblyClientBuilder, AblyError,
};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Match, Mock, MockServer, Request, ResponseTemplate,
};

const KEY_NAME: &str = "app.restricted";
const KEY_SECRET: &str = "secret";

/// Capability of the key used to sign requests.
fn key_capability() -> Capability {
    Capability::new()
        .with("canpublish:*", [Operation::Publish])
        .with("channel2", [Operation::Publish, Operation::Subscribe])
        .with("channel6", [Operation::All])
        .with("cansubscribe:*", [Operation::Subscribe])
}

/// Matches token requests which doesn't ask for any capability.
struct WithoutCapability;

impl Match for WithoutCapability {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .map(|body| body.get("capability").is_none())
            .unwrap_or(false)
    }
}

fn token_details(capability: &Capability) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token": "issued.token",
        "keyName": KEY_NAME,
        "issued": 1_000,
        "expires": 3_601_000,
        "capability": capability.to_json(),
    }))
}

fn rejection(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {
            "message": message,
            "code": 40000,
            "statusCode": 400,
            "href": "https://help.ably.io/error/40000"
        }
    }))
}

async fn mount_requested(server: &MockServer, requested: &Capability, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/keys/{KEY_NAME}/requestToken")))
        .and(body_partial_json(json!({ "capability": requested.to_json() })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> AblyClient {
    let _ = env_logger::builder().is_test(true).try_init();

    AblyClientBuilder::with_reqwest_transport()
        .with_key("app.default:other")
        .with_origin(server.uri())
        .build()
        .unwrap()
}

async fn request_with(
    client: &AblyClient,
    capability: Capability,
) -> Result<Capability, AblyError> {
    client
        .request_token()
        .key_name(KEY_NAME)
        .key_secret(KEY_SECRET)
        .token_params(TokenParams {
            capability: Some(capability),
            ..Default::default()
        })
        .execute()
        .await
        .map(|details| details.capability)
}

fn assert_rejected(result: Result<Capability, AblyError>) {
    let error = result.unwrap_err();

    assert!(matches!(error, AblyError::API { .. }));
    assert_eq!(error.status_code(), Some(400));
    assert_eq!(error.code(), Some(40000));
}

#[tokio::test]
async fn blanket_intersection_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/keys/{KEY_NAME}/requestToken")))
        .and(WithoutCapability)
        .respond_with(token_details(&key_capability()))
        .expect(1)
        .mount(&server)
        .await;

    let details = client(&server)
        .request_token()
        .key_name(KEY_NAME)
        .key_secret(KEY_SECRET)
        .execute()
        .await
        .unwrap();

    assert_eq!(details.token, "issued.token");
    assert_eq!(details.capability, key_capability());
}

#[tokio::test]
async fn equal_intersection_with_key() {
    let server = MockServer::start().await;
    mount_requested(&server, &key_capability(), token_details(&key_capability())).await;

    let capability = request_with(&client(&server), key_capability()).await;

    assert_eq!(capability.unwrap(), key_capability());
}

#[tokio::test]
async fn empty_paths_intersection() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("testchannelx", [Operation::Publish]);
    mount_requested(&server, &requested, rejection("Capability intersection is empty")).await;

    assert_rejected(request_with(&client(&server), requested).await);
}

#[tokio::test]
async fn non_empty_ops_intersection() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel2", ["presence", "subscribe"]);
    let issued = Capability::new().with("channel2", ["subscribe"]);
    mount_requested(&server, &requested, token_details(&issued)).await;

    let capability = request_with(&client(&server), requested).await;

    assert_eq!(capability.unwrap(), issued);
}

#[tokio::test]
async fn wildcard_ops_intersection() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel2", ["*"]);
    let issued = Capability::new().with("channel2", ["subscribe", "publish"]);
    mount_requested(&server, &requested, token_details(&issued)).await;

    let capability = request_with(&client(&server), requested).await;

    assert_eq!(capability.unwrap(), issued);
}

#[tokio::test]
async fn wildcard_ops_of_key() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel6", ["publish", "subscribe"]);
    mount_requested(&server, &requested, token_details(&requested)).await;

    let capability = request_with(&client(&server), requested.clone()).await;

    assert_eq!(capability.unwrap(), requested);
}

#[tokio::test]
async fn keep_wildcard_resources() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("cansubscribe:*", ["subscribe"]);
    mount_requested(&server, &requested, token_details(&requested)).await;

    let capability = request_with(&client(&server), requested).await.unwrap();

    assert_eq!(
        capability.resources().collect::<Vec<_>>(),
        vec!["cansubscribe:*"]
    );
}

#[tokio::test]
async fn reject_unknown_operation() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel0", ["publish_"]);
    mount_requested(&server, &requested, rejection("Invalid capability operation")).await;

    assert_rejected(request_with(&client(&server), requested).await);
}

#[tokio::test]
async fn reject_wildcard_mixed_with_operations() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel0", ["*", "publish"]);
    mount_requested(&server, &requested, rejection("Invalid capability operation")).await;

    assert_rejected(request_with(&client(&server), requested).await);
}

#[tokio::test]
async fn reject_empty_operations() {
    let server = MockServer::start().await;
    let requested = Capability::new().with("channel0", Vec::<Operation>::new());
    mount_requested(&server, &requested, rejection("Empty operations list")).await;

    assert_rejected(request_with(&client(&server), requested).await);
}
