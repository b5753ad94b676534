use account_auth::{hash_credential, AccountAuthenticator, HttpAccountAuthenticator, LoginRequest};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> LoginRequest<'static> {
    LoginRequest {
        account: "user@example.com",
        credential: "hunter2",
        web_device_id: "wb_0123456789",
    }
}

fn authenticator(server: &MockServer) -> HttpAccountAuthenticator {
    HttpAccountAuthenticator::new(Url::parse(&server.uri()).unwrap())
}

#[tokio::test]
async fn posts_hashed_credential_and_reads_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pass/serviceLoginAuth2"))
        .and(header("cookie", "deviceId=wb_0123456789"))
        .and(body_string_contains(format!("hash={}", hash_credential("hunter2"))))
        .and(body_string_contains("sid=unlockApi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"&&&START&&&{"code":0,"userId":"42","ssecurity":"s","nonce":"n","location":"https://example.com/next"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let session = authenticator(&server).authenticate(request()).await.unwrap();

    assert_eq!(session.remote_user_id, "42");
    assert_eq!(session.redirect_location, "https://example.com/next");
}

#[tokio::test]
async fn rejection_carries_service_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pass/serviceLoginAuth2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"&&&START&&&{"code":70016,"desc":"invalid password"}"#),
        )
        .mount(&server)
        .await;

    let err = authenticator(&server)
        .authenticate(request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "auth_rejected");
    assert!(err.to_string().contains("invalid password"));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);

    let err = HttpAccountAuthenticator::new(base)
        .authenticate(request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "auth_transport");
    assert!(!err.is_rejection());
}
