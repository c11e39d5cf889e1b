//! End-to-end seeding tests.

use std::collections::BTreeSet;

use kc_seed::seed::{seed, SeedOptions};
use kc_seed::SeedError;
use kc_seed_integration_tests::{body, MockKeycloak, TEST_REALM};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Tests the three-user scenario end to end.
#[tokio::test]
async fn test_seeds_three_users() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token("token-1", 1).await;
    kc.realm_exists().await;
    kc.users("token-1", 201).await;

    let config = kc.config(3, 10);
    let report = seed(kc.client(3, 10), &config, SeedOptions::default()).await?;

    assert!(report.is_success());
    assert_eq!(report.succeeded, 3);

    let requests = kc.user_requests().await;
    assert_eq!(requests.len(), 3);

    let mut usernames = BTreeSet::new();
    for request in &requests {
        let user = body(request);
        let username = user["username"].as_str().unwrap_or_default().to_string();
        let email = format!("{username}@example.com");
        assert_eq!(user["email"], email.as_str());
        assert_eq!(user["credentials"][0]["value"], email.as_str());
        usernames.insert(username);
    }
    assert_eq!(
        usernames.into_iter().collect::<Vec<_>>(),
        vec!["user1", "user2", "user3"]
    );
    Ok(())
}

/// Tests a larger batch with the realm created on the way.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_creates_realm_and_all_users() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token("token-1", 1).await;

    Mock::given(method("GET"))
        .and(path(format!("/admin/realms/{TEST_REALM}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&kc.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/realms"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&kc.server)
        .await;
    kc.users("token-1", 201).await;

    let config = kc.config(120, 10);
    let report = seed(kc.client(120, 10), &config, SeedOptions::default()).await?;

    assert_eq!(report.succeeded, 120);
    assert_eq!(report.failed, 0);
    assert_eq!(kc.user_requests().await.len(), 120);
    Ok(())
}

/// Tests that a single expired token is refreshed once and the user retried.
#[tokio::test]
async fn test_expired_token_is_refreshed_once() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token_sequence("token-1", "token-2", 1).await;
    kc.realm_exists().await;
    kc.users("token-1", 401).await;
    kc.users("token-2", 201).await;

    let config = kc.config(1, 1);
    let report = seed(kc.client(1, 1), &config, SeedOptions::default()).await?;

    assert!(report.is_success());
    assert_eq!(report.refreshes, 1);
    assert_eq!(kc.token_requests().await, 2);
    assert_eq!(kc.user_requests().await.len(), 2);
    Ok(())
}

/// Tests that workers hitting the same expiry share one refresh.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_expiry_shares_one_refresh() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token_sequence("token-1", "token-2", 1).await;
    kc.realm_exists().await;
    kc.users("token-1", 401).await;
    kc.users("token-2", 201).await;

    let config = kc.config(50, 10);
    let report = seed(kc.client(50, 10), &config, SeedOptions::default()).await?;

    assert_eq!(report.succeeded, 50);
    assert_eq!(report.refreshes, 1);
    assert_eq!(kc.token_requests().await, 2);
    Ok(())
}

/// Tests that a token rejected again after refresh is fatal.
#[tokio::test]
async fn test_repeated_unauthorized_is_fatal() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token_sequence("token-1", "token-2", 1).await;
    kc.realm_exists().await;
    kc.users("token-1", 401).await;
    kc.users("token-2", 401).await;

    let config = kc.config(1, 1);
    let err = seed(kc.client(1, 1), &config, SeedOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Unauthorized { ref username } if username == "user1"));
    assert_eq!(kc.user_requests().await.len(), 2);
    Ok(())
}

/// Tests that an unrecoverable creation error stops the batch early.
#[tokio::test]
async fn test_server_error_stops_batch() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;
    kc.token("token-1", 1).await;
    kc.realm_exists().await;
    kc.users("token-1", 500).await;

    let config = kc.config(200, 2);
    let err = seed(kc.client(200, 2), &config, SeedOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Creation { status: 500, .. }));
    assert!(kc.user_requests().await.len() < 200);
    Ok(())
}

/// Tests that bad admin credentials stop the run before any admin call.
#[tokio::test]
async fn test_bad_credentials_abort_startup() -> anyhow::Result<()> {
    let kc = MockKeycloak::start().await;

    Mock::given(method("POST"))
        .and(path(kc_seed_integration_tests::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&kc.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/admin/realms/{TEST_REALM}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&kc.server)
        .await;

    let config = kc.config(5, 2);
    let err = seed(kc.client(5, 2), &config, SeedOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Auth(_)));
    assert!(kc.user_requests().await.is_empty());
    Ok(())
}
