//! Provider state → session store → guard → REST client.

use std::time::Duration;

use mc_auth::{AuthError, GuardDecision, IdentityProvider, Route, SyncOutcome};
use mc_integration_tests::{user, TestEnv};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

#[tokio::test]
async fn guard_waits_for_provider_then_renders_synced_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let sync_task = env.spawn_sync();

    assert_eq!(env.check_guard(), GuardDecision::Loading);

    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok-1");
    assert!(env.wait_for_session(Duration::from_secs(2)).await);

    assert_eq!(env.check_guard(), GuardDecision::Render);
    let claims = env.store.user().expect("claims synced");
    assert_eq!(claims.account_no, "user_1");
    assert_eq!(claims.email, "ops@masschat.test");
    assert!(env.effects.routes().is_empty());

    sync_task.abort();
    Ok(())
}

#[tokio::test]
async fn signed_out_user_is_redirected_once() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.finish_loading();

    assert_eq!(env.check_guard(), GuardDecision::Redirected(Route::SignIn));
    assert_eq!(env.check_guard(), GuardDecision::Blocked);
    assert_eq!(env.effects.routes(), vec![Route::SignIn]);
    Ok(())
}

#[tokio::test]
async fn requests_carry_synced_bearer_token() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path("/auth/token-status"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(&env.server)
        .await;

    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok-1");
    assert_eq!(env.sync().sync(&env.provider.snapshot()).await, SyncOutcome::Synced);

    let status = env.client.check_token_status().await?;
    assert_eq!(status.0, json!({"valid": true}));
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_resets_session_and_guard_redirects() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&env.server)
        .await;

    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "stale");
    env.sync().sync(&env.provider.snapshot()).await;
    assert_eq!(env.check_guard(), GuardDecision::Render);

    let err = env.client.accounts().list().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(env.store.snapshot().is_empty());

    // Provider still reports a signed-in user, but the store is empty.
    assert_eq!(env.check_guard(), GuardDecision::Redirected(Route::SignIn));
    assert_eq!(env.effects.routes(), vec![Route::SignIn]);
    Ok(())
}

#[tokio::test]
async fn requests_after_reset_go_out_without_bearer() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path("/auth/token-status"))
        .respond_with(|req: &Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(401)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"valid": false}))
            }
        })
        .mount(&env.server)
        .await;

    env.provider.sign_in_as(user("user_1", ""), "stale");
    env.sync().sync(&env.provider.snapshot()).await;

    assert!(env.client.check_token_status().await.is_err());
    let status = env.client.check_token_status().await?;
    assert_eq!(status.0, json!({"valid": false}));
    Ok(())
}

#[tokio::test]
async fn token_fetch_failure_keeps_previous_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok-1");
    let sync = env.sync();
    sync.sync(&env.provider.snapshot()).await;
    let before = env.store.snapshot();

    env.provider.fail_token_fetch(true);
    assert_eq!(
        sync.sync(&env.provider.snapshot()).await,
        SyncOutcome::Failed(AuthError::TokenFetch("token endpoint unreachable".to_string()))
    );
    assert_eq!(env.store.snapshot(), before);
    Ok(())
}

#[tokio::test]
async fn rotated_token_is_used_after_resync() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    Mock::given(method("GET"))
        .and(path("/auth/token-status"))
        .and(header("Authorization", "Bearer tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(&env.server)
        .await;

    env.provider.sign_in_as(user("user_1", ""), "tok-1");
    let sync = env.sync();
    sync.sync(&env.provider.snapshot()).await;
    assert_eq!(sync.sync(&env.provider.snapshot()).await, SyncOutcome::Unchanged);

    env.provider.rotate_token("tok-2");
    assert_eq!(sync.sync(&env.provider.snapshot()).await, SyncOutcome::Synced);

    env.client.check_token_status().await?;
    Ok(())
}
