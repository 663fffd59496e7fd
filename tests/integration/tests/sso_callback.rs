//! SSO callback resolution against provider state changes.

use std::sync::Arc;
use std::time::Duration;

use mc_auth::{EffectLog, IdentityProvider, Notice, Route, SsoCallback, SsoState};
use mc_integration_tests::{user, ScriptedIdentityProvider};

fn callback(effects: &Arc<EffectLog>) -> SsoCallback {
    SsoCallback::new(effects.clone(), effects.clone())
        .with_timers(Duration::from_millis(2_000), Duration::from_millis(15_000))
}

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn redirect_return_with_session_goes_home() {
    let provider = ScriptedIdentityProvider::new();
    let effects = Arc::new(EffectLog::new());
    let handle = callback(&effects).mount(provider.subscribe());
    settle().await;

    provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok");
    settle().await;
    tokio::time::advance(Duration::from_millis(2_100)).await;
    settle().await;

    assert_eq!(handle.state(), SsoState::Succeeded);
    assert_eq!(effects.routes(), vec![Route::Home]);
    assert_eq!(effects.notices(), vec![Notice::success("Successfully signed in")]);
}

#[tokio::test(start_paused = true)]
async fn slow_provider_load_still_succeeds_before_timeout() {
    let provider = ScriptedIdentityProvider::new();
    let effects = Arc::new(EffectLog::new());
    let handle = callback(&effects).mount(provider.subscribe());
    settle().await;

    tokio::time::advance(Duration::from_millis(9_000)).await;
    settle().await;
    assert_eq!(handle.state(), SsoState::Pending);

    provider.sign_in_as(user("user_1", ""), "tok");
    settle().await;
    tokio::time::advance(Duration::from_millis(2_100)).await;
    settle().await;

    assert_eq!(handle.state(), SsoState::Succeeded);
    assert_eq!(effects.routes(), vec![Route::Home]);
}

#[tokio::test(start_paused = true)]
async fn abandoned_redirect_times_out_to_sign_in() {
    let provider = ScriptedIdentityProvider::new();
    provider.finish_loading();
    let effects = Arc::new(EffectLog::new());
    let handle = callback(&effects).mount(provider.subscribe());
    settle().await;

    tokio::time::advance(Duration::from_millis(15_100)).await;
    settle().await;

    assert_eq!(handle.state(), SsoState::TimedOut);
    assert_eq!(effects.routes(), vec![Route::SignIn]);
    assert_eq!(
        effects.notices(),
        vec![Notice::error("Authentication timed out. Please try signing in again.")]
    );
}

#[tokio::test(start_paused = true)]
async fn exactly_one_outcome_is_reported() {
    let provider = ScriptedIdentityProvider::new();
    let effects = Arc::new(EffectLog::new());
    let handle = callback(&effects).mount(provider.subscribe());
    settle().await;

    tokio::time::advance(Duration::from_millis(15_100)).await;
    settle().await;
    provider.sign_in_as(user("user_1", ""), "tok");
    settle().await;
    tokio::time::advance(Duration::from_millis(5_000)).await;
    settle().await;

    assert_eq!(handle.outcome().await, SsoState::TimedOut);
    assert_eq!(effects.routes(), vec![Route::SignIn]);
    assert_eq!(effects.notices().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn leaving_the_page_cancels_everything() {
    let provider = ScriptedIdentityProvider::new();
    let effects = Arc::new(EffectLog::new());
    let handle = callback(&effects).mount(provider.subscribe());
    settle().await;

    handle.unmount();
    provider.sign_in_as(user("user_1", ""), "tok");
    tokio::time::advance(Duration::from_millis(20_000)).await;
    settle().await;

    assert!(effects.routes().is_empty());
    assert!(effects.notices().is_empty());
}
