//! Interactive auth flows wired to the session store and guard.

use std::sync::Arc;
use std::time::Duration;

use mc_auth::{
    AuthError, AuthFlows, EffectLog, GuardDecision, IdentityProvider, Notice, OtpMode, Route,
    SignInOutcome,
};
use mc_integration_tests::{user, TestEnv};
use mc_session::SessionStore;

#[tokio::test]
async fn password_sign_in_establishes_session() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.finish_loading();
    let sync_task = env.spawn_sync();
    env.provider.expect_user(user("user_1", "ops@masschat.test"), "tok-1");

    let outcome = env.flows().sign_in("ops@masschat.test", "correct-horse").await?;
    assert_eq!(outcome, SignInOutcome::SignedIn);
    assert!(env.wait_for_session(Duration::from_secs(2)).await);

    assert_eq!(env.store.access_token().as_deref(), Some("tok-1"));
    assert_eq!(env.check_guard(), GuardDecision::Render);
    assert_eq!(env.effects.routes(), vec![Route::Home]);
    assert_eq!(env.effects.notices(), vec![Notice::success("Signed in successfully")]);

    sync_task.abort();
    Ok(())
}

#[tokio::test]
async fn wrong_password_surfaces_provider_message() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.finish_loading();

    let err = env
        .flows()
        .sign_in("ops@masschat.test", "tr0ub4dor&3")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::CredentialRejected("Password is incorrect. Try again.".to_string())
    );
    assert_eq!(
        env.effects.notices(),
        vec![Notice::error("Password is incorrect. Try again.")]
    );
    assert!(env.effects.routes().is_empty());
    assert!(!env.store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn second_factor_goes_through_otp() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.finish_loading();
    env.provider.require_second_factor();
    env.provider.expect_user(user("user_1", "ops@masschat.test"), "tok-1");
    let flows = env.flows();

    let outcome = flows.sign_in("ops@masschat.test", "correct-horse").await?;
    assert_eq!(outcome, SignInOutcome::NeedsSecondFactor);
    assert_eq!(env.effects.last_route(), Some(Route::Otp));

    assert!(flows.verify_otp(OtpMode::SignIn, "111111").await.is_err());
    assert_eq!(env.effects.last_route(), Some(Route::Otp));

    assert!(flows.verify_otp(OtpMode::SignIn, "424242").await?);
    assert_eq!(env.effects.last_route(), Some(Route::Home));
    assert!(env.provider.snapshot().is_signed_in);
    Ok(())
}

#[tokio::test]
async fn sign_out_clears_session_and_redirects() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok-1");
    env.sync().sync(&env.provider.snapshot()).await;
    assert_eq!(env.check_guard(), GuardDecision::Render);

    env.flows().sign_out().await?;

    assert!(env.store.snapshot().is_empty());
    assert!(!env.provider.snapshot().is_signed_in);
    assert_eq!(env.effects.routes(), vec![Route::SignIn]);

    // The guard sees the transition out of the session and redirects too.
    assert_eq!(env.check_guard(), GuardDecision::Redirected(Route::SignIn));
    assert_eq!(env.check_guard(), GuardDecision::Blocked);
    Ok(())
}

#[tokio::test]
async fn missing_provider_disables_actions() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let effects = Arc::new(EffectLog::new());
    let flows = AuthFlows::new(
        None,
        Arc::new(SessionStore::new()),
        effects.clone(),
        effects.clone(),
        &env.config,
    );

    let err = flows.sign_in("ops@masschat.test", "correct-horse").await.unwrap_err();
    assert_eq!(err, AuthError::ProviderUnavailable);
    assert_eq!(
        effects.notices(),
        vec![Notice::error("Authentication service is not available")]
    );
    Ok(())
}
