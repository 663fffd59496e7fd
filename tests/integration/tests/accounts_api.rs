//! Account resources against a mock backend with a synced session.

use mc_auth::IdentityProvider;
use mc_client::{ClientError, NewAccount};
use mc_integration_tests::{user, TestEnv};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn signed_in_env() -> anyhow::Result<TestEnv> {
    let env = TestEnv::new().await?;
    env.provider.sign_in_as(user("user_1", "ops@masschat.test"), "tok-1");
    env.sync().sync(&env.provider.snapshot()).await;
    Ok(env)
}

#[tokio::test]
async fn create_then_list_accounts() -> anyhow::Result<()> {
    let env = signed_in_env().await?;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(body_json(json!({
            "name": "Support line",
            "provider": "whatsapp",
            "phoneNumber": "+5511999990000",
            "endpoint": null,
            "welcome_text": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "name": "Support line",
            "provider": "whatsapp",
            "phoneNumber": "+5511999990000"
        })))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Support line", "provider": "whatsapp"},
            {"id": 8, "name": "Sales", "provider": "telegram", "instanceId": "inst-8"}
        ])))
        .mount(&env.server)
        .await;

    let created = env
        .client
        .accounts()
        .create(&NewAccount::new("Support line", "whatsapp").with_phone_number("+5511999990000"))
        .await?;
    assert_eq!(created.id, Some(7));
    assert_eq!(created.phone_number.as_deref(), Some("+5511999990000"));

    let accounts = env.client.accounts().list().await?;
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[1].instance_id.as_deref(), Some("inst-8"));
    Ok(())
}

#[tokio::test]
async fn validation_detail_is_surfaced() -> anyhow::Result<()> {
    let env = signed_in_env().await?;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "provider"], "msg": "unsupported provider", "type": "value_error"}]
        })))
        .mount(&env.server)
        .await;

    let err = env
        .client
        .accounts()
        .create(&NewAccount::new("Support line", "fax"))
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "unsupported provider");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Non-401 failures keep the session.
    assert!(env.store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn invalid_account_never_reaches_backend() -> anyhow::Result<()> {
    let env = signed_in_env().await?;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&env.server)
        .await;

    let err = env
        .client
        .accounts()
        .create(&NewAccount::new("  ", "whatsapp"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn refresh_fetches_accounts_and_token_status() -> anyhow::Result<()> {
    let env = signed_in_env().await?;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/token-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(&env.server)
        .await;

    let snapshot = env.client.refresh().await?;
    assert_eq!(snapshot.accounts.len(), 1);
    assert_eq!(snapshot.token_status.0, json!({"valid": true}));
    Ok(())
}

#[tokio::test]
async fn refresh_with_expired_token_resets_session() -> anyhow::Result<()> {
    let env = signed_in_env().await?;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/token-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": false})))
        .mount(&env.server)
        .await;

    let err = env.client.refresh().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!env.store.is_authenticated());
    Ok(())
}
