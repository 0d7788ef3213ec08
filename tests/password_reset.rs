mod common;

use axum::http::StatusCode;

use common::{anonymous_post, app, flash, send};
use italia_app::domain::User;
use italia_app::repositories::{PasswordResetRepository, UserRepository};

const EMAIL: &str = "mario@example.com";

async fn seeded(app: &italia_app::App) -> (UserRepository, PasswordResetRepository) {
    let users = UserRepository::new(app.pool.clone());
    let resets = PasswordResetRepository::new(app.pool.clone());

    let mut user = User::new("Mario", EMAIL, "vecchia-password").unwrap();
    users.save(&mut user).await.unwrap();
    resets.create(EMAIL, "abc123").await.unwrap();
    resets.create(EMAIL, "def456").await.unwrap();

    (users, resets)
}

#[tokio::test]
async fn matching_token_resets_the_password_and_revokes_every_token() {
    let app = app().await;
    let (users, resets) = seeded(&app).await;

    let (status, location, body) = send(
        &app,
        anonymous_post(
            "/password/reset",
            "email=mario%40example.com&token=abc123&password=nuova-password",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/login"));
    assert_eq!(
        flash(&body, "success_message"),
        Some("La password è stata reimpostata correttamente.")
    );

    let user = users.find_by_email(EMAIL).await.unwrap().unwrap();
    assert!(user.verify_password("nuova-password"));
    assert!(!resets.exists(EMAIL, "abc123").await.unwrap());
    assert!(!resets.exists(EMAIL, "def456").await.unwrap());
}

#[tokio::test]
async fn wrong_token_changes_nothing() {
    let app = app().await;
    let (users, resets) = seeded(&app).await;

    let (status, location, body) = send(
        &app,
        anonymous_post(
            "/password/reset",
            "email=mario%40example.com&token=zzz999&password=nuova-password",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/password/reset/zzz999"));
    assert_eq!(
        flash(&body, "error_message"),
        Some("L'indirizzo email o il token non sono corretti.")
    );
    assert_eq!(body["old_input"]["email"], EMAIL);
    assert!(body["old_input"].get("password").is_none());

    let user = users.find_by_email(EMAIL).await.unwrap().unwrap();
    assert!(user.verify_password("vecchia-password"));
    assert!(resets.exists(EMAIL, "abc123").await.unwrap());
    assert!(resets.exists(EMAIL, "def456").await.unwrap());
}

#[tokio::test]
async fn unknown_email_is_reported_like_a_wrong_token() {
    let app = app().await;
    seeded(&app).await;

    let (_, _, body) = send(
        &app,
        anonymous_post(
            "/password/reset",
            "email=luigi%40example.com&token=abc123&password=nuova-password",
        ),
    )
    .await;

    assert_eq!(
        flash(&body, "error_message"),
        Some("L'indirizzo email o il token non sono corretti.")
    );
}

#[tokio::test]
async fn short_password_is_rejected_before_any_lookup() {
    let app = app().await;
    let (_, resets) = seeded(&app).await;

    let (status, _, body) = send(
        &app,
        anonymous_post("/password/reset", "email=mario%40example.com&token=abc123&password=corta"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "password");
    assert!(resets.exists(EMAIL, "abc123").await.unwrap());
}
