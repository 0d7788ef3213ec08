mod common;

use axum::http::StatusCode;

use common::{admin_get, admin_post, app, flash, send};
use italia_app::repositories::CategoryRepository;

#[tokio::test]
async fn categories_are_added_listed_and_deleted() {
    let app = app().await;

    let (status, location, body) = send(&app, admin_post("/admin/categories/add", "name=Rust&slug=rust")).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/admin/categories"));
    assert_eq!(
        flash(&body, "success_message"),
        Some("La categoria è stata aggiunta correttamente.")
    );
    send(&app, admin_post("/admin/categories/add", "name=Laravel&slug=laravel")).await;

    let (status, _, body) = send(&app, admin_get("/admin/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "admin.categories_index");
    let names: Vec<_> = body["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Laravel", "Rust"]);

    let (_, _, body) = send(&app, admin_get("/admin/categories/delete/rust")).await;
    assert_eq!(
        flash(&body, "success_message"),
        Some("La categoria è stata cancellata correttamente.")
    );
    let repository = CategoryRepository::new(app.pool.clone());
    assert!(repository.find_by_slug("rust").await.unwrap().is_none());

    let (_, _, body) = send(&app, admin_get("/admin/categories/delete/rust")).await;
    assert_eq!(
        flash(&body, "error_message"),
        Some("La categoria scelta è stata già rimossa.")
    );
}

#[tokio::test]
async fn duplicate_slug_keeps_the_submitted_input() {
    let app = app().await;
    send(&app, admin_post("/admin/categories/add", "name=Rust&slug=rust")).await;

    let (status, _, body) = send(&app, admin_post("/admin/categories/add", "name=Ruggine&slug=rust")).await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(
        flash(&body, "error_message"),
        Some("Problemi in fase di salvataggio. Riprovare.")
    );
    assert_eq!(body["old_input"]["name"], "Ruggine");
    assert_eq!(
        CategoryRepository::new(app.pool.clone()).get_all().await.unwrap().len(),
        1
    );
}
