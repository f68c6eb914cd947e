use crate::helpers::{instant, spawn_app};

#[tokio::test]
async fn health_check_works() {
    // arrange
    let app = spawn_app(instant("2024-03-14T12:00:00Z"), vec![]).await;

    // act
    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert!(response.status().is_success());
    assert_eq!(response.content_length().unwrap_or(0), 0);
}
