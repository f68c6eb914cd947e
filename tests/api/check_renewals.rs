use crate::helpers::{instant, spawn_app, subscription, CRON_SECRET};

#[tokio::test]
async fn a_missing_credential_is_rejected_without_touching_storage() {
    // arrange
    let app = spawn_app(
        instant("2024-03-14T12:00:00Z"),
        vec![subscription(1, "Netflix", 1599, "2024-03-15", "UTC", "u@x.com")],
    )
    .await;

    // act
    let response = reqwest::Client::new()
        .get(&format!("{}/check-renewals", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(app.store.list_calls(), 0);
    assert!(app.email_client.sent_emails.lock().unwrap().is_empty());
}

#[tokio::test]
async fn a_wrong_credential_is_rejected_without_touching_storage() {
    // arrange
    let app = spawn_app(instant("2024-03-14T12:00:00Z"), vec![]).await;

    // act
    let response = app.check_renewals("not-the-secret").await;

    // assert
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.store.list_calls(), 0);
}

#[tokio::test]
async fn the_credential_is_accepted_as_a_bearer_header() {
    // arrange
    let app = spawn_app(instant("2024-03-14T12:00:00Z"), vec![]).await;

    // act
    let response = reqwest::Client::new()
        .get(&format!("{}/check-renewals", &app.address))
        .header("Authorization", format!("Bearer {}", CRON_SECRET))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.store.list_calls(), 1);
}

#[tokio::test]
async fn a_subscription_renewing_tomorrow_triggers_one_reminder() {
    // arrange
    let app = spawn_app(
        instant("2024-03-14T12:00:00Z"),
        vec![subscription(1, "Netflix", 1599, "2024-03-15", "UTC", "u@x.com")],
    )
    .await;

    // act
    let response = app.check_renewals(CRON_SECRET).await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["remindersSent"][0]["email"], "u@x.com");
    assert_eq!(body["remindersSent"][0]["subscriptionCount"], 1);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);

    let emails = app.email_client.sent_emails.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].recipient, "u@x.com");
    assert_eq!(emails[0].subject, "Reminder: Netflix renews tomorrow");
    assert!(emails[0].html.contains("$15.99"));
}

#[tokio::test]
async fn due_selection_uses_the_owner_timezone_not_utc() {
    // 03:00 UTC on March 15 is still March 14 in New York, so a renewal on
    // the 15th is tomorrow for this user even though it is "today" in UTC.
    let app = spawn_app(
        instant("2024-03-15T03:00:00Z"),
        vec![subscription(
            1,
            "Netflix",
            1599,
            "2024-03-15",
            "America/New_York",
            "u@x.com",
        )],
    )
    .await;

    let response = app.check_renewals(CRON_SECRET).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["remindersSent"].as_array().unwrap().len(), 1);
    // The renewal is still in the future for its owner, so nothing rolls.
    assert_eq!(body["updatedRenewals"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn one_user_with_several_renewals_gets_one_consolidated_email() {
    // arrange
    let app = spawn_app(
        instant("2024-03-14T12:00:00Z"),
        vec![
            subscription(1, "Spotify", 999, "2024-03-15", "UTC", "u@x.com"),
            subscription(2, "Netflix", 1599, "2024-03-15", "UTC", "u@x.com"),
            subscription(3, "iCloud", 299, "2024-03-15", "UTC", "v@x.com"),
        ],
    )
    .await;

    // act
    let response = app.check_renewals(CRON_SECRET).await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["remindersSent"].as_array().unwrap().len(), 2);

    let emails = app.email_client.sent_emails.lock().unwrap();
    assert_eq!(emails.len(), 2);
    let to_u = emails.iter().find(|e| e.recipient == "u@x.com").unwrap();
    assert_eq!(to_u.subject, "Reminder: 2 subscriptions renew tomorrow");
    // Name-ascending order inside the consolidated email.
    let netflix = to_u.text.find("Netflix").unwrap();
    let spotify = to_u.text.find("Spotify").unwrap();
    assert!(netflix < spotify);
    assert!(to_u.text.contains("Total: $25.98"));
}

#[tokio::test]
async fn a_dispatch_failure_is_reported_without_failing_the_cycle() {
    // arrange
    let app = spawn_app(
        instant("2024-03-14T12:00:00Z"),
        vec![subscription(1, "Netflix", 1599, "2024-03-15", "UTC", "u@x.com")],
    )
    .await;
    app.email_client.fail_sends();

    // act
    let response = app.check_renewals(CRON_SECRET).await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["remindersSent"].as_array().unwrap().len(), 0);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["email"], "u@x.com");
    assert_eq!(errors[0]["subscriptions"][0]["name"], "Netflix");
}

#[tokio::test]
async fn a_stale_renewal_date_is_rolled_forward_and_reported() {
    // arrange
    let app = spawn_app(
        instant("2024-03-14T12:00:00Z"),
        vec![subscription(7, "Gym", 4500, "2024-01-10", "UTC", "u@x.com")],
    )
    .await;

    // act
    let response = app.check_renewals(CRON_SECRET).await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["remindersSent"].as_array().unwrap().len(), 0);
    let updated = body["updatedRenewals"].as_array().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["oldRenewalDate"], "2024-01-10");
    assert_eq!(updated[0]["newRenewalDate"], "2024-04-10");
    assert_eq!(
        app.store.renewal_date_of(7),
        "2024-04-10".parse::<chrono::NaiveDate>().unwrap()
    );
}

#[tokio::test]
async fn a_storage_failure_fails_the_cycle_with_error_detail() {
    // arrange
    let app = spawn_app(instant("2024-03-14T12:00:00Z"), vec![]).await;
    app.store.fail_reads();

    // act
    let response = app.check_renewals(CRON_SECRET).await;

    // assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("storage"));
}
