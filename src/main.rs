use anyhow::Context;
use std::sync::Arc;
use subtracker::configuration::get_configuration;
use subtracker::email::SesEmailClient;
use subtracker::engine::SystemClock;
use subtracker::startup::Application;
use subtracker::storage::PostgresSubscriptionStore;
use subtracker::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("subtracker".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let store = PostgresSubscriptionStore::new(&configuration.database)
        .context("Failed to set up the subscription store.")?;
    let email_client = SesEmailClient::new(&configuration.email_client)
        .await
        .context("Failed to set up the email client.")?;

    let app = Application::build(
        &configuration,
        Arc::new(store),
        Arc::new(email_client),
        Arc::new(SystemClock),
    )
    .await
    .context("Failed to build the application.")?;
    app.server.launch().await?;
    Ok(())
}
