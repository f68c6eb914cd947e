use crate::bound_port;
use crate::bound_port::BoundPort;
use crate::catchers::*;
use crate::configuration::Settings;
use crate::email::Email;
use crate::engine::{Clock, EngineContext};
use crate::routes::*;
use crate::storage::SubscriptionStore;
use rocket::{Config, Ignite, Rocket};
use std::sync::Arc;

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: BoundPort,
}

impl Application {
    /// Assembles the server from settings plus the engine's collaborators.
    /// Collaborators come in as trait objects so tests can substitute an
    /// in-memory store and a capturing email client.
    pub async fn build(
        configuration: &Settings,
        store: Arc<dyn SubscriptionStore>,
        notifier: Arc<dyn Email>,
        clock: Arc<dyn Clock>,
    ) -> Result<Application, rocket::Error> {
        let (port_reporter, port) = bound_port::create_pair();
        let context = EngineContext::new(
            store,
            notifier,
            clock,
            &configuration.scheduler,
            configuration.application.base_url.clone(),
        );
        rocket::custom(Config {
            port: configuration.application.port.unwrap_or(0),
            address: configuration.application.host,
            ..Config::debug_default()
        })
        .attach(port_reporter)
        .manage(context)
        .manage(configuration.scheduler.clone())
        .mount(
            "/",
            routes![
                crate::routes::health_check::health_check,
                crate::routes::check_renewals::check_renewals
            ],
        )
        .register("/", catchers![crate::catchers::unauthorized::unauthorized])
        .ignite()
        .await
        .map(|server| Application { server, port })
    }
}
