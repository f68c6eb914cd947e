use crate::configuration::SchedulerSettings;
use anyhow::anyhow;
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::ExposeSecret;

/// Proof that the caller presented the shared scheduler credential, either
/// as `Authorization: Bearer <secret>` or as a `cronSecret` query
/// parameter. Requests without it never reach a handler, so a rejected
/// trigger performs no storage reads.
pub struct CronSecret(());

#[async_trait]
impl<'r> FromRequest<'r> for CronSecret {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let settings = match request.rocket().state::<SchedulerSettings>() {
            Some(settings) => settings,
            None => {
                return Error((
                    Status::InternalServerError,
                    anyhow!("Scheduler settings are not configured."),
                ))
            }
        };
        match provided_secret(request) {
            Some(provided) if provided == settings.cron_secret.expose_secret() => {
                Success(CronSecret(()))
            }
            Some(_) => Error((
                Status::Unauthorized,
                anyhow!("The scheduler credential did not match."),
            )),
            None => Error((
                Status::Unauthorized,
                anyhow!("No scheduler credential was provided."),
            )),
        }
    }
}

fn provided_secret<'r>(request: &'r Request<'_>) -> Option<&'r str> {
    if let Some(header_value) = request.headers().get_one("Authorization") {
        if let Some(token) = header_value.strip_prefix("Bearer ") {
            return Some(token);
        }
    }
    match request.query_value::<&'r str>("cronSecret") {
        Some(Ok(value)) => Some(value),
        _ => None,
    }
}
