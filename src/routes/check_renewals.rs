use crate::engine::{run_reminder_cycle, CycleError, CycleSummary, EngineContext};
use crate::guards::CronSecret;
use crate::routes::error_chain_fmt;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::{json, Json};
use rocket::{Request, State};
use uuid::Uuid;

/// The entry point the external cron trigger hits. One call runs one full
/// reminder cycle and reports what was sent, what was rolled forward and
/// what failed along the way.
#[tracing::instrument(
    name = "Check renewals",
    skip(_auth, ctx),
    fields(request_id = %Uuid::new_v4())
)]
#[get("/check-renewals")]
pub async fn check_renewals(
    _auth: CronSecret,
    ctx: &State<EngineContext>,
) -> Result<Json<CycleSummary>, CheckRenewalsError> {
    let summary = run_reminder_cycle(ctx.inner()).await?;
    Ok(Json(summary))
}

#[derive(thiserror::Error)]
pub enum CheckRenewalsError {
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

impl std::fmt::Debug for CheckRenewalsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for CheckRenewalsError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!("CheckRenewalsError: {:?}", self);
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        let mut response = body.respond_to(request)?;
        response.set_status(Status::InternalServerError);
        Ok(response)
    }
}
