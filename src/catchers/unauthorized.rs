use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};

#[catch(401)]
pub fn unauthorized() -> status::Custom<Json<Value>> {
    status::Custom(
        Status::Unauthorized,
        Json(json!({ "error": "Unauthorized" })),
    )
}
