use crate::handlers::prelude::*;

use autohost_api::report::{CreateMatchRequest, CreateMatchResponse};

use crate::ingest;

#[post("/api/v1/matches")]
pub async fn post_create_match(
    req: HttpRequest,
    body: web::Json<CreateMatchRequest>,
) -> HttpResult {
    let state = server_state(&req)?;
    let match_id = ingest::create_match(&state.db, &body)
        .await
        .map_err(|e| ingest_error("Create match", e))?;
    log::info!("Created match {match_id} on map {:?}", body.game.map_name);
    Ok(HttpResponse::Ok().json(CreateMatchResponse { match_id }))
}
