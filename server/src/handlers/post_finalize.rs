use crate::handlers::prelude::*;

use autohost_api::report::FinalizeRequest;

use crate::ingest;

#[post("/api/v1/matches/{id}/finalize")]
pub async fn post_finalize(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<FinalizeRequest>,
) -> HttpResult {
    let state = server_state(&req)?;
    let match_id = path.into_inner();
    ingest::finalize_match(&state.db, match_id, &body)
        .await
        .map_err(|e| ingest_error("Finalize match", e))?;
    log::info!("Finalized match {match_id}");
    Ok(HttpResponse::Ok().finish())
}
