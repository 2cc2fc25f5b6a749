use crate::handlers::prelude::*;

use autohost_api::report::FrameRequest;

use crate::ingest;

#[post("/api/v1/matches/{id}/frames")]
pub async fn post_frame(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<FrameRequest>,
) -> HttpResult {
    let state = server_state(&req)?;
    let match_id = path.into_inner();
    ingest::append_frame(&state.db, match_id, &body)
        .await
        .map_err(|e| ingest_error("Append frame", e))?;
    Ok(HttpResponse::Ok().finish())
}
