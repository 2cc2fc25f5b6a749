use crate::handlers::prelude::*;

use crate::listing;

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub map: Option<String>,
    pub player: Option<i64>,
    /// Self-declared caller identity. Only honored when it matches the
    /// configured privileged caller, which in turn requires `--insecure`.
    pub caller: Option<String>,
}

#[get("/api/v1/matches")]
pub async fn get_matches(req: HttpRequest, info: web::Query<ListQuery>) -> HttpResult {
    let state = server_state(&req)?;
    let caller = match (
        &state.config.access_control.privileged_caller,
        &info.caller,
    ) {
        (Some(privileged), Some(claimed)) if privileged == claimed => listing::Caller::Privileged,
        _ => listing::Caller::Anonymous,
    };
    let params = listing::ListParams {
        limit: info.limit,
        offset: info.offset,
        sort: info
            .sort
            .as_deref()
            .map(listing::SortField::parse)
            .unwrap_or_default(),
        order: info
            .order
            .as_deref()
            .map(listing::SortOrder::parse)
            .unwrap_or_default(),
        map: info.map.clone(),
        player: info.player,
    };
    let listed = listing::list_matches(&state.db, &params, caller)
        .await
        .map_err(|e| {
            log::error!("Failed to list matches: {e}");
            AppHttpError::Internal
        })?;
    Ok(HttpResponse::Ok().json(listed))
}
