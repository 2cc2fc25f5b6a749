use crate::handlers::prelude::*;

use crate::listing;

#[derive(Deserialize, Debug)]
pub struct LeaderboardQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize, Clone, Debug)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub name: String,
    pub elo: i32,
    pub elo2: i32,
    pub autoplayed: i32,
    pub autowon: i32,
    pub autolost: i32,
}

/// Players ranked by rating. Players with no rated matches yet are left
/// out; an empty profile at the starting rating says nothing.
#[get("/api/v1/leaderboard")]
pub async fn get_leaderboard(req: HttpRequest, info: web::Query<LeaderboardQuery>) -> HttpResult {
    let state = server_state(&req)?;
    let rows = db::players::Entity::find()
        .filter(db::players::Column::Autoplayed.gt(0))
        .order_by_desc(db::players::Column::Elo)
        .limit(listing::effective_limit(info.limit))
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch leaderboard: {e}");
            AppHttpError::Internal
        })?;
    let entries: Vec<LeaderboardEntry> = rows
        .into_iter()
        .map(|p| LeaderboardEntry {
            id: p.id,
            name: p.name,
            elo: p.elo,
            elo2: p.elo2,
            autoplayed: p.autoplayed,
            autowon: p.autowon,
            autolost: p.autolost,
        })
        .collect();
    Ok(HttpResponse::Ok().json(entries))
}
