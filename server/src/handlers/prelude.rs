pub use actix_web::{get, post, web, HttpRequest, HttpResponse};
pub use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
pub use serde::{Deserialize, Serialize};

pub use autohost_db as db;

pub use crate::http_types::*;
pub use crate::server_state::*;
