use actix_web::{HttpResponse, web};
use bazaar_catalog::Catalog;
use serde::Deserialize;

use crate::ServerResult;
use crate::items::ItemList;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    keyword: String,
}

pub(crate) async fn get(
    query: web::Query<SearchQuery>,
    catalog: web::Data<Catalog>,
) -> ServerResult {
    let keyword = query.into_inner().keyword;
    let items = web::block(move || catalog.search(&keyword)).await??;
    Ok(HttpResponse::Ok().json(ItemList { items }))
}
