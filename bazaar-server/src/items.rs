use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use bazaar_catalog::{Catalog, Item, NewItemRequest, validate};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::{Message, ServerResult, UploadLimit};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ItemList {
    pub(crate) items: Vec<Item>,
}

pub(crate) async fn list(catalog: web::Data<Catalog>) -> ServerResult {
    let items = web::block(move || catalog.list()).await??;
    Ok(HttpResponse::Ok().json(ItemList { items }))
}

pub(crate) async fn get(item_id: web::Path<String>, catalog: web::Data<Catalog>) -> ServerResult {
    let item_id = item_id.into_inner();
    let id: i64 = item_id
        .parse()
        .map_err(|_| RequestError::InvalidItemId(item_id.clone()))?;

    let item = web::block(move || catalog.get(id)).await??;
    Ok(HttpResponse::Ok().json(item))
}

async fn read_field(
    field: &mut Field,
    name: &str,
    limit: usize,
) -> Result<Vec<u8>, RequestError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > limit {
            return Err(RequestError::TooLarge {
                field: name.to_string(),
                limit,
            });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn text_field(name: &str, data: Vec<u8>) -> Result<String, RequestError> {
    String::from_utf8(data).map_err(|_| RequestError::Form {
        reason: format!("{name} must be valid UTF-8"),
    })
}

pub(crate) async fn add(
    mut payload: Multipart,
    limit: web::Data<UploadLimit>,
    catalog: web::Data<Catalog>,
) -> ServerResult {
    let mut name = String::new();
    let mut category = String::new();
    let mut image = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let field_name = field.name().unwrap_or_default().to_owned();
        let data = read_field(&mut field, &field_name, limit.max_bytes).await?;
        match field_name.as_str() {
            "name" => name = text_field("name", data)?,
            "category" => category = text_field("category", data)?,
            "image" => image = Some(data),
            _ => {}
        }
    }

    tracing::info!("Receive item: {}, category: {}", name, category);
    validate(&name, &category)?;
    let image = image.ok_or_else(|| RequestError::Form {
        reason: "image is required".to_string(),
    })?;

    let item = web::block(move || {
        catalog.add(NewItemRequest {
            name,
            category,
            image,
        })
    })
    .await??;

    Ok(HttpResponse::Ok().json(Message::new(format!(
        "item received: {}, category: {}",
        item.name, item.category
    ))))
}
