use actix_web::HttpResponse;

use crate::{Message, ServerResult};

pub(crate) async fn get() -> ServerResult {
    Ok(HttpResponse::Ok().json(Message::new("Hello, world!")))
}
