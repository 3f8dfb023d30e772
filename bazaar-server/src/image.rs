use actix_files::NamedFile;
use actix_web::{HttpRequest, Responder, web};
use bazaar_catalog::Catalog;

use crate::ServerResult;
use crate::error::IoErrorContext;

pub(crate) async fn get(
    filename: web::Path<String>,
    req: HttpRequest,
    catalog: web::Data<Catalog>,
) -> ServerResult {
    let filename = filename.into_inner();
    let path = web::block(move || catalog.image(&filename)).await??;

    Ok(NamedFile::open_async(&path)
        .await
        .io_context(format!("cannot open image: {}", path.display()))?
        .respond_to(&req))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use bazaar_catalog::{NewItemRequest, digest_filename};

    use crate::Message;
    use crate::test_support::{self, DEFAULT_IMAGE_BYTES};

    #[actix_web::test]
    async fn test_stored_image_is_served() {
        let (_tmp, catalog) = test_support::catalog();
        let item = catalog
            .add(NewItemRequest {
                name: "jacket".into(),
                category: "fashion".into(),
                image: b"JPEGDATA".to_vec(),
            })
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(catalog)
                .configure(crate::routes(test_support::LIMIT)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/image/{}", item.image_filename))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await.as_ref(), b"JPEGDATA");
    }

    #[actix_web::test]
    async fn test_missing_image_serves_default() {
        let (_tmp, catalog) = test_support::catalog();
        let app = test::init_service(
            App::new()
                .app_data(catalog)
                .configure(crate::routes(test_support::LIMIT)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/image/{}", digest_filename(b"never uploaded")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await.as_ref(), DEFAULT_IMAGE_BYTES);
    }

    #[actix_web::test]
    async fn test_wrong_extension_is_rejected() {
        let (tmp, catalog) = test_support::catalog();
        // present on disk, still rejected
        std::fs::write(tmp.path().join("images").join("default.png"), b"PNG").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(catalog)
                .configure(crate::routes(test_support::LIMIT)),
        )
        .await;

        for uri in ["/image/default.png", "/image/default"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body: Message = test::read_body_json(resp).await;
            assert_eq!(body.message, "Image path does not end with .jpg");
        }
    }
}
