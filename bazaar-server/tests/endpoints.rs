
use server::{Result, TestServer};

fn json(body: &[u8]) -> Result<serde_json::Value> {
    Ok(serde_json::from_slice(body)?)
}

#[tokio::test]
async fn test_root_endpoint() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/").await?;
    assert_eq!(status, 200);
    assert_eq!(json(&body)?, serde_json::json!({"message": "Hello, world!"}));
    Ok(())
}

#[tokio::test]
async fn test_add_item_roundtrip() -> Result<()> {
    let server = TestServer::start().await?;

    let boundary = "bazaar-endpoint-test";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\njacket\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\nfashion\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--{boundary}--\r\n"
    );
    let content_type = format!("multipart/form-data; boundary={boundary}");
    let (status, response) = server
        .request(
            "POST",
            "/items",
            &[("Content-Type", content_type.as_str())],
            body.as_bytes(),
        )
        .await?;
    assert_eq!(status, 200, "{}", String::from_utf8_lossy(&response));
    assert_eq!(
        json(&response)?,
        serde_json::json!({"message": "item received: jacket, category: fashion"})
    );

    let (status, response) = server.get("/items").await?;
    assert_eq!(status, 200);
    let items = json(&response)?;
    assert_eq!(items["items"][0]["name"], "jacket");
    assert_eq!(items["items"][0]["category"], "fashion");
    let image = items["items"][0]["image_filename"]
        .as_str()
        .ok_or("image_filename missing")?
        .to_string();
    assert!(image.ends_with(".jpg"));

    let (status, response) = server.get(&format!("/image/{image}")).await?;
    assert_eq!(status, 200);
    assert_eq!(response, b"JPEGDATA");

    let snapshot = std::fs::read(server.root().join("items.json"))?;
    assert_eq!(json(&snapshot)?["items"], items["items"]);
    Ok(())
}

#[tokio::test]
async fn test_error_statuses() -> Result<()> {
    let server = TestServer::start().await?;

    assert_eq!(server.get("/items/42").await?.0, 404);
    assert_eq!(server.get("/items/forty-two").await?.0, 400);
    assert_eq!(server.get("/image/picture.png").await?.0, 400);

    let (status, body) = server.get("/image/missing.jpg").await?;
    assert_eq!(status, 200);
    assert_eq!(body, b"DEFAULT JPEG");

    let (status, body) = server.get("/search?keyword=jacket").await?;
    assert_eq!(status, 200);
    assert_eq!(json(&body)?, serde_json::json!({"items": []}));
    Ok(())
}
