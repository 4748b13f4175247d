//! In-process stand-in for the classification service.

use std::sync::Mutex;

use actix_multipart::Multipart;
use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpResponse, HttpServer, web};
use futures::{StreamExt, TryStreamExt};
use serde_json::json;

type Received = web::Data<Mutex<Vec<Vec<u8>>>>;

pub struct StubServer {
    base: String,
    received: Received,
    handle: ServerHandle,
}

impl StubServer {
    pub async fn start() -> Self {
        let received: Received = web::Data::new(Mutex::new(Vec::new()));
        let data = received.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/predict", web::post().to(predict))
                .route("/broken", web::post().to(broken))
                .route("/garbage", web::post().to(garbage))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base: format!("http://{}", addr),
            received,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Bytes of every `image` field received so far.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn predict(received: Received, mut payload: Multipart) -> HttpResponse {
    let mut image = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let is_image = field
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("name=\"image\""));

        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(data) if is_image => image.extend_from_slice(&data),
                Ok(_) => {}
                Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
            }
        }
    }

    if image.is_empty() {
        return HttpResponse::BadRequest().body("missing image field");
    }

    received.lock().unwrap().push(image);
    HttpResponse::Ok().json(json!({
        "class_name": "benign",
        "confidence_score": 92.5
    }))
}

async fn broken() -> HttpResponse {
    HttpResponse::InternalServerError().body("model crashed")
}

async fn garbage() -> HttpResponse {
    HttpResponse::Ok().body("not json")
}
