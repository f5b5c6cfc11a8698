use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::ingest;
use crate::ranking::{summarize, ModelSummary};
use crate::state::{Phase, Session, ViewState};
use crate::view::render_page;

/// Shared across every worker.
pub struct AppState {
    pub session: Session,
    pub aggregator: Aggregator,
    pub max_upload_bytes: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/upload").route(web::post().to(upload)))
        .service(web::resource("/api/predictions").route(web::get().to(predictions)));
}

pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    page(&state.session.snapshot())
}

pub async fn upload(mut payload: Multipart, state: web::Data<AppState>) -> Result<HttpResponse> {
    let image = match ingest::read_upload(&mut payload, state.max_upload_bytes).await? {
        Some(image) => image,
        // nothing selected: keep whatever is on screen
        None => return Ok(page(&state.session.snapshot())),
    };

    let (ticket, image) = state.session.select_image(image);
    if state.session.begin_aggregation(ticket) {
        let predictions = state.aggregator.aggregate(&image).await;
        if !state.session.complete(ticket, predictions) {
            info!(image = %image.id, "newer upload arrived while aggregating");
        }
    }

    Ok(page(&state.session.snapshot()))
}

#[derive(Debug, Serialize)]
struct ImageInfo {
    id: Uuid,
    file_name: Option<String>,
    content_type: String,
    size: usize,
    dimensions: Option<(u32, u32)>,
}

#[derive(Debug, Serialize)]
struct PredictionsResponse {
    phase: Phase,
    cycle: u64,
    image: Option<ImageInfo>,
    models: Vec<ModelSummary>,
}

pub async fn predictions(state: web::Data<AppState>) -> HttpResponse {
    let snap = state.session.snapshot();
    let body = PredictionsResponse {
        phase: snap.phase,
        cycle: snap.cycle,
        image: snap.image.as_ref().map(|image| ImageInfo {
            id: image.id,
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            size: image.bytes.len(),
            dimensions: image.dimensions,
        }),
        models: summarize(&snap.predictions),
    };
    HttpResponse::Ok().json(body)
}

fn page(state: &ViewState) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(state))
}
