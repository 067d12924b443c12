use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Deserialize;

use crate::engine::{Doctor, EngineError, OpdEngine, Source};
use crate::seed;

/// In-memory application state: the engine owns all schedules (in
/// production, back this with a database).
pub struct AppState {
    pub engine: OpdEngine,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    doctor_id: String,
    patient_name: String,
    source: Source,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayRequest {
    doctor_id: String,
    slot_id: String,
    delay_minutes: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    doctor_id: String,
    slot_id: String,
    token_index: usize,
}

fn error_response(err: &EngineError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        EngineError::NotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
    }
}

// Register a doctor with their daily slot schedule
async fn create_doctor(
    req: web::Json<Doctor>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let doctor = req.into_inner();
    match state.engine.add_doctor(doctor.clone()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Doctor added",
            "doctor": doctor
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Book a token for a patient
async fn book_token(req: web::Json<BookRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    match state
        .engine
        .request_token(&req.doctor_id, &req.patient_name, req.source)
    {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e) => Ok(error_response(&e)),
    }
}

// Report a slot delay; shifts all later slots of the doctor
async fn report_delay(
    req: web::Json<DelayRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state
        .engine
        .report_delay(&req.doctor_id, &req.slot_id, req.delay_minutes)
    {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Delay reported"
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Cancel the token at a display rank within a slot
async fn cancel_token(
    req: web::Json<CancelRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let success = state
        .engine
        .cancel_token(&req.doctor_id, &req.slot_id, req.token_index);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": success })))
}

// Full state for the dashboard: doctor id -> doctor with ranked token lists
async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.engine.snapshot()))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/dashboard.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Route table shared by the server and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/doctors", web::post().to(create_doctor))
        .route("/book", web::post().to(book_token))
        .route("/event/delay", web::post().to(report_delay))
        .route("/cancel", web::post().to(cancel_token))
        .route("/dashboard", web::get().to(dashboard));
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let engine = OpdEngine::new();
    seed::seed_demo_doctors(&engine);
    let app_state = web::Data::new(AppState { engine });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((bind_addr.as_str(), port))?
    .run()
    .await
}
