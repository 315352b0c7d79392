use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::DashboardSettings;
use crate::dashboard::build_dashboard;
use crate::html::{self, HtmlOptions};
use crate::models::TicketRecord;

/// Loaded once per server start; the source file is read-only for the
/// session so every request derives from the same table.
pub struct AppState {
    pub settings: DashboardSettings,
    pub tickets: Arc<Vec<TicketRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub category: Option<String>,
}

async fn page_handler(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> impl Responder {
    let requested = query.category.as_deref().filter(|value| !value.is_empty());
    info!(category = ?requested, "rendering dashboard page");

    let dashboard = build_dashboard(&state.tickets, &state.settings, requested);
    match html::render_page(&dashboard, &HtmlOptions { interactive: true }) {
        Ok(page) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(e) => {
            error!(error = %e, "failed to render dashboard page");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("failed to render dashboard: {e}"))
        }
    }
}

async fn dashboard_json_handler(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> impl Responder {
    let requested = query.category.as_deref().filter(|value| !value.is_empty());
    let dashboard = build_dashboard(&state.tickets, &state.settings, requested);
    HttpResponse::Ok().json(dashboard)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(page_handler))
        .route("/api/dashboard", web::get().to(dashboard_json_handler));
}

pub async fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!(bind = bind_addr, "starting dashboard server");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind_addr)?
        .run()
        .await
}
