use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use exam_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{admin_auth, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool, config);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let admin_api = Router::new()
        .route(
            "/api/admin/exams",
            get(routes::exam_routes::list_exams).post(routes::exam_routes::upsert_exam),
        )
        .route(
            "/api/admin/exams/:title/questions",
            get(routes::exam_routes::list_questions).post(routes::exam_routes::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            axum::routing::patch(routes::exam_routes::update_question)
                .delete(routes::exam_routes::delete_question),
        )
        .route(
            "/api/admin/notifications",
            post(routes::notification_routes::create_notification),
        )
        .route(
            "/api/admin/notifications/:id",
            axum::routing::delete(routes::notification_routes::delete_notification),
        )
        .route(
            "/api/admin/materials",
            post(routes::material_routes::upload_material),
        )
        .route(
            "/api/admin/materials/:id",
            axum::routing::delete(routes::material_routes::delete_material),
        )
        .route(
            "/api/admin/orders/:order_id",
            get(routes::payment_routes::get_order),
        )
        .route(
            "/api/admin/payments/:payment_id",
            get(routes::payment_routes::get_payment),
        )
        .layer(axum::middleware::from_fn_with_state(
            admin_auth::new_admin_state(config.admin_api_key.clone()),
            admin_auth::admin_key_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new("admin", config.admin_rps),
            rate_limit::rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/save-answer", post(routes::answer_routes::save_answer))
        .route(
            "/api/save-all-answers",
            post(routes::answer_routes::save_all_answers),
        )
        .route(
            "/api/timeout-save-answers",
            post(routes::answer_routes::timeout_save_answers),
        )
        .route(
            "/api/complete-exam",
            post(routes::answer_routes::complete_exam),
        )
        .route(
            "/api/today-exam-results",
            get(routes::result_routes::today_exam_results),
        )
        .route(
            "/api/all-exam-results",
            get(routes::result_routes::all_exam_results),
        )
        .route(
            "/api/candidate-answers/:registration_id",
            get(routes::answer_routes::candidate_answers),
        )
        .route("/api/exams/today", get(routes::exam_routes::today_exam))
        .route(
            "/api/exams/:title/questions",
            get(routes::exam_routes::public_questions),
        )
        .route(
            "/api/candidates/register",
            post(routes::candidate_routes::register_candidate),
        )
        .route(
            "/api/candidates/:registration_id",
            get(routes::candidate_routes::get_candidate),
        )
        .route(
            "/api/candidates/:registration_id/start",
            post(routes::candidate_routes::start_exam),
        )
        .route(
            "/api/notifications",
            get(routes::notification_routes::list_notifications),
        )
        .route(
            "/api/notifications/poll",
            get(routes::notification_routes::poll_notifications),
        )
        .route(
            "/api/materials",
            get(routes::material_routes::list_materials),
        )
        .route(
            "/api/payment/create-order",
            post(routes::payment_routes::create_order),
        )
        .route(
            "/api/payment/verify",
            post(routes::payment_routes::verify_payment),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new("public", config.public_rps),
            rate_limit::rps_middleware,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(admin_api)
        .merge(public_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
