use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bizdash_api::config;
use bizdash_api::database::DatabaseManager;
use bizdash_api::handlers::{protected, public};
use bizdash_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting bizdash API in {:?} mode", config.environment);

    if config.database.run_migrations_on_start {
        if let Err(e) = DatabaseManager::run_migrations().await {
            tracing::error!("Migration failure: {}", e);
            std::process::exit(1);
        }
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("BIZDASH_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("bizdash API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API (JWT)
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(affiliate_routes())
        .merge(finance_routes())
        .merge(todo_routes())
        .merge(billing_routes())
        .route_layer(from_fn(jwt_auth_middleware))
}

fn auth_routes() -> Router {
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/users", get(auth::users_list))
}

fn affiliate_routes() -> Router {
    use axum::routing::put;
    use protected::affiliate::{expenses, projects, sales, stats};

    Router::new()
        .route(
            "/api/affiliate/projects",
            get(projects::list).post(projects::create),
        )
        .route(
            "/api/affiliate/projects/:id",
            put(projects::update).delete(projects::delete),
        )
        .route("/api/affiliate/sales", get(sales::list).post(sales::create))
        .route(
            "/api/affiliate/sales/:id",
            put(sales::update).delete(sales::delete),
        )
        .route(
            "/api/affiliate/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/api/affiliate/expenses/:id",
            put(expenses::update).delete(expenses::delete),
        )
        .route("/api/affiliate/stats", get(stats::get))
}

fn finance_routes() -> Router {
    use axum::routing::{post, put};
    use protected::finance::{budgets, categories, goals, recurring, stats, transactions};

    Router::new()
        .route(
            "/api/finance/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/finance/categories/:id",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/api/finance/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/api/finance/transactions/:id",
            put(transactions::update).delete(transactions::delete),
        )
        .route(
            "/api/finance/recurring",
            get(recurring::list).post(recurring::create),
        )
        .route(
            "/api/finance/recurring/:id",
            put(recurring::update).delete(recurring::delete),
        )
        .route(
            "/api/finance/budgets",
            get(budgets::list).post(budgets::create),
        )
        .route(
            "/api/finance/budgets/:id",
            put(budgets::update).delete(budgets::delete),
        )
        .route("/api/finance/goals", get(goals::list).post(goals::create))
        .route(
            "/api/finance/goals/:id",
            put(goals::update).delete(goals::delete),
        )
        .route("/api/finance/goals/:id/contribute", post(goals::contribute))
        .route("/api/finance/stats", get(stats::get))
}

fn todo_routes() -> Router {
    use axum::routing::put;
    use protected::todo::{boards, tasks};

    Router::new()
        .route("/api/todo/boards", get(boards::list).post(boards::create))
        .route(
            "/api/todo/boards/:id",
            put(boards::update).delete(boards::delete),
        )
        .route(
            "/api/todo/boards/:board_id/tasks",
            get(tasks::list).post(tasks::create),
        )
        .route(
            "/api/todo/tasks/:id",
            put(tasks::update).delete(tasks::delete),
        )
        .route("/api/todo/tasks/:id/move", put(tasks::move_task))
}

fn billing_routes() -> Router {
    use axum::routing::put;
    use protected::billing::{entries, projects};

    Router::new()
        .route(
            "/api/billing/projects",
            get(projects::list).post(projects::create),
        )
        .route(
            "/api/billing/projects/:id",
            put(projects::update).delete(projects::delete),
        )
        .route(
            "/api/billing/projects/:project_id/entries",
            get(entries::list).post(entries::create),
        )
        .route(
            "/api/billing/projects/:project_id/entries/:id",
            put(entries::update).delete(entries::delete),
        )
        .route("/api/billing/projects/:project_id/sheet", get(entries::sheet))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "bizdash API",
            "version": version,
            "description": "Business dashboard API: affiliate tracking, personal finance, todo boards and project billing",
            "endpoints": {
                "home": "/ (public)",
                "public_auth": "/auth/register, /auth/login (public - token acquisition)",
                "auth": "/api/auth/* (protected)",
                "affiliate": "/api/affiliate/* (protected)",
                "finance": "/api/finance/* (protected)",
                "todo": "/api/todo/* (protected)",
                "billing": "/api/billing/* (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
