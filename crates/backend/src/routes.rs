use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::shared::context::AppContext;
use crate::system::auth::middleware::{
    require_account, require_active_subscription, require_auth, ACCOUNT_HEADER,
    AUTHORIZATION_HEADER,
};
use crate::system::middleware::request_logger::request_logger;

/// Routes of the application with their auth layers
pub fn configure_routes(ctx: AppContext) -> Router {
    // ========================================
    // PUBLIC
    // ========================================
    let public = Router::new()
        .route("/health", get(handlers::sys_health::health))
        .route(
            "/api/billing/webhook",
            post(handlers::a009_billing::payment_webhook),
        );

    // ========================================
    // TOKEN ONLY
    // ========================================
    let user = Router::new()
        .route(
            "/api/accounts",
            get(handlers::a001_account::list).post(handlers::a001_account::create),
        )
        .route(
            "/api/billing/plans",
            get(handlers::a009_billing::list_plans),
        )
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_auth));

    // ========================================
    // TOKEN + ACCOUNT
    // ========================================
    let account = Router::new()
        .route(
            "/api/seller-connections",
            get(handlers::a002_seller_connection::list)
                .post(handlers::a002_seller_connection::connect),
        )
        .route(
            "/api/billing/subscriptions",
            post(handlers::a009_billing::create_subscription),
        )
        .route(
            "/api/billing/subscriptions/:id/cancel",
            post(handlers::a009_billing::cancel_subscription),
        )
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_account))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_auth));

    // ========================================
    // TOKEN + ACCOUNT + ACTIVE SUBSCRIPTION
    // ========================================
    let subscribed = Router::new()
        // Dashboards
        .route(
            "/api/dashboard/sales-overview",
            get(handlers::d401_sales_overview::get_sales_overview),
        )
        .route(
            "/api/dashboard/profit-loss",
            get(handlers::d402_profit_loss::get_profit_loss),
        )
        .route(
            "/api/dashboard/ad-performance",
            get(handlers::d403_ad_performance::get_ad_performance),
        )
        .route(
            "/api/dashboard/marketplace-breakdown",
            get(handlers::d404_marketplace_breakdown::get_marketplace_breakdown),
        )
        // Data
        .route("/api/orders", get(handlers::a003_order::list))
        .route(
            "/api/products",
            get(handlers::a011_product::list).post(handlers::a011_product::save),
        )
        // Report lifecycle
        .route(
            "/api/reports",
            get(handlers::a008_amazon_report::list).post(handlers::a008_amazon_report::create),
        )
        .route(
            "/api/reports/:id",
            get(handlers::a008_amazon_report::get_by_id),
        )
        .route(
            "/api/reports/:id/verify",
            post(handlers::a008_amazon_report::verify),
        )
        .route(
            "/api/reports/:id/retrieve",
            post(handlers::a008_amazon_report::retrieve),
        )
        .route(
            "/api/finances/sync",
            post(handlers::u501_import_from_sp_api::sync_financial_events),
        )
        // Amazon Ads
        .route(
            "/api/ads/authorize-url",
            get(handlers::u502_import_from_amazon_ads::authorize_url),
        )
        .route(
            "/api/ads/callback",
            post(handlers::u502_import_from_amazon_ads::callback),
        )
        .route(
            "/api/ads/profiles",
            get(handlers::u502_import_from_amazon_ads::list_profiles),
        )
        .route(
            "/api/ads/reports",
            post(handlers::u502_import_from_amazon_ads::create_report),
        )
        // Queue
        .route("/api/tasks", post(handlers::sys_tasks::enqueue))
        .route("/api/tasks/:id", get(handlers::sys_tasks::get_by_id))
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            require_active_subscription,
        ))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_account))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(AUTHORIZATION_HEADER),
            HeaderName::from_static(ACCOUNT_HEADER),
        ]);

    Router::new()
        .merge(public)
        .merge(user)
        .merge(account)
        .merge(subscribed)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(ctx)
}
