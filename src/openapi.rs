use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wild ERP API",
        version = "1.0.0",
        description = "Backend for a small manufacturing ERP: materials, product \
configurations, customer orders and their line items. Order-level cost and price \
totals are derived from line items and recomputed on every item change."
    ),
    tags(
        (name = "materials", description = "Raw material catalog"),
        (name = "configurations", description = "Product configurations and their bills of materials"),
        (name = "orders", description = "Customer orders and line items"),
        (name = "stats", description = "Dashboard counters"),
        (name = "health", description = "Liveness probe")
    ),
    paths(
        crate::handlers::materials::list_materials,
        crate::handlers::materials::get_material,
        crate::handlers::materials::list_material_categories,
        crate::handlers::materials::create_material,
        crate::handlers::materials::update_material,
        crate::handlers::materials::delete_material,
        crate::handlers::configurations::list_configurations,
        crate::handlers::configurations::get_configuration,
        crate::handlers::configurations::list_configuration_categories,
        crate::handlers::configurations::create_configuration,
        crate::handlers::configurations::update_configuration,
        crate::handlers::configurations::delete_configuration,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::add_order_item,
        crate::handlers::orders::update_order_item,
        crate::handlers::orders::delete_order_item,
        crate::handlers::stats::get_stats,
        crate::handlers::health::health
    ),
    components(schemas(
        crate::entities::material::Model,
        crate::entities::configuration_category::Model,
        crate::entities::configuration::Model,
        crate::entities::configuration_material::Model,
        crate::entities::order::Model,
        crate::entities::order_item::Model,
        crate::services::configurations::ConfigurationResponse,
        crate::services::configurations::ConfigurationDetail,
        crate::services::configurations::ConfigurationMaterialLine,
        crate::services::configurations::MaterialLineInput,
        crate::services::orders::OrderDetail,
        crate::services::stats::StatsResponse,
        crate::handlers::materials::CreateMaterialRequest,
        crate::handlers::materials::UpdateMaterialRequest,
        crate::handlers::configurations::CreateConfigurationRequest,
        crate::handlers::orders::CreateOrderRequest,
        crate::handlers::orders::UpdateOrderRequest,
        crate::handlers::orders::OrderItemRequest,
        crate::handlers::health::HealthResponse,
        crate::errors::ErrorResponse
    ))
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
