/// URL for accessing the PostgreSQL database holding invoices and users
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. Accepts [EnvFilter directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Address the HTTP server binds to, such as 0.0.0.0:8080
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Bind address used when [SERVER_ADDRESS] is unset
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";
