// Service layer for dependency injection and testability
//
// Configuration lives behind the ConfigService trait so the builder and the
// CLI can be exercised with mock settings and no real environment.
//
// Usage Example:
//     // Production code
//     let config = Arc::new(EnvConfigService::load()?);
//     let deps = AppBuilder::new().with_config(config).build()?;
//
//     // Test code
//     let config = Arc::new(create_mock_config());
//     let deps = AppBuilder::new().with_config(config).with_llm_adapter(mock_llm).build()?;

pub mod config;
#[cfg(test)]
pub mod mocks;
pub mod traits;

// Re-export commonly used types
pub use config::{validate_max_results, EnvConfigService};
pub use traits::ConfigService;
