mod settings;

pub use settings::{
    CapturesConfig, Config, RetryConfig, ServerConfig, SessionConfig, TomlConfig, EXAMPLE_CONFIG,
};
