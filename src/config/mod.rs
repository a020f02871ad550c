mod settings;

pub use settings::{
    ChannelConfig, LogFormat, LoggingConfig, PatternConfig, PipelineConfig, Settings,
};
