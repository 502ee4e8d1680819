mod defaults;
mod loader;

pub use defaults::NodeSettings;
pub use loader::{get_default_config, load_configuration, load_node_settings, write_config_to};
