// Configuration: YAML file, platform directories.

mod loader;
mod types;

pub use loader::{
    APP_DIR_NAME, CONFIG_FILE_NAME, default_config_dir, default_data_root, load, load_file,
    resolve_data_root,
};
pub use types::{Config, StorageEngineConnectionConfig};
