// Export submodules
pub mod config_files;
pub mod env_variables;

/// Route paths served by the environment service.
pub(crate) mod routes {
    pub const CONFIG_FILES: &str = "/api/config-files";
    pub const CONFIG_FILES_LOAD: &str = "/api/config-files/load";
    pub const CONFIG_FILES_SAVE: &str = "/api/config-files/save";
    pub const ENV_VARIABLES: &str = "/api/env-variables";

    pub fn env_variable(index: u64) -> String {
        format!("{ENV_VARIABLES}/{index}")
    }
}
