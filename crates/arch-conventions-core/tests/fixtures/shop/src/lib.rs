pub mod domain;
pub mod infra;

pub struct AppConfig {
    pub name: String,
}
