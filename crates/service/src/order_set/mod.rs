pub mod repository;
pub mod service;

pub use repository::{OrderSetRepository, SeaOrmOrderSetRepository};
pub use service::OrderSetService;
