use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::order_set::{OrderSetService, SeaOrmOrderSetRepository};

/// Shared handler state. The order-set service is injected here instead of
/// being resolved from a global context at call time.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub order_sets: Arc<OrderSetService<SeaOrmOrderSetRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmOrderSetRepository { db: db.clone() });
        Self {
            db,
            order_sets: Arc::new(OrderSetService::new(repo)),
        }
    }
}
