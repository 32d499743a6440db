use crate::domain::order::{Order, OrderRepository};

pub struct SqlOrderRepositoryImpl {
    pool: ConnectionPool,
}

struct ConnectionPool;

impl OrderRepository for SqlOrderRepositoryImpl {
    fn save(&self, _order: &Order) {
        let _ = &self.pool;
    }
}
