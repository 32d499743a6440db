use super::CustomerId;

#[derive(Debug, Clone)]
pub struct Order {
    pub customer: CustomerId,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Closed,
}

pub trait OrderRepository {
    fn save(&self, order: &Order);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InMemoryOrders(Vec<Order>);

    #[test]
    fn stores_orders() {
        let _orders = InMemoryOrders(Vec::new());
    }
}
