pub mod order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerId(pub u64);
