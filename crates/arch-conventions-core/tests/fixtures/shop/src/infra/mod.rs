mod repository_impl;

pub use repository_impl::SqlOrderRepositoryImpl;

pub type Connection = String;
