pub mod client;
pub mod order_book;

pub use client::ProviderClient;
pub use order_book::ExchangeClient;
