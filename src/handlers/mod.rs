pub mod ops;
pub mod webhooks;
