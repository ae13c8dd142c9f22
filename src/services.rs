pub mod auth_service;
pub mod credentials;
pub mod expense_service;
