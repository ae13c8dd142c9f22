pub mod auth;
pub mod category;
pub mod expense;
pub mod filters;
pub mod user;

pub use auth::{AuthToken, CredentialsRequest, LoginResponse, RegisterResponse};
pub use category::{
    CategoryList, CategoryTotal, ALL_CATEGORIES, FALLBACK_CATEGORY, SUGGESTED_CATEGORIES,
};
pub use expense::{CreateExpenseRequest, Expense, ExpenseChanges, NewExpense, UpdateExpenseRequest};
pub use filters::{ExpenseFilter, ExpenseQuery};
pub use user::User;
