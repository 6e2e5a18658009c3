// /api/finance/* - transactions, categories, recurring, budgets, goals
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod recurring;
pub mod stats;
pub mod transactions;
