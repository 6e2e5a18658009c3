pub mod billing;
pub mod board;
pub mod budget;
pub mod category;
pub mod expense;
pub mod goal;
pub mod project;
pub mod recurring_transaction;
pub mod sale;
pub mod task;
pub mod transaction;
pub mod user;

pub use billing::{BillingEntry, BillingProject};
pub use board::Board;
pub use budget::Budget;
pub use category::Category;
pub use expense::{Expense, ExpenseType, Frequency};
pub use goal::Goal;
pub use project::Project;
pub use recurring_transaction::RecurringTransaction;
pub use sale::Sale;
pub use task::{Task, TaskStatus};
pub use transaction::{Transaction, TxnKind, TxnSource};
pub use user::{User, UserRole};
