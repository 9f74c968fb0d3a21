pub mod budget;
pub mod category;
pub mod expense;
pub mod notification;
pub mod profile;

pub use budget::BudgetGoals;
pub use category::Category;
pub use expense::{ExpenseLedger, ExpenseRecord, MonthBucket, NewExpenseRecord};
pub use notification::{Notification, NotificationCenter, NotificationKind};
pub use profile::{CityTier, Occupation, Profile, RiskProfile};
