pub mod activity_handlers;
pub mod appointment_handlers;
pub mod auth_handlers;
pub mod case_handlers;
pub mod customer_handlers;
pub mod dashboard;
pub mod file_handlers;
pub mod order_handlers;
pub mod purchase_order_handlers;
pub mod repair_handlers;
pub mod todo_handlers;
pub mod uploads;
pub mod user_handlers;
