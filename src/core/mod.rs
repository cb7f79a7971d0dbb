pub mod dashboard_manager;

pub use dashboard_manager::DashboardManager;
