pub mod attendance;
pub mod dashboard;

pub use attendance::AttendanceService;
pub use dashboard::DashboardService;
