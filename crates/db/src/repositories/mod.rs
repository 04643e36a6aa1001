//! Repository layer for database operations.

mod category;
mod content;
mod dashboard;
mod lead;
mod session;
mod user;

pub use category::CategoryRepository;
pub use content::ContentRepository;
pub use dashboard::{CourseEnquiryCount, DashboardRepository, EnrolledRevenueRow};
pub use lead::LeadRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
