//! Business logic services.

#![allow(missing_docs)]

pub mod category;
pub mod content;
pub mod dashboard;
pub mod forms;
pub mod lead;
pub mod session;
pub mod submission;
pub mod user;

pub use category::{CategoryInput, CategoryService};
pub use content::{ContentForm, ContentService};
pub use dashboard::{DashboardData, DashboardService};
pub use forms::{BlogForm, CourseForm, FacultyForm, FaqForm, PlacementForm, TestimonialForm};
pub use lead::{
    AssignInput, LeadCounts, LeadListQuery, LeadService, Page, UpdateNotesInput,
    UpdateStatusInput,
};
pub use session::SessionService;
pub use submission::{
    EnterpriseEnquiryInput, FacultyEnquiryInput, StudentEnquiryInput, SubmissionReceipt,
    SubmissionService,
};
pub use user::{StaffQuery, UserService};
