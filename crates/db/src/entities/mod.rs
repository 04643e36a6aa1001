//! Database entities.

pub mod blog;
pub mod category;
pub mod course;
pub mod enquiry;
pub mod enterprise_enquiry;
pub mod faculty;
pub mod faculty_enquiry;
pub mod faq;
pub mod placement;
pub mod session;
pub mod testimonial;
pub mod user;

pub use blog::Entity as Blog;
pub use category::Entity as Category;
pub use course::Entity as Course;
pub use enquiry::Entity as Enquiry;
pub use enterprise_enquiry::Entity as EnterpriseEnquiry;
pub use faculty::Entity as Faculty;
pub use faculty_enquiry::Entity as FacultyEnquiry;
pub use faq::Entity as Faq;
pub use placement::Entity as Placement;
pub use session::Entity as Session;
pub use testimonial::Entity as Testimonial;
pub use user::Entity as User;
