pub mod auth;
pub mod class;
pub mod common;
pub mod enrollment;
pub mod repository;
pub mod session;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod transaction;
pub mod user;

pub use class::ClassRepository;
pub use enrollment::EnrollmentRepository;
pub use repository::Repository;
pub use student::StudentRepository;
pub use subject::SubjectRepository;
pub use teacher::TeacherRepository;
