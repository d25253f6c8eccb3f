pub mod attendance;
pub mod course;
pub mod dashboard;
pub mod dispatch;
pub mod enrollment;
pub mod profile;
pub mod seed;
pub mod transcript;
pub mod visibility;
