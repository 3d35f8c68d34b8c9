pub mod attendance;
pub mod event;
pub mod user;

pub use attendance::Entity as Attendance;
pub use event::Entity as Event;
pub use user::Entity as User;
