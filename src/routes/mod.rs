pub mod quizzes;

pub mod system;

pub use quizzes::configure_quiz_routes;
pub use system::configure_system_routes;
