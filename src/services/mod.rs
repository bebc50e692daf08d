// Business logic services

pub mod availability_service;
pub mod booking_service;
pub mod certification_service;
pub mod errors;
pub mod relationship_service;
pub mod session_service;
pub mod stats_service;
pub mod trainer_service;
pub mod user_service;

pub use availability_service::AvailabilityService;
pub use booking_service::BookingService;
pub use certification_service::CertificationService;
pub use relationship_service::RelationshipService;
pub use session_service::SessionService;
pub use stats_service::StatsService;
pub use trainer_service::TrainerService;
pub use user_service::UserService;
