pub mod availability;
pub mod booking;
pub mod lifecycle;
pub mod slots;
pub mod validate;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use lifecycle::LifecycleService;
pub use slots::SlotGenerator;
pub use validate::SlotSyntax;
