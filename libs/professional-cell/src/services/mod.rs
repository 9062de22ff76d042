// libs/professional-cell/src/services/mod.rs
pub mod professional;
pub mod specialty;
pub mod windows;

pub use professional::ProfessionalService;
pub use specialty::SpecialtyService;
pub use windows::WindowService;
