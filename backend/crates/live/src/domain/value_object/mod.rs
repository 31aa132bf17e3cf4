//! Value Object Module

pub mod car_number;
pub mod compound;
pub mod lap_time;

pub use car_number::CarNumber;
pub use compound::TyreCompound;
pub use lap_time::LapTime;
