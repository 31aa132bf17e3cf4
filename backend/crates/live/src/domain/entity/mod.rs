pub mod pit;
pub mod position;
pub mod race_control;
pub mod radio;
pub mod session;
pub mod snapshot;
pub mod timing;
pub mod tyre;
pub mod weather;

pub use pit::PitStop;
pub use position::CarPosition;
pub use race_control::{RaceControlCategory, RaceControlMessage, RawRaceControl};
pub use radio::RadioMessage;
pub use session::{Session, SessionKind, SessionStatus};
pub use snapshot::{DriverLive, FeedCategory, LiveSnapshot, SnapshotMode};
pub use timing::{Gap, IntervalRecord, LapRecord, LapTiming, SectorStatus, SectorTime};
pub use tyre::{StintError, TyreStint, TyreState, validate_stints};
pub use weather::{WeatherReport, WeatherSample};
