//! IO modules - billing input and output files
//!
//! - `zone_map` - station to zone CSV reader
//! - `journey_data` - tap CSV reader, grouped per user
//! - `bill_writer` - billing CSV writer

pub mod bill_writer;
pub mod journey_data;
pub mod zone_map;

// Re-export commonly used types
pub use bill_writer::BillWriter;
pub use journey_data::{read_journey_data, JourneysByUser};
pub use zone_map::{read_zone_map, StationZones};
