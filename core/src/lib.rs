pub mod codec;
pub mod error;
pub mod ffi;
pub mod ledger;
pub mod location;
pub mod location_mock;
pub mod models;
pub mod settings;
pub mod storage;

uniffi::include_scaffolding!("fishcount");

pub use error::{LedgerError, LocationError, StoreError};
pub use ffi::{CatchRecordView, CounterSnapshot, FishCounter, LocationFeed};
pub use ledger::{CatchLedger, Status};
pub use location::{LocationCache, LocationProvider, LocationState};
pub use models::{map_url, CatchRecord, Coordinate, RecordId};
pub use settings::{DecrementMode, LedgerSettings};
pub use storage::{FileStore, KeyValueStore, LedgerStore, MemoryStore};
