// Application layer: encoding of the scheduling rules, enumeration and swaps

pub mod enumerator;
pub mod hard_constraints;
pub mod objective;
pub mod overlap;
pub mod scheduling;
pub mod swap;
pub mod variables;

pub use enumerator::{EnumeratorState, ScheduleEnumerator, Step};
pub use overlap::CoveringSet;
pub use scheduling::SchedulingModel;
pub use swap::{SwapFailure, SwapRequest};
pub use variables::VariableMap;
