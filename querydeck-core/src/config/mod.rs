pub use serde_yaml::{from_value, Mapping, Number, Sequence, Value};

mod sources;
pub use sources::*;
mod util;
pub use util::*;
