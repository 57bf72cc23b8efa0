pub mod format;
pub mod model;
pub mod offset;
pub mod time;
pub mod types;

pub mod prelude {
    pub use crate::{model::*, offset::*, time::*, types::*};

    pub use std::{
        cmp::Ordering,
        collections::HashMap,
        fmt::{self, Debug, Display},
    };

    pub use serde::{Deserialize, Serialize};
    pub use serde_json;
    pub use uuid::Uuid;
}
