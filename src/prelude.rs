pub use anyhow::{anyhow, Context, Result};
pub use bm_core::prelude::*;
pub use tracing::{debug, info};

pub use std::path::{Path, PathBuf};
