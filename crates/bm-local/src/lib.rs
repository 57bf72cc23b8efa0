mod controller;
pub mod fs;

pub use self::controller::*;

use std::{
    cell::RefCell,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use bm_core::{format, prelude::*};
