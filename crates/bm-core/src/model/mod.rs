mod beatmap;
mod clock;
mod event;
mod light;
mod note;
mod obstacle;
mod song;

pub use self::{beatmap::*, clock::*, event::*, light::*, note::*, obstacle::*, song::*};

use crate::prelude::*;
