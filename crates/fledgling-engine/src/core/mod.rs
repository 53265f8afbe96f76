pub use self::{bird::*, pipe::*, playfield::*, rect::*};

pub(crate) mod bird;
pub(crate) mod pipe;
pub(crate) mod playfield;
pub(crate) mod rect;
