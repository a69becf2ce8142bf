//! Pipeline - Host-side scheduling of forced re-renders.

mod redraw;

pub use redraw::{RedrawQueue, MAX_DRAIN_RENDERS};
