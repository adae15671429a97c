//! Draw, move and resize named fields on a template image and save them as
//! a YAML layout document.

pub mod app;
pub mod codec;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod region;
pub mod selection;

pub use codec::{decode, decode_document, encode, suggested_file_name, Document};
pub use config::Config;
pub use geometry::{compute_fit_zoom, Corner, FieldRect, Viewport};
pub use interaction::{Annotator, Input, Mode, ModeKind, Modifiers, PointerButton};
pub use region::{FieldKind, FieldType, Region, RegionId, RegionList, TextAlign, TextStyle};
pub use selection::Selection;
