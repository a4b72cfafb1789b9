//! Presentation Layer
//!
//! Shapes finished results for maps and tables.

pub mod presenter;

pub use presenter::{DEFAULT_ZOOM, MapMarker, MapView, ResultPresenter, TableRow};
