//! chartkit
//!
//! A lightweight Rust library for normalizing, rendering, and exporting
//! analytics chart records produced by a loosely-specified backend. Pairs
//! with the `chartkit` CLI.
//!
//! ### Features
//! - Classify shape-ambiguous chart payloads into a closed set of dialects
//! - Normalize every dialect into one canonical series representation
//! - Select a presentation mode (bar, pie, line, forecast, multi-line,
//!   components) and render it to SVG/PNG
//! - Export batches as delimited tables, textual sparklines, printable HTML
//!   reports, and paced PNG snapshots
//!
//! ### Example
//! ```no_run
//! use chartkit::models::RawChartRecord;
//! use chartkit::present::{Prepared, prepare};
//!
//! let record: RawChartRecord = serde_json::from_str(
//!     r#"{"title": "Monthly Sales", "type": "line",
//!         "data": {"date": ["Jan", "Feb"], "sales": [120, 140]}}"#,
//! )?;
//! match prepare(&record) {
//!     Prepared::Chart { series, plan } => {
//!         chartkit::render::render_chart(&series, &plan, record.title(), "sales.svg", 800, 480)?;
//!     }
//!     Prepared::NoData => println!("nothing to draw"),
//!     Prepared::UpstreamError { message, .. } => eprintln!("{:?}", message),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod classify;
pub mod export;
pub mod models;
pub mod normalize;
pub mod present;
pub mod render;
pub mod snapshot;
pub mod stats;
pub mod storage;

pub use classify::{ShapeTag, classify};
pub use models::{AnalysisDocument, CanonicalSeries, RawChartRecord, SeriesPoint};
pub use normalize::normalize;
pub use present::{Prepared, PresentationMode, Selection, prepare, select_mode};
