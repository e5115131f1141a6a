//! Filter options and equality filters over an uploaded table.
//!
//! - [`derive_options()`]: distinct values per designated column, from the unfiltered table
//! - [`matches()`] / [`filter_rows()`]: row membership for a [`FilterSelection`]
//!
//! ## Example: options → selection → filtered rows
//!
//! ```rust
//! use dashboard_data::filtering::{derive_options, filter_rows, FilterSelection};
//! use dashboard_data::ingestion::csv::{ingest_csv_from_bytes, DEFAULT_DELIMITER};
//!
//! let table = ingest_csv_from_bytes(b"Name,Country\nAlice,US\nBob,\n\nCara,UK\n", DEFAULT_DELIMITER)
//!     .unwrap();
//! assert_eq!(table.row_count(), 3);
//!
//! let options = derive_options(&table, &["Country"]);
//! let labels: Vec<&str> = options.get("Country").unwrap().labels().collect();
//! assert_eq!(labels, vec!["UK", "US"]);
//!
//! let selection = FilterSelection::new().with("Country", "UK");
//! let rows = filter_rows(&table, &selection);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("Name").unwrap().to_string(), "Cara");
//! ```

pub mod options;
pub mod predicate;

pub use options::{FilterOptions, OptionSet, derive_options};
pub use predicate::{FilterSelection, filter_rows, matches, matching_indices};
