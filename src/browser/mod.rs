//! Headless capture of live pages into host snapshots.
//!
//! This is the only asynchronous part of the crate. It produces a
//! [`HostDocument`](crate::types::HostDocument) that the synchronous walker
//! consumes; nothing in here touches style translation.
//!
//! # Module Structure
//!
//! - [`capture`] - `capture_page` and its options
//! - [`playwright`] - the inline capture script, error mapping and availability checks
//!
//! # Example
//!
//! ```no_run
//! use h2f_lib::{capture_page, extract_page_data, CaptureOptions, ExtractOptions};
//!
//! # async fn example() -> h2f_lib::Result<()> {
//! let document = capture_page("https://example.com", &CaptureOptions::default()).await?;
//! let page = extract_page_data(&document, &ExtractOptions::default())?;
//! println!("{} nodes", h2f_lib::count_nodes(&page.tree));
//! # Ok(())
//! # }
//! ```

mod capture;
mod playwright;

pub use capture::{capture_page, CaptureOptions};
pub use playwright::MOCK_CAPTURE_ENV;
