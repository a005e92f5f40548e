//! Output generation for a finished briefing.
//!
//! # Submodules
//!
//! - [`console`]: Writes the briefing as numbered text panels to any `io::Write` sink
//! - [`html`]: Renders a standalone HTML document and saves it under the output directory
//!
//! Both renderers zip articles and summaries positionally; when the two lists
//! differ in length the surplus of the longer one is ignored.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_briefing_technology_20250506_080000.html
//! └── news_briefing_health_20250507_080000.html
//! ```

pub mod console;
pub mod html;

use crate::models::Category;

/// Header line shared by the console and HTML renderers.
pub fn briefing_title(category: Category) -> String {
    format!("Daily News Briefing - {}", category.title())
}
