//! # photo-cluster CLI
//!
//! Command-line interface for the photo clusterer.
//!
//! ## Usage
//! ```bash
//! photo-cluster preview ~/Camera
//! photo-cluster organize ~/Camera --output json
//! ```

mod cli;

use photo_cluster::Result;

fn main() -> Result<()> {
    photo_cluster::init_tracing();
    cli::run()
}
