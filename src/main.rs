//! # MGA Feed Assay Processor
//!
//! Command-line tool that turns a chromatography data system export into an
//! MGA feed assay report.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive: prompts for anything the export does not carry
//! mga-assay run1.txt
//!
//! # Unattended
//! mga-assay run1.txt --standard-conc 1000 --expected-potency 2000 \
//!     --average positional --default-weight 1 --default-dilution 1
//!
//! # Lab defaults from a config file
//! mga-assay run1.txt --config mga-assay.toml -v
//! ```

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
