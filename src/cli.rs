use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nAboutCode, version ",
    env!("CARGO_PKG_VERSION"),
    "\nABOUT spec version: 3.0 http://dejacode.org\n",
    "Copyright (c) 2013-2016 nexB Inc. All rights reserved."
);

#[derive(Parser, Debug)]
#[command(
    name = "about",
    version,
    long_version = LONG_VERSION,
    about = "Inventory, generate and attribute ABOUT files"
)]
pub struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        default_value_t = 30,
        value_name = "LEVEL",
        help = "Lowest severity level printed and logged (CRITICAL=50, ERROR=40, WARNING=30, INFO=20, NOTSET=0)"
    )]
    pub verbose: u8,
    #[arg(short, long, global = true, help = "Do not print any output")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inventory components from an ABOUT file or a directory tree of ABOUT files.
    Inventory {
        /// ABOUT file, directory of ABOUT files, or .zip of them
        location: PathBuf,
        /// Inventory file to write (.csv, or any name with --format json)
        output: PathBuf,
        #[arg(long, help = "Overwrites the output file if it exists")]
        overwrite: bool,
        #[arg(
            short,
            long,
            default_value = "csv",
            value_name = "STYLE",
            help = "Output format: csv or json"
        )]
        format: String,
    },
    /// Generate ABOUT files from a CSV or JSON inventory.
    Gen {
        /// Inventory file (.csv or .json)
        location: PathBuf,
        /// Directory to write ABOUT files to
        output: PathBuf,
        #[arg(long, help = "Rename inventory columns with the [mapping] table of the settings file")]
        mapping: bool,
        #[arg(
            long = "license_text_location",
            value_name = "DIR",
            help = "Copy the license files named by the inventory from this directory"
        )]
        license_text_location: Option<PathBuf>,
        #[arg(
            long = "extract_license",
            num_args = 2,
            value_names = ["API_URL", "API_KEY"],
            help = "Fetch license texts from a DejaCode license library and write <key>.LICENSE files"
        )]
        extract_license: Option<Vec<String>>,
    },
    /// Export ABOUT files as a zip archive.
    Export,
    /// Update ABOUT files with license data from a license library.
    Fetch,
    /// Generate an attribution document from ABOUT files.
    Attrib {
        /// ABOUT file, directory of ABOUT files, or .zip of them
        location: PathBuf,
        /// Attribution document to write
        output: PathBuf,
        /// CSV/JSON listing the about_file_path entries to include
        inventory_location: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Custom template with a {{ components }} placeholder")]
        template: Option<PathBuf>,
        #[arg(long, help = "Rename fields with the [mapping] table of the settings file")]
        mapping: bool,
    },
    /// Collect redistributable code and its ABOUT files.
    Redist {
        /// ABOUT file, directory of ABOUT files, or .zip of them
        location: PathBuf,
        /// Directory to copy redistributable files into
        output: PathBuf,
        /// CSV/JSON listing the about_file_path entries to include
        inventory_location: Option<PathBuf>,
    },
}
