use crate::client::Preserve;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "compress-img",
    about = "Compress images with the TinyPNG API",
    long_about = "compress-img sends an image to the TinyPNG (Tinify) API and saves the compressed result. \
                  By default the output is written next to the source as <name>.cmprs.<ext>; use --new to pick \
                  another name or --replace to overwrite the original. The API key is read from API_KEY \
                  (environment or .env file).",
    version,
    after_help = "EXAMPLES:\n  \
    compress-img compress photo.png\n  \
    compress-img c photo.png --new small.png --force\n  \
    compress-img compress photo.jpg --replace --preserve creation,location\n  \
    compress-img count\n  \
    compress-img rename photo.cmprs.png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "quiet",
        help = "Print each step of the run"
    )]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Compress a file",
        long_about = "Compress a file through the TinyPNG API. The output is saved as <name>.cmprs.<ext> \
                      unless --new or --replace is given. --replace takes precedence over --new."
    )]
    Compress {
        #[arg(help = "Image file to compress")]
        file: PathBuf,

        #[arg(
            short = 'n',
            long = "new",
            value_name = "NAME",
            help = "Write the compressed image to NAME"
        )]
        new_name: Option<PathBuf>,

        #[arg(short, long, help = "Replace the original file")]
        replace: bool,

        #[arg(
            short,
            long,
            help = "Overwrite the file given with --new if it already exists"
        )]
        force: bool,

        #[arg(
            long,
            value_enum,
            value_delimiter = ',',
            default_value = "creation",
            help = "Metadata to keep in the output (copyright, creation, location)"
        )]
        preserve: Vec<Preserve>,

        #[arg(long, conflicts_with = "preserve", help = "Do not keep any metadata")]
        no_preserve: bool,
    },

    #[command(
        visible_alias = "cnt",
        about = "Print the number of files compressed with the current API key"
    )]
    Count,

    #[command(
        visible_alias = "strip",
        about = "Remove .cmprs from a file's name",
        long_about = "Rename photo.cmprs.png to photo.png. Fails if photo.png already exists unless --force is given. \
                      A name without .cmprs is left untouched."
    )]
    Rename {
        #[arg(help = "File to rename")]
        file: PathBuf,

        #[arg(short, long, help = "Overwrite an existing file with the original name")]
        force: bool,
    },
}
