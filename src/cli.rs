// imgresizer/src/cli.rs
use crate::core::{Configuration, ResizeAlgorithm, DEFAULT_HEIGHT, DEFAULT_QUALITY, DEFAULT_WIDTH};
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const PROGRAM_NAME: &str = "imgResizer";

/// Short flags longer than one character, which clap cannot express.
const MULTI_CHAR_SHORTS: [(&str, &str); 3] = [
    ("-wm", "--watchMode"),
    ("-wid", "--watchInDir"),
    ("-wod", "--watchOutDir"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = PROGRAM_NAME,
    about = "Resize one image, or every image dropped into a watched directory",
    disable_help_flag = true,
    help_template = "{options}"
)]
pub struct Cli {
    /// Image file path to transform
    #[arg(short = 's', long = "imageSource", value_name = "PATH")]
    pub image_source: Option<PathBuf>,

    /// New resized image path, its extension picks the format
    #[arg(short = 'o', long = "imageOut", value_name = "PATH")]
    pub image_out: Option<PathBuf>,

    /// Width for the new image, 0 keeps the aspect ratio
    #[arg(
        short = 'w',
        long = "imageWidth",
        value_name = "INT",
        default_value_t = DEFAULT_WIDTH
    )]
    pub image_width: u32,

    /// Height for the new image, 0 keeps the aspect ratio
    #[arg(
        short = 'h',
        long = "imageHeight",
        value_name = "INT",
        default_value_t = DEFAULT_HEIGHT
    )]
    pub image_height: u32,

    /// Use watch mode (-wm), only valid option is true
    #[arg(
        long = "watchMode",
        value_name = "BOOL",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub watch_mode: bool,

    /// Directory to watch for new images (-wid) [default: ./in]
    #[arg(long = "watchInDir", value_name = "DIR")]
    pub watch_in_dir: Option<PathBuf>,

    /// Directory resized images from the watched directory go to (-wod) [default: ./out]
    #[arg(long = "watchOutDir", value_name = "DIR")]
    pub watch_out_dir: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Resampling filter
    #[arg(short = 'a', long, value_enum, default_value_t = Algorithm::Bicubic)]
    pub algorithm: Algorithm,

    /// Resize threads in watch mode, 0 uses one per CPU
    #[arg(long, value_name = "INT", default_value_t = 0)]
    pub workers: usize,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Show this message and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub help: bool,
}

impl Cli {
    /// Parse `args` (program name first) after expanding the multi-character
    /// short flags.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Fill in the directory defaults, which hang off `cwd`.
    pub fn into_configuration(self, cwd: &Path) -> Configuration {
        Configuration {
            source_path: self.image_source,
            output_path: self.image_out,
            width: self.image_width,
            height: self.image_height,
            watch_mode: self.watch_mode,
            watch_in_dir: self.watch_in_dir.unwrap_or_else(|| cwd.join("in")),
            watch_out_dir: self.watch_out_dir.unwrap_or_else(|| cwd.join("out")),
            show_help: self.help,
            quality: self.quality,
            algorithm: self.algorithm.into(),
            workers: self.workers,
            verbose: self.verbose,
        }
    }
}

pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| match arg.to_str().and_then(expand_short) {
            Some(expanded) => expanded,
            None => arg,
        })
        .collect()
}

fn expand_short(text: &str) -> Option<OsString> {
    MULTI_CHAR_SHORTS.iter().find_map(|(short, long)| {
        if text == *short {
            return Some(OsString::from(*long));
        }
        text.strip_prefix(short)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| OsString::from(format!("{}={}", long, value)))
    })
}

/// One line describing a parse failure, without clap's usage footer.
pub fn parse_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

pub fn help_text() -> String {
    let mut text = String::new();

    text.push_str("Usage Examples:\n\n");
    text.push_str("Single Image:\n");
    text.push_str(&format!(
        "{} -s {{PATH_TO_SOURCE_IMG}} -o {{PATH_FOR_RESIZED_IMG}} \
         -w {{INT_WIDTH}} -h {{INT_HEIGHT}}\n\n",
        PROGRAM_NAME
    ));
    text.push_str("Watch a directory:\n");
    text.push_str(&format!(
        "{} -wm true -wid {{DIR_TO_WATCH}} -wod {{OUTPUT_DIR}} \
         -w {{INT_WIDTH}} -h {{INT_HEIGHT}}\n\n",
        PROGRAM_NAME
    ));
    text.push_str("Notes:\n");
    text.push_str(&format!(
        "Without a width or height the resize is {} wide by {} high. \
         Pass 0 for either width or height to keep the aspect ratio.\n\n",
        DEFAULT_WIDTH, DEFAULT_HEIGHT
    ));
    text.push_str(&format!(
        "Without watch directories, 'in' and 'out' are created in the directory {} runs from.\n\n",
        PROGRAM_NAME
    ));
    text.push_str("Options:\n");
    text.push_str(&Cli::command().render_help().to_string());

    text
}
