use crate::utils::parser::parse_matrix;
use clap::{Args, Parser, Subcommand};
use magspin::core::utils::directions::parse_direction;
use nalgebra::{DMatrix, Vector3};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const DIRECTION_HELP: &str = "Directions are given as 'x,y,z' triples or by name ('x', '-z', '[111]', ...).";

#[derive(Parser, Debug)]
#[command(
    author = "The magspin developers",
    version,
    about = "magspin CLI - Spin-vector geometry and magnetic symmetry images for crystal structures.",
    after_help = DIRECTION_HELP,
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the spherical angles, rotation matrix, Euler angles and global-frame vector of a spin.
    Angles(AnglesArgs),
    /// Build a spin from spherical angles and print its Cartesian components.
    Vector(VectorArgs),
    /// Rotate a spin about an arbitrary axis.
    Rotate(RotateArgs),
    /// Reflect a spin through the plane with the given normal.
    Mirror(MirrorArgs),
    /// Apply a 3x3 or 4x4 (homogeneous) matrix to a spin.
    Apply(ApplyArgs),
    /// Expand a magnetic structure file into all symmetry-equivalent sites.
    Images(ImagesArgs),
}

/// The spin a transformation command starts from.
#[derive(Args, Debug, Clone)]
pub struct SpinArgs {
    /// Spin direction; normalized before use.
    #[arg(long, value_name = "DIRECTION", allow_hyphen_values = true, value_parser = parse_direction)]
    pub vector: Vector3<f64>,

    /// Magnitude of the moment.
    #[arg(short, long, value_name = "FLOAT")]
    pub moment: Option<f64>,

    /// Reference normal (polar axis) of the spin's frame. Defaults to +z.
    #[arg(short, long, value_name = "DIRECTION", allow_hyphen_values = true, value_parser = parse_direction)]
    pub normal: Option<Vector3<f64>>,
}

#[derive(Args, Debug)]
pub struct AnglesArgs {
    #[command(flatten)]
    pub spin: SpinArgs,

    /// Report angles in radians instead of degrees.
    #[arg(long)]
    pub radians: bool,
}

#[derive(Args, Debug)]
pub struct VectorArgs {
    /// Azimuthal angle in the frame's xy-plane.
    #[arg(short, long, value_name = "ANGLE", allow_hyphen_values = true)]
    pub theta: f64,

    /// Polar angle from the frame's z axis.
    #[arg(short, long, value_name = "ANGLE", allow_hyphen_values = true)]
    pub phi: f64,

    /// Magnitude of the moment.
    #[arg(short, long, value_name = "FLOAT")]
    pub moment: Option<f64>,

    /// Reference normal (polar axis). Defaults to +z.
    #[arg(short, long, value_name = "DIRECTION", allow_hyphen_values = true, value_parser = parse_direction)]
    pub normal: Option<Vector3<f64>>,

    /// Interpret the angles as radians instead of degrees.
    #[arg(long)]
    pub radians: bool,
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    #[command(flatten)]
    pub spin: SpinArgs,

    /// Rotation axis.
    #[arg(short, long, value_name = "DIRECTION", allow_hyphen_values = true, value_parser = parse_direction)]
    pub axis: Vector3<f64>,

    /// Rotation angle (right-hand rule about the axis).
    #[arg(long, value_name = "ANGLE", allow_hyphen_values = true)]
    pub angle: f64,

    /// Interpret the angle as radians instead of degrees.
    #[arg(long)]
    pub radians: bool,
}

#[derive(Args, Debug)]
pub struct MirrorArgs {
    #[command(flatten)]
    pub spin: SpinArgs,

    /// Normal of the mirror plane.
    #[arg(long, value_name = "DIRECTION", allow_hyphen_values = true, value_parser = parse_direction)]
    pub plane_normal: Vector3<f64>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub spin: SpinArgs,

    /// Matrix rows separated by ';' and entries by ',', e.g. '0,-1,0;1,0,0;0,0,1'.
    #[arg(long, value_name = "ROWS", allow_hyphen_values = true, value_parser = parse_matrix)]
    pub matrix: DMatrix<f64>,
}

#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Path to the magnetic structure file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write the images as CSV to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Expansion settings file (TOML), overriding the structure's `[settings]` table.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the fractional-coordinate tolerance for merging duplicate positions.
    #[arg(short, long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub tolerance: Option<f64>,

    /// Keep image positions outside the unit cell instead of wrapping them into [0, 1).
    #[arg(long)]
    pub no_wrap: bool,
}
