pub mod angles;
pub mod images;
pub mod transform;
pub mod vector;

use crate::cli::SpinArgs;
use crate::error::Result;
use magspin::core::models::spin::SpinVector;

/// Builds the normalized spin described by the shared `--vector/--moment/--normal` flags.
pub(crate) fn spin_from_args(args: &SpinArgs) -> Result<SpinVector> {
    Ok(SpinVector::from_vector(args.vector, args.moment, args.normal)?)
}
