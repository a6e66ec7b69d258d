use super::spin_from_args;
use crate::cli::{ApplyArgs, MirrorArgs, RotateArgs};
use crate::error::Result;
use crate::ui;
use magspin::core::models::angles::AngleUnit;
use magspin::core::models::spin::SpinVector;
use tracing::{debug, info};

fn before_and_after(before: &SpinVector, after: &SpinVector) -> String {
    format!(
        "before: {}\nafter:  {}",
        ui::format_vector(&before.vector()),
        ui::format_vector(&after.vector())
    )
}

pub fn rotate_report(args: &RotateArgs) -> Result<String> {
    let original = spin_from_args(&args.spin)?;
    let mut spin = original.clone();
    spin.rotate(&args.axis, args.angle, AngleUnit::from_radians_flag(args.radians))?;
    debug!("Rotated {} to {}", original, spin);
    Ok(before_and_after(&original, &spin))
}

pub fn mirror_report(args: &MirrorArgs) -> Result<String> {
    let original = spin_from_args(&args.spin)?;
    let mut spin = original.clone();
    spin.mirror(&args.plane_normal)?;
    debug!("Mirrored {} to {}", original, spin);
    Ok(before_and_after(&original, &spin))
}

pub fn apply_report(args: &ApplyArgs) -> Result<String> {
    let original = spin_from_args(&args.spin)?;
    let mut spin = original.clone();
    spin.apply_matrix(&args.matrix)?;
    debug!("Applied {}x{} matrix: {} to {}", args.matrix.nrows(), args.matrix.ncols(), original, spin);
    Ok(before_and_after(&original, &spin))
}

pub fn rotate(args: &RotateArgs) -> Result<()> {
    info!("Rotating spin by {} about {:?}", args.angle, args.axis);
    println!("{}", rotate_report(args)?);
    Ok(())
}

pub fn mirror(args: &MirrorArgs) -> Result<()> {
    info!("Mirroring spin through plane with normal {:?}", args.plane_normal);
    println!("{}", mirror_report(args)?);
    Ok(())
}

pub fn apply(args: &ApplyArgs) -> Result<()> {
    info!("Applying matrix to spin");
    println!("{}", apply_report(args)?);
    Ok(())
}
