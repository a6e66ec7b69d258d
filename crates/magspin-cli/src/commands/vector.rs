use crate::cli::VectorArgs;
use crate::error::Result;
use crate::ui;
use magspin::core::models::angles::AngleUnit;
use magspin::core::models::spin::SpinVector;
use tracing::info;

pub fn report(args: &VectorArgs) -> Result<String> {
    let unit = AngleUnit::from_radians_flag(args.radians);
    let spin = SpinVector::from_angles(args.theta, args.phi, args.moment, unit, args.normal)?;
    Ok([
        ui::format_spin(&spin),
        format!("moment vector: {}", ui::format_vector(&spin.moment())),
        format!("global frame: {}", ui::format_vector(&spin.xyz())),
    ]
    .join("\n"))
}

pub fn run(args: &VectorArgs) -> Result<()> {
    info!(
        "Building spin from theta = {}, phi = {} ({})",
        args.theta,
        args.phi,
        if args.radians { "radians" } else { "degrees" }
    );
    println!("{}", report(args)?);
    Ok(())
}
