use super::spin_from_args;
use crate::cli::AnglesArgs;
use crate::error::Result;
use crate::ui;
use magspin::core::models::angles::AngleUnit;
use tracing::{debug, info};

pub fn report(args: &AnglesArgs) -> Result<String> {
    let unit = AngleUnit::from_radians_flag(args.radians);
    let spin = spin_from_args(&args.spin)?;
    debug!("Converting {}", spin);

    let angles = spin.angles()?;
    let matrix = spin.matrix()?;
    let euler = spin.euler_angles()?;

    Ok([
        ui::format_spin(&spin),
        format!("theta: {}", ui::format_angle(angles.theta, unit)),
        format!("phi:   {}", ui::format_angle(angles.phi, unit)),
        format!("matrix:\n{}", ui::format_matrix(&matrix)),
        format!("euler (zyz): {}", ui::format_euler(&euler, unit)),
        format!("global frame: {}", ui::format_vector(&spin.xyz())),
    ]
    .join("\n"))
}

pub fn run(args: &AnglesArgs) -> Result<()> {
    info!("Computing orientation of spin {:?}", args.spin.vector);
    println!("{}", report(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;

    fn args(argv: &[&str]) -> AnglesArgs {
        let mut full = vec!["magspin", "angles"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Angles(args) => args,
            other => panic!("Expected 'angles' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn reports_angles_of_y_axis() {
        let text = report(&args(&["--vector", "y"])).unwrap();
        assert!(text.contains("theta: 90.000000 deg"));
        assert!(text.contains("phi:   90.000000 deg"));
        assert!(text.contains("global frame: [0.000000, 1.000000, 0.000000]"));
    }

    #[test]
    fn reports_radians_on_request() {
        let text = report(&args(&["--vector", "x", "--radians"])).unwrap();
        assert!(text.contains("phi:   1.570796 rad"));
    }

    #[test]
    fn reports_global_frame_for_flipped_normal() {
        let text = report(&args(&["--vector", "1,0,0", "--normal", "-z"])).unwrap();
        assert!(text.contains("global frame: [-1.000000, 0.000000, 0.000000]"));
    }

    #[test]
    fn zero_vector_is_a_geometry_error() {
        let result = report(&args(&["--vector", "0,0,0"]));
        assert!(matches!(result, Err(CliError::Geometry(_))));
    }
}
