//! Command trace chart for offline gain tuning

use plotters::prelude::*;

use crate::command::VelocityCommand;

#[derive(Debug, Clone, Copy)]
pub struct TraceSample {
    /// Seconds since the start of the run.
    pub t: f64,
    pub command: VelocityCommand,
}

pub fn render_command_trace(samples: &[TraceSample], path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if samples.is_empty() {
        return Err("no command samples to plot".into());
    }

    let root = BitMapBackend::new(path, (1024, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let t_max = samples.last().map(|s| s.t).unwrap_or(1.0).max(1e-3);
    let y_max = samples
        .iter()
        .flat_map(|s| [s.command.angular_z, s.command.linear_z, s.command.linear_x])
        .fold(0.0f32, |acc, v| acc.max(v.abs()))
        .max(0.1) as f64
        * 1.2;

    let mut chart = ChartBuilder::on(&root)
        .caption("Follow commands", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..t_max, -y_max..y_max)?;

    chart.configure_mesh().x_desc("Time (s)").y_desc("Command").draw()?;

    let series: [(&str, RGBColor, fn(&VelocityCommand) -> f32); 3] = [
        ("angular_z", RED, |c| c.angular_z),
        ("linear_z", BLUE, |c| c.linear_z),
        ("linear_x", GREEN, |c| c.linear_x),
    ];

    for (label, color, field) in series {
        chart
            .draw_series(LineSeries::new(
                samples.iter().map(|s| (s.t, field(&s.command) as f64)),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
