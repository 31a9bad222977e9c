use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Paragraph,
    },
    Frame,
};

use pimem::report::{chart_series, ChartPoint};

use crate::App;

/// Compute X and Y canvas bounds for the progress chart. Points sit at
/// whole x positions; y leaves headroom for the labels printed above them.
pub fn compute_chart_params(points: &[ChartPoint]) -> ([f64; 2], [f64; 2]) {
    let highest = points.iter().map(|p| p.y).fold(0.0, f64::max);
    let last_x = points.last().map_or(0.0, |p| p.x);

    let x_bounds = [-0.5, last_x + 0.5];
    let y_bounds = [0.0, (highest * 1.25).max(highest + 2.0)];
    (x_bounds, y_bounds)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

pub fn render_progress_graph(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let points = match chart_series(app.game.scores()) {
        Ok(points) => points,
        Err(_) => {
            let empty = Paragraph::new("No scores to plot yet! Play some games first.")
                .alignment(Alignment::Center);
            f.render_widget(empty, chunks[0]);
            return;
        }
    };

    let (x_bounds, y_bounds) = compute_chart_params(&points);
    let label_lift = (y_bounds[1] - y_bounds[0]) * 0.06;
    let line_color = Color::Blue;

    let canvas = Canvas::default()
        .block(
            Block::bordered().title(Span::styled(
                "Pi Memory Game Progress Over Time",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].x,
                    y1: pair[0].y,
                    x2: pair[1].x,
                    y2: pair[1].y,
                    color: line_color,
                });
            }
            let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::LightBlue,
            });
            ctx.layer();
            for p in &points {
                ctx.print(p.x, p.y + label_lift, p.label.clone());
            }
        });
    f.render_widget(canvas, chunks[0]);

    let first = points.first().map(|p| p.date.to_string()).unwrap_or_default();
    let last = points.last().map(|p| p.date.to_string()).unwrap_or_default();
    let axis = Paragraph::new(format!(
        "Date: {first} .. {last}   Score (digits): 0 .. {}",
        format_label(y_bounds[1])
    ))
    .alignment(Alignment::Center)
    .style(Style::default().add_modifier(Modifier::DIM));
    f.render_widget(axis, chunks[1]);

    let legend = Paragraph::new(Span::styled(
        "(b)ack / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(legend, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(x: f64, y: f64) -> ChartPoint {
        ChartPoint {
            x,
            y,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            label: format_label(y),
        }
    }

    #[test]
    fn test_compute_chart_params_single_point() {
        let (x, y) = compute_chart_params(&[point(0.0, 0.0)]);
        assert_eq!(x, [-0.5, 0.5]);
        assert_eq!(y, [0.0, 2.0]);
    }

    #[test]
    fn test_compute_chart_params_leaves_headroom() {
        let (x, y) = compute_chart_params(&[point(0.0, 40.0), point(1.0, 20.0), point(2.0, 12.0)]);
        assert_eq!(x, [-0.5, 2.5]);
        assert_eq!(y, [0.0, 50.0]);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(50.0), "50");
        assert_eq!(format_label(2.34), "2.3");
    }
}
